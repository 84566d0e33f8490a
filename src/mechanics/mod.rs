//! Puzzle Mechanisms
//!
//! The interactive object behind each puzzle. A mechanism only knows its
//! own physical state; the [`MechanismDriver`] ties it to the quest's
//! puzzle record so that solving, skipping and resetting stay in sync
//! with saved progress.

pub mod combination_lock;
pub mod components;
pub mod reveal;
pub mod rotating_lock;
pub mod sliding;
pub mod switches;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MechanismKind;
use crate::core::Duration;
use crate::game::quest::Quest;

pub use combination_lock::CombinationLock;
pub use reveal::Reveal;
pub use rotating_lock::{tilt_from_gravity, RotatingLock};
pub use sliding::{SlidingPuzzle, TileMove};
pub use switches::{ConnectedLevers, SoundSequence, ToggleButtons};

// =============================================================================
// FRAME
// =============================================================================

/// What a mechanism may observe during one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MechanismFrame {
    /// Time since the previous frame.
    pub dt: Duration,
    /// The puzzle's image target is recognised this frame.
    pub in_view: bool,
    /// The camera screen is the active screen.
    pub camera_active: bool,
    /// The preceding puzzle in the quest is solved.
    pub previous_solved: bool,
    /// Device roll in degrees, when a gravity reading exists.
    pub tilt_degrees: Option<f64>,
}

impl MechanismFrame {
    /// A frame that observes nothing.
    pub fn idle(dt: Duration) -> Self {
        Self {
            dt,
            in_view: false,
            camera_active: false,
            previous_solved: false,
            tilt_degrees: None,
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Behaviour shared by all puzzle mechanisms.
pub trait PuzzleMechanism {
    /// Whether the mechanism is in its solved configuration.
    fn check_if_solved(&mut self, frame: &MechanismFrame) -> bool;

    /// Back to the unsolved start configuration.
    fn reset(&mut self);

    /// Jump to the solved configuration after a skip or a restored save.
    fn on_skip(&mut self) {}

    /// The player solved it.
    fn on_solve(&mut self) {}

    /// Per-frame animation.
    fn on_update(&mut self, _frame: &MechanismFrame) {}
}

/// A puzzle that is only ever solved from outside.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NoMechanism;

impl PuzzleMechanism for NoMechanism {
    fn check_if_solved(&mut self, _frame: &MechanismFrame) -> bool {
        false
    }

    fn reset(&mut self) {}
}

// =============================================================================
// DISPATCH
// =============================================================================

/// A player input aimed at a mechanism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    /// Turn a combination dial by one digit.
    TurnDial(usize),
    /// Slide the numbered tile.
    MoveTile(u8),
    /// Pull a lever.
    PullLever(usize),
    /// Press a toggle button.
    PressButton(usize),
    /// Touch a sound button (numbered from 1).
    SoundButton(u8),
}

/// Any of the built-in mechanisms.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Mechanism {
    None(NoMechanism),
    Reveal(Reveal),
    CombinationLock(CombinationLock),
    Sliding(SlidingPuzzle),
    Levers(ConnectedLevers),
    Toggles(ToggleButtons),
    Sound(SoundSequence),
    Rotating(RotatingLock),
}

impl Mechanism {
    /// Instantiate a validated mechanism description.
    pub fn from_kind(kind: &MechanismKind) -> Self {
        match kind {
            MechanismKind::None => Self::None(NoMechanism),
            MechanismKind::Reveal { seconds } => Self::Reveal(Reveal::new(*seconds)),
            MechanismKind::CombinationLock { combination, .. } => {
                Self::CombinationLock(CombinationLock::new(combination.clone()))
            }
            MechanismKind::SlidingTiles { size, seed } => {
                Self::Sliding(SlidingPuzzle::new(*size, *seed))
            }
            MechanismKind::ConnectedLevers { count } => Self::Levers(ConnectedLevers::new(*count)),
            MechanismKind::ToggleButtons { links, .. } => {
                Self::Toggles(ToggleButtons::new(links.clone()))
            }
            MechanismKind::SoundSequence { buttons, sequence } => {
                Self::Sound(SoundSequence::new(*buttons, sequence.clone()))
            }
            MechanismKind::RotatingLock { solution } => match RotatingLock::from_slice(solution) {
                Some(lock) => Self::Rotating(lock),
                None => Self::None(NoMechanism),
            },
        }
    }

    /// Forward a player input. False if it does not apply or was ignored.
    pub fn interact(&mut self, interaction: Interaction) -> bool {
        match (self, interaction) {
            (Self::CombinationLock(lock), Interaction::TurnDial(i)) => lock.turn(i),
            (Self::Sliding(tiles), Interaction::MoveTile(k)) => tiles.move_tile(k).is_some(),
            (Self::Levers(levers), Interaction::PullLever(i)) => levers.pull(i),
            (Self::Toggles(buttons), Interaction::PressButton(i)) => buttons.press(i),
            (Self::Sound(sound), Interaction::SoundButton(n)) => sound.touch(n),
            _ => false,
        }
    }

    fn inner(&mut self) -> &mut dyn PuzzleMechanism {
        match self {
            Self::None(m) => m,
            Self::Reveal(m) => m,
            Self::CombinationLock(m) => m,
            Self::Sliding(m) => m,
            Self::Levers(m) => m,
            Self::Toggles(m) => m,
            Self::Sound(m) => m,
            Self::Rotating(m) => m,
        }
    }
}

fn marks(flags: impl Iterator<Item = bool>) -> String {
    flags.map(|on| if on { '#' } else { '.' }).collect()
}

/// One-line state summary for text front ends.
impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None(_) => write!(f, "nothing to operate"),
            Self::Reveal(m) => write!(f, "map revealed {:.0}%", m.progress() * 100.0),
            Self::CombinationLock(m) => {
                let digits: Vec<String> = m.digits().iter().map(u8::to_string).collect();
                write!(f, "dials {}", digits.join(" "))
            }
            Self::Sliding(m) => {
                let rows: Vec<String> = m
                    .tiles()
                    .chunks(m.size().max(1))
                    .map(|row| row.iter().map(u8::to_string).collect::<Vec<_>>().join(" "))
                    .collect();
                write!(f, "tiles {}", rows.join(" / "))
            }
            Self::Levers(m) => {
                write!(f, "levers {}", marks((0..m.levers().len()).map(|i| m.is_toggled(i))))
            }
            Self::Toggles(m) => write!(f, "buttons {}", marks((0..m.count()).map(|i| m.is_toggled(i)))),
            Self::Sound(m) => {
                let played: Vec<String> = m.history().iter().map(u8::to_string).collect();
                write!(f, "played {}", played.join(" "))
            }
            Self::Rotating(m) => {
                let [a, b, c] = m.cylinders();
                write!(f, "cylinders {a:.0} {b:.0} {c:.0} locked {}", marks(m.locked().into_iter()))
            }
        }
    }
}

impl PuzzleMechanism for Mechanism {
    fn check_if_solved(&mut self, frame: &MechanismFrame) -> bool {
        self.inner().check_if_solved(frame)
    }

    fn reset(&mut self) {
        self.inner().reset();
    }

    fn on_skip(&mut self) {
        self.inner().on_skip();
    }

    fn on_solve(&mut self) {
        self.inner().on_solve();
    }

    fn on_update(&mut self, frame: &MechanismFrame) {
        self.inner().on_update(frame);
    }
}

// =============================================================================
// DRIVER
// =============================================================================

/// Keeps one mechanism consistent with its puzzle record.
#[derive(Clone, Debug)]
pub struct MechanismDriver {
    mechanism: Mechanism,
    /// The current solved state was reached through this mechanism.
    solved_internally: bool,
}

impl MechanismDriver {
    pub fn new(mechanism: Mechanism) -> Self {
        Self { mechanism, solved_internally: false }
    }

    pub fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    pub fn mechanism_mut(&mut self) -> &mut Mechanism {
        &mut self.mechanism
    }

    /// Run one frame for puzzle `i`.
    ///
    /// Order per frame: pending reset, then solve detection (or syncing to
    /// a solve that happened elsewhere), then animation. `frame.in_view`
    /// and `frame.previous_solved` are filled in from the quest.
    pub fn update(&mut self, i: usize, quest: &mut Quest, frame: &MechanismFrame) {
        let previous_solved = quest.is_previous_solved(i);
        let Some(puzzle) = quest.puzzle_mut(i) else {
            return;
        };
        let frame = MechanismFrame { in_view: puzzle.is_in_view(), previous_solved, ..*frame };

        if puzzle.needs_reset() {
            self.solved_internally = false;
            self.mechanism.reset();
            puzzle.reset_over();
        }

        let solved = puzzle.is_solved();
        if !solved && self.mechanism.check_if_solved(&frame) {
            self.solved_internally = true;
            quest.solve(i);
            self.mechanism.on_solve();
        } else if solved && !self.solved_internally {
            // Skipped, or solved in a restored save
            debug!(puzzle = i, "Mechanism synced to solved state");
            self.solved_internally = true;
            self.mechanism.on_skip();
        }

        self.mechanism.on_update(&frame);
    }
}

/// One driver per chapter of `kinds`.
pub fn build_drivers<'a>(kinds: impl IntoIterator<Item = &'a MechanismKind>) -> Vec<MechanismDriver> {
    kinds
        .into_iter()
        .map(|kind| MechanismDriver::new(Mechanism::from_kind(kind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuestDefinition;
    use crate::game::session::GameSession;

    fn setup() -> (Quest, Vec<MechanismDriver>) {
        let definition = QuestDefinition::builtin();
        let quest = Quest::new(&definition).unwrap();
        let drivers = build_drivers(definition.chapters.iter().map(|c| &c.mechanism));
        (quest, drivers)
    }

    fn frame() -> MechanismFrame {
        MechanismFrame::idle(Duration::from_seconds(0.5))
    }

    fn step(quest: &mut Quest, drivers: &mut [MechanismDriver]) {
        for (i, driver) in drivers.iter_mut().enumerate() {
            driver.update(i, quest, &frame());
        }
    }

    #[test]
    fn test_reveal_solves_prologue() {
        let (mut quest, mut drivers) = setup();
        step(&mut quest, &mut drivers);
        assert!(!quest.is_started());

        quest.set_in_view(0, true);
        for _ in 0..20 {
            step(&mut quest, &mut drivers);
        }
        assert!(quest.is_started());
        assert!(quest.chapter(1).unwrap().is_unlocked());
    }

    #[test]
    fn test_combination_lock_solves_through_driver() {
        let (mut quest, mut drivers) = setup();
        quest.solve(0);
        step(&mut quest, &mut drivers);

        for (dial, digit) in [3u8, 5, 8, 7].into_iter().enumerate() {
            for _ in 0..digit {
                assert!(drivers[1].mechanism_mut().interact(Interaction::TurnDial(dial)));
                step(&mut quest, &mut drivers);
            }
        }
        step(&mut quest, &mut drivers);
        assert!(quest.puzzle(1).unwrap().is_solved());
        assert!(!quest.puzzle(1).unwrap().is_skipped());
    }

    #[test]
    fn test_skip_syncs_mechanism() {
        let (mut quest, mut drivers) = setup();
        let mut session = GameSession::new();
        quest.solve(0);
        step(&mut quest, &mut drivers);

        for _ in 0..3 {
            quest.request_help(2, &mut session);
        }
        assert!(quest.puzzle(2).unwrap().is_solved());
        step(&mut quest, &mut drivers);

        match drivers[2].mechanism() {
            Mechanism::Sliding(tiles) => {
                assert!(tiles.is_in_order());
                assert!(!tiles.is_activated());
            }
            other => panic!("unexpected mechanism {other:?}"),
        }
    }

    #[test]
    fn test_reset_reshuffles() {
        let (mut quest, mut drivers) = setup();
        step(&mut quest, &mut drivers);
        match drivers[2].mechanism() {
            Mechanism::Sliding(tiles) => assert!(!tiles.is_in_order()),
            other => panic!("unexpected mechanism {other:?}"),
        }

        quest.reset();
        step(&mut quest, &mut drivers);
        assert!(!quest.puzzle(2).unwrap().needs_reset());
    }

    #[test]
    fn test_display_summaries() {
        let lock = Mechanism::from_kind(&MechanismKind::CombinationLock {
            dials: 3,
            combination: vec![1, 2, 3],
        });
        assert_eq!(lock.to_string(), "dials 0 0 0");

        let tiles = Mechanism::from_kind(&MechanismKind::SlidingTiles { size: 2, seed: Some(1) });
        assert_eq!(tiles.to_string(), "tiles 1 2 / 3 0");

        let levers = Mechanism::from_kind(&MechanismKind::ConnectedLevers { count: 3 });
        assert_eq!(levers.to_string(), "levers ...");
    }

    #[test]
    fn test_interaction_mismatch_ignored() {
        let mut lock = Mechanism::from_kind(&MechanismKind::CombinationLock {
            dials: 2,
            combination: vec![1, 2],
        });
        assert!(!lock.interact(Interaction::MoveTile(1)));
        assert!(lock.interact(Interaction::TurnDial(0)));
    }
}
