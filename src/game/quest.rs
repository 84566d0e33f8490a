//! Quest Progression
//!
//! Fixed arena of N (chapter, location, puzzle) triples, indexed `0..N`.
//! Progression is linear: solving puzzle `i` unlocks chapter and location
//! `i + 1`. Chapter 0 and location 0 are unlocked from the start.
//!
//! Out-of-range indices are logged and answered with `None`; nothing here
//! panics on bad input.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::chapter::{Chapter, ChapterData};
use super::events::QuestEvent;
use super::location::{Location, LocationData, LocationHelpStep};
use super::puzzle::{HelpStep, Puzzle, PuzzleData};
use super::session::GameSession;
use crate::config::{ConfigError, QuestDefinition};

/// Plain-data copy of all quest progress, one list per entity kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestSnapshot {
    /// Location flags in quest order.
    pub locations: Vec<LocationData>,
    /// Chapter flags in quest order.
    pub chapters: Vec<ChapterData>,
    /// Puzzle flags in quest order.
    pub puzzles: Vec<PuzzleData>,
}

/// The whole treasure hunt.
#[derive(Clone, Debug)]
pub struct Quest {
    chapters: Vec<Chapter>,
    locations: Vec<Location>,
    puzzles: Vec<Puzzle>,
    pending_events: Vec<QuestEvent>,
}

fn lookup<'a, T>(items: &'a [T], kind: &str, index: usize) -> Option<&'a T> {
    let item = items.get(index);
    if item.is_none() {
        warn!(index, len = items.len(), "Accessed {} out of bounds", kind);
    }
    item
}

fn lookup_mut<'a, T>(items: &'a mut [T], kind: &str, index: usize) -> Option<&'a mut T> {
    let len = items.len();
    let item = items.get_mut(index);
    if item.is_none() {
        warn!(index, len, "Accessed {} out of bounds", kind);
    }
    item
}

impl Quest {
    /// Build the quest from a validated layout.
    pub fn new(definition: &QuestDefinition) -> Result<Self, ConfigError> {
        definition.validate()?;

        let mut quest = Self {
            chapters: Vec::with_capacity(definition.len()),
            locations: Vec::with_capacity(definition.len()),
            puzzles: Vec::with_capacity(definition.len()),
            pending_events: Vec::new(),
        };

        for (i, def) in definition.chapters.iter().enumerate() {
            quest.chapters.push(Chapter::new(i, def.title.clone()));
            quest.locations.push(Location::new(
                i,
                def.coordinates,
                def.clue_text.clone(),
                def.clue_text_2.clone(),
                def.image_targets.clone(),
            ));
            quest.puzzles.push(Puzzle::new(
                i,
                def.has_help_function,
                def.tier1_help_text.clone(),
                def.tier2_help_text.clone(),
            ));
        }

        quest.unlock_first();
        info!(chapters = quest.len(), "Quest loaded");
        Ok(quest)
    }

    fn unlock_first(&mut self) {
        if let Some(chapter) = self.chapters.first_mut() {
            chapter.unlock();
        }
        if let Some(location) = self.locations.first_mut() {
            location.unlock();
        }
    }

    /// Number of chapters (= locations = puzzles).
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    /// Never true for a quest built by [`Quest::new`].
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Chapter `i`.
    pub fn chapter(&self, i: usize) -> Option<&Chapter> {
        lookup(&self.chapters, "chapter", i)
    }

    /// Location `i`.
    pub fn location(&self, i: usize) -> Option<&Location> {
        lookup(&self.locations, "location", i)
    }

    /// Puzzle `i`.
    pub fn puzzle(&self, i: usize) -> Option<&Puzzle> {
        lookup(&self.puzzles, "puzzle", i)
    }

    /// All chapters in order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// All locations in order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// All puzzles in order.
    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    // =========================================================================
    // PROGRESSION
    // =========================================================================

    /// Mark puzzle `i` solved and unlock the next chapter and location.
    ///
    /// Idempotent: returns false (and changes nothing) if the puzzle was
    /// already solved or `i` is out of range.
    pub fn solve(&mut self, i: usize) -> bool {
        let Some(puzzle) = lookup_mut(&mut self.puzzles, "puzzle", i) else {
            return false;
        };
        if !puzzle.solve() {
            return false;
        }

        info!(puzzle = i, "Puzzle solved");
        self.push_event(QuestEvent::PuzzleSolved { puzzle: i });

        let next = i + 1;
        if next < self.len() {
            let chapter_changed = self.chapters[next].unlock();
            let location_changed = self.locations[next].unlock();
            if chapter_changed || location_changed {
                debug!(chapter = next, "Chapter unlocked");
                self.push_event(QuestEvent::ChapterUnlocked { chapter: next });
            }
        }
        true
    }

    /// Climb puzzle `i`'s help ladder by one step.
    ///
    /// Each hint tier counts one hint; the final skip counts one skip and
    /// solves the puzzle.
    pub fn request_help(&mut self, i: usize, session: &mut GameSession) -> Option<HelpStep> {
        let step = lookup_mut(&mut self.puzzles, "puzzle", i)?.help();

        match step {
            HelpStep::Tier1 | HelpStep::Tier2 => {
                let tier = if step == HelpStep::Tier1 { 1 } else { 2 };
                session.needed_hint();
                info!(puzzle = i, tier, "Puzzle hint used");
                self.push_event(QuestEvent::HintUsed { puzzle: i, tier });
            }
            HelpStep::Skip => {
                session.skipped_puzzle();
                info!(puzzle = i, "Puzzle skipped");
                self.push_event(QuestEvent::PuzzleSkipped { puzzle: i });
                self.solve(i);
            }
            HelpStep::None => {}
        }

        Some(step)
    }

    /// Escalate navigation help for location `i`.
    ///
    /// Only the distance step counts as a hint; the direction step is free.
    pub fn request_location_help(
        &mut self,
        i: usize,
        session: &mut GameSession,
    ) -> Option<LocationHelpStep> {
        let step = lookup_mut(&mut self.locations, "location", i)?.help();

        match step {
            LocationHelpStep::Distance => {
                session.needed_hint();
                info!(location = i, "Distance help used");
                self.push_event(QuestEvent::LocationHelpUsed { location: i, direction: false });
            }
            LocationHelpStep::Direction => {
                info!(location = i, "Direction help used");
                self.push_event(QuestEvent::LocationHelpUsed { location: i, direction: true });
            }
            LocationHelpStep::Exhausted => {}
        }

        Some(step)
    }

    /// Mark chapter `i` read. True on the first read.
    pub fn read_chapter(&mut self, i: usize) -> bool {
        let first = lookup_mut(&mut self.chapters, "chapter", i).is_some_and(|c| c.mark_read());
        if first {
            self.push_event(QuestEvent::ChapterRead { chapter: i });
        }
        first
    }

    /// Mark puzzle `i` seen. True on the first sighting.
    pub fn see(&mut self, i: usize) -> bool {
        let first = lookup_mut(&mut self.puzzles, "puzzle", i).is_some_and(|p| p.see());
        if first {
            debug!(puzzle = i, "Puzzle seen");
            self.push_event(QuestEvent::PuzzleSeen { puzzle: i });
        }
        first
    }

    /// Mark location `i` visited. True on the first visit.
    pub fn visit(&mut self, i: usize) -> bool {
        let first = lookup_mut(&mut self.locations, "location", i).is_some_and(|l| l.visit());
        if first {
            self.push_event(QuestEvent::LocationVisited { location: i });
        }
        first
    }

    /// Set the transient "in view" flag of puzzle `i`.
    pub fn set_in_view(&mut self, i: usize, in_view: bool) {
        if let Some(puzzle) = lookup_mut(&mut self.puzzles, "puzzle", i) {
            puzzle.set_in_view(in_view);
        }
    }

    /// Clear every "in view" flag.
    pub fn clear_in_view(&mut self) {
        for puzzle in &mut self.puzzles {
            puzzle.set_in_view(false);
        }
    }

    /// Apply this frame's recognised image targets.
    ///
    /// A puzzle is in view when one of its location's targets is recognised.
    /// It counts as seen (and its location as visited) only once the
    /// previous puzzle is solved.
    pub fn update_recognition<S: AsRef<str>>(&mut self, recognized: &[S]) {
        self.clear_in_view();

        for i in 0..self.len() {
            let matched = recognized
                .iter()
                .any(|target| self.locations[i].owns_target(target.as_ref()));
            if !matched {
                continue;
            }

            self.puzzles[i].set_in_view(true);
            if self.is_previous_solved(i) {
                self.see(i);
                self.visit(i);
            }
        }
    }

    /// True iff some puzzle is in view this frame.
    pub fn is_looking_at_any_puzzle(&self) -> bool {
        self.puzzles.iter().any(Puzzle::is_in_view)
    }

    /// True for puzzle 0, otherwise whether puzzle `i - 1` is solved.
    pub fn is_previous_solved(&self, i: usize) -> bool {
        i == 0 || self.puzzles.get(i - 1).is_some_and(Puzzle::is_solved)
    }

    /// The prologue puzzle is solved; the quest timer should run.
    pub fn is_started(&self) -> bool {
        self.puzzles.first().is_some_and(Puzzle::is_solved)
    }

    /// The last puzzle is solved.
    pub fn is_complete(&self) -> bool {
        self.puzzles.last().is_some_and(Puzzle::is_solved)
    }

    /// Index of the first unsolved puzzle, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.puzzles.iter().position(|p| !p.is_solved())
    }

    /// Back to a fresh quest: everything locked except chapter/location 0.
    pub fn reset(&mut self) {
        for chapter in &mut self.chapters {
            chapter.reset();
        }
        for location in &mut self.locations {
            location.reset();
        }
        for puzzle in &mut self.puzzles {
            puzzle.reset();
        }
        self.pending_events.clear();
        self.unlock_first();
        info!("Quest reset");
    }

    pub(crate) fn puzzle_mut(&mut self, i: usize) -> Option<&mut Puzzle> {
        lookup_mut(&mut self.puzzles, "puzzle", i)
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    /// Copy out all progress.
    pub fn snapshot(&self) -> QuestSnapshot {
        QuestSnapshot {
            locations: self.locations.iter().map(Location::data).collect(),
            chapters: self.chapters.iter().map(Chapter::data).collect(),
            puzzles: self.puzzles.iter().map(Puzzle::data).collect(),
        }
    }

    /// Load progress from a snapshot.
    ///
    /// A list whose length differs from the quest is reported as an error
    /// and only the overlapping prefix is applied.
    pub fn restore(&mut self, snapshot: &QuestSnapshot) {
        let n = self.len();
        for (kind, len) in [
            ("location", snapshot.locations.len()),
            ("chapter", snapshot.chapters.len()),
            ("puzzle", snapshot.puzzles.len()),
        ] {
            if len != n {
                error!(kind, saved = len, expected = n, "Inconsistent saved {} data", kind);
            }
        }

        for (location, data) in self.locations.iter_mut().zip(&snapshot.locations) {
            location.apply(*data);
        }
        for (chapter, data) in self.chapters.iter_mut().zip(&snapshot.chapters) {
            chapter.apply(*data);
        }
        for (puzzle, data) in self.puzzles.iter_mut().zip(&snapshot.puzzles) {
            puzzle.apply(*data);
        }

        // Saved data never relocks the start of the hunt
        self.unlock_first();
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Queue an event.
    pub fn push_event(&mut self, event: QuestEvent) {
        self.pending_events.push(event);
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<QuestEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn quest() -> Quest {
        Quest::new(&QuestDefinition::builtin()).unwrap()
    }

    fn unlocked(quest: &Quest) -> Vec<bool> {
        quest.chapters().iter().map(Chapter::is_unlocked).collect()
    }

    #[test]
    fn test_initial_state() {
        let q = quest();
        assert_eq!(q.len(), 7);
        assert!(q.chapter(0).unwrap().is_unlocked());
        assert!(q.location(0).unwrap().is_unlocked());
        assert!(q.chapters()[1..].iter().all(|c| !c.is_unlocked()));
        assert!(q.locations()[1..].iter().all(|l| !l.is_unlocked()));
        assert!(!q.is_looking_at_any_puzzle());
        assert_eq!(q.current_index(), Some(0));
    }

    #[test]
    fn test_scenario_solve_prologue() {
        let mut q = quest();
        assert!(q.solve(0));

        assert!(q.chapter(1).unwrap().is_unlocked());
        assert!(q.location(1).unwrap().is_unlocked());
        assert!(q.chapters()[2..].iter().all(|c| !c.is_unlocked()));
        assert!(q.locations()[2..].iter().all(|l| !l.is_unlocked()));
        assert!(q.is_started());
        assert!(!q.is_complete());

        assert!(!q.is_looking_at_any_puzzle());
        q.set_in_view(3, true);
        assert!(q.is_looking_at_any_puzzle());
    }

    #[test]
    fn test_solve_is_idempotent() {
        let mut q = quest();
        assert!(q.solve(2));
        let after_first = q.snapshot();
        let events_first = q.take_events();

        assert!(!q.solve(2));
        assert_eq!(q.snapshot(), after_first);
        assert!(q.take_events().is_empty());
        assert_eq!(
            events_first,
            vec![QuestEvent::PuzzleSolved { puzzle: 2 }, QuestEvent::ChapterUnlocked { chapter: 3 }]
        );
    }

    #[test]
    fn test_solve_last_unlocks_nothing() {
        let mut q = quest();
        let before = unlocked(&q);
        assert!(q.solve(6));
        assert_eq!(unlocked(&q), before);
        assert!(q.is_complete());
    }

    #[test]
    fn test_out_of_range_is_none() {
        let mut q = quest();
        let mut session = GameSession::new();
        assert!(q.chapter(7).is_none());
        assert!(q.location(99).is_none());
        assert!(q.puzzle(7).is_none());
        assert!(!q.solve(7));
        assert!(q.request_help(7, &mut session).is_none());
        assert!(q.request_location_help(7, &mut session).is_none());
        assert!(!q.read_chapter(7));
        q.set_in_view(7, true);
        assert!(!q.is_looking_at_any_puzzle());
        assert_eq!(session.hints_needed, 0);
    }

    #[test]
    fn test_help_ladder_counts() {
        let mut q = quest();
        let mut session = GameSession::new();

        assert_eq!(q.request_help(1, &mut session), Some(HelpStep::Tier1));
        assert_eq!((session.hints_needed, session.puzzles_skipped), (1, 0));

        assert_eq!(q.request_help(1, &mut session), Some(HelpStep::Tier2));
        assert_eq!((session.hints_needed, session.puzzles_skipped), (2, 0));

        assert_eq!(q.request_help(1, &mut session), Some(HelpStep::Skip));
        assert_eq!((session.hints_needed, session.puzzles_skipped), (2, 1));
        assert!(q.puzzle(1).unwrap().is_solved());
        assert!(q.chapter(2).unwrap().is_unlocked());

        assert_eq!(q.request_help(1, &mut session), Some(HelpStep::None));
        assert_eq!((session.hints_needed, session.puzzles_skipped), (2, 1));
    }

    #[test]
    fn test_help_on_solved_puzzle_is_noop() {
        let mut q = quest();
        let mut session = GameSession::new();
        q.solve(3);
        assert_eq!(q.request_help(3, &mut session), Some(HelpStep::None));
        assert_eq!(session.hints_needed, 0);
        assert!(!q.puzzle(3).unwrap().tier1_help_active());
    }

    #[test]
    fn test_location_help_counts_distance_only() {
        let mut q = quest();
        let mut session = GameSession::new();

        assert_eq!(q.request_location_help(2, &mut session), Some(LocationHelpStep::Distance));
        assert_eq!(session.hints_needed, 1);

        assert_eq!(q.request_location_help(2, &mut session), Some(LocationHelpStep::Direction));
        assert_eq!(session.hints_needed, 1);

        assert_eq!(q.request_location_help(2, &mut session), Some(LocationHelpStep::Exhausted));
        assert_eq!(session.hints_needed, 1);
    }

    #[test]
    fn test_recognition_requires_previous_solved_for_seen() {
        let mut q = quest();
        q.update_recognition(&["lock_box"]);
        assert!(q.puzzle(1).unwrap().is_in_view());
        assert!(q.is_looking_at_any_puzzle());
        assert!(!q.puzzle(1).unwrap().is_seen());

        q.solve(0);
        q.update_recognition(&["lock_box", "unknown_poster"]);
        assert!(q.puzzle(1).unwrap().is_seen());
        assert!(q.location(1).unwrap().is_visited());

        q.update_recognition::<&str>(&[]);
        assert!(!q.is_looking_at_any_puzzle());
        // Seen is sticky
        assert!(q.puzzle(1).unwrap().is_seen());
    }

    #[test]
    fn test_prologue_seen_immediately() {
        let mut q = quest();
        q.update_recognition(&["map_wall".to_string()]);
        assert!(q.puzzle(0).unwrap().is_seen());
    }

    #[test]
    fn test_reset_relocks_everything_but_first() {
        let mut q = quest();
        let mut session = GameSession::new();
        for i in 0..4 {
            q.solve(i);
        }
        q.read_chapter(2);
        q.request_location_help(3, &mut session);
        q.set_in_view(2, true);

        q.reset();
        let fresh = quest();
        assert_eq!(q.snapshot(), fresh.snapshot());
        assert!(!q.is_looking_at_any_puzzle());
        assert!(q.puzzles().iter().all(Puzzle::needs_reset));
        assert!(q.take_events().is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut q = quest();
        let mut session = GameSession::new();
        q.solve(0);
        q.solve(1);
        q.request_help(2, &mut session);
        q.read_chapter(1);

        let snapshot = q.snapshot();
        let mut other = quest();
        other.restore(&snapshot);
        assert_eq!(other.snapshot(), snapshot);
    }

    #[test]
    fn test_restore_with_wrong_length_applies_prefix() {
        let mut q = quest();
        let mut snapshot = q.snapshot();
        snapshot.puzzles.truncate(2);
        snapshot.puzzles[1].solved = true;
        snapshot.chapters.clear();

        q.restore(&snapshot);
        assert!(q.puzzle(1).unwrap().is_solved());
        assert!(!q.puzzle(2).unwrap().is_solved());
        assert!(q.chapter(0).unwrap().is_unlocked());
    }

    proptest! {
        #[test]
        fn test_solve_unlocks_only_next(i in 0usize..7) {
            let mut q = quest();
            let before = unlocked(&q);
            q.solve(i);
            let after = unlocked(&q);

            for j in 0..7 {
                if j == i + 1 {
                    prop_assert!(after[j]);
                    prop_assert!(q.location(j).unwrap().is_unlocked());
                } else {
                    prop_assert_eq!(after[j], before[j]);
                }
            }
        }

        #[test]
        fn test_help_is_monotonic(calls in proptest::collection::vec(0usize..7, 0..40)) {
            let mut q = quest();
            let mut session = GameSession::new();

            for i in calls {
                let before = q.puzzle(i).unwrap().data();
                let counters = session.hints_needed + session.puzzles_skipped;
                q.request_help(i, &mut session);
                let after = q.puzzle(i).unwrap().data();

                // At most one counter increment per call
                prop_assert!(session.hints_needed + session.puzzles_skipped - counters <= 1);
                // Flags never turn off
                prop_assert!(after.tier1_help_active >= before.tier1_help_active);
                prop_assert!(after.tier2_help_active >= before.tier2_help_active);
                prop_assert!(after.skipped >= before.skipped);
                // Tier 2 implies tier 1, skip implies tier 2 and solved
                prop_assert!(!after.tier2_help_active || after.tier1_help_active);
                prop_assert!(!after.skipped || (after.tier2_help_active && after.solved));
            }
        }
    }
}
