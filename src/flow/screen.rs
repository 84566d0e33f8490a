//! Screens
//!
//! The closed set of screens the game can show. Each variant carries only
//! the state that belongs to that visit of the screen; everything that
//! outlives a visit is in the [`GameContext`].
//!
//! Lifecycle hooks come from [`ScreenHooks`]. Player input goes through
//! [`Screen::handle`] and, while a popover is up, [`Screen::handle_popover`].
//! Neither validates where a transition leads; handlers check the quest
//! before offering or taking a route.

use std::fmt;

use tracing::{debug, info};

use super::view::{Action, View};
use crate::core::Duration;
use crate::game::context::GameContext;
use crate::game::puzzle::Puzzle;
use crate::network::{LeaderboardStatus, SubmitStatus};

/// Seconds between a puzzle being solved and its popover appearing.
pub const POPUP_DELAY_SECS: f64 = 0.25;

/// Rows shown on the leaderboard screen.
pub const LEADERBOARD_ROWS: usize = 7;

const NO_SIGNAL: &str = "Waiting for GPS signal...";
const NO_SERVER: &str = "Can't connect to server.";

// =============================================================================
// SCREEN KINDS & POPOVERS
// =============================================================================

/// Screen identity without its per-visit state.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Menu,
    Index,
    Preface,
    Prologue,
    Tutorial,
    Chapter,
    Camera,
    Help,
    Epilogue,
    Leaderboard,
    Credits,
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which help ladder a confirmation is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelpKind {
    /// Distance, then direction to the location.
    Location,
    /// Hint tiers, then skip.
    Puzzle,
}

/// Modal overlay on top of the current screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Popover {
    /// Menu: a game exists, really start over?
    ConfirmNewGame,
    /// Index: playing offline.
    NoInternet,
    /// Chapter: compass pointing north.
    Compass,
    /// Camera: the puzzle is solved.
    PuzzleSolved,
    /// Help: spend points on help?
    ConfirmHelp(HelpKind),
    /// Help: this kind of help is not available right now.
    NoHelp(HelpKind),
}

/// What an input handler decided.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    /// The action does not apply here.
    Ignored,
    /// State changed, same screen.
    Handled,
    /// Show a popover.
    Popover(Popover),
    /// Switch screens.
    Goto(Screen),
}

// =============================================================================
// SCREEN STATE
// =============================================================================

/// Camera visit state.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraScreen {
    /// Puzzle the camera is looking for.
    pub puzzle: usize,
    /// The puzzle was solved before the camera opened.
    pub already_solved: bool,
    /// Seconds left before the solved popover shows.
    pub popup_delay: f64,
}

/// Epilogue visit state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpilogueScreen {
    /// Name to submit.
    pub name: String,
    /// Submission was attempted without a name.
    pub no_name: bool,
    /// Last submission failed.
    pub error: bool,
}

/// The active screen.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Menu,
    Index,
    Preface { first_time: bool },
    Prologue,
    Tutorial,
    Chapter { chapter: usize },
    Camera(CameraScreen),
    Help { chapter: usize },
    Epilogue(EpilogueScreen),
    Leaderboard,
    Credits,
}

impl Screen {
    /// Camera for `puzzle`.
    pub fn camera(puzzle: usize) -> Self {
        Screen::Camera(CameraScreen { puzzle, already_solved: false, popup_delay: POPUP_DELAY_SECS })
    }

    /// Epilogue with an empty form.
    pub fn epilogue() -> Self {
        Screen::Epilogue(EpilogueScreen::default())
    }

    /// Identity of this screen.
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Menu => ScreenKind::Menu,
            Screen::Index => ScreenKind::Index,
            Screen::Preface { .. } => ScreenKind::Preface,
            Screen::Prologue => ScreenKind::Prologue,
            Screen::Tutorial => ScreenKind::Tutorial,
            Screen::Chapter { .. } => ScreenKind::Chapter,
            Screen::Camera(_) => ScreenKind::Camera,
            Screen::Help { .. } => ScreenKind::Help,
            Screen::Epilogue(_) => ScreenKind::Epilogue,
            Screen::Leaderboard => ScreenKind::Leaderboard,
            Screen::Credits => ScreenKind::Credits,
        }
    }
}

// =============================================================================
// HOOKS
// =============================================================================

/// Lifecycle of a screen.
pub trait ScreenHooks {
    /// Entered from `previous` (`None` at start-up). May raise a popover.
    fn on_enter(&mut self, _previous: Option<ScreenKind>, _ctx: &mut GameContext) -> Option<Popover> {
        None
    }

    /// About to be replaced by `next`.
    fn on_exit(&mut self, _next: ScreenKind, _ctx: &mut GameContext) {}

    /// Once per frame while active. May raise a popover.
    fn on_update(&mut self, _dt: Duration, _ctx: &mut GameContext) -> Option<Popover> {
        None
    }

    /// The screen's content.
    fn on_display(&self, ctx: &GameContext) -> View;

    /// Content of `popover`, or `None` while it is still hidden.
    fn on_popover_display(&self, _popover: Popover, _ctx: &GameContext) -> Option<View> {
        None
    }
}

impl ScreenHooks for Screen {
    fn on_enter(&mut self, previous: Option<ScreenKind>, ctx: &mut GameContext) -> Option<Popover> {
        match self {
            Screen::Index => {
                let from_menu = previous == Some(ScreenKind::Menu);
                (from_menu && !ctx.connected_to_internet).then_some(Popover::NoInternet)
            }
            Screen::Preface { first_time } => {
                match previous {
                    Some(ScreenKind::Menu) => *first_time = true,
                    Some(ScreenKind::Index) => *first_time = false,
                    _ => {}
                }
                None
            }
            Screen::Camera(camera) => {
                camera.already_solved = ctx.quest.puzzle(camera.puzzle).is_some_and(Puzzle::is_solved);
                camera.popup_delay = POPUP_DELAY_SECS;
                None
            }
            Screen::Epilogue(epilogue) => {
                epilogue.name = ctx
                    .session
                    .leaderboard_entry
                    .as_ref()
                    .map(|entry| entry.username.clone())
                    .unwrap_or_else(|| ctx.username.clone());
                epilogue.no_name = false;
                epilogue.error = false;
                if !ctx.session.entered_leaderboard {
                    ctx.leaderboard.clear_submit();
                }
                None
            }
            Screen::Leaderboard => {
                ctx.leaderboard.request_update(ctx.session.leaderboard_entry.clone());
                None
            }
            _ => None,
        }
    }

    fn on_exit(&mut self, _next: ScreenKind, ctx: &mut GameContext) {
        if let Screen::Camera(_) = self {
            // Nothing is recognised once the camera is closed
            ctx.quest.clear_in_view();
        }
    }

    fn on_update(&mut self, dt: Duration, ctx: &mut GameContext) -> Option<Popover> {
        match self {
            Screen::Camera(camera) => {
                let solved = ctx.quest.puzzle(camera.puzzle).is_some_and(Puzzle::is_solved);
                if !solved {
                    camera.popup_delay = POPUP_DELAY_SECS;
                    return None;
                }
                if camera.popup_delay > 0.0 {
                    camera.popup_delay -= dt.seconds();
                }
                Some(Popover::PuzzleSolved)
            }
            Screen::Epilogue(epilogue) => {
                if *ctx.leaderboard.submit_status() == SubmitStatus::Failed && !epilogue.error {
                    epilogue.error = true;
                }
                None
            }
            _ => None,
        }
    }

    fn on_display(&self, ctx: &GameContext) -> View {
        match self {
            Screen::Menu => display_menu(ctx),
            Screen::Index => display_index(ctx),
            Screen::Preface { first_time } => View::new("Preface")
                .action_if(*first_time, Action::Continue)
                .action_if(!*first_time, Action::Back),
            Screen::Prologue => display_prologue(ctx),
            Screen::Tutorial => View::new("Help")
                .line("Play by day in good light for the image recognition to work best.")
                .line("Try different angles or distances if the target is not recognised.")
                .action(Action::Back),
            Screen::Chapter { chapter } => display_chapter(*chapter, ctx),
            Screen::Camera(camera) => display_camera(camera, ctx),
            Screen::Help { chapter } => display_help(*chapter, ctx),
            Screen::Epilogue(epilogue) => display_epilogue(epilogue, ctx),
            Screen::Leaderboard => display_leaderboard(ctx),
            Screen::Credits => View::new("Credits")
                .line(format!("AR Treasure Hunt {}", crate::VERSION))
                .action(Action::Back),
        }
    }

    fn on_popover_display(&self, popover: Popover, ctx: &GameContext) -> Option<View> {
        let view = match (self, popover) {
            (Screen::Menu, Popover::ConfirmNewGame) => View::new("New Game")
                .line("Would you like to start a new game?")
                .line("Your current progress will be lost.")
                .action(Action::Confirm)
                .action(Action::Dismiss),
            (Screen::Index, Popover::NoInternet) => View::new("Offline")
                .line("This game doesn't require an internet connection")
                .line("but it is highly recommended for better GPS tracking.")
                .action(Action::Dismiss),
            (Screen::Chapter { .. }, Popover::Compass) => {
                let north = ctx
                    .sensors
                    .heading
                    .map(|heading| format!("North is {:.0}° to your right.", normalize(-heading)))
                    .unwrap_or_else(|| "No compass reading.".to_string());
                View::new("Compass").line(north).action(Action::Dismiss)
            }
            (Screen::Camera(camera), Popover::PuzzleSolved) => {
                if camera.popup_delay > 0.0 && !camera.already_solved {
                    return None;
                }
                let text = if camera.puzzle + 1 == ctx.quest.len() {
                    "You found the treasure! Epilogue unlocked."
                } else {
                    "Puzzle solved! The next chapter is unlocked."
                };
                View::new("Solved").line(text).action(Action::Continue)
            }
            (Screen::Help { chapter }, Popover::ConfirmHelp(kind)) => {
                display_help_prompt(*chapter, kind, ctx).action(Action::Confirm).action(Action::Dismiss)
            }
            (Screen::Help { .. }, Popover::NoHelp(HelpKind::Location)) => View::new("Help")
                .line("You already found the puzzle. I can't help you find it anymore.")
                .action(Action::Dismiss),
            (Screen::Help { .. }, Popover::NoHelp(HelpKind::Puzzle)) => View::new("Help")
                .line("I won't give you any hints on how to solve the puzzle until you find it.")
                .action(Action::Dismiss),
            _ => return None,
        };
        Some(view)
    }
}

// =============================================================================
// INPUT
// =============================================================================

impl Screen {
    /// React to `action` with no popover up.
    pub fn handle(&mut self, action: &Action, ctx: &mut GameContext) -> Response {
        match (self, action) {
            // Menu
            (Screen::Menu, Action::ResumeGame) if ctx.session.game_started => {
                ctx.resume_game();
                Response::Goto(Screen::Index)
            }
            (Screen::Menu, Action::NewGame) => {
                if ctx.session.game_started {
                    Response::Popover(Popover::ConfirmNewGame)
                } else {
                    ctx.start_game();
                    Response::Goto(Screen::Preface { first_time: true })
                }
            }
            (Screen::Menu, Action::OpenLeaderboard) => Response::Goto(Screen::Leaderboard),
            (Screen::Menu, Action::OpenCredits) => Response::Goto(Screen::Credits),

            // Index
            (Screen::Index, Action::Exit) => {
                ctx.pause_game();
                Response::Goto(Screen::Menu)
            }
            (Screen::Index, Action::OpenChapter(i)) => {
                let unlocked = ctx.quest.chapter(*i).is_some_and(|c| c.is_unlocked());
                if !unlocked {
                    return Response::Ignored;
                }
                ctx.selected_chapter = *i;
                ctx.quest.read_chapter(*i);
                if *i == 0 {
                    Response::Goto(Screen::Prologue)
                } else {
                    Response::Goto(Screen::Chapter { chapter: *i })
                }
            }
            (Screen::Index, Action::OpenPreface) => Response::Goto(Screen::Preface { first_time: false }),
            (Screen::Index, Action::OpenEpilogue) if ctx.quest.is_complete() => {
                Response::Goto(Screen::epilogue())
            }

            // Story pages
            (Screen::Preface { .. }, Action::Continue | Action::Back) => Response::Goto(Screen::Index),
            (Screen::Prologue, Action::Back) => Response::Goto(Screen::Index),
            (Screen::Prologue, Action::OpenCamera) => Response::Goto(Screen::camera(0)),
            (Screen::Prologue, Action::OpenHelp) => Response::Goto(Screen::Tutorial),
            (Screen::Tutorial, Action::Back) => Response::Goto(Screen::Prologue),

            // Chapter
            (Screen::Chapter { .. }, Action::Back) => Response::Goto(Screen::Index),
            (Screen::Chapter { chapter }, Action::OpenCamera) => Response::Goto(Screen::camera(*chapter)),
            (Screen::Chapter { .. }, Action::OpenCompass) => Response::Popover(Popover::Compass),
            (Screen::Chapter { chapter }, Action::OpenHelp) if help_offered(*chapter, ctx) => {
                Response::Goto(Screen::Help { chapter: *chapter })
            }

            // Camera
            (Screen::Camera(camera), Action::Back) => {
                if camera.puzzle == 0 {
                    Response::Goto(Screen::Prologue)
                } else {
                    Response::Goto(Screen::Chapter { chapter: camera.puzzle })
                }
            }
            (Screen::Camera(camera), Action::Interact(interaction)) => {
                if ctx.interact(camera.puzzle, *interaction) {
                    Response::Handled
                } else {
                    Response::Ignored
                }
            }

            // Help
            (Screen::Help { chapter }, Action::Back) => Response::Goto(Screen::Chapter { chapter: *chapter }),
            (Screen::Help { chapter }, Action::RequestLocationHelp) => {
                let (Some(location), Some(puzzle)) = (ctx.quest.location(*chapter), ctx.quest.puzzle(*chapter))
                else {
                    return Response::Ignored;
                };
                if location.direction_help_active() {
                    Response::Ignored
                } else if puzzle.is_seen() {
                    Response::Popover(Popover::NoHelp(HelpKind::Location))
                } else {
                    Response::Popover(Popover::ConfirmHelp(HelpKind::Location))
                }
            }
            (Screen::Help { chapter }, Action::RequestPuzzleHelp) => {
                let Some(puzzle) = ctx.quest.puzzle(*chapter) else {
                    return Response::Ignored;
                };
                if puzzle.is_solved() || !puzzle.has_help_function {
                    Response::Ignored
                } else if puzzle.is_seen() {
                    Response::Popover(Popover::ConfirmHelp(HelpKind::Puzzle))
                } else {
                    Response::Popover(Popover::NoHelp(HelpKind::Puzzle))
                }
            }

            // Epilogue
            (Screen::Epilogue(_), Action::Back) => Response::Goto(Screen::Index),
            (Screen::Epilogue(epilogue), Action::EditName(name)) => {
                if ctx.session.entered_leaderboard {
                    return Response::Ignored;
                }
                epilogue.name = name.clone();
                epilogue.no_name = false;
                Response::Handled
            }
            (Screen::Epilogue(epilogue), Action::SubmitScore) => submit_score(epilogue, ctx),

            // Leaderboard & credits
            (Screen::Leaderboard, Action::Refresh) => {
                ctx.leaderboard.request_update(ctx.session.leaderboard_entry.clone());
                Response::Handled
            }
            (Screen::Leaderboard | Screen::Credits, Action::Back) => Response::Goto(Screen::Menu),

            _ => Response::Ignored,
        }
    }

    /// React to `action` aimed at `popover`.
    pub fn handle_popover(&mut self, popover: Popover, action: &Action, ctx: &mut GameContext) -> Response {
        match (popover, action) {
            (Popover::ConfirmNewGame, Action::Confirm) => {
                ctx.start_game();
                Response::Goto(Screen::Preface { first_time: true })
            }
            (Popover::PuzzleSolved, Action::Continue) => Response::Goto(Screen::Index),
            (Popover::ConfirmHelp(kind), Action::Confirm) => {
                let Screen::Help { chapter } = *self else {
                    return Response::Handled;
                };
                match kind {
                    HelpKind::Location => {
                        ctx.quest.request_location_help(chapter, &mut ctx.session);
                        Response::Handled
                    }
                    HelpKind::Puzzle => {
                        ctx.quest.request_help(chapter, &mut ctx.session);
                        if ctx.quest.puzzle(chapter).is_some_and(Puzzle::is_solved) {
                            // Skipped: show the solved mechanism
                            Response::Goto(Screen::camera(chapter))
                        } else {
                            Response::Handled
                        }
                    }
                }
            }
            (Popover::PuzzleSolved, _) => Response::Ignored,
            (_, Action::Dismiss) => Response::Handled,
            _ => Response::Ignored,
        }
    }
}

fn help_offered(chapter: usize, ctx: &GameContext) -> bool {
    chapter > 0 && ctx.quest.puzzle(chapter).is_some_and(|p| !p.is_solved())
}

fn submit_score(epilogue: &mut EpilogueScreen, ctx: &mut GameContext) -> Response {
    let submitting = *ctx.leaderboard.submit_status() == SubmitStatus::Submitting;
    if ctx.session.entered_leaderboard || submitting {
        return Response::Ignored;
    }

    let name = epilogue.name.trim().to_string();
    if name.is_empty() {
        epilogue.no_name = true;
        return Response::Handled;
    }

    let entry = ctx.session.score_entry(name.clone());
    info!(username = %name, score = entry.score(), "Submitting score");
    ctx.username = name;
    epilogue.no_name = false;
    epilogue.error = false;
    ctx.leaderboard.submit(entry);
    Response::Handled
}

// =============================================================================
// DISPLAY
// =============================================================================

fn normalize(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// "N m away." or the no-signal notice.
fn distance_line(chapter: usize, ctx: &GameContext) -> String {
    let distance = ctx
        .quest
        .location(chapter)
        .map(|l| l.distance_from(&ctx.sensors.location));
    match distance {
        Some(d) if d.is_valid() => format!("{d} away."),
        _ => NO_SIGNAL.to_string(),
    }
}

/// Direction to the location relative to where the device points.
fn direction_line(chapter: usize, ctx: &GameContext) -> Option<String> {
    let bearing = ctx.quest.location(chapter)?.bearing_from(&ctx.sensors.location);
    if bearing.is_nan() {
        return None;
    }
    let relative = normalize(bearing - ctx.sensors.heading.unwrap_or(0.0));
    Some(format!("Head {relative:.0}° to your right."))
}

fn display_menu(ctx: &GameContext) -> View {
    View::new("AR Treasure Hunt")
        .line(crate::VERSION)
        .action_if(ctx.session.game_started, Action::ResumeGame)
        .action(Action::NewGame)
        .action(Action::OpenLeaderboard)
        .action(Action::OpenCredits)
}

fn display_index(ctx: &GameContext) -> View {
    let session = &ctx.session;
    let mut view = View::new("Journal Index")
        .line(format!("Passed time: {}", session.total_time))
        .line(format!("Number of hints needed: {}", session.hints_needed))
        .line(format!("Number of skipped puzzles: {}", session.puzzles_skipped))
        .action(Action::Exit)
        .action(Action::OpenPreface);

    for chapter in ctx.quest.chapters().iter().filter(|c| c.is_unlocked()) {
        let marker = if chapter.is_read() { "" } else { " (new)" };
        view = view
            .line(format!("{}{}", chapter.title, marker))
            .action(Action::OpenChapter(chapter.index));
    }

    let complete = ctx.quest.is_complete();
    view.line_if(complete, "Epilogue").action_if(complete, Action::OpenEpilogue)
}

fn display_prologue(ctx: &GameContext) -> View {
    let mut view = View::new("Prologue");
    if let Some(location) = ctx.quest.location(0) {
        view = view.line(location.clue_text.clone());
    }
    view.line(distance_line(0, ctx))
        .line(direction_line(0, ctx).unwrap_or_default())
        .action(Action::Back)
        .action(Action::OpenCamera)
        .action(Action::OpenHelp)
}

fn display_chapter(chapter: usize, ctx: &GameContext) -> View {
    let title = ctx.quest.chapter(chapter).map(|c| c.title.clone()).unwrap_or_default();
    let mut view = View::new(title);
    if let Some(location) = ctx.quest.location(chapter) {
        view = view.line(location.clue_text.clone()).line(location.clue_text_2.clone());
    }
    view.action(Action::Back)
        .action(Action::OpenCamera)
        .action(Action::OpenCompass)
        .action_if(help_offered(chapter, ctx), Action::OpenHelp)
}

fn display_camera(camera: &CameraScreen, ctx: &GameContext) -> View {
    let mut view = View::new("Camera").action(Action::Back);
    if !ctx.quest.is_looking_at_any_puzzle() {
        return view.line(
            "Recognition may be tricky at times. Try different angles and distances if you have trouble.",
        );
    }

    let in_view = ctx.quest.puzzle(camera.puzzle).is_some_and(Puzzle::is_in_view);
    if let (true, Some(driver)) = (in_view, ctx.mechanisms.get(camera.puzzle)) {
        view = view.line(driver.mechanism().to_string());
    }
    view
}

fn display_help(chapter: usize, ctx: &GameContext) -> View {
    let title = ctx.quest.chapter(chapter).map(|c| format!("{} Help", c.title)).unwrap_or_default();
    let mut view = View::new(title).action(Action::Back);
    let (Some(location), Some(puzzle)) = (ctx.quest.location(chapter), ctx.quest.puzzle(chapter)) else {
        return view;
    };

    if location.distance_help_active() {
        view = view.line(distance_line(chapter, ctx));
    }
    if location.direction_help_active() {
        if let Some(direction) = direction_line(chapter, ctx) {
            view = view.line(direction);
        }
    }
    if puzzle.has_help_function {
        view = view
            .line_if(puzzle.tier1_help_active(), puzzle.tier1_help_text.clone())
            .line_if(puzzle.tier2_help_active(), puzzle.tier2_help_text.clone());
    }

    view.action_if(!location.direction_help_active(), Action::RequestLocationHelp)
        .action_if(!puzzle.is_solved() && puzzle.has_help_function, Action::RequestPuzzleHelp)
}

fn display_help_prompt(chapter: usize, kind: HelpKind, ctx: &GameContext) -> View {
    let view = View::new("Help");
    let text = match kind {
        HelpKind::Location => match ctx.quest.location(chapter) {
            Some(l) if !l.distance_help_active() => {
                "Would you like to know how far you have to go? This results in a point deduction."
            }
            _ => "Would you like to know in which direction you have to go? This results in a point deduction.",
        },
        HelpKind::Puzzle => match ctx.quest.puzzle(chapter) {
            Some(p) if !p.tier1_help_active() => "Would you like a hint? This results in a point deduction.",
            Some(p) if !p.tier2_help_active() => {
                "Would you like another hint? This results in a point deduction."
            }
            _ => "Would you like to skip the puzzle? This will have severe consequences...",
        },
    };
    view.line(text)
}

fn display_epilogue(epilogue: &EpilogueScreen, ctx: &GameContext) -> View {
    let session = &ctx.session;
    let submitting = *ctx.leaderboard.submit_status() == SubmitStatus::Submitting;

    let status = if session.entered_leaderboard {
        "Successfully entered."
    } else if submitting {
        "Submitting..."
    } else if epilogue.no_name {
        "Please enter a name."
    } else if epilogue.error {
        NO_SERVER
    } else {
        ""
    };

    let open = !session.entered_leaderboard && !submitting;
    View::new("Epilogue")
        .line(format!("Time spent walking: {}", session.walking_time()))
        .line(format!("Time spent solving puzzles: {}", session.puzzle_time))
        .line(format!("Needed hints: {}", session.hints_needed))
        .line(format!("Skipped puzzles: {}", session.puzzles_skipped))
        .line(format!("Acquired points: {}", session.final_score()))
        .line(format!("Name: {}", epilogue.name))
        .line_if(!status.is_empty(), status)
        .action(Action::Back)
        .action_if(open, Action::EditName(String::new()))
        .action_if(open, Action::SubmitScore)
}

fn display_leaderboard(ctx: &GameContext) -> View {
    let session = &ctx.session;
    let mut view = View::new("Leaderboard");

    match (ctx.leaderboard.leaderboard(), &session.leaderboard_entry) {
        (LeaderboardStatus::Ready(ranking), Some(entry)) if session.entered_leaderboard => {
            view = view.line(entry.username.clone());
            if let Some(rank) = ranking.player_rank {
                view = view.line(format!("Your Rank: {rank}"));
            }
            view = view.line(format!("Acquired points: {}", entry.score()));
        }
        (_, _) if !session.entered_leaderboard => {
            view = view.line("Complete the game to get a score.");
        }
        _ => {}
    }

    view = match ctx.leaderboard.leaderboard() {
        LeaderboardStatus::Idle | LeaderboardStatus::Updating => view.line("Updating..."),
        LeaderboardStatus::Failed => view.line(NO_SERVER),
        LeaderboardStatus::Ready(ranking) => {
            debug!(rows = ranking.entries.len(), "Showing leaderboard");
            ranking
                .top(LEADERBOARD_ROWS)
                .iter()
                .fold(view, |view, row| view.line(format!("{}. {}", row.rank, row.entry.summary())))
        }
    };

    view.action(Action::Back).action(Action::Refresh)
}
