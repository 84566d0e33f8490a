//! AR Treasure Hunt demo
//!
//! Plays through the configured quest with scripted input and logs every
//! screen on the way. Configuration comes from `TREASURE_*` variables.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use treasure_hunt::{
    core::{Coordinates, Duration},
    flow::{Action, ScreenKind},
    game::{FrameInput, GameContext, GameLoop},
    GameConfig, VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    info!("AR Treasure Hunt v{}", VERSION);

    let config = GameConfig::from_env().context("Invalid configuration")?;
    info!(save_dir = %config.save_dir.display(), frame_rate = config.frame_rate, "Configuration loaded");

    let mut ctx = GameContext::new(config).context("Failed to load quest")?;
    ctx.load_saved();

    let mut game = GameLoop::new(ctx);
    demo_playthrough(&mut game);

    game.ctx.session.pause();
    game.ctx.save_all();
    Ok(())
}

/// Step frames of simulated time.
fn wait(game: &mut GameLoop, secs: f64, input: FrameInput) {
    let dt = 0.25;
    let mut left = secs;
    while left > 0.0 {
        game.step(FrameInput { dt: Duration::from_seconds(dt), ..input.clone() });
        left -= dt;
    }
}

/// Apply one action and log the resulting screen.
fn press(game: &mut GameLoop, action: Action) {
    let handled = game.flow.handle(action.clone(), &mut game.ctx);
    if !handled {
        warn!(?action, screen = %game.flow.kind(), "Action not available");
    }
    game.step(FrameInput::default());
    show(game);
}

fn show(game: &GameLoop) {
    let frame = game.render();
    info!("\n{}", frame.primary);
    if let Some(popover) = &frame.popover {
        info!("\n{}", popover);
    }
}

fn recognize(game: &GameLoop, i: usize) -> FrameInput {
    let targets = game
        .ctx
        .quest
        .location(i)
        .map(|l| l.image_targets.clone())
        .unwrap_or_default();
    let location = game.ctx.quest.location(i).map(|l| l.coordinates);
    FrameInput { recognized_targets: targets, location, ..FrameInput::default() }
}

/// Solve the prologue, skip through the chapters, submit the score.
fn demo_playthrough(game: &mut GameLoop) {
    info!("=== Starting Demo Playthrough ===");
    show(game);

    press(game, Action::NewGame);
    if game.flow.popover().is_some() {
        press(game, Action::Confirm);
    }
    press(game, Action::Continue);
    if game.flow.popover().is_some() {
        press(game, Action::Dismiss);
    }

    // Approach the first location from a few hundred metres away
    let Some(start) = game.ctx.quest.location(0).map(|l| l.coordinates) else {
        warn!("Quest has no locations");
        return;
    };
    let away = Coordinates::new(start.latitude - 0.003, start.longitude);
    press(game, Action::OpenChapter(0));
    wait(game, 1.0, FrameInput { location: Some(away), ..FrameInput::default() });
    show(game);

    press(game, Action::OpenCamera);
    let input = recognize(game, 0);
    wait(game, 10.0, input);
    show(game);
    press(game, Action::Continue);

    for i in 1..game.ctx.quest.len() {
        press(game, Action::OpenChapter(i));
        press(game, Action::OpenCamera);
        let input = recognize(game, i);
        wait(game, 2.0, input);
        press(game, Action::Back);

        press(game, Action::OpenHelp);
        for _ in 0..3 {
            press(game, Action::RequestPuzzleHelp);
            press(game, Action::Confirm);
        }
        if game.flow.kind() == ScreenKind::Camera {
            wait(game, 1.0, FrameInput::default());
            show(game);
            press(game, Action::Continue);
        }
    }

    let session = &game.ctx.session;
    info!("=== Quest Results ===");
    info!("Total time: {}", session.total_time);
    info!("Puzzle time: {}", session.puzzle_time);
    info!("Walked: {}", session.walked_distance);
    info!("Hints: {}, skips: {}", session.hints_needed, session.puzzles_skipped);
    info!("Score: {}", session.final_score());

    press(game, Action::OpenEpilogue);
    press(game, Action::EditName("demo".to_string()));
    press(game, Action::SubmitScore);
    wait(game, 2.0, FrameInput::default());
    show(game);
}
