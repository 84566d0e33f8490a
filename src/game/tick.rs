//! Frame Loop
//!
//! One call to [`GameLoop::step`] advances the whole game by one frame:
//!
//! 1. Apply sensor readings (GPS only on its sampling interval)
//! 2. Apply async leaderboard replies
//! 3. Feed player actions to the flow controller
//! 4. Refresh puzzle visibility from recognised image targets
//! 5. Accumulate session time and walked distance
//! 6. Sync puzzle mechanisms with the quest
//! 7. Run the active screen's update
//! 8. Fire the autosave and connectivity timers
//!
//! [`GameLoop::run`] drives `step` from a tokio interval until shutdown.

use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::context::GameContext;
use super::events::QuestEvent;
use crate::core::{Coordinates, Duration};
use crate::flow::{Action, FlowController, Frame, ScreenKind};
use crate::mechanics::{tilt_from_gravity, MechanismFrame};
use crate::network::TrackerUpdate;

/// Everything the platform reports for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Time since the previous frame.
    pub dt: Duration,
    /// Current GPS fix, if the receiver has one.
    pub location: Option<Coordinates>,
    /// Names of image targets the tracker recognises this frame.
    pub recognized_targets: Vec<String>,
    /// Gravity vector in device coordinates.
    pub gravity: Option<[f64; 3]>,
    /// Compass heading in degrees.
    pub heading: Option<f64>,
    /// Player actions, applied in order.
    pub actions: Vec<Action>,
}

// =============================================================================
// TIMERS
// =============================================================================

/// Fires once every `period` of accumulated frame time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntervalTimer {
    period: f64,
    elapsed: f64,
}

/// Timer that schedules the periodic save.
pub type AutosaveTimer = IntervalTimer;

impl IntervalTimer {
    /// Timer with a period in seconds.
    pub fn new(period_secs: f64) -> Self {
        Self { period: period_secs.max(0.0), elapsed: 0.0 }
    }

    /// Timer that fires on its first advance.
    pub fn due(period_secs: f64) -> Self {
        let period = period_secs.max(0.0);
        Self { period, elapsed: period }
    }

    /// Period in seconds.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Change the period, keeping the time already accumulated.
    pub fn set_period(&mut self, period_secs: f64) {
        self.period = period_secs.max(0.0);
    }

    /// Restart the count.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Add `dt`; true when the period is reached. A long frame fires once.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed += dt.seconds().max(0.0);
        if self.elapsed >= self.period {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

// =============================================================================
// GAME LOOP
// =============================================================================

/// Source of frames for [`GameLoop::run`].
pub trait FrameSource {
    /// Input for the next frame, or `None` to stop.
    fn next_frame(&mut self, dt: Duration) -> Option<FrameInput>;

    /// Called with the rendered frame after each step.
    fn present(&mut self, _frame: &Frame) {}
}

/// What one step produced.
#[derive(Debug, Default)]
pub struct StepResult {
    /// Quest events raised during the step.
    pub events: Vec<QuestEvent>,
    /// The autosave timer fired.
    pub saved: bool,
}

/// Owns the context and the flow controller and advances both.
#[derive(Debug)]
pub struct GameLoop {
    /// Screen flow.
    pub flow: FlowController,
    /// Shared state.
    pub ctx: GameContext,
    autosave: AutosaveTimer,
    gps: IntervalTimer,
    connectivity: IntervalTimer,
}

impl GameLoop {
    /// Start on the menu with `ctx`.
    pub fn new(mut ctx: GameContext) -> Self {
        let flow = FlowController::new(&mut ctx);
        let config = &ctx.config;
        Self {
            autosave: AutosaveTimer::new(config.autosave_interval_secs),
            gps: IntervalTimer::due(config.gps_interval_secs),
            connectivity: IntervalTimer::due(config.connectivity_retry_secs),
            flow,
            ctx,
        }
    }

    /// Advance one frame.
    pub fn step(&mut self, input: FrameInput) -> StepResult {
        let dt = input.dt;
        let ctx = &mut self.ctx;

        // Sensors
        ctx.sensors.gravity = input.gravity;
        ctx.sensors.heading = input.heading;
        let sample_gps = self.gps.advance(dt) || !ctx.sensors.location.is_valid();
        if let (true, Some(location)) = (sample_gps, input.location) {
            ctx.sensors.location = location;
        }

        // Async replies
        for update in ctx.leaderboard.poll() {
            match update {
                TrackerUpdate::Accepted(entry) => {
                    ctx.session.enter_leaderboard(entry);
                    ctx.save_all();
                }
                TrackerUpdate::Connectivity(connected) => {
                    if connected != ctx.connected_to_internet {
                        info!(connected, "Connectivity changed");
                    }
                    ctx.connected_to_internet = connected;
                    let period = if connected {
                        ctx.config.connectivity_recheck_secs
                    } else {
                        ctx.config.connectivity_retry_secs
                    };
                    self.connectivity.set_period(period);
                }
                TrackerUpdate::Ranked | TrackerUpdate::SubmitFailed => {
                    debug!(?update, "Leaderboard update");
                }
            }
        }

        // Player input
        for action in input.actions {
            self.flow.handle(action, ctx);
        }

        // Recognition only happens through the camera
        let camera_active = self.flow.kind() == ScreenKind::Camera;
        if camera_active {
            ctx.quest.update_recognition(&input.recognized_targets);
        } else {
            ctx.quest.clear_in_view();
        }

        // Timers of the run
        let looking = ctx.quest.is_looking_at_any_puzzle();
        ctx.session.advance(dt, ctx.sensors.location, looking);
        if ctx.quest.is_started() && !ctx.session.quest_started {
            ctx.session.start_quest();
        }
        if ctx.quest.is_complete() && ctx.session.is_running() {
            info!(score = ctx.session.final_score(), "Quest complete");
            ctx.pause_game();
        }

        // Mechanisms
        let frame = MechanismFrame {
            camera_active,
            tilt_degrees: ctx.sensors.gravity.and_then(tilt_from_gravity),
            ..MechanismFrame::idle(dt)
        };
        for (i, driver) in ctx.mechanisms.iter_mut().enumerate() {
            driver.update(i, &mut ctx.quest, &frame);
        }

        self.flow.tick(dt, ctx);

        let events = ctx.quest.take_events();
        for event in &events {
            if event.is_penalty() {
                info!(?event, "Penalty recorded");
            } else {
                debug!(?event, "Quest event");
            }
        }

        // Background chores
        let saved = ctx.session.game_started && self.autosave.advance(dt);
        if saved {
            ctx.save_all();
        }
        if self.connectivity.advance(dt) && !ctx.leaderboard.is_pinging() {
            ctx.leaderboard.ping();
        }

        StepResult { events, saved }
    }

    /// Describe the current frame.
    pub fn render(&self) -> Frame {
        self.flow.render(&self.ctx)
    }

    /// Run at the configured frame rate until `source` stops or a shutdown
    /// signal arrives. Progress is saved on the way out.
    pub async fn run<S: FrameSource>(&mut self, source: &mut S, mut shutdown: broadcast::Receiver<()>) {
        let frame_secs = self.ctx.config.frame_secs();
        let mut ticker = interval(std::time::Duration::from_secs_f64(frame_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let dt = Duration::from_seconds(frame_secs);

        info!(frame_rate = self.ctx.config.frame_rate, "Game loop started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(input) = source.next_frame(dt) else {
                        info!("Frame source finished");
                        break;
                    };
                    self.step(input);
                    source.present(&self.render());
                }
                _ = shutdown.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        self.ctx.session.pause();
        self.ctx.save_all();
        info!("Game loop stopped");
    }
}

// =============================================================================
// TESTS
// =============================================================================
