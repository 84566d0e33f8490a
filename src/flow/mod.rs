//! Screen Flow
//!
//! The flow controller owns the active [`Screen`] and an optional modal
//! [`Popover`]. Transitions run `on_exit` of the old screen, then
//! `on_enter` of the new one, before the swap. While a popover is up the
//! screen underneath takes no input.
//!
//! - `view`: view models and player actions
//! - `screen`: per-screen state, hooks and input handling

pub mod screen;
pub mod view;

use std::mem;

use tracing::debug;

use crate::core::Duration;
use crate::game::context::GameContext;

pub use screen::{
    CameraScreen, EpilogueScreen, HelpKind, Popover, Response, Screen, ScreenHooks, ScreenKind,
    LEADERBOARD_ROWS, POPUP_DELAY_SECS,
};
pub use view::{Action, Frame, View};

/// Drives screen transitions and popovers.
#[derive(Debug)]
pub struct FlowController {
    screen: Screen,
    popover: Option<Popover>,
}

impl FlowController {
    /// Start on the main menu.
    pub fn new(ctx: &mut GameContext) -> Self {
        let mut screen = Screen::Menu;
        let popover = screen.on_enter(None, ctx);
        Self { screen, popover }
    }

    /// Active screen.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Identity of the active screen.
    pub fn kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    /// Active popover, visible or not.
    pub fn popover(&self) -> Option<Popover> {
        self.popover
    }

    /// Switch to `next`. Any popover is dropped; the new screen may raise
    /// its own.
    pub fn transition(&mut self, mut next: Screen, ctx: &mut GameContext) {
        let from = self.screen.kind();
        let to = next.kind();

        self.screen.on_exit(to, ctx);
        let popover = next.on_enter(Some(from), ctx);
        let _old = mem::replace(&mut self.screen, next);
        self.popover = popover;

        debug!(%from, %to, ?popover, "Screen transition");
    }

    /// Per-frame update of the active screen.
    pub fn tick(&mut self, dt: Duration, ctx: &mut GameContext) {
        let raised = self.screen.on_update(dt, ctx);
        if self.popover.is_none() {
            self.popover = raised;
        }
    }

    /// Describe the current screen and popover.
    pub fn render(&self, ctx: &GameContext) -> Frame {
        Frame {
            primary: self.screen.on_display(ctx),
            primary_enabled: self.popover.is_none(),
            popover: self.popover.and_then(|p| self.screen.on_popover_display(p, ctx)),
        }
    }

    /// Feed a player action. Returns whether anything handled it.
    pub fn handle(&mut self, action: Action, ctx: &mut GameContext) -> bool {
        let response = match self.popover {
            Some(popover) => {
                let response = self.screen.handle_popover(popover, &action, ctx);
                if response != Response::Ignored {
                    self.popover = None;
                }
                response
            }
            None => self.screen.handle(&action, ctx),
        };

        match response {
            Response::Ignored => {
                debug!(screen = %self.kind(), ?action, "Action ignored");
                false
            }
            Response::Handled => true,
            Response::Popover(popover) => {
                self.popover = Some(popover);
                true
            }
            Response::Goto(next) => {
                self.transition(next, ctx);
                true
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
