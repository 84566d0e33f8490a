//! View models and player actions
//!
//! Screens describe what they show as a [`View`]: a title, some text lines
//! and the actions currently offered. A front end renders views however it
//! likes and feeds chosen [`Action`]s back to the controller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mechanics::Interaction;

/// Everything a player can ask for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Menu: continue the existing game.
    ResumeGame,
    /// Menu: start over (asks first when a game exists).
    NewGame,
    /// Menu: show the leaderboard.
    OpenLeaderboard,
    /// Menu: show the credits.
    OpenCredits,
    /// Index: open chapter `i`.
    OpenChapter(usize),
    /// Index: reread the preface.
    OpenPreface,
    /// Index: open the epilogue once the hunt is complete.
    OpenEpilogue,
    /// Index: back to the menu, pausing the game.
    Exit,
    /// Return to the parent screen.
    Back,
    /// Move on (preface, solved-puzzle popover).
    Continue,
    /// Open the camera for the selected chapter.
    OpenCamera,
    /// Open the help page (tutorial from the prologue).
    OpenHelp,
    /// Chapter: show the compass popover.
    OpenCompass,
    /// Help: ask for navigation help.
    RequestLocationHelp,
    /// Help: ask for a puzzle hint or skip.
    RequestPuzzleHelp,
    /// Camera: touch the puzzle mechanism.
    Interact(Interaction),
    /// Epilogue: set the leaderboard name.
    EditName(String),
    /// Epilogue: submit the score.
    SubmitScore,
    /// Popover: accept.
    Confirm,
    /// Popover: close or decline.
    Dismiss,
    /// Leaderboard: fetch again.
    Refresh,
}

/// Plain description of one screen or popover.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub title: String,
    pub lines: Vec<String>,
    pub actions: Vec<Action>,
}

impl View {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Add a line only when `cond` holds.
    pub fn line_if(self, cond: bool, line: impl Into<String>) -> Self {
        if cond {
            self.line(line)
        } else {
            self
        }
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an action only when `cond` holds.
    pub fn action_if(self, cond: bool, action: Action) -> Self {
        if cond {
            self.action(action)
        } else {
            self
        }
    }

    /// Whether `action` is offered. Parameterised actions match by kind.
    pub fn offers(&self, action: &Action) -> bool {
        self.actions
            .iter()
            .any(|a| std::mem::discriminant(a) == std::mem::discriminant(action))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        if !self.actions.is_empty() {
            let names: Vec<String> = self.actions.iter().map(|a| format!("{a:?}")).collect();
            writeln!(f, "[{}]", names.join("] ["))?;
        }
        Ok(())
    }
}

/// One rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// The current screen.
    pub primary: View,
    /// False while a popover is up; the primary view takes no input.
    pub primary_enabled: bool,
    /// The popover, once it is visible.
    pub popover: Option<View>,
}
