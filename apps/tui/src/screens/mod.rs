//! TUI screen definitions.
//!
//! Each screen corresponds to a tab in the TUI and encapsulates its
//! own state and rendering logic.

mod inputs;
mod leads;

use std::fmt;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;

pub(crate) use inputs::InputsScreen;
pub(crate) use leads::LeadsScreen;

/// Screen identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    Inputs,
    Leads,
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inputs => write!(f, "Inputs"),
            Self::Leads => write!(f, "Ranked Leads"),
        }
    }
}

/// Something a screen asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    /// Start a pipeline run.
    Run {
        role: String,
        science: String,
        offline: bool,
    },
}

/// State of every screen.
pub(crate) struct Screens {
    pub inputs: InputsScreen,
    pub leads: LeadsScreen,
}

impl Screens {
    pub(crate) fn new(role: &str, science: &str) -> Self {
        Self {
            inputs: InputsScreen::new(role, science),
            leads: LeadsScreen::new(),
        }
    }

    pub(crate) fn draw(&self, id: ScreenId, f: &mut Frame, area: Rect) {
        match id {
            ScreenId::Inputs => self.inputs.draw(f, area),
            ScreenId::Leads => self.leads.draw(f, area),
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        id: ScreenId,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<Action> {
        match id {
            ScreenId::Inputs => self.inputs.handle_key(code, modifiers),
            ScreenId::Leads => {
                self.leads.handle_key(code, modifiers);
                None
            }
        }
    }
}
