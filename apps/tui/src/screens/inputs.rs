//! "Inputs" screen: role persona and science context pickers.

use crossterm::event::{KeyCode, KeyModifiers};
use leadgen_shared::{ROLE_PERSONAS, SCIENCE_CONTEXTS};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::Action;

/// Which list is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Persona,
    Context,
}

pub(crate) struct InputsScreen {
    persona: usize,
    context: usize,
    focused: Field,
    offline: bool,
}

impl InputsScreen {
    /// Preselect the configured defaults when they are in the lists.
    pub(crate) fn new(role: &str, science: &str) -> Self {
        Self {
            persona: ROLE_PERSONAS.iter().position(|p| *p == role).unwrap_or(0),
            context: SCIENCE_CONTEXTS.iter().position(|c| *c == science).unwrap_or(0),
            focused: Field::Persona,
            offline: false,
        }
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(8),    // Pickers
                Constraint::Length(3), // Options
                Constraint::Length(2), // Hint
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        f.render_widget(
            picker(" Role Persona ", ROLE_PERSONAS, self.persona, self.focused == Field::Persona),
            columns[0],
        );
        f.render_widget(
            picker(
                " Scientific Context ",
                SCIENCE_CONTEXTS,
                self.context,
                self.focused == Field::Context,
            ),
            columns[1],
        );

        let pubmed = if self.offline { "off" } else { "on" };
        let options = Paragraph::new(format!(
            "Sources: LinkedIn (mock) · Funding (mock) · PubMed E-utilities [{pubmed}]"
        ))
        .block(Block::default().borders(Borders::ALL).title(" Pipeline "));
        f.render_widget(options, rows[1]);

        let hint = Paragraph::new("←/→ switch list · ↑/↓ choose · o toggle PubMed · Enter/r run")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint, rows[2]);
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> Option<Action> {
        match code {
            KeyCode::Left | KeyCode::Char('h') => self.focused = Field::Persona,
            KeyCode::Right | KeyCode::Char('l') => self.focused = Field::Context,
            KeyCode::Up | KeyCode::Char('k') => {
                let selected = self.selected_mut();
                *selected = selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.focused_len();
                let selected = self.selected_mut();
                if *selected + 1 < len {
                    *selected += 1;
                }
            }
            KeyCode::Char('o') => self.offline = !self.offline,
            KeyCode::Enter | KeyCode::Char('r') => {
                return Some(Action::Run {
                    role: self.role().to_string(),
                    science: self.science().to_string(),
                    offline: self.offline,
                });
            }
            _ => {}
        }
        None
    }

    pub(crate) fn role(&self) -> &'static str {
        ROLE_PERSONAS[self.persona]
    }

    pub(crate) fn science(&self) -> &'static str {
        SCIENCE_CONTEXTS[self.context]
    }

    fn selected_mut(&mut self) -> &mut usize {
        match self.focused {
            Field::Persona => &mut self.persona,
            Field::Context => &mut self.context,
        }
    }

    fn focused_len(&self) -> usize {
        match self.focused {
            Field::Persona => ROLE_PERSONAS.len(),
            Field::Context => SCIENCE_CONTEXTS.len(),
        }
    }
}

fn picker<'a>(title: &'a str, items: &[&'a str], selected: usize, focused: bool) -> List<'a> {
    let items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if i == selected { "▸ " } else { "  " };
            ListItem::new(format!("{prefix}{item}")).style(style)
        })
        .collect();

    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border),
    )
}
