//! "Ranked Leads" screen: metrics and the scored lead table.

use crossterm::event::{KeyCode, KeyModifiers};
use leadgen_shared::{FitCategory, RunReport, ScoredLead};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::widgets::metric;

const HEADERS: [&str; 8] = [
    "Score",
    "Source",
    "Name",
    "Title",
    "Company",
    "Active Researcher?",
    "Action",
    "Funding",
];

pub(crate) struct LeadsScreen {
    report: Option<RunReport>,
    /// First visible row.
    offset: usize,
}

impl LeadsScreen {
    pub(crate) fn new() -> Self {
        Self {
            report: None,
            offset: 0,
        }
    }

    pub(crate) fn set_report(&mut self, report: RunReport) {
        self.report = Some(report);
        self.offset = 0;
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let Some(report) = &self.report else {
            let empty = Paragraph::new("No results yet. Pick inputs on the first tab and press Enter.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" Ranked Leads "));
            f.render_widget(empty, area);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Metrics
                Constraint::Min(3),    // Table
            ])
            .split(area);

        let boxes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[0]);

        let s = &report.summary;
        f.render_widget(metric("Total Prospects", s.total), boxes[0]);
        f.render_widget(metric("Hot Leads (>80%)", s.hot_leads), boxes[1]);
        f.render_widget(metric("PubMed Verified", s.verified), boxes[2]);
        f.render_widget(metric("Funding Qualified", s.funding_qualified), boxes[3]);

        let header = Row::new(HEADERS.map(Cell::from))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let body: Vec<Row> = report.leads.iter().skip(self.offset).map(row).collect();

        let title = format!(
            " {} · {} · {} leads ",
            report.role_input,
            report.science_context,
            report.leads.len()
        );
        let table = Table::new(
            body,
            [
                Constraint::Length(6),
                Constraint::Length(9),
                Constraint::Percentage(16),
                Constraint::Percentage(22),
                Constraint::Percentage(16),
                Constraint::Length(18),
                Constraint::Percentage(18),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(table, rows[1]);
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) {
        let len = self.report.as_ref().map_or(0, |r| r.leads.len());
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.offset = self.offset.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.offset + 1 < len {
                    self.offset += 1;
                }
            }
            KeyCode::Home | KeyCode::Char('g') => self.offset = 0,
            _ => {}
        }
    }
}

fn row(lead: &ScoredLead) -> Row<'_> {
    let color = match lead.fit_category {
        FitCategory::High => Color::Green,
        FitCategory::Medium => Color::Yellow,
        FitCategory::Low => Color::Gray,
    };
    Row::new(vec![
        Cell::from(format!("{:.1}", lead.propensity_score)).style(Style::default().fg(color)),
        Cell::from(lead.lead.source.to_string()),
        Cell::from(lead.lead.name.as_str()),
        Cell::from(lead.lead.title.as_str()),
        Cell::from(lead.lead.company.as_str()),
        Cell::from(lead.recent_publication.label()),
        Cell::from(lead.recommended_action.to_string()),
        Cell::from(lead.lead.funding_stage.unwrap_or_default().to_string()),
    ])
}
