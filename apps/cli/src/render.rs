//! Plain-text rendering of run results.

use leadgen_shared::{RunSummary, ScoredLead};

const HEADERS: [&str; 8] = [
    "Score",
    "Lead Source",
    "Name",
    "Title",
    "Company",
    "Active Researcher?",
    "Recommended Action",
    "Funding Stage",
];

/// Cells wider than this are cut with an ellipsis.
const MAX_CELL: usize = 32;

/// The four headline metrics, one per line.
pub(crate) fn summary_lines(summary: &RunSummary) -> Vec<String> {
    vec![
        format!("Total Prospects:   {}", summary.total),
        format!("Hot Leads (>80%):  {}", summary.hot_leads),
        format!("PubMed Verified:   {}", summary.verified),
        format!("Funding Qualified: {}", summary.funding_qualified),
    ]
}

/// Ranked lead table with a header row and a separator.
pub(crate) fn lead_table(leads: &[ScoredLead]) -> Vec<String> {
    let rows: Vec<[String; 8]> = leads.iter().map(row).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join(&HEADERS.map(String::from), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|r| join(r, &widths)));
    lines
}

fn row(lead: &ScoredLead) -> [String; 8] {
    [
        format!("{:.1}", lead.propensity_score),
        lead.lead.source.to_string(),
        cut(&lead.lead.name),
        cut(&lead.lead.title),
        cut(&lead.lead.company),
        lead.recent_publication.label().to_string(),
        lead.recommended_action.to_string(),
        lead.lead
            .funding_stage
            .unwrap_or_default()
            .to_string(),
    ]
}

fn join(cells: &[String; 8], widths: &[usize; 8]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn cut(s: &str) -> String {
    if s.chars().count() <= MAX_CELL {
        s.to_string()
    } else {
        let kept: String = s.chars().take(MAX_CELL - 1).collect();
        format!("{kept}…")
    }
}

#[cfg(test)]
mod tests {
    use leadgen_shared::{
        FeatureVector, FitCategory, FundingStage, Lead, LeadSource, RecentPublication,
        RecommendedAction,
    };

    use super::*;

    fn scored(name: &str, score: f64) -> ScoredLead {
        ScoredLead {
            lead: Lead {
                name: name.into(),
                title: "Director of Toxicology".into(),
                company: "NeoLiver Bio".into(),
                location: None,
                headquarters: "Cambridge, MA".into(),
                source: LeadSource::LinkedIn,
                funding_stage: Some(FundingStage::SeriesB),
            },
            features: FeatureVector::new(2, 3, 1),
            propensity_score: score,
            fit_category: FitCategory::High,
            recommended_action: RecommendedAction::HighPriorityOutreach,
            recent_publication: RecentPublication::Yes,
        }
    }

    #[test]
    fn table_has_header_separator_and_rows() {
        let lines = lead_table(&[scored("Dr. Emily Ross", 97.04), scored("B", 61.0)]);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Score"));
        assert!(lines[1].starts_with("-----"));
        assert!(lines[2].starts_with("97.0 "));
        assert!(lines[2].contains("High Priority Outreach"));
        assert!(lines[2].contains("Series B"));
        assert!(lines[2].contains("Yes (≤12 months)"));
    }

    #[test]
    fn long_cells_are_cut() {
        let cut = cut(&"x".repeat(50));
        assert_eq!(cut.chars().count(), MAX_CELL);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn summary_has_four_metrics() {
        let lines = summary_lines(&RunSummary {
            total: 28,
            hot_leads: 5,
            verified: 3,
            funding_qualified: 9,
        });
        assert_eq!(lines.len(), 4);
        assert!(lines[1].ends_with('5'));
    }
}
