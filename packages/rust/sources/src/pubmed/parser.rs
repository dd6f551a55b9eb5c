//! Parser for PubMed `efetch` XML (`PubmedArticleSet`).
//!
//! Streams the document with `quick-xml` and keeps, per `PubmedArticle`,
//! the article title, the journal title and the last listed author (usually
//! the senior PI and budget holder). Articles missing any of these are
//! skipped instead of failing the whole document.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, warn};

use crate::records::RawAuthor;

/// Authors extracted from one `efetch` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArticles {
    /// One entry per well-formed article.
    pub authors: Vec<RawAuthor>,
    /// Articles dropped for missing title, journal or authors.
    pub skipped: usize,
}

#[derive(Debug, Default)]
struct AuthorDraft {
    last_name: String,
    fore_name: String,
    affiliations: Vec<String>,
}

#[derive(Debug, Default)]
struct ArticleDraft {
    title: String,
    title_done: bool,
    journal: String,
    journal_done: bool,
    authors: Vec<AuthorDraft>,
}

impl ArticleDraft {
    fn absorb(&mut self, stack: &[String], text: &str) {
        if !self.title_done && stack.iter().any(|t| t == "ArticleTitle") {
            self.title.push_str(text);
            return;
        }

        if !self.journal_done && ends_with(stack, &["Journal", "Title"]) {
            self.journal.push_str(text);
            return;
        }

        if !in_author(stack) {
            return;
        }
        let Some(author) = self.authors.last_mut() else {
            return;
        };

        match stack.last().map(String::as_str) {
            Some("LastName") => author.last_name.push_str(text),
            Some("ForeName") => author.fore_name.push_str(text),
            _ if stack.iter().any(|t| t == "Affiliation") => {
                if let Some(aff) = author.affiliations.last_mut() {
                    aff.push_str(text);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Option<RawAuthor> {
        let paper_title = collapse_whitespace(&self.title);
        let journal = collapse_whitespace(&self.journal);
        if paper_title.is_empty() || journal.is_empty() {
            return None;
        }

        let last = self.authors.into_iter().last()?;
        let name = collapse_whitespace(&format!("{} {}", last.fore_name, last.last_name));
        let affiliation = last
            .affiliations
            .iter()
            .map(|a| collapse_whitespace(a))
            .find(|a| !a.is_empty());

        Some(RawAuthor {
            name: (!name.is_empty()).then_some(name),
            paper_title,
            journal,
            affiliation,
        })
    }
}

/// Parse an `efetch` response body.
///
/// Malformed markup ends parsing early; articles completed before the error
/// are still returned.
pub fn parse_efetch(xml: &str) -> ParsedArticles {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<String> = Vec::new();
    let mut article: Option<ArticleDraft> = None;
    let mut parsed = ParsedArticles::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match tag.as_str() {
                    "PubmedArticle" => article = Some(ArticleDraft::default()),
                    "Author" if stack.last().is_some_and(|t| t == "AuthorList") => {
                        if let Some(draft) = article.as_mut() {
                            draft.authors.push(AuthorDraft::default());
                        }
                    }
                    "Affiliation" if in_author(&stack) => {
                        if let Some(author) = article.as_mut().and_then(|d| d.authors.last_mut()) {
                            author.affiliations.push(String::new());
                        }
                    }
                    _ => {}
                }
                stack.push(tag);
            }
            Ok(Event::End(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.pop();
                match tag.as_str() {
                    "PubmedArticle" => {
                        if let Some(draft) = article.take() {
                            match draft.finish() {
                                Some(author) => parsed.authors.push(author),
                                None => parsed.skipped += 1,
                            }
                        }
                    }
                    "ArticleTitle" => {
                        if let Some(draft) = article.as_mut() {
                            draft.title_done = true;
                        }
                    }
                    "Title" if stack.last().is_some_and(|t| t == "Journal") => {
                        if let Some(draft) = article.as_mut() {
                            draft.journal_done = true;
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(draft) = article.as_mut() {
                    let text = t
                        .unescape()
                        .map(|c| c.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                    draft.absorb(&stack, &text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(draft) = article.as_mut() {
                    draft.absorb(&stack, &String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(
                    position = reader.buffer_position(),
                    error = %e,
                    kept = parsed.authors.len(),
                    "malformed efetch XML, keeping articles parsed so far"
                );
                break;
            }
        }
    }

    if article.is_some() {
        // Document ended inside an article.
        parsed.skipped += 1;
    }

    debug!(
        authors = parsed.authors.len(),
        skipped = parsed.skipped,
        "efetch document parsed"
    );
    parsed
}

fn in_author(stack: &[String]) -> bool {
    stack
        .windows(2)
        .any(|w| w[0] == "AuthorList" && w[1] == "Author")
}

fn ends_with(stack: &[String], suffix: &[&str]) -> bool {
    stack.len() >= suffix.len()
        && stack[stack.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(a, b)| a == b)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, journal: &str, authors: &str) -> String {
        format!(
            r#"<PubmedArticle><MedlineCitation><Article>
                <Journal><Title>{journal}</Title></Journal>
                <ArticleTitle>{title}</ArticleTitle>
                <AuthorList>{authors}</AuthorList>
            </Article></MedlineCitation></PubmedArticle>"#
        )
    }

    fn author(fore: &str, last: &str, affiliation: Option<&str>) -> String {
        let aff = affiliation
            .map(|a| format!("<AffiliationInfo><Affiliation>{a}</Affiliation></AffiliationInfo>"))
            .unwrap_or_default();
        format!("<Author><LastName>{last}</LastName><ForeName>{fore}</ForeName>{aff}</Author>")
    }

    fn document(articles: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" ?><PubmedArticleSet>{}</PubmedArticleSet>"#,
            articles.concat()
        )
    }

    #[test]
    fn takes_last_author_and_first_affiliation() {
        let authors = [
            author("John", "First", Some("Somewhere Else")),
            "<Author><LastName>Doe</LastName><ForeName>Jane</ForeName>\
             <AffiliationInfo><Affiliation>Harvard Medical School, Boston, MA, USA.</Affiliation></AffiliationInfo>\
             <AffiliationInfo><Affiliation>Broad Institute, Cambridge, MA.</Affiliation></AffiliationInfo></Author>"
                .to_string(),
        ]
        .concat();
        let xml = document(&[article("Liver chips for DILI", "Lab on a Chip", &authors)]);

        let parsed = parse_efetch(&xml);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.authors.len(), 1);

        let lead = &parsed.authors[0];
        assert_eq!(lead.name.as_deref(), Some("Jane Doe"));
        assert_eq!(lead.paper_title, "Liver chips for DILI");
        assert_eq!(lead.journal, "Lab on a Chip");
        assert_eq!(
            lead.affiliation.as_deref(),
            Some("Harvard Medical School, Boston, MA, USA.")
        );
    }

    #[test]
    fn inline_markup_and_entities_in_title() {
        let xml = document(&[article(
            "Modelling <i>in vitro</i> hepatotoxicity &amp; fibrosis",
            "Toxicol Sci",
            &author("Ana", "Lima", None),
        )]);

        let parsed = parse_efetch(&xml);
        assert_eq!(parsed.authors.len(), 1);
        assert_eq!(
            parsed.authors[0].paper_title,
            "Modelling in vitro hepatotoxicity & fibrosis"
        );
        assert!(parsed.authors[0].affiliation.is_none());
    }

    #[test]
    fn skips_articles_missing_required_parts() {
        let no_journal = r#"<PubmedArticle><MedlineCitation><Article>
                <ArticleTitle>Orphan</ArticleTitle>
                <AuthorList><Author><LastName>X</LastName></Author></AuthorList>
            </Article></MedlineCitation></PubmedArticle>"#
            .to_string();
        let no_authors = article("No authors here", "J Hepatol", "");
        let good = article("Organoids", "Hepatology", &author("Li", "Wei", Some("Basel Uni")));

        let parsed = parse_efetch(&document(&[no_journal, no_authors, good]));
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.authors.len(), 1);
        assert_eq!(parsed.authors[0].name.as_deref(), Some("Li Wei"));
    }

    #[test]
    fn author_without_name_parts_has_no_name() {
        let xml = document(&[article(
            "Consortium paper",
            "Nature",
            "<Author><CollectiveName>Liver Consortium</CollectiveName></Author>",
        )]);

        let parsed = parse_efetch(&xml);
        assert_eq!(parsed.authors.len(), 1);
        assert!(parsed.authors[0].name.is_none());
    }

    #[test]
    fn truncated_document_keeps_completed_articles() {
        let good = article("Spheroids", "Arch Toxicol", &author("Eve", "Stone", None));
        let xml = format!(
            "<PubmedArticleSet>{good}<PubmedArticle><MedlineCitation><Article><ArticleTitle>Cut"
        );

        let parsed = parse_efetch(&xml);
        assert_eq!(parsed.authors.len(), 1);
        assert_eq!(parsed.authors[0].name.as_deref(), Some("Eve Stone"));
    }

    #[test]
    fn empty_article_set() {
        let parsed = parse_efetch("<PubmedArticleSet></PubmedArticleSet>");
        assert_eq!(parsed, ParsedArticles::default());
    }
}
