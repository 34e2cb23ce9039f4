use anyhow::{Result, anyhow};
use colored::*;
use std::fmt::Write;

use crate::catalog::BookSummary;
use crate::discovery::SearchReport;
use crate::preferences::PreferenceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "terminal" | "plain" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow!("Unknown output format: {}", other)),
        }
    }
}

/// Turns a [`SearchReport`] into text for the terminal. Read-only.
pub struct Renderer {
    format: OutputFormat,
    colorful: bool,
}

impl Renderer {
    pub fn new(format: OutputFormat, colorful: bool) -> Self {
        Self { format, colorful }
    }

    pub fn render(&self, report: &SearchReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Terminal => Ok(self.render_terminal(report)),
        }
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.colorful {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn render_terminal(&self, report: &SearchReport) -> String {
        let mut out = String::new();
        let rule = "=".repeat(60);

        let _ = writeln!(out, "{}", self.paint(&rule, |s| s.bright_blue()));
        let _ = writeln!(out, "{}", self.paint("Universal Pages", |s| s.bright_white().bold()));
        let _ = writeln!(out, "{}", self.paint(&rule, |s| s.bright_blue()));

        if report.books.is_empty() {
            let _ = writeln!(
                out,
                "{}",
                self.paint(
                    &format!("No books found for '{}'. Try different keywords.", report.query),
                    |s| s.red()
                )
            );
        } else {
            let _ = writeln!(
                out,
                "{}",
                self.paint(
                    &format!("Located {} books matching '{}'", report.books.len(), report.query),
                    |s| s.green()
                )
            );
            for book in &report.books {
                out.push('\n');
                self.render_book(&mut out, book);
            }
        }

        if report.preferences.has_recommendation() {
            out.push('\n');
            self.render_preferences(&mut out, &report.preferences);
        }

        out
    }

    fn render_book(&self, out: &mut String, book: &BookSummary) {
        let _ = writeln!(out, "{}", self.paint(&book.title, |s| s.bold()));
        let _ = writeln!(out, "  by {}", self.paint(&book.authors, |s| s.cyan()));
        let _ = writeln!(out, "  {} · {}", book.published_date, book.categories);
        let _ = writeln!(out, "  {}", book.description);
        if !book.image_url.is_empty() {
            let _ = writeln!(out, "  Cover:   {}", book.image_url);
        }
        let _ = writeln!(out, "  Preview: {}", self.paint(&book.preview_link, |s| s.underline()));
    }

    fn render_preferences(&self, out: &mut String, prefs: &PreferenceRecord) {
        let _ = writeln!(out, "{}", self.paint("Recommendations", |s| s.bright_magenta().bold()));
        if !prefs.genre.is_empty() {
            let _ = writeln!(
                out,
                "  Genre:  you seem to enjoy {} books.",
                self.paint(&prefs.genre, |s| s.bold())
            );
        }
        if !prefs.author.is_empty() {
            let _ = writeln!(
                out,
                "  Author: explore more from {}.",
                self.paint(&prefs.author, |s| s.bold())
            );
        }
        if !prefs.length.is_empty() {
            let _ = writeln!(out, "  Length: {}", prefs.length);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str) -> BookSummary {
        BookSummary {
            title: title.to_string(),
            authors: "Agatha Christie".to_string(),
            published_date: "1934".to_string(),
            categories: "Fiction".to_string(),
            description: "A snowbound train.".to_string(),
            image_url: String::new(),
            preview_link: "#".to_string(),
        }
    }

    fn report(books: Vec<BookSummary>, preferences: PreferenceRecord) -> SearchReport {
        SearchReport {
            query: "christie".to_string(),
            books,
            preferences,
        }
    }

    fn plain() -> Renderer {
        Renderer::new(OutputFormat::Terminal, false)
    }

    #[test]
    fn test_books_and_recommendations() {
        let prefs = PreferenceRecord {
            genre: "mystery".to_string(),
            author: "Agatha Christie".to_string(),
            length: "short".to_string(),
        };
        let text = plain()
            .render(&report(vec![book("Murder on the Orient Express")], prefs))
            .unwrap();

        assert!(text.contains("Located 1 books matching 'christie'"));
        assert!(text.contains("Murder on the Orient Express"));
        assert!(text.contains("1934 · Fiction"));
        assert!(!text.contains("Cover:"));
        assert!(text.contains("Recommendations"));
        assert!(text.contains("you seem to enjoy mystery books"));
        assert!(text.contains("explore more from Agatha Christie"));
        assert!(text.contains("Length: short"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_no_results_and_no_recommendations() {
        let text = plain().render(&report(Vec::new(), PreferenceRecord::empty())).unwrap();
        assert!(text.contains("No books found for 'christie'"));
        assert!(!text.contains("Recommendations"));
    }

    #[test]
    fn test_length_alone_is_not_a_recommendation() {
        let prefs = PreferenceRecord {
            length: "long".to_string(),
            ..PreferenceRecord::default()
        };
        let text = plain().render(&report(vec![book("Curtain")], prefs)).unwrap();
        assert!(!text.contains("Recommendations"));
        assert!(!text.contains("Length:"));
    }

    #[test]
    fn test_only_author_panel() {
        let prefs = PreferenceRecord {
            author: "Agatha Christie".to_string(),
            ..PreferenceRecord::default()
        };
        let text = plain().render(&report(Vec::new(), prefs)).unwrap();
        assert!(text.contains("No books found"));
        assert!(text.contains("explore more from Agatha Christie"));
        assert!(!text.contains("Genre:"));
    }

    #[test]
    fn test_json_output() {
        let renderer = Renderer::new(OutputFormat::Json, true);
        let text = renderer
            .render(&report(vec![book("Curtain")], PreferenceRecord::empty()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["query"], "christie");
        assert_eq!(value["books"][0]["title"], "Curtain");
        assert_eq!(value["preferences"]["genre"], "");
        assert_eq!(value["preferences"]["author"], "");
        assert_eq!(value["preferences"]["length"], "");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("terminal").unwrap(), OutputFormat::Terminal);
        assert!(OutputFormat::parse("html").is_err());
    }
}
