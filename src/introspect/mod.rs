//! Introspection client — asks the documented program about itself.

pub mod fixture;
pub mod process;

pub use fixture::FixtureIntrospector;
pub use process::ProcessIntrospector;

use crate::error::Result;

/// Answers line-oriented queries such as `help list-verbs`.
///
/// Each call is independent: no caching, no retries.
pub trait Introspector {
    /// Run one query and return its output split into lines.
    fn query(&self, args: &[&str]) -> Result<Vec<String>>;

    /// Run one query and return its output as newline-terminated text.
    fn query_text(&self, args: &[&str]) -> Result<String> {
        let lines = self.query(args)?;
        let mut text = lines.join("\n");
        if !lines.is_empty() {
            text.push('\n');
        }
        Ok(text)
    }
}

/// Render a query for log and error messages.
pub(crate) fn display_query(program: &[String], args: &[&str]) -> String {
    let words: Vec<&str> = program
        .iter()
        .map(String::as_str)
        .chain(args.iter().copied())
        .collect();
    shell_words::join(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text_rejoins_lines() {
        let client = FixtureIntrospector::new().with_response(&["help", "mlrrc"], "a\nb\n");
        assert_eq!(client.query_text(&["help", "mlrrc"]).unwrap(), "a\nb\n");
    }

    #[test]
    fn query_text_of_empty_output() {
        let client = FixtureIntrospector::new().with_response(&["aux-list"], "");
        assert_eq!(client.query_text(&["aux-list"]).unwrap(), "");
    }

    #[test]
    fn display_query_quotes_words_with_spaces() {
        let program = vec!["mlr".to_string()];
        assert_eq!(
            display_query(&program, &["help", "show-help-for-section", "CSV/TSV-only flags"]),
            "mlr help show-help-for-section 'CSV/TSV-only flags'"
        );
    }
}
