//! Canned introspection answers, for building documents without running the
//! real program.

use super::{display_query, Introspector};
use crate::error::{Error, Result};
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Canned {
    Text(String),
    Exit(i32),
}

/// Maps queries (arguments joined shell-style) to fixed output. Queries with
/// no registered answer fail like a program exiting with status 1.
#[derive(Debug, Clone, Default)]
pub struct FixtureIntrospector {
    answers: HashMap<String, Canned>,
}

impl FixtureIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, args: &[&str], text: impl Into<String>) -> Self {
        self.answers.insert(key(args), Canned::Text(text.into()));
        self
    }

    /// Register a query that fails with the given exit status.
    pub fn with_failure(mut self, args: &[&str], status: i32) -> Self {
        self.answers.insert(key(args), Canned::Exit(status));
        self
    }
}

fn key(args: &[&str]) -> String {
    display_query(&[], args)
}

impl Introspector for FixtureIntrospector {
    fn query(&self, args: &[&str]) -> Result<Vec<String>> {
        let shown = key(args);
        match self.answers.get(&shown) {
            Some(Canned::Text(text)) => Ok(text.lines().map(str::to_string).collect()),
            Some(Canned::Exit(status)) => {
                Err(Error::external(shown, Some(*status), "non-zero exit"))
            }
            None => Err(Error::external(shown, Some(1), "no canned answer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_answer_split_into_lines() {
        let client = FixtureIntrospector::new().with_response(&["help", "list-verbs"], "cat\nhead\n");
        assert_eq!(client.query(&["help", "list-verbs"]).unwrap(), vec!["cat", "head"]);
    }

    #[test]
    fn arguments_with_spaces_are_distinct_keys() {
        let client = FixtureIntrospector::new()
            .with_response(&["help", "show-help-for-section", "Legacy flags"], "legacy\n");
        assert!(client.query(&["help", "show-help-for-section", "Legacy", "flags"]).is_err());
        assert_eq!(
            client.query(&["help", "show-help-for-section", "Legacy flags"]).unwrap(),
            vec!["legacy"]
        );
    }

    #[test]
    fn registered_failure() {
        let client = FixtureIntrospector::new().with_failure(&["nosuch", "-h"], 2);
        assert!(matches!(
            client.query(&["nosuch", "-h"]),
            Err(Error::ExternalProcess { status: Some(2), .. })
        ));
    }

    #[test]
    fn unknown_query_fails() {
        let client = FixtureIntrospector::new();
        assert!(matches!(
            client.query(&["help", "topics"]),
            Err(Error::ExternalProcess { status: Some(1), .. })
        ));
    }
}
