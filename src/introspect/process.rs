//! Subprocess-backed introspection.

use super::{display_query, Introspector};
use crate::error::{Error, Result};
use std::process::{Command, Stdio};

/// Runs `program [base args] [query args]` and captures stdout.
#[derive(Debug, Clone)]
pub struct ProcessIntrospector {
    /// Program followed by any fixed leading arguments
    program: Vec<String>,
    envs: Vec<(String, String)>,
}

impl ProcessIntrospector {
    pub fn new(program: impl Into<String>) -> Self {
        ProcessIntrospector {
            program: vec![program.into()],
            envs: Vec::new(),
        }
    }

    /// Split a shell-style command line such as `"sh ./fake-mlr.sh"` into the
    /// program and its leading arguments.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let program = shell_words::split(command)
            .map_err(|e| Error::external(command, None, format!("cannot parse command: {}", e)))?;
        if program.is_empty() {
            return Err(Error::external(command, None, "empty command"));
        }
        Ok(ProcessIntrospector {
            program,
            envs: Vec::new(),
        })
    }

    /// A client for Miller that ignores the user's `.mlrrc`, so local
    /// defaults cannot leak into the generated help text.
    pub fn miller(command: &str) -> Result<Self> {
        Ok(Self::from_command_line(command)?.env("MLRRC", "__none__"))
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl Introspector for ProcessIntrospector {
    fn query(&self, args: &[&str]) -> Result<Vec<String>> {
        let shown = display_query(&self.program, args);
        tracing::debug!(command = %shown, "querying");

        let output = Command::new(&self.program[0])
            .args(&self.program[1..])
            .args(args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::external(&shown, None, format!("could not be started: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.lines().find(|l| !l.trim().is_empty()) {
                Some(line) => format!("non-zero exit: {}", line.trim()),
                None => "non-zero exit".to_string(),
            };
            return Err(Error::external(&shown, output.status.code(), reason));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| Error::external(&shown, Some(0), "malformed output: not valid UTF-8"))?;
        Ok(stdout.lines().map(str::to_string).collect())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_lines() {
        let client = ProcessIntrospector::from_command_line("printf").unwrap();
        let lines = client.query(&["cat\\nhead\\n"]).unwrap();
        assert_eq!(lines, vec!["cat", "head"]);
    }

    #[test]
    fn leading_arguments_come_first() {
        let client = ProcessIntrospector::from_command_line("sh -c 'echo \"$0 $1\"'").unwrap();
        let lines = client.query(&["help", "topics"]).unwrap();
        assert_eq!(lines, vec!["help topics"]);
    }

    #[test]
    fn environment_is_passed() {
        let client = ProcessIntrospector::miller("sh -c 'echo $MLRRC'").unwrap();
        assert_eq!(client.query(&[]).unwrap(), vec!["__none__"]);
    }

    #[test]
    fn missing_program_is_external_error() {
        let client = ProcessIntrospector::new("/nonexistent/mlrdoc-test-binary");
        let err = client.query(&["help", "list-verbs"]).unwrap_err();
        match err {
            Error::ExternalProcess { command, status, .. } => {
                assert_eq!(command, "/nonexistent/mlrdoc-test-binary help list-verbs");
                assert_eq!(status, None);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_zero_exit_is_external_error() {
        let client = ProcessIntrospector::from_command_line("sh -c 'echo oops >&2; exit 3'").unwrap();
        let err = client.query(&[]).unwrap_err();
        match err {
            Error::ExternalProcess { status, reason, .. } => {
                assert_eq!(status, Some(3));
                assert_eq!(reason, "non-zero exit: oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_command_line_is_rejected() {
        assert!(ProcessIntrospector::from_command_line("  ").is_err());
    }
}
