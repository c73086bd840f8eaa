//! Error type shared by the introspection client, the model builder and the
//! encoders.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An introspection query could not be answered: the program was missing,
    /// exited non-zero, or printed something unusable.
    #[error("command `{command}` failed{}: {reason}", describe_status(.status))]
    ExternalProcess {
        command: String,
        status: Option<i32>,
        reason: String,
    },

    /// The document tree or a table violated its shape rules.
    #[error("structural error: {0}")]
    Structural(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" (exit status {})", code),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn external(command: impl Into<String>, status: Option<i32>, reason: impl Into<String>) -> Self {
        Error::ExternalProcess {
            command: command.into(),
            status,
            reason: reason.into(),
        }
    }

    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        Error::Structural(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_error_mentions_command_and_status() {
        let err = Error::external("mlr help list-verbs", Some(2), "non-zero exit");
        assert_eq!(
            err.to_string(),
            "command `mlr help list-verbs` failed (exit status 2): non-zero exit"
        );
    }

    #[test]
    fn external_error_without_status() {
        let err = Error::external("nosuch help", None, "not found");
        assert_eq!(err.to_string(), "command `nosuch help` failed: not found");
    }
}
