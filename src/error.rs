//! Error types.
//!
//! Decoding, search configuration and instance parsing each have their
//! own error enum. All of them are plain data: the computations they
//! report on are deterministic, so callers never retry.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised when decoding an encoded solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The solution is not a permutation with repetition of the
    /// instance's job ids.
    #[error("malformed solution: {reason}")]
    MalformedSolution {
        /// What is wrong with the sequence.
        reason: String,
    },
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSolution {
            reason: reason.into(),
        }
    }
}

/// Errors raised by the search entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// A configuration parameter is out of its valid range.
    #[error("invalid configuration for `{parameter}`: {reason}")]
    InvalidConfig {
        /// Parameter name.
        parameter: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// An initial solution given to the search does not fit the instance.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl SearchError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Errors raised while reading instance files.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("failed to read `{path}`")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// No `num_jobs num_machines` line was found.
    #[error("could not find dimensions line (num_jobs num_machines){}", context(.instance))]
    MissingDimensions {
        /// Instance name, for multi-instance files.
        instance: Option<String>,
    },
    /// A token is not a non-negative integer.
    #[error("line {line}: invalid integer `{token}`")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A job line has an odd number of values.
    #[error("line {line}: expected `machine duration` pairs, found {count} values")]
    UnpairedValues {
        /// 1-based line number.
        line: usize,
        /// Number of values on the line.
        count: usize,
    },
    /// The file ended before all job lines were read.
    #[error("expected {expected} job lines, found {found}{}", context(.instance))]
    MissingJobs {
        /// Instance name, for multi-instance files.
        instance: Option<String>,
        /// Declared job count.
        expected: usize,
        /// Job lines actually present.
        found: usize,
    },
    /// A named-instance file was given to the single-instance parser.
    #[error("file contains {} named instances, specify one of: {}", .available.len(), .available.join(", "))]
    NamedInstances {
        /// Names found in the file.
        available: Vec<String>,
    },
    /// The requested instance name is not in the file.
    #[error("instance `{name}` not found")]
    UnknownInstance {
        /// Requested name.
        name: String,
    },
    /// The parsed instance is structurally inconsistent.
    #[error("invalid instance{}: {}", context(.instance), summarize(.errors))]
    Invalid {
        /// Instance name, for multi-instance files.
        instance: Option<String>,
        /// All detected problems.
        errors: Vec<ValidationError>,
    },
}

fn context(instance: &Option<String>) -> String {
    match instance {
        Some(name) => format!(" in instance `{name}`"),
        None => String::new(),
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_decode_error_message() {
        let err = DecodeError::malformed("job 3 out of range");
        assert_eq!(err.to_string(), "malformed solution: job 3 out of range");
    }

    #[test]
    fn test_search_error_from_decode() {
        let err: SearchError = DecodeError::malformed("bad").into();
        assert!(matches!(err, SearchError::Decode(_)));
        assert_eq!(err.to_string(), "malformed solution: bad");

        let err = SearchError::invalid("alpha", "must be in (0, 1)");
        assert_eq!(
            err.to_string(),
            "invalid configuration for `alpha`: must be in (0, 1)"
        );
    }

    #[test]
    fn test_parse_error_messages() {
        let err = ParseError::MissingDimensions {
            instance: Some("ft06".into()),
        };
        assert_eq!(
            err.to_string(),
            "could not find dimensions line (num_jobs num_machines) in instance `ft06`"
        );

        let err = ParseError::NamedInstances {
            available: vec!["abz5".into(), "ft06".into()],
        };
        assert_eq!(
            err.to_string(),
            "file contains 2 named instances, specify one of: abz5, ft06"
        );

        let err = ParseError::Invalid {
            instance: None,
            errors: vec![ValidationError {
                kind: ValidationErrorKind::MachineOutOfRange,
                message: "job 0 op 1 uses machine 7".into(),
            }],
        };
        assert_eq!(err.to_string(), "invalid instance: job 0 op 1 uses machine 7");
    }
}
