//! Validation issues shared by every schema binding.
//!
//! Each binding converts its library's native error into a list of
//! [`Issue`]s, so a strict parse failure always looks the same to the error
//! response builder regardless of which library produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message used when a library reports failure without any detail.
pub const DEFAULT_ISSUE_MESSAGE: &str = "Invalid input";

/// One step in the path to an offending value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// An object key.
    Key(String),
    /// An array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A single validation failure.
///
/// An empty `path` refers to the params object as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable description.
    pub message: String,
    /// Location of the offending value.
    pub path: Vec<PathSegment>,
}

impl Issue {
    /// Creates a root-level issue.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
        }
    }

    /// Creates an issue at the given path.
    #[must_use]
    pub fn at<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            message: message.into(),
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Prepends a segment, used when nesting issues from a child value.
    #[must_use]
    pub fn prefixed(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    /// Returns the path as a dotted string, e.g. `items.0.name`.
    #[must_use]
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path_string(), self.message)
        }
    }
}

/// A strict parse failure, carrying every issue the library reported.
///
/// Always holds at least one issue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{library} validation failed: {}", summary(.issues))]
pub struct ValidationError {
    library: &'static str,
    issues: Vec<Issue>,
}

fn summary(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates a validation error for the named library.
    ///
    /// An empty issue list is replaced by a single root-level
    /// [`DEFAULT_ISSUE_MESSAGE`] issue, and a blank message on any issue is
    /// replaced by [`DEFAULT_ISSUE_MESSAGE`].
    #[must_use]
    pub fn new(library: &'static str, issues: Vec<Issue>) -> Self {
        if issues.is_empty() {
            return Self {
                library,
                issues: vec![Issue::new(DEFAULT_ISSUE_MESSAGE)],
            };
        }
        let issues = issues
            .into_iter()
            .map(|mut issue| {
                if issue.message.trim().is_empty() {
                    issue.message = DEFAULT_ISSUE_MESSAGE.to_string();
                }
                issue
            })
            .collect();
        Self { library, issues }
    }

    /// Returns the name of the library that rejected the input.
    #[must_use]
    pub fn library(&self) -> &'static str {
        self.library
    }

    /// Returns the issues.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consumes the error, returning its issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}
