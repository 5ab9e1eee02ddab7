//! User-visible notices and the boundary that turns lookup outcomes into safe defaults.
//!
//! External calls never fail a user action. Each one produces an [`Outcome`], and
//! [`Notices::settle`] converts it into a value the caller can always render, recording
//! a notice for anything the user should hear about.

use serde::Serialize;

use crate::error::{AppError, AppResult, FailureKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// Non-blocking message shown next to a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Result of a single external lookup
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    NotFound,
    TransientFailure(AppError),
    ConfigurationError(String),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::TransientFailure(e) => Outcome::TransientFailure(e),
            Outcome::ConfigurationError(msg) => Outcome::ConfigurationError(msg),
        }
    }
}

impl<T> From<AppResult<T>> for Outcome<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => match e.kind() {
                FailureKind::NotFound => Outcome::NotFound,
                FailureKind::Configuration => Outcome::ConfigurationError(e.to_string()),
                _ => Outcome::TransientFailure(e),
            },
        }
    }
}

/// Notices collected while serving one user action
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct Notices(Vec<Notice>);

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.0.push(notice);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Notice::warning(message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.0.iter()
    }

    /// Resolve an outcome to a value, recording a notice for failures.
    ///
    /// `NotFound` yields the fallback silently. Transient and configuration failures
    /// yield the fallback and add an error notice prefixed with `context`.
    pub fn settle<T>(
        &mut self,
        outcome: Outcome<T>,
        context: &str,
        fallback: impl FnOnce() -> T,
    ) -> T {
        match outcome {
            Outcome::Success(value) => value,
            Outcome::NotFound => fallback(),
            Outcome::TransientFailure(e) => {
                tracing::warn!(error = %e, context = %context, "External call failed");
                self.push(Notice::error(format!("{}: {}", context, e)));
                fallback()
            }
            Outcome::ConfigurationError(msg) => {
                tracing::error!(error = %msg, context = %context, "External call not configured");
                self.push(Notice::error(format!("{}: {}", context, msg)));
                fallback()
            }
        }
    }
}
