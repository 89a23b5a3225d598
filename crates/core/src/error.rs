// ABOUTME: Error types for the QuickFacts scraper including ErrorCode enum and ScrapeError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of scrape failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Input,
    InvalidIdentifier,
    Browser,
    Timeout,
    Output,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Input => "input error",
            ErrorCode::InvalidIdentifier => "invalid identifier",
            ErrorCode::Browser => "browser error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Output => "output error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for scrape operations.
///
/// `target` names what the operation was working on: a file path for
/// input/output errors, a URL or identifier for navigation errors.
#[derive(Debug, thiserror::Error)]
pub struct ScrapeError {
    pub code: ErrorCode,
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quickfacts: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScrapeError {
    fn with_code(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an Input error.
    pub fn input(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Input, target, op, source)
    }

    /// Create an InvalidIdentifier error.
    pub fn invalid_identifier(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::InvalidIdentifier, target, op, source)
    }

    /// Create a Browser error.
    pub fn browser(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Browser, target, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Timeout, target, op, source)
    }

    /// Create an Output error.
    pub fn output(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Output, target, op, source)
    }

    /// Returns true if this is an Input error.
    pub fn is_input(&self) -> bool {
        self.code == ErrorCode::Input
    }

    /// Returns true if this is an InvalidIdentifier error.
    pub fn is_invalid_identifier(&self) -> bool {
        self.code == ErrorCode::InvalidIdentifier
    }

    /// Returns true if this is a Browser error.
    pub fn is_browser(&self) -> bool {
        self.code == ErrorCode::Browser
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is an Output error.
    pub fn is_output(&self) -> bool {
        self.code == ErrorCode::Output
    }

    /// Errors that make continuing the batch pointless.
    ///
    /// Input and output failures affect every pair; the rest are local to the
    /// pair being navigated.
    pub fn is_fatal(&self) -> bool {
        matches!(self.code, ErrorCode::Input | ErrorCode::Output)
    }
}
