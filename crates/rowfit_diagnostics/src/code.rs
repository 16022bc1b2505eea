//! Legalizer message codes: a category letter and a three-digit number.
//!
//! Numbers in the 3xx range describe one pass of a run (classification,
//! segmentation, assignment, audits); 4xx covers run settings and fatal
//! invariant violations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which part of a legalization run a code reports on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Internal invariant violations (`E`). The run must stop.
    Error,
    /// Cells the legalizer had to leave where they were (`W`).
    Warning,
    /// Progress of classification, segmentation and assignment (`P`).
    Placement,
    /// Results of the consistency audits (`C`).
    Check,
}

impl Category {
    /// Letter printed in front of the number.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Placement => 'P',
            Category::Check => 'C',
        }
    }

    /// Inverse of [`prefix`](Self::prefix).
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'E' => Some(Category::Error),
            'W' => Some(Category::Warning),
            'P' => Some(Category::Placement),
            'C' => Some(Category::Check),
            _ => None,
        }
    }

    /// Severity a message of this category carries unless stated otherwise.
    /// Progress and audit summaries are notes.
    pub fn default_severity(self) -> crate::Severity {
        match self {
            Category::Error => crate::Severity::Error,
            Category::Warning => crate::Severity::Warning,
            Category::Placement | Category::Check => crate::Severity::Note,
        }
    }
}

/// A message code such as `P310` or `C311`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// Reporting category.
    pub category: Category,
    /// Number within the category, below 1000.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a code. `const` so that code tables can be declared as items.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// A string that is not a category letter followed by three digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed diagnostic code `{0}`")]
pub struct ParseCodeError(pub String);

impl FromStr for DiagnosticCode {
    type Err = ParseCodeError;

    /// Parses codes as printed, e.g. `W330`. Used to select codes by name
    /// when filtering a sink's output.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseCodeError(s.to_string());
        let mut chars = s.chars();
        let category = chars.next().and_then(Category::from_prefix).ok_or_else(bad)?;
        let digits = chars.as_str();
        if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let number = digits.parse().map_err(|_| bad())?;
        Ok(Self::new(category, number))
    }
}
