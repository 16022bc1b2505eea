//! How much a legalizer message matters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic, ordered from `Help` up to `Error`.
///
/// Cell counts, displacement totals and audit results are `Note`s. A cell
/// left unassigned is a `Warning`. A broken segment/cell mapping is an
/// `Error`, after which the placement state must not be trusted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Suggestion attached to another message.
    Help,
    /// Run summary.
    Note,
    /// The placement is usable but some cells were left in place.
    Warning,
    /// Invariant violation.
    Error,
}

impl Severity {
    /// Returns `true` for [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// Lowercase name as rendered.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Help => "help",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Highest severity among `levels`, `None` when there are none.
    pub fn worst<I: IntoIterator<Item = Severity>>(levels: I) -> Option<Severity> {
        levels.into_iter().max()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
