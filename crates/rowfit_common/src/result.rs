//! Common result and error types for the legalizer.

/// The standard result type for operations that can detect corrupted state.
///
/// `Ok` carries the operation's outcome, which for move proposals is itself a
/// feasibility flag. `Err` means an internal invariant was broken (a bug in
/// the legalizer, not bad input); the caller must abort the run rather than
/// continue on a corrupted segment/cell mapping.
pub type LegalResult<T> = Result<T, InternalError>;

/// A fatal invariant violation inside the legalizer.
///
/// Examples are a cell missing from the segment its reverse map names, a
/// region split that matches none of the overlap cases, or a multi-height
/// cell whose segment span disagrees with its row count.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal legalizer error: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for InternalError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("cell not found in expected segment");
        assert_eq!(
            format!("{err}"),
            "internal legalizer error: cell not found in expected segment"
        );
    }

    #[test]
    fn question_mark_propagates() {
        fn inner() -> LegalResult<u32> {
            Err("improper region id".into())
        }
        fn outer() -> LegalResult<u32> {
            let v = inner()?;
            Ok(v + 1)
        }
        assert_eq!(outer().unwrap_err().message, "improper region id");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}
