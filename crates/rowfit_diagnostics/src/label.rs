//! Labels that point a diagnostic at objects in the placement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A layout object a diagnostic can refer to.
///
/// Raw indices are used so that this crate stays independent of the
/// legalizer's ID newtypes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Subject {
    /// A cell (node) in the network.
    Cell(u32),
    /// A placement segment.
    Segment(u32),
    /// A placement row.
    Row(u32),
    /// A fence region.
    Region(u32),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Cell(id) => write!(f, "cell {id}"),
            Subject::Segment(id) => write!(f, "segment {id}"),
            Subject::Row(id) => write!(f, "row {id}"),
            Subject::Region(id) => write!(f, "region {id}"),
        }
    }
}

/// An annotation attaching an explanatory message to a layout object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    /// The object this label annotates.
    pub subject: Subject,
    /// The message displayed next to the object.
    pub message: String,
}

impl Label {
    /// Creates a label for the given object.
    pub fn new(subject: Subject, message: impl Into<String>) -> Self {
        Self {
            subject,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_display() {
        assert_eq!(format!("{}", Subject::Cell(3)), "cell 3");
        assert_eq!(format!("{}", Subject::Segment(0)), "segment 0");
        assert_eq!(format!("{}", Subject::Row(12)), "row 12");
        assert_eq!(format!("{}", Subject::Region(2)), "region 2");
    }

    #[test]
    fn label_new() {
        let label = Label::new(Subject::Segment(4), "region 1 segment");
        assert_eq!(label.subject, Subject::Segment(4));
        assert_eq!(label.message, "region 1 segment");
    }
}
