//! Venue classification by entry type.

use std::fmt;

use serde::{Serialize, Serializer};

/// Display category of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VenueType {
    Journal,
    Conference,
    Workshop,
    Thesis,
    Other,
}

impl VenueType {
    /// Classifies a BibTeX entry type (case-insensitive).
    pub fn from_entry_type(entry_type: &str) -> Self {
        match entry_type.to_lowercase().as_str() {
            "article" => Self::Journal,
            "inproceedings" | "conference" => Self::Conference,
            "misc" => Self::Workshop,
            "masterthesis" | "mastersthesis" | "phdthesis" => Self::Thesis,
            _ => Self::Other,
        }
    }

    /// The label shown on the site.
    ///
    /// Theses are labelled "These"; the published pages already use it.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Journal => "Journal",
            Self::Conference => "Conference",
            Self::Workshop => "Workshop",
            Self::Thesis => "These",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for VenueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
