use std::fmt;

use serde::{Deserialize, Serialize};

/// Availability value that marks a document as downloadable.
pub const AVAILABLE: &str = "Available";

/// One archived record, as delivered by the document source.
///
/// Every field except `document_id` may be missing from the source data.
/// `document_date` is an ISO `YYYY-MM-DD` string, so lexicographic order on it
/// is chronological order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub document_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub document_date: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    /// Reserved for ranking; never computed here.
    #[serde(default)]
    pub score: f64,
}

/// Document fields addressable by filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    DocumentId,
    Description,
    DocumentDate,
    DocumentType,
    Source,
    Availability,
    FilePath,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::DocumentId => "document_id",
            Field::Description => "description",
            Field::DocumentDate => "document_date",
            Field::DocumentType => "document_type",
            Field::Source => "source",
            Field::Availability => "availability",
            Field::FilePath => "file_path",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Document {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            ..Self::default()
        }
    }

    /// Raw value of `field`, `None` when the source omitted it.
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::DocumentId => Some(self.document_id.as_str()),
            Field::Description => self.description.as_deref(),
            Field::DocumentDate => self.document_date.as_deref(),
            Field::DocumentType => self.document_type.as_deref(),
            Field::Source => self.source.as_deref(),
            Field::Availability => self.availability.as_deref(),
            Field::FilePath => self.file_path.as_deref(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.availability.as_deref() == Some(AVAILABLE)
    }

    /// Year prefix of `document_date`, if it starts with four ASCII digits.
    pub fn year(&self) -> Option<i32> {
        let date = self.document_date.as_deref()?;
        let prefix = date.get(..4)?;
        if !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        prefix.parse().ok()
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.document_date = Some(date.into());
        self
    }

    pub fn with_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = Some(availability.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_returns_none_for_missing_values() {
        let doc = Document::new("1895-18").with_type("ORGANISATIONAL");
        assert_eq!(doc.field(Field::DocumentId), Some("1895-18"));
        assert_eq!(doc.field(Field::DocumentType), Some("ORGANISATIONAL"));
        assert_eq!(doc.field(Field::Source), None);
        assert_eq!(doc.field(Field::DocumentDate), None);
    }

    #[test]
    fn year_requires_four_leading_digits() {
        let cases: &[(Option<&str>, Option<i32>)] = &[
            (Some("2015-01-01"), Some(2015)),
            (Some("2018"), Some(2018)),
            (Some("15-01-01"), None),
            (Some("abcd-01-01"), None),
            (Some(""), None),
            (None, None),
        ];

        for (date, expected) in cases {
            let mut doc = Document::new("x");
            doc.document_date = date.map(str::to_owned);
            assert_eq!(doc.year(), *expected, "date: {:?}", date);
        }
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let doc: Document = serde_json::from_str(
            r#"{"document_id":"2056-34","document_date":"2018-02-01","extra":"ignored"}"#,
        )
        .expect("valid document json");

        assert_eq!(doc.document_id, "2056-34");
        assert_eq!(doc.document_date.as_deref(), Some("2018-02-01"));
        assert_eq!(doc.availability, None);
        assert_eq!(doc.score, 0.0);
        assert!(!doc.is_available());
    }
}
