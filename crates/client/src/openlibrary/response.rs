//! Open Library response types.
//!
//! Every field upstream may omit is optional here, and each accessor states
//! the default it falls back to.

use serde::{Deserialize, Deserializer};

/// Raw response from the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchDocs {
    /// Total matches across all pages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_found: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub docs: Vec<SearchDoc>,
}

/// One search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchDoc {
    /// Work path, e.g. `/works/OL27513W`.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: Vec<String>,
    /// Numeric cover id.
    #[serde(default)]
    pub cover_i: Option<i64>,
}

/// Read an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SearchDoc {
    /// Final path segment of `key`, or empty when there is no key.
    pub fn work_id(&self) -> &str {
        self.key
            .as_deref()
            .and_then(|key| key.rsplit('/').next())
            .unwrap_or("")
    }

    /// Title, or `None` when absent or empty.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// First author split into first and last whitespace token.
    ///
    /// The last token is empty when the name has a single token; both are
    /// empty when there is no author.
    pub fn author_tokens(&self) -> (&str, &str) {
        let Some(full) = self.author_name.first() else {
            return ("", "");
        };
        let mut parts = full.split_whitespace();
        let first = parts.next().unwrap_or("");
        let last = parts.next_back().unwrap_or("");
        (first, last)
    }

    /// First listed subject, or empty.
    pub fn genre(&self) -> &str {
        self.subject.first().map(String::as_str).unwrap_or("")
    }

    /// Cover id as a string. Zero and negative ids mean "no cover".
    pub fn cover_id(&self) -> Option<String> {
        self.cover_i.filter(|id| *id > 0).map(|id| id.to_string())
    }
}

/// Raw response from the work endpoint. Only the description is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkRecord {
    #[serde(default)]
    pub description: Option<WorkDescription>,
}

/// Upstream stores descriptions either as a bare string or as a typed text
/// object `{"type": "/type/text", "value": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WorkDescription {
    Text(String),
    Typed {
        #[serde(default)]
        value: Option<String>,
    },
}

impl WorkRecord {
    /// Description as plain text; empty when upstream has none.
    pub fn description_text(self) -> String {
        match self.description {
            Some(WorkDescription::Text(text)) => text,
            Some(WorkDescription::Typed { value }) => value.unwrap_or_default(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "num_found": 1523,
        "start": 0,
        "docs": [
            {
                "key": "/works/OL123W",
                "title": "The Great Gatsby",
                "author_name": ["F. Scott Fitzgerald"],
                "first_publish_year": 1925,
                "subject": ["Fiction", "Classic"],
                "cover_i": 12345,
                "edition_count": 800
            },
            {
                "key": "/works/OL456W",
                "title": "Unknown Book"
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_search_response() {
        let response: SearchDocs = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(response.num_found, 1523);
        assert_eq!(response.docs.len(), 2);
    }

    #[test]
    fn test_full_doc_accessors() {
        let response: SearchDocs = serde_json::from_str(FIXTURE_JSON).unwrap();
        let doc = &response.docs[0];

        assert_eq!(doc.work_id(), "OL123W");
        assert_eq!(doc.title(), Some("The Great Gatsby"));
        assert_eq!(doc.author_tokens(), ("F.", "Fitzgerald"));
        assert_eq!(doc.first_publish_year, Some(1925));
        assert_eq!(doc.genre(), "Fiction");
        assert_eq!(doc.cover_id().as_deref(), Some("12345"));
    }

    #[test]
    fn test_sparse_doc_accessors() {
        let response: SearchDocs = serde_json::from_str(FIXTURE_JSON).unwrap();
        let doc = &response.docs[1];

        assert_eq!(doc.work_id(), "OL456W");
        assert_eq!(doc.author_tokens(), ("", ""));
        assert_eq!(doc.first_publish_year, None);
        assert_eq!(doc.genre(), "");
        assert_eq!(doc.cover_id(), None);
    }

    #[test]
    fn test_missing_key_and_title() {
        let doc: SearchDoc = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert_eq!(doc.work_id(), "");
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn test_author_tokens() {
        let single = SearchDoc { author_name: vec!["Homer".into()], ..Default::default() };
        assert_eq!(single.author_tokens(), ("Homer", ""));

        let spaced = SearchDoc { author_name: vec!["  Ursula   K.  Le Guin ".into()], ..Default::default() };
        assert_eq!(spaced.author_tokens(), ("Ursula", "Guin"));

        let many = SearchDoc { author_name: vec!["John Doe".into(), "Jane Smith".into()], ..Default::default() };
        assert_eq!(many.author_tokens(), ("John", "Doe"));
    }

    #[test]
    fn test_non_positive_cover_is_absent() {
        let doc = SearchDoc { cover_i: Some(-1), ..Default::default() };
        assert_eq!(doc.cover_id(), None);
        let doc = SearchDoc { cover_i: Some(0), ..Default::default() };
        assert_eq!(doc.cover_id(), None);
    }

    #[test]
    fn test_null_fields_read_as_absent() {
        let response: SearchDocs = serde_json::from_str(
            r#"{"num_found": 1, "docs": [{"key": "/works/OL1W", "title": "T", "author_name": null, "subject": null, "cover_i": null}]}"#,
        )
        .unwrap();

        let doc = &response.docs[0];
        assert_eq!(doc.work_id(), "OL1W");
        assert_eq!(doc.author_tokens(), ("", ""));
        assert_eq!(doc.genre(), "");
        assert_eq!(doc.cover_id(), None);

        let response: SearchDocs = serde_json::from_str(r#"{"num_found": null, "docs": null}"#).unwrap();
        assert_eq!(response.num_found, 0);
        assert!(response.docs.is_empty());
    }

    #[test]
    fn test_empty_search_response() {
        let response: SearchDocs = serde_json::from_str("{}").unwrap();
        assert_eq!(response.num_found, 0);
        assert!(response.docs.is_empty());
    }

    #[test]
    fn test_description_forms() {
        let text: WorkRecord = serde_json::from_str(r#"{"description": "A novel."}"#).unwrap();
        assert_eq!(text.description_text(), "A novel.");

        let typed: WorkRecord =
            serde_json::from_str(r#"{"description": {"type": "/type/text", "value": "Typed."}}"#).unwrap();
        assert_eq!(typed.description_text(), "Typed.");

        let empty_typed: WorkRecord = serde_json::from_str(r#"{"description": {"type": "/type/text"}}"#).unwrap();
        assert_eq!(empty_typed.description_text(), "");

        let absent: WorkRecord = serde_json::from_str(r#"{"title": "No blurb"}"#).unwrap();
        assert_eq!(absent.description_text(), "");

        let null: WorkRecord = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(null.description_text(), "");
    }
}
