//! Composed search results.
//!
//! These are the documents stored in the search cache and returned to callers. Field names on
//! the wire match what existing clients already consume.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Synopsis reported for a book whose description is empty or could not be fetched.
pub const NO_DESCRIPTION: &str = "No Description Available";

/// Title reported for a book the upstream provider did not name.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// The composed, cacheable response to one (query, page) search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultSet {
    /// Total number of matches reported upstream, not the length of `results`.
    pub count: u64,
    /// Books in upstream order.
    pub results: Vec<BookSummary>,
}

/// One enriched search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BookSummary {
    /// Upstream work id, e.g. `OL27513W`.
    #[serde(rename = "bID")]
    pub work_id: String,
    pub title: String,
    #[serde(rename = "sypnosis", alias = "synopsis")]
    pub synopsis: String,
    /// First publish year.
    #[serde(rename = "date")]
    pub first_publish_year: Option<i32>,
    #[serde(rename = "authorF")]
    pub author_first: String,
    #[serde(rename = "authorL")]
    pub author_last: String,
    pub genre: String,
    /// Local image route, origin URL fallback, or empty when the book has no cover.
    pub image: String,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gatsby() -> BookSummary {
        BookSummary {
            work_id: "OL123W".into(),
            title: "The Great Gatsby".into(),
            synopsis: NO_DESCRIPTION.into(),
            first_publish_year: Some(1925),
            author_first: "F.".into(),
            author_last: "Fitzgerald".into(),
            genre: "Fiction".into(),
            image: "/static/images/12345.jpg".into(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(gatsby()).unwrap();
        assert_eq!(json["bID"], "OL123W");
        assert_eq!(json["sypnosis"], NO_DESCRIPTION);
        assert_eq!(json["date"], 1925);
        assert_eq!(json["authorF"], "F.");
        assert_eq!(json["authorL"], "Fitzgerald");
        assert_eq!(json["image"], "/static/images/12345.jpg");
    }

    #[test]
    fn test_absent_year_serializes_as_null() {
        let book = BookSummary { first_publish_year: None, ..gatsby() };
        let json = serde_json::to_value(book).unwrap();
        assert!(json["date"].is_null());
    }

    #[test]
    fn test_accepts_synopsis_alias() {
        let json = r#"{"bID":"OL1W","title":"T","synopsis":"S","date":null,
            "authorF":"","authorL":"","genre":"","image":""}"#;
        let book: BookSummary = serde_json::from_str(json).unwrap();
        assert_eq!(book.synopsis, "S");
    }

    #[test]
    fn test_result_set_shape() {
        let set = ResultSet { count: 42, results: vec![gatsby()] };
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["count"], 42);
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert!(!set.is_empty());
    }
}
