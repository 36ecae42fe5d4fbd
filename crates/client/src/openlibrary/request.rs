//! Open Library request URL construction.

use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::openlibrary::OpenLibraryError;

/// Search request for one page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Sanitized query: lower-case tokens joined with `+`.
    pub q: String,
    /// 1-based page.
    pub page: u32,
}

impl SearchRequest {
    pub fn new(q: impl Into<String>, page: u32) -> Self {
        Self { q: q.into(), page }
    }

    /// Build `<endpoint>?q=<q>&page=<page>`.
    ///
    /// The `+` separators are kept as-is so upstream reads them as spaces;
    /// every token is percent-encoded on its own.
    pub fn to_url(&self, endpoint: &str) -> Result<Url, OpenLibraryError> {
        let mut url = Url::parse(endpoint).map_err(|e| OpenLibraryError::InvalidUrl(format!("{endpoint}: {e}")))?;

        let q = self
            .q
            .split('+')
            .map(|token| byte_serialize(token.as_bytes()).collect::<String>())
            .collect::<Vec<_>>()
            .join("+");

        url.set_query(Some(&format!("q={}&page={}", q, self.page)));
        Ok(url)
    }
}

/// `<base>/<work_id>.json`
pub fn work_url(base: &str, work_id: &str) -> Result<Url, OpenLibraryError> {
    append_segment(base, &format!("{work_id}.json"))
}

/// `<base>/<cover_id>-L.jpg`
pub fn cover_url(base: &str, cover_id: &str) -> Result<Url, OpenLibraryError> {
    append_segment(base, &format!("{cover_id}-L.jpg"))
}

fn append_segment(base: &str, segment: &str) -> Result<Url, OpenLibraryError> {
    let mut url = Url::parse(base).map_err(|e| OpenLibraryError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| OpenLibraryError::InvalidUrl(format!("{base}: cannot be a base URL")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}
