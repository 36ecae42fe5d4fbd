//! In-memory [`BookSource`] for catalog tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Barrier;

use super::BookSource;
use crate::openlibrary::{OpenLibraryError, SearchDocs, WorkRecord};

/// Canned upstream responses with call counters.
///
/// Unknown work ids answer with an empty record and unknown cover ids fail
/// with a 404, matching what upstream does.
#[derive(Default)]
pub struct FakeSource {
    search: Option<String>,
    search_fails: bool,
    works: HashMap<String, String>,
    failing_works: HashSet<String>,
    covers: HashMap<String, Vec<u8>>,
    work_gate: Option<Arc<Barrier>>,
    cover_gate: Option<Arc<Barrier>>,
    search_calls: AtomicUsize,
    work_calls: AtomicUsize,
    cover_calls: AtomicUsize,
    last_query: Mutex<Option<(String, u32)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search response body returned for every query.
    pub fn with_search(mut self, json: &str) -> Self {
        self.search = Some(json.to_string());
        self
    }

    pub fn with_failing_search(mut self) -> Self {
        self.search_fails = true;
        self
    }

    /// Work record body for one work id.
    pub fn with_work(mut self, work_id: &str, json: &str) -> Self {
        self.works.insert(work_id.to_string(), json.to_string());
        self
    }

    pub fn with_failing_work(mut self, work_id: &str) -> Self {
        self.failing_works.insert(work_id.to_string());
        self
    }

    pub fn with_cover(mut self, cover_id: &str, bytes: &[u8]) -> Self {
        self.covers.insert(cover_id.to_string(), bytes.to_vec());
        self
    }

    /// Every work call waits on `gate` before answering.
    pub fn with_work_gate(mut self, gate: Arc<Barrier>) -> Self {
        self.work_gate = Some(gate);
        self
    }

    /// Every cover call waits on `gate` before answering.
    pub fn with_cover_gate(mut self, gate: Arc<Barrier>) -> Self {
        self.cover_gate = Some(gate);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn work_calls(&self) -> usize {
        self.work_calls.load(Ordering::SeqCst)
    }

    pub fn cover_calls(&self) -> usize {
        self.cover_calls.load(Ordering::SeqCst)
    }

    /// Query and page of the most recent search call.
    pub fn last_query(&self) -> Option<(String, u32)> {
        self.last_query.lock().ok().and_then(|q| q.clone())
    }
}

#[async_trait]
impl BookSource for FakeSource {
    async fn search(&self, query: &str, page: u32) -> Result<SearchDocs, OpenLibraryError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some((query.to_string(), page));
        }

        if self.search_fails {
            return Err(OpenLibraryError::HttpError { status: 503 });
        }
        let body = self.search.as_deref().unwrap_or("{}");
        serde_json::from_str(body).map_err(|e| OpenLibraryError::Parse(e.to_string()))
    }

    async fn work(&self, work_id: &str) -> Result<WorkRecord, OpenLibraryError> {
        self.work_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.work_gate {
            gate.wait().await;
        }

        if self.failing_works.contains(work_id) {
            return Err(OpenLibraryError::Timeout);
        }
        let body = self.works.get(work_id).map(String::as_str).unwrap_or("{}");
        serde_json::from_str(body).map_err(|e| OpenLibraryError::Parse(e.to_string()))
    }

    async fn cover(&self, cover_id: &str) -> Result<Bytes, OpenLibraryError> {
        self.cover_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.cover_gate {
            gate.wait().await;
        }

        self.covers
            .get(cover_id)
            .map(|bytes| Bytes::from(bytes.clone()))
            .ok_or(OpenLibraryError::HttpError { status: 404 })
    }

    fn cover_url(&self, cover_id: &str) -> String {
        format!("https://covers.example.org/b/id/{cover_id}-L.jpg")
    }
}
