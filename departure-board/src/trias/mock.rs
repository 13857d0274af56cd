//! Mock feed source for development and tests without feed credentials.
//!
//! Serves pre-recorded TRIAS responses from XML files. File stems name the
//! stop point they answer for, with `:` replaced by `_` so refs like
//! `de:08212:3` stay portable as filenames (`de_08212_3.xml`).

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

use super::client::StopEventSource;
use super::error::TriasError;
use super::parse::{FeedDocument, parse_document};

/// A feed source backed by in-memory documents.
#[derive(Debug, Clone, Default)]
pub struct MockFeed {
    documents: HashMap<String, FeedDocument>,
}

impl MockFeed {
    /// An empty mock; every fetch fails until documents are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.xml` file in a directory as a recorded response.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TriasError> {
        let mut documents = HashMap::new();

        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("xml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let stop_point_ref = stem.replace('_', ":");
            let body = std::fs::read_to_string(&path)?;
            documents.insert(stop_point_ref, parse_document(&body)?);
        }

        Ok(Self { documents })
    }

    /// Add (or replace) the recorded document for one stop point.
    pub fn with_document(mut self, stop_point_ref: impl Into<String>, doc: FeedDocument) -> Self {
        self.documents.insert(stop_point_ref.into(), doc);
        self
    }

    /// Stop points this mock can answer for.
    pub fn available_stop_points(&self) -> Vec<&str> {
        self.documents.keys().map(String::as_str).collect()
    }
}

impl StopEventSource for MockFeed {
    fn stop_events(
        &self,
        stop_point_ref: &str,
    ) -> impl Future<Output = Result<FeedDocument, TriasError>> + Send {
        let result = self
            .documents
            .get(stop_point_ref)
            .cloned()
            .ok_or_else(|| TriasError::Api {
                status: 404,
                message: format!("no mock data for stop point {stop_point_ref}"),
            });
        async move { result }
    }
}
