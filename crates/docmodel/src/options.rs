//! Options passed with every collection operation

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Acknowledgement level requested from the store for a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteConcern {
    /// Fire and forget
    Unacknowledged,
    /// Acknowledged by the primary
    Acknowledged,
    /// Acknowledged by a majority of nodes
    Majority,
    /// Acknowledged by the given number of nodes
    Nodes(u32),
}

impl Default for WriteConcern {
    fn default() -> Self {
        WriteConcern::Acknowledged
    }
}

/// Options for insert, update, replace and delete operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Store default when unset
    pub write_concern: Option<WriteConcern>,
    /// Wait for the write to reach the journal
    pub journal: bool,
    /// Give up waiting for the write concern after this long
    pub wtimeout: Option<Duration>,
    /// Insert when an update or replace matches nothing
    pub upsert: bool,
    /// Ask the store to skip its own document validation. Model-side
    /// validation still runs.
    pub bypass_document_validation: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_concern(mut self, concern: WriteConcern) -> Self {
        self.write_concern = Some(concern);
        self
    }

    pub fn journal(mut self, journal: bool) -> Self {
        self.journal = journal;
        self
    }

    pub fn wtimeout(mut self, timeout: Duration) -> Self {
        self.wtimeout = Some(timeout);
        self
    }

    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    pub fn bypass_document_validation(mut self, bypass: bool) -> Self {
        self.bypass_document_validation = bypass;
        self
    }
}

/// Options for find operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindOptions {
    /// Fields to include (`1`) or exclude (`0`), by dot path
    pub projection: Option<Document>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }
}
