//! Per-query search session
//!
//! A session is everything tied to one explicitly submitted query: the
//! query text, the page cursor and the accumulated profiles. Submitting
//! again builds a fresh session, so a page number can never leak from one
//! query into the next.

use crate::client::{ProfileRecord, SearchPage};
use std::collections::HashSet;

/// The search API serves at most this many results per query, whatever
/// `total_count` says; later pages are rejected.
pub const SEARCH_RESULT_CAP: u64 = 1000;

/// Identifies one submitted query for the lifetime of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    query: String,
    page: u32,
    profiles: Vec<ProfileRecord>,
    seen: HashSet<u64>,
    total_count: Option<u64>,
    exhausted: bool,
}

impl Session {
    pub fn new(id: SessionId, query: impl Into<String>) -> Self {
        Self {
            id,
            query: query.into(),
            page: 1,
            profiles: Vec::new(),
            seen: HashSet::new(),
            total_count: None,
            exhausted: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn profiles(&self) -> &[ProfileRecord] {
        &self.profiles
    }

    /// Total reported by the API, `None` until the first page arrives
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether a sentinel trigger may advance this session
    pub fn can_advance(&self) -> bool {
        !self.exhausted && self.total_count.is_some()
    }

    /// Move to the next page and return it
    pub fn advance(&mut self) -> u32 {
        self.page += 1;
        self.page
    }

    /// Replace the result set with the first page.
    pub fn apply_first_page(&mut self, page: SearchPage) {
        self.profiles.clear();
        self.seen.clear();
        self.total_count = Some(page.total_count);
        let added = self.merge(page.items);
        self.update_exhausted(added);
    }

    /// Append a later page, skipping profiles already present.
    /// Returns how many profiles were new.
    pub fn apply_next_page(&mut self, page: SearchPage) -> usize {
        self.total_count = Some(page.total_count);
        let added = self.merge(page.items);
        self.update_exhausted(added);
        added
    }

    fn merge(&mut self, items: Vec<ProfileRecord>) -> usize {
        let before = self.profiles.len();
        for profile in items {
            if self.seen.insert(profile.id) {
                self.profiles.push(profile);
            }
        }
        self.profiles.len() - before
    }

    fn update_exhausted(&mut self, added: usize) {
        let total = self.total_count.unwrap_or(0).min(SEARCH_RESULT_CAP);
        if added == 0 || self.profiles.len() as u64 >= total {
            self.exhausted = true;
        }
    }
}
