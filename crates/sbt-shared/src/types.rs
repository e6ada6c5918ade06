//! Common types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Cursor-style pagination input used by every list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<usize>,
    pub next_token: Option<String>,
}

impl Pagination {
    /// Effective page size. `None` when the caller asked for zero items.
    pub fn page_size(&self) -> Option<usize> {
        match self.limit {
            None => Some(DEFAULT_PAGE_SIZE),
            Some(0) => None,
            Some(n) => Some(n.min(MAX_PAGE_SIZE)),
        }
    }

    /// Start key for the next scan; an empty token means "from the beginning".
    pub fn start_key(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// One page of results plus the token to fetch the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }
}
