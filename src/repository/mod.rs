//! Repository layer for book persistence

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use bson::oid::ObjectId;
use regex::{Regex, RegexBuilder};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

pub use memory::InMemoryBookStore;
pub use mongo::MongoBookStore;

/// Document store holding the book collection.
///
/// `create` and `find_by_id_and_update` run the payload's shape validation
/// before committing. Update and delete are atomic single-document operations
/// and return `None` when no record has the given id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Whether `id` has the store's identifier format
    fn is_valid_id(&self, id: &str) -> bool;

    /// Records matching `filter` in natural order, after skipping `skip` and capped at `limit`
    async fn find(&self, filter: &BookFilter, skip: u64, limit: u64) -> AppResult<Vec<Book>>;

    async fn create(&self, book: CreateBook) -> AppResult<Book>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Book>>;

    /// Apply `patch` and return the record as it is after the update
    async fn find_by_id_and_update(&self, id: &str, patch: UpdateBook) -> AppResult<Option<Book>>;

    /// Remove the record and return it as it was before removal
    async fn find_by_id_and_delete(&self, id: &str) -> AppResult<Option<Book>>;

    /// Round-trip to the backing store
    async fn ping(&self) -> AppResult<()>;
}

/// Largest skip a store accepts; MongoDB carries skip as a signed 64-bit integer
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Identifier format shared by both stores: a 24 character hex ObjectId
pub fn is_valid_object_id(id: &str) -> bool {
    ObjectId::parse_str(id).is_ok()
}

pub(crate) fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidIdentifier)
}

/// Filter applied by [`BookStore::find`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Regex matched case-insensitively against the title
    pub title_pattern: Option<String>,
}

impl BookFilter {
    /// Titles containing `keyword` as a literal, case-insensitive substring
    pub fn title_contains(keyword: Option<&str>) -> Self {
        Self {
            title_pattern: keyword.map(regex::escape),
        }
    }

    pub fn title_regex(&self) -> AppResult<Option<Regex>> {
        self.title_pattern
            .as_deref()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| AppError::Internal(format!("Invalid title pattern: {}", e)))
            })
            .transpose()
    }
}
