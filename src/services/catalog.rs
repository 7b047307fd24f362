//! Book catalog service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::{BookFilter, BookStore, MAX_SKIP},
};

/// Fixed number of books returned per list page
pub const BOOKS_PER_PAGE: u64 = 2;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// List one page of books, optionally filtered by title keyword
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let page = query.page();
        let skip = BOOKS_PER_PAGE.saturating_mul(page - 1).min(MAX_SKIP);
        let filter = BookFilter::title_contains(query.keyword());

        tracing::debug!(page, keyword = ?query.keyword(), "Listing books");
        self.store.find(&filter, skip, BOOKS_PER_PAGE).await
    }

    /// Create a new book; the store assigns its id
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        let created = self.store.create(book).await?;
        tracing::info!("Catalog create: book id={}", created.id);
        Ok(created)
    }

    /// Get a book by id
    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        self.check_id(id)?;

        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found!".to_string()))
    }

    /// Update a book. A well-formed id with no record yields `None`, not `NotFound`.
    pub async fn update_book(&self, id: &str, patch: UpdateBook) -> AppResult<Option<Book>> {
        self.check_id(id)?;

        let updated = self.store.find_by_id_and_update(id, patch).await?;
        if updated.is_none() {
            tracing::debug!("Catalog update: no book with id={}", id);
        }
        Ok(updated)
    }

    /// Delete a book, returning it as it was before removal.
    /// A well-formed id with no record yields `None`, not `NotFound`.
    pub async fn delete_book(&self, id: &str) -> AppResult<Option<Book>> {
        self.check_id(id)?;

        let deleted = self.store.find_by_id_and_delete(id).await?;
        if let Some(ref book) = deleted {
            tracing::info!("Catalog delete: book id={}", book.id);
        }
        Ok(deleted)
    }

    /// Round-trip to the store, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    fn check_id(&self, id: &str) -> AppResult<()> {
        if self.store.is_valid_id(id) {
            Ok(())
        } else {
            Err(AppError::InvalidIdentifier)
        }
    }
}
