//! Process-local book store

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tokio::sync::RwLock;
use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, UpdateBook},
};

use super::{is_valid_object_id, parse_object_id, BookFilter, BookStore};

/// Keeps books in insertion order behind an async lock
#[derive(Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Stored ids are lowercase hex; any accepted spelling of an id maps onto that form
fn canonical_id(id: &str) -> AppResult<String> {
    Ok(parse_object_id(id)?.to_hex())
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    fn is_valid_id(&self, id: &str) -> bool {
        is_valid_object_id(id)
    }

    async fn find(&self, filter: &BookFilter, skip: u64, limit: u64) -> AppResult<Vec<Book>> {
        let title = filter.title_regex()?;
        let books = self.books.read().await;

        Ok(books
            .iter()
            .filter(|b| title.as_ref().map_or(true, |re| re.is_match(&b.title)))
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn create(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;

        let now = Utc::now();
        let created = Book {
            id: ObjectId::new().to_hex(),
            title: book.title,
            description: book.description,
            author: book.author,
            price: book.price,
            category: book.category,
            created_at: now,
            updated_at: now,
        };

        self.books.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Book>> {
        let id = canonical_id(id)?;
        let books = self.books.read().await;
        Ok(books.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_id_and_update(&self, id: &str, patch: UpdateBook) -> AppResult<Option<Book>> {
        patch.validate()?;

        let id = canonical_id(id)?;
        let mut books = self.books.write().await;
        Ok(books.iter_mut().find(|b| b.id == id).map(|book| {
            patch.apply_to(book);
            book.updated_at = Utc::now();
            book.clone()
        }))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> AppResult<Option<Book>> {
        let id = canonical_id(id)?;
        let mut books = self.books.write().await;
        let index = books.iter().position(|b| b.id == id);
        Ok(index.map(|index| books.remove(index)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::book::Category};

    fn new_book(title: &str) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            description: String::new(),
            author: "Anonymous".to_string(),
            price: 10.0,
            category: Category::Classics,
        }
    }

    async fn seeded(titles: &[&str]) -> InMemoryBookStore {
        let store = InMemoryBookStore::new();
        for title in titles {
            store.create(new_book(title)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_find_keeps_insertion_order() {
        let store = seeded(&["a", "b", "c", "d", "e"]).await;

        let titles: Vec<_> = store
            .find(&BookFilter::default(), 2, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();

        assert_eq!(titles, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_find_filters_before_skipping() {
        let store = seeded(&["Dune", "Emma", "Dune Messiah", "Ulysses", "Children of Dune"]).await;
        let filter = BookFilter::title_contains(Some("dune"));

        let page = store.find(&filter, 2, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Children of Dune");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_shape() {
        let store = InMemoryBookStore::new();
        let mut book = new_book("x");
        book.price = -2.0;

        let err = store.create(book).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.find(&BookFilter::default(), 0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_validates_before_commit() {
        let store = seeded(&["Emma"]).await;
        let id = store.find(&BookFilter::default(), 0, 1).await.unwrap()[0].id.clone();

        let patch = UpdateBook {
            title: Some(String::new()),
            ..Default::default()
        };
        let err = store.find_by_id_and_update(&id, patch).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let unchanged = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "Emma");
    }

    #[tokio::test]
    async fn test_lookup_ignores_id_case() {
        let store = seeded(&["Emma"]).await;
        let id = store.find(&BookFilter::default(), 0, 1).await.unwrap()[0].id.clone();
        let upper = id.to_uppercase();
        assert!(store.is_valid_id(&upper));

        let found = store.find_by_id(&upper).await.unwrap().unwrap();
        assert_eq!(found.id, id);

        let patch = UpdateBook {
            price: Some(2.0),
            ..Default::default()
        };
        let updated = store.find_by_id_and_update(&upper, patch).await.unwrap().unwrap();
        assert_eq!(updated.price, 2.0);

        let removed = store.find_by_id_and_delete(&upper).await.unwrap().unwrap();
        assert_eq!(removed.id, id);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_record() {
        let store = seeded(&["Emma", "Ulysses"]).await;
        let id = store.find(&BookFilter::default(), 0, 1).await.unwrap()[0].id.clone();

        let removed = store.find_by_id_and_delete(&id).await.unwrap().unwrap();
        assert_eq!(removed.title, "Emma");
        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert!(store.find_by_id_and_delete(&id).await.unwrap().is_none());
    }
}
