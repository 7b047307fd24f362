//! MongoDB-backed book store

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::{
    options::{FindOptions, ReturnDocument},
    Client, Collection, Database,
};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use validator::Validate;

use crate::{
    config::DatabaseConfig,
    error::AppResult,
    models::book::{Book, Category, CreateBook, UpdateBook},
};

use super::{is_valid_object_id, parse_object_id, BookFilter, BookStore, MAX_SKIP};

/// Book as laid out in the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    #[serde(default)]
    description: String,
    author: String,
    price: f64,
    category: Category,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

impl From<BookDocument> for Book {
    fn from(doc: BookDocument) -> Self {
        Book {
            id: doc.id.to_hex(),
            title: doc.title,
            description: doc.description,
            author: doc.author,
            price: doc.price,
            category: doc.category,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

impl BookDocument {
    fn new(book: CreateBook) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: ObjectId::new(),
            title: book.title,
            description: book.description,
            author: book.author,
            price: book.price,
            category: book.category,
            created_at: now,
            updated_at: now,
        }
    }
}

fn filter_document(filter: &BookFilter) -> Document {
    match filter.title_pattern {
        Some(ref pattern) => doc! { "title": { "$regex": pattern.as_str(), "$options": "i" } },
        None => Document::new(),
    }
}

fn find_options(skip: u64, limit: u64) -> FindOptions {
    FindOptions::builder()
        .skip(skip.min(MAX_SKIP))
        .limit(i64::try_from(limit).unwrap_or(i64::MAX))
        .build()
}

fn update_document(patch: &UpdateBook) -> AppResult<Document> {
    let mut set = bson::to_document(patch)?;
    set.insert("updated_at", BsonDateTime::now());
    Ok(doc! { "$set": set })
}

#[derive(Clone)]
pub struct MongoBookStore {
    database: Database,
    books: Collection<BookDocument>,
}

impl MongoBookStore {
    /// Open a client and bind to the configured collection
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.url).await?;
        let database = client.database(&config.name);
        let books = database.collection::<BookDocument>(&config.collection);
        Ok(Self { database, books })
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    fn is_valid_id(&self, id: &str) -> bool {
        is_valid_object_id(id)
    }

    async fn find(&self, filter: &BookFilter, skip: u64, limit: u64) -> AppResult<Vec<Book>> {
        let mut cursor = self
            .books
            .find(filter_document(filter))
            .with_options(find_options(skip, limit))
            .await?;

        let mut books = Vec::new();
        while let Some(doc) = cursor.next().await {
            books.push(doc?.into());
        }
        Ok(books)
    }

    async fn create(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;

        let document = BookDocument::new(book);
        self.books.insert_one(&document).await?;
        Ok(document.into())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Book>> {
        let oid = parse_object_id(id)?;
        let found = self.books.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(Book::from))
    }

    async fn find_by_id_and_update(&self, id: &str, patch: UpdateBook) -> AppResult<Option<Book>> {
        patch.validate()?;

        let oid = parse_object_id(id)?;
        let updated = self
            .books
            .find_one_and_update(doc! { "_id": oid }, update_document(&patch)?)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(Book::from))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> AppResult<Option<Book>> {
        let oid = parse_object_id(id)?;
        let deleted = self.books.find_one_and_delete(doc! { "_id": oid }).await?;
        Ok(deleted.map(Book::from))
    }

    async fn ping(&self) -> AppResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(filter_document(&BookFilter::default()).is_empty());
    }

    #[test]
    fn test_keyword_filter_is_case_insensitive_regex() {
        let filter = filter_document(&BookFilter::title_contains(Some("a.b")));
        let title = filter.get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), r"a\.b");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_find_options_fit_in_command() {
        let options = find_options(u64::MAX, 2);
        assert_eq!(options.skip, Some(MAX_SKIP));
        assert_eq!(options.limit, Some(2));
        assert!(bson::to_document(&options).is_ok());
    }

    #[test]
    fn test_update_sets_only_present_fields() {
        let patch = UpdateBook {
            price: Some(9.99),
            category: Some(Category::Crime),
            ..Default::default()
        };
        let update = update_document(&patch).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_f64("price").unwrap(), 9.99);
        assert_eq!(set.get_str("category").unwrap(), "Crime");
        assert!(set.get_datetime("updated_at").is_ok());
        assert!(!set.contains_key("title"));
        assert!(!set.contains_key("created_at"));
    }

    #[test]
    fn test_document_to_book_uses_hex_id() {
        let document = BookDocument::new(CreateBook {
            title: "Emma".to_string(),
            description: String::new(),
            author: "Jane Austen".to_string(),
            price: 4.0,
            category: Category::Classics,
        });
        let oid = document.id;

        let book = Book::from(document);
        assert_eq!(book.id, oid.to_hex());
        assert_eq!(book.created_at, book.updated_at);
    }
}
