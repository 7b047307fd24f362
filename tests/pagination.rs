//! Property-based tests for list pagination and keyword search.

use std::sync::Arc;

use proptest::prelude::*;

use bookshelf_server::{
    models::book::{BookQuery, Category, CreateBook},
    repository::InMemoryBookStore,
    services::catalog::{CatalogService, BOOKS_PER_PAGE},
};

fn new_book(title: String) -> CreateBook {
    CreateBook {
        title,
        description: String::new(),
        author: "Anonymous".to_string(),
        price: 1.0,
        category: Category::Crime,
    }
}

fn seeded(titles: Vec<String>) -> CatalogService {
    let service = CatalogService::new(Arc::new(InMemoryBookStore::new()));
    tokio_test::block_on(async {
        for title in titles {
            service.create_book(new_book(title)).await.unwrap();
        }
    });
    service
}

fn list(service: &CatalogService, page: Option<String>, keyword: Option<String>) -> Vec<String> {
    let query = BookQuery { page, keyword };
    tokio_test::block_on(service.list_books(&query))
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect()
}

proptest! {
    /// Page P over N records holds min(2, max(0, N - 2(P-1))) records.
    #[test]
    fn page_size_law(n in 0usize..12, page in 1u64..9) {
        let service = seeded((0..n).map(|i| format!("Book {i}")).collect());

        let got = list(&service, Some(page.to_string()), None).len() as u64;
        let expected = (n as u64)
            .saturating_sub(BOOKS_PER_PAGE * (page - 1))
            .min(BOOKS_PER_PAGE);
        prop_assert_eq!(got, expected);
    }

    /// Every returned title contains the keyword, ignoring case.
    #[test]
    fn keyword_results_contain_keyword(
        titles in prop::collection::vec("[a-zA-Z ]{1,12}", 0..8),
        keyword in "[a-zA-Z]{1,3}",
    ) {
        let service = seeded(titles);

        for title in list(&service, None, Some(keyword.clone())) {
            prop_assert!(title.to_lowercase().contains(&keyword.to_lowercase()));
        }
    }

    /// Anything that is not a positive integer reads as the first page.
    #[test]
    fn unparseable_page_is_first_page(page in "[a-z.\\-]{0,6}") {
        let service = seeded((0..5).map(|i| format!("Book {i}")).collect());

        prop_assert_eq!(
            list(&service, Some(page), None),
            list(&service, None, None)
        );
    }
}
