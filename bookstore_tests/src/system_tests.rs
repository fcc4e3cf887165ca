use std::time::UNIX_EPOCH;

use bookstore_catalog::api::{BookDetailsPatch, NewBook};
use bookstore_catalog::client::BookCatalogClient;

fn bookstore_url() -> String {
    std::env::var("BOOKSTORE_URL").unwrap_or("http://127.0.0.1:8080".to_string())
}

fn unique_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

#[tokio::test]
/// Simple test for the catalog
/// Creates a book
/// Gets the book and checks the defaults
/// Patches the book
/// Gets list of books and checks if the book is there
/// Deletes the book twice
async fn bookstore_catalog_e2e_test() {
    let client = BookCatalogClient::new(&bookstore_url()).expect("Failed to create client");

    let title = format!("title {}", unique_suffix());
    let new_book = NewBook {
        quantity: Some(5),
        ..NewBook::with_title_and_author(title.clone(), "Author1")
    };

    let book_id = client.add_book(&new_book).await.expect("Failed to add book");

    let book = client
        .get_book(&book_id)
        .await
        .expect("Failed to get book")
        .expect("Book not found");
    assert_eq!(book.id, book_id);
    assert_eq!(book.title, title);
    assert_eq!(book.author, "Author1");
    assert_eq!(book.isbn, "");
    assert_eq!(book.price, 0.0);
    assert_eq!(book.quantity, 5);
    assert_eq!(book.publication_date, "");
    assert!(!book.created_at.is_empty());

    let patch = BookDetailsPatch {
        quantity: Some(10),
        ..BookDetailsPatch::default()
    };
    let modified = client
        .update_book(&book_id, &patch)
        .await
        .expect("Failed to patch book");
    assert_eq!(modified, Some(1));

    let patched = client
        .get_book(&book_id)
        .await
        .expect("Failed to get book")
        .expect("Book not found");
    assert_eq!(patched.quantity, 10);
    assert_eq!(patched.title, title);
    assert_eq!(patched.created_at, book.created_at);

    let all_books = client.list_books().await.expect("Failed to list books");
    assert_eq!(all_books.total_books, all_books.books.len() as u64);
    assert!(all_books
        .books
        .iter()
        .any(|listed| listed.id == book_id && listed.quantity == 10));

    assert_eq!(
        client.delete_book(&book_id).await.expect("Failed to delete"),
        Some(1)
    );
    assert_eq!(
        client.delete_book(&book_id).await.expect("Failed to delete"),
        None
    );
    assert_eq!(client.get_book(&book_id).await.expect("Failed to get"), None);
}

#[tokio::test]
/// Creates a few books, removes one of them and checks that count and list follow
async fn bookstore_catalog_count_test() {
    let client = BookCatalogClient::new(&bookstore_url()).expect("Failed to create client");
    let author = format!("Counter {}", unique_suffix());

    let mut book_ids = vec![];
    for i in 0..3 {
        let new_book = NewBook::with_title_and_author(format!("count {}", i), author.clone());
        book_ids.push(client.add_book(&new_book).await.expect("Failed to add book"));
    }
    client
        .delete_book(&book_ids[0])
        .await
        .expect("Failed to delete");

    let all_books = client.list_books().await.expect("Failed to list books");
    let by_author = all_books
        .books
        .iter()
        .filter(|book| book.author == author)
        .count();
    assert_eq!(by_author, 2);
    assert!(client.count_books().await.expect("Failed to count") >= 2);

    for book_id in &book_ids[1..] {
        client.delete_book(book_id).await.expect("Failed to delete");
    }
}

#[tokio::test]
async fn bookstore_catalog_rejects_invalid_requests() {
    let client = BookCatalogClient::new(&bookstore_url()).expect("Failed to create client");

    let missing_author = NewBook {
        title: Some("only title".to_string()),
        ..NewBook::default()
    };
    assert!(client.add_book(&missing_author).await.is_err());

    assert_eq!(
        client
            .get_book("65a1f0c2e4b0a1b2c3d4e5f6")
            .await
            .expect("Failed to get"),
        None
    );
    assert_eq!(
        client.get_book("malformed").await.expect("Failed to get"),
        None
    );

    let health = client.health().await.expect("Failed to check health");
    assert_eq!(health.status, "healthy");
}
