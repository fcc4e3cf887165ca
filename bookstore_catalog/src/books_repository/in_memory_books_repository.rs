use std::collections::BTreeMap;

use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::api::{Book, BookDetails, BookDetailsPatch, BookId};
use crate::books_repository::{parse_book_id, BookRepository, BookRepositoryError};

/// Keeps books in process memory, ordered by id which follows insertion order
#[derive(Default)]
pub struct InMemoryBookRepository {
    books: parking_lot::RwLock<BTreeMap<ObjectId, BookDetails>>,
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add_book(&self, details: BookDetails) -> Result<BookId, BookRepositoryError> {
        let id = ObjectId::new();
        self.books.write().insert(id, details);
        Ok(id.to_hex())
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(self
            .books
            .read()
            .iter()
            .map(|(id, details)| Book::new(id.to_hex(), details.clone()))
            .collect())
    }

    async fn get_book(&self, book_id: &str) -> Result<Book, BookRepositoryError> {
        let id = parse_book_id(book_id)?;
        self.books
            .read()
            .get(&id)
            .cloned()
            .map(|details| Book::new(id.to_hex(), details))
            .ok_or_else(|| BookRepositoryError::NotFound(book_id.to_string()))
    }

    async fn update_book(
        &self,
        book_id: &str,
        patch: BookDetailsPatch,
    ) -> Result<u64, BookRepositoryError> {
        let id = parse_book_id(book_id)?;
        let mut locked_books = self.books.write();
        let book = locked_books
            .get_mut(&id)
            .ok_or_else(|| BookRepositoryError::NotFound(book_id.to_string()))?;

        let mut result_book = json!(book);
        json_patch::merge(&mut result_book, &json!(patch));
        let result_book: BookDetails = serde_json::from_value(result_book)?;
        if result_book == *book {
            return Ok(0);
        }
        *book = result_book;
        Ok(1)
    }

    async fn delete_book(&self, book_id: &str) -> Result<u64, BookRepositoryError> {
        let id = parse_book_id(book_id)?;
        self.books
            .write()
            .remove(&id)
            .map(|_| 1)
            .ok_or_else(|| BookRepositoryError::NotFound(book_id.to_string()))
    }

    async fn count_books(&self) -> Result<u64, BookRepositoryError> {
        Ok(self.books.read().len() as u64)
    }
}
