pub use in_memory_books_repository::InMemoryBookRepository;
pub use mongo_books_repository::{MongoBooksRepository, MongoBooksRepositoryConfig};

use mongodb::bson::oid::ObjectId;

use crate::api::{Book, BookDetails, BookDetailsPatch, BookId};

mod in_memory_books_repository;
mod mongo_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("Book {0} not found")]
    NotFound(BookId),

    #[error("Invalid book id {0}")]
    InvalidBookId(BookId),

    #[error("Failed to deserialize book: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to serialize book: {0}")]
    SerializationError(#[from] mongodb::bson::ser::Error),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] mongodb::error::Error),

    #[error("Other error {0}")]
    Other(String),
}

impl BookRepositoryError {
    /// Both unknown and malformed ids can't address any record
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidBookId(_))
    }
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Adds book to repository, returns an id assigned to the book
    async fn add_book(&self, details: BookDetails) -> Result<BookId, BookRepositoryError>;
    /// Lists all books in the repository in the store natural order
    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError>;
    /// Retrieves the book from repository
    async fn get_book(&self, book_id: &str) -> Result<Book, BookRepositoryError>;
    /// Sets the fields present in the patch, returns how many records actually changed (0 or 1)
    async fn update_book(
        &self,
        book_id: &str,
        patch: BookDetailsPatch,
    ) -> Result<u64, BookRepositoryError>;
    /// Removes the book, returns number of deleted records
    async fn delete_book(&self, book_id: &str) -> Result<u64, BookRepositoryError>;
    /// Number of all books in the repository
    async fn count_books(&self) -> Result<u64, BookRepositoryError>;
}

fn parse_book_id(book_id: &str) -> Result<ObjectId, BookRepositoryError> {
    ObjectId::parse_str(book_id).map_err(|_| BookRepositoryError::InvalidBookId(book_id.to_string()))
}
