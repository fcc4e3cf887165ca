use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Store assigned identifier of the book, rendered as a 24 character hex string
pub type BookId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
/// Book record as returned by the API
pub struct Book {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: f64,
    pub quantity: i64,
    pub publication_date: String,
    pub created_at: String,
}

impl Book {
    pub fn new(id: BookId, details: BookDetails) -> Self {
        Self {
            id,
            title: details.title,
            author: details.author,
            isbn: details.isbn,
            price: details.price,
            quantity: details.quantity,
            publication_date: details.publication_date,
            created_at: details.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Everything that is stored for a book apart from its id
pub struct BookDetails {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Apiv2Schema)]
/// Body of the create request. Only title and author are required, the rest falls back to defaults
pub struct NewBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
}

impl NewBook {
    /// Creates a request with the two required fields set
    pub fn with_title_and_author(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            ..Self::default()
        }
    }

    /// Turns the request into stored details, returns None when title or author is missing
    pub fn into_details(self, created_at: String) -> Option<BookDetails> {
        Some(BookDetails {
            title: self.title?,
            author: self.author?,
            isbn: self.isbn.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
            publication_date: self.publication_date.unwrap_or_default(),
            created_at,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Apiv2Schema)]
#[serde(deny_unknown_fields)]
/// Struct representing a patch to book details. Allows to specify only a few fields and patch the current details.
/// Id and creation time are not part of it and can't be changed.
pub struct BookDetailsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
}

impl BookDetailsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
pub struct CreateBookResponse {
    pub message: String,
    pub book_id: BookId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
pub struct GetAllBooksResponse {
    pub total_books: u64,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
pub struct UpdateBookResponse {
    pub message: String,
    /// 1 if stored values changed, 0 if the patch matched what was already there
    pub modified_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
pub struct DeleteBookResponse {
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
pub struct BookCountResponse {
    pub total_books: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Apiv2Schema)]
/// Body of every failed response
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod api_tests {
    use super::{BookDetailsPatch, NewBook};

    #[test]
    fn new_book_without_author_is_rejected() {
        let request: NewBook = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(request.into_details("now".to_string()), None);

        let request: NewBook = serde_json::from_str("{}").unwrap();
        assert_eq!(request.into_details("now".to_string()), None);
    }

    #[test]
    fn new_book_fills_in_defaults() {
        let details = NewBook::with_title_and_author("T", "A")
            .into_details("2024-01-01T00:00:00Z".to_string())
            .expect("title and author are set");

        assert_eq!(details.title, "T");
        assert_eq!(details.author, "A");
        assert_eq!(details.isbn, "");
        assert_eq!(details.price, 0.0);
        assert_eq!(details.quantity, 0);
        assert_eq!(details.publication_date, "");
        assert_eq!(details.created_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn patch_rejects_unknown_and_protected_fields() {
        assert!(serde_json::from_str::<BookDetailsPatch>(r#"{"created_at": "x"}"#).is_err());
        assert!(serde_json::from_str::<BookDetailsPatch>(r#"{"_id": "x"}"#).is_err());
        assert!(serde_json::from_str::<BookDetailsPatch>(r#"{"color": "red"}"#).is_err());

        let patch: BookDetailsPatch = serde_json::from_str(r#"{"quantity": 10}"#).unwrap();
        assert_eq!(patch.quantity, Some(10));
        assert!(!patch.is_empty());
        assert!(BookDetailsPatch::default().is_empty());
    }
}
