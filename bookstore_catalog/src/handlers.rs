use std::sync::Arc;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::header::LOCATION;
use actix_web::web::Data;
use actix_web::{Error, HttpRequest, HttpResponse};
use chrono::{SecondsFormat, Utc};
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{
    BookCountResponse, BookDetailsPatch, BookId, CreateBookResponse, DeleteBookResponse,
    ErrorResponse, GetAllBooksResponse, HealthResponse, NewBook, UpdateBookResponse,
};
use crate::books_repository::{BookRepository, BookRepositoryError};

const BOOK_NOT_FOUND: &str = "Book not found";
const NO_DATA_PROVIDED: &str = "No data provided";

fn book_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(BOOK_NOT_FOUND))
}

fn store_failure(operation: &str, err: BookRepositoryError) -> HttpResponse {
    tracing::error!("{} failed {}", operation, err);
    HttpResponse::InternalServerError().json(ErrorResponse::new(err.to_string()))
}

pub fn endpoint_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Endpoint not found"))
}

/// Fallback for requests no route matched
pub async fn not_found() -> HttpResponse {
    endpoint_not_found()
}

/// Turns body extraction failures into the usual `{"error": ...}` 400 response
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let message = match &err {
        JsonPayloadError::ContentType => NO_DATA_PROVIDED.to_string(),
        JsonPayloadError::Deserialize(json_err) if json_err.is_eof() => {
            NO_DATA_PROVIDED.to_string()
        }
        other => format!("Invalid request body: {}", other),
    };
    InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(ErrorResponse::new(message)),
    )
    .into()
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        message: "Application is running".to_string(),
    }))
}

#[api_v2_operation]
pub async fn get_all_books(
    books_repository: Data<Arc<dyn BookRepository>>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.list_books().await {
        Ok(books) => HttpResponse::Ok().json(GetAllBooksResponse {
            total_books: books.len() as u64,
            books,
        }),
        Err(err) => store_failure("Get all books", err),
    })
}

#[api_v2_operation]
pub async fn add_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    new_book: web::Json<NewBook>,
) -> Result<HttpResponse, Error> {
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    let details = match new_book.into_inner().into_details(created_at) {
        Some(details) => details,
        None => {
            return Ok(HttpResponse::BadRequest()
                .json(ErrorResponse::new("Title and Author are required")))
        }
    };

    Ok(match books_repository.add_book(details).await {
        Ok(book_id) => HttpResponse::Created()
            .append_header((LOCATION, format!("/api/books/{}", book_id)))
            .json(CreateBookResponse {
                message: "Book created successfully".to_string(),
                book_id,
            }),
        Err(err) => store_failure("Add book", err),
    })
}

#[api_v2_operation]
pub async fn get_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.get_book(&book_id).await {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(err) if err.is_not_found() => book_not_found(),
        Err(err) => store_failure("Get book", err),
    })
}

#[api_v2_operation]
pub async fn update_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
    patch: web::Json<BookDetailsPatch>,
) -> Result<HttpResponse, Error> {
    let patch = patch.into_inner();
    if patch.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::new(NO_DATA_PROVIDED)));
    }

    Ok(match books_repository.update_book(&book_id, patch).await {
        Ok(modified_count) => HttpResponse::Ok().json(UpdateBookResponse {
            message: "Book updated successfully".to_string(),
            modified_count,
        }),
        Err(err) if err.is_not_found() => book_not_found(),
        Err(err) => store_failure("Update book", err),
    })
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.delete_book(&book_id).await {
        Ok(deleted_count) => HttpResponse::Ok().json(DeleteBookResponse {
            message: "Book deleted successfully".to_string(),
            deleted_count,
        }),
        Err(err) if err.is_not_found() => book_not_found(),
        Err(err) => store_failure("Delete book", err),
    })
}

#[api_v2_operation]
pub async fn count_books(
    books_repository: Data<Arc<dyn BookRepository>>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.count_books().await {
        Ok(total_books) => HttpResponse::Ok().json(BookCountResponse { total_books }),
        Err(err) => store_failure("Count books", err),
    })
}
