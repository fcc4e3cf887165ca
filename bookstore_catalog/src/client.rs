use anyhow::{bail, Context};
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::api::{
    Book, BookCountResponse, BookDetailsPatch, BookId, CreateBookResponse, DeleteBookResponse,
    ErrorResponse, GetAllBooksResponse, HealthResponse, NewBook, UpdateBookResponse,
};

pub struct BookCatalogClient {
    url: String,
    client: ClientWithMiddleware,
}

async fn error_message(response: Response) -> String {
    response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_default()
}

impl BookCatalogClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Calls POST /api/books endpoint
    /// Returns id of the created book
    pub async fn add_book(&self, new_book: &NewBook) -> anyhow::Result<BookId> {
        let response = self
            .client
            .post(format!("{}/api/books", self.url))
            .json(new_book)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            bail!("Failed to add book {}", error_message(response).await)
        }
        let created: CreateBookResponse = response.json().await?;
        Ok(created.book_id)
    }

    /// Calls GET /api/books endpoint
    pub async fn list_books(&self) -> anyhow::Result<GetAllBooksResponse> {
        let response = self
            .client
            .get(format!("{}/api/books", self.url))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            bail!("Failed to list books {}", error_message(response).await)
        }
    }

    /// Calls GET /api/books/{book_id} endpoint
    /// Returns None if book was not in the repository
    pub async fn get_book(&self, book_id: &str) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .get(format!("{}/api/books/{}", self.url, book_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            bail!("Failed to get book {}", error_message(response).await)
        }
    }

    /// Calls PUT /api/books/{book_id} endpoint
    /// Returns modified count, None if book was not found
    pub async fn update_book(
        &self,
        book_id: &str,
        patch: &BookDetailsPatch,
    ) -> anyhow::Result<Option<u64>> {
        let response = self
            .client
            .put(format!("{}/api/books/{}", self.url, book_id))
            .json(patch)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            let updated: UpdateBookResponse = response.json().await?;
            Ok(Some(updated.modified_count))
        } else {
            bail!("Failed to update book {}", error_message(response).await)
        }
    }

    /// Calls DELETE /api/books/{book_id} endpoint
    /// Returns deleted count, None if book was not found
    pub async fn delete_book(&self, book_id: &str) -> anyhow::Result<Option<u64>> {
        let response = self
            .client
            .delete(format!("{}/api/books/{}", self.url, book_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            let deleted: DeleteBookResponse = response.json().await?;
            Ok(Some(deleted.deleted_count))
        } else {
            bail!("Failed to delete book {}", error_message(response).await)
        }
    }

    /// Calls GET /api/books/stats/count endpoint
    pub async fn count_books(&self) -> anyhow::Result<u64> {
        let response = self
            .client
            .get(format!("{}/api/books/stats/count", self.url))
            .send()
            .await?;
        if response.status().is_success() {
            let count: BookCountResponse = response.json().await?;
            Ok(count.total_books)
        } else {
            bail!("Failed to count books {}", error_message(response).await)
        }
    }

    /// Calls GET /health endpoint
    pub async fn health(&self) -> anyhow::Result<HealthResponse> {
        let response = self
            .client
            .get(format!("{}/health", self.url))
            .send()
            .await
            .context("Failed to reach the service")?;
        Ok(response.json().await?)
    }
}
