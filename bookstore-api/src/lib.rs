//! Async client for the bookstore backend REST API.
//!
//! Every call except [`BookstoreApi::login`] is authenticated with an
//! `Authorization: Bearer <token>` header. Collections are fetched
//! wholesale; nothing is cached here.

pub mod models;

pub use models::{
    ApprovalStatus, Book, BookUpload, Category, Customer, Feedback, LoginResponse, Order,
    OrderStatus, Subcategory, UnknownOrderStatus, UploadFile,
};
pub use reqwest::StatusCode;

use models::{ApprovalResponse, ErrorBody, LoginRequest, OrderStatusUpdate, SubcategoryLookup};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error within reqwest library
    #[error("Bookstore API request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// Error returned by server, with the body's message when it had one
    #[error("HTTP error from API: {status}")]
    HttpError {
        status: StatusCode,
        message: Option<String>,
    },

    /// Endpoint could not be built from the base URL
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Human-readable message supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::HttpError { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::ReqwestError(e) => e.status(),
            Error::Url(_) => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub struct BookstoreApi {
    client: Client,
    base_url: Url,
}

impl BookstoreApi {
    pub fn new<T: IntoUrl>(base_url: T, allow_invalid_tls: bool) -> Result<Self> {
        Self::with_timeout(base_url, allow_invalid_tls, None)
    }

    /// Create a client whose requests give up after `timeout`.
    ///
    /// Without a timeout a hung backend keeps the request pending forever.
    pub fn with_timeout<T: IntoUrl>(
        base_url: T,
        allow_invalid_tls: bool,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder().danger_accept_invalid_certs(allow_invalid_tls);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        // Url::join drops the last segment unless the base ends in '/'
        let mut base_url = base_url.into_url()?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.client.request(method, url).bearer_auth(token)
    }

    /// Turn a non-2xx response into [`Error::HttpError`], keeping the
    /// backend's `message` (or `error`) field when the body is JSON.
    async fn check(resp: Response, what: &str) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        error!("Failed to {what}: {status} - {body}");
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty());
        Err(Error::HttpError { status, message })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        what: &str,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let resp = self.request(Method::GET, url, token).send().await?;
        let resp = Self::check(resp, what).await?;
        Ok(resp.json().await?)
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Exchange credentials for a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.endpoint("userauth/login")?;
        let resp = self
            .client
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let resp = Self::check(resp, "log in").await?;
        let login: LoginResponse = resp.json().await?;
        debug!(has_admin_id = login.adminid.is_some(), "Login accepted by backend");
        Ok(login)
    }

    // ========================================================================
    // Books
    // ========================================================================

    pub async fn list_books(&self, token: &str) -> Result<Vec<Book>> {
        self.get_json("admin/books", token, "list books").await
    }

    /// Upload a new book as multipart form data.
    pub async fn create_book(&self, token: &str, upload: BookUpload) -> Result<Book> {
        let url = self.endpoint("admin/books")?;
        let form = book_form(upload)?;
        let resp = self
            .request(Method::POST, url, token)
            .multipart(form)
            .send()
            .await?;
        let resp = Self::check(resp, "create book").await?;
        let book: Book = resp.json().await?;
        debug!("Created book {}", book.book_id);
        Ok(book)
    }

    pub async fn delete_book(&self, token: &str, book_id: i64) -> Result<()> {
        let url = self.endpoint(&format!("admin/books/{book_id}"))?;
        let resp = self.request(Method::DELETE, url, token).send().await?;
        Self::check(resp, &format!("delete book {book_id}")).await?;
        debug!("Deleted book {book_id}");
        Ok(())
    }

    /// Flip a book's approval flag; returns the status the server settled on.
    pub async fn toggle_approval(&self, token: &str, book_id: i64) -> Result<ApprovalStatus> {
        let url = self.endpoint(&format!("admin/books/{book_id}/approval"))?;
        let resp = self.request(Method::POST, url, token).send().await?;
        let resp = Self::check(resp, &format!("toggle approval of book {book_id}")).await?;
        let resp: ApprovalResponse = resp.json().await?;
        Ok(resp.current_status)
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn list_categories(&self, token: &str) -> Result<Vec<Category>> {
        self.get_json("admin/categories", token, "list categories").await
    }

    pub async fn list_subcategories(
        &self,
        token: &str,
        category_id: i64,
    ) -> Result<Vec<Subcategory>> {
        let url = self.endpoint("admin/subcategories")?;
        let resp = self
            .request(Method::POST, url, token)
            .json(&SubcategoryLookup { category_id })
            .send()
            .await?;
        let resp = Self::check(resp, &format!("list subcategories of {category_id}")).await?;
        Ok(resp.json().await?)
    }

    // ========================================================================
    // Orders, feedback, customers
    // ========================================================================

    pub async fn list_orders(&self, token: &str) -> Result<Vec<Order>> {
        self.get_json("admin/orders", token, "list orders").await
    }

    /// Set an order's status; returns the order as stored by the server.
    pub async fn update_order_status(
        &self,
        token: &str,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order> {
        let url = self.endpoint(&format!("admin/orders/{order_id}/status"))?;
        let resp = self
            .request(Method::PUT, url, token)
            .json(&OrderStatusUpdate { status })
            .send()
            .await?;
        let resp = Self::check(resp, &format!("update order {order_id}")).await?;
        Ok(resp.json().await?)
    }

    pub async fn list_feedback(&self, token: &str) -> Result<Vec<Feedback>> {
        self.get_json("admin/feedback", token, "list feedback").await
    }

    pub async fn list_customers(&self, token: &str) -> Result<Vec<Customer>> {
        self.get_json("admin/customers", token, "list customers").await
    }
}

fn book_form(upload: BookUpload) -> Result<Form> {
    let mut form = Form::new()
        .text("title", upload.title)
        .text("author", upload.author)
        .text("price", upload.price.to_string())
        .text("stock", upload.stock.to_string())
        .text("category_id", upload.category_id.to_string())
        .text("admin_id", upload.admin_id.to_string());

    if let Some(description) = upload.description {
        form = form.text("description", description);
    }
    if let Some(subcategory_id) = upload.subcategory_id {
        form = form.text("subcategory_id", subcategory_id.to_string());
    }
    if let Some(pages) = upload.pages {
        form = form.text("pages", pages.to_string());
    }
    if let Some(language) = upload.language {
        form = form.text("language", language);
    }
    if let Some(publisher) = upload.publisher {
        form = form.text("publisher", publisher);
    }
    if let Some(year) = upload.year {
        form = form.text("year", year.to_string());
    }
    if let Some(file) = upload.pdf_file {
        form = form.part("pdf_file", file_part(file)?);
    }
    if let Some(file) = upload.cover_image {
        form = form.part("cover_image", file_part(file)?);
    }
    Ok(form)
}

fn file_part(file: UploadFile) -> Result<Part> {
    let part = Part::bytes(file.bytes).file_name(file.file_name);
    match file.content_type {
        Some(content_type) => Ok(part.mime_str(&content_type)?),
        None => Ok(part),
    }
}
