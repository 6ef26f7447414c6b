//! Seam between the console and the bookstore backend.
//!
//! Production uses [`BookstoreApi`]; tests substitute an in-memory fake.

use async_trait::async_trait;
use bookstore_api::{
    ApprovalStatus, Book, BookUpload, BookstoreApi, Category, Customer, Feedback, LoginResponse,
    Order, OrderStatus, Result, Subcategory,
};

use crate::session::SessionToken;

/// Every backend call the console makes.
#[async_trait]
pub trait BookstoreBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;

    async fn list_books(&self, token: &SessionToken) -> Result<Vec<Book>>;
    async fn create_book(&self, token: &SessionToken, upload: BookUpload) -> Result<Book>;
    async fn delete_book(&self, token: &SessionToken, book_id: i64) -> Result<()>;
    async fn toggle_approval(&self, token: &SessionToken, book_id: i64) -> Result<ApprovalStatus>;

    async fn list_categories(&self, token: &SessionToken) -> Result<Vec<Category>>;
    async fn list_subcategories(
        &self,
        token: &SessionToken,
        category_id: i64,
    ) -> Result<Vec<Subcategory>>;

    async fn list_orders(&self, token: &SessionToken) -> Result<Vec<Order>>;
    async fn update_order_status(
        &self,
        token: &SessionToken,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order>;

    async fn list_feedback(&self, token: &SessionToken) -> Result<Vec<Feedback>>;
    async fn list_customers(&self, token: &SessionToken) -> Result<Vec<Customer>>;
}

#[async_trait]
impl BookstoreBackend for BookstoreApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        BookstoreApi::login(self, email, password).await
    }

    async fn list_books(&self, token: &SessionToken) -> Result<Vec<Book>> {
        BookstoreApi::list_books(self, token.as_str()).await
    }

    async fn create_book(&self, token: &SessionToken, upload: BookUpload) -> Result<Book> {
        BookstoreApi::create_book(self, token.as_str(), upload).await
    }

    async fn delete_book(&self, token: &SessionToken, book_id: i64) -> Result<()> {
        BookstoreApi::delete_book(self, token.as_str(), book_id).await
    }

    async fn toggle_approval(&self, token: &SessionToken, book_id: i64) -> Result<ApprovalStatus> {
        BookstoreApi::toggle_approval(self, token.as_str(), book_id).await
    }

    async fn list_categories(&self, token: &SessionToken) -> Result<Vec<Category>> {
        BookstoreApi::list_categories(self, token.as_str()).await
    }

    async fn list_subcategories(
        &self,
        token: &SessionToken,
        category_id: i64,
    ) -> Result<Vec<Subcategory>> {
        BookstoreApi::list_subcategories(self, token.as_str(), category_id).await
    }

    async fn list_orders(&self, token: &SessionToken) -> Result<Vec<Order>> {
        BookstoreApi::list_orders(self, token.as_str()).await
    }

    async fn update_order_status(
        &self,
        token: &SessionToken,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order> {
        BookstoreApi::update_order_status(self, token.as_str(), order_id, status).await
    }

    async fn list_feedback(&self, token: &SessionToken) -> Result<Vec<Feedback>> {
        BookstoreApi::list_feedback(self, token.as_str()).await
    }

    async fn list_customers(&self, token: &SessionToken) -> Result<Vec<Customer>> {
        BookstoreApi::list_customers(self, token.as_str()).await
    }
}
