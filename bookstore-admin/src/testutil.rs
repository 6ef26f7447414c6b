//! Fixtures and an in-memory backend for unit tests.

use async_trait::async_trait;
use bookstore_api::{
    ApprovalStatus, Book, BookUpload, Category, Customer, Error, Feedback, LoginResponse, Order,
    OrderStatus, Result, StatusCode, Subcategory,
};
use chrono::NaiveDate;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::backend::BookstoreBackend;
use crate::session::{SessionContext, SessionToken};

pub fn book(id: i64, title: &str, stock: i64) -> Book {
    Book {
        book_id: id,
        title: title.to_string(),
        author: "Unknown".to_string(),
        description: None,
        price: 299.0,
        stock,
        category_id: Some(1),
        subcategory_id: None,
        pages: None,
        language: None,
        publisher: None,
        year: None,
        approval_status: ApprovalStatus::NotApproved,
        cover_image_url: None,
        pdf_url: None,
    }
}

pub fn order(id: i64, total: f64, status: OrderStatus) -> Order {
    Order {
        order_id: id,
        customer_name: "Rahul Sharma".to_string(),
        order_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        total,
        status,
        items: 1,
    }
}

pub fn feedback(id: i64, book_title: &str, rating: f32) -> Feedback {
    Feedback {
        feedback_id: id,
        book_title: book_title.to_string(),
        customer_name: "Ananya Gupta".to_string(),
        rating,
        comment: "Loved it".to_string(),
        created_at: None,
    }
}

pub fn customer(id: i64, name: &str) -> Customer {
    Customer {
        customer_id: id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        total_orders: 2,
        total_spent: 1200.0,
        joined: None,
    }
}

/// A signed JWT carrying `adminid`, the way the backend issues them.
pub fn admin_token(admin_id: i64) -> SessionToken {
    let raw = encode(
        &Header::default(),
        &json!({ "adminid": admin_id, "email": "admin@bookverse.test" }),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();
    SessionToken::new(raw).unwrap()
}

pub fn admin_session(admin_id: i64) -> SessionContext {
    SessionContext::with_token(admin_token(admin_id))
}

/// Backend double: serves fixed collections, records every call, and fails
/// the operations it is told to fail.
pub struct MockBackend {
    books: Mutex<Vec<Book>>,
    orders: Mutex<Vec<Order>>,
    customers: Mutex<Vec<Customer>>,
    feedback: Mutex<Vec<Feedback>>,
    categories: Mutex<Vec<Category>>,
    approval_response: Mutex<ApprovalStatus>,
    login_response: Mutex<Option<LoginResponse>>,
    failures: Mutex<HashMap<&'static str, Option<String>>>,
    calls: Mutex<Vec<&'static str>>,
    last_upload: Mutex<Option<BookUpload>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            books: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
            customers: Mutex::new(vec![customer(1, "Rahul Sharma")]),
            feedback: Mutex::new(vec![feedback(1, "Ikigai", 4.5)]),
            categories: Mutex::new(vec![Category {
                category_id: 1,
                name: "Fiction".to_string(),
            }]),
            approval_response: Mutex::new(ApprovalStatus::Approved),
            login_response: Mutex::new(Some(LoginResponse {
                token: admin_token(1).as_str().to_string(),
                adminid: Some(1),
                message: None,
            })),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            last_upload: Mutex::new(None),
        }
    }
}

impl MockBackend {
    pub fn set_books(&self, books: Vec<Book>) {
        *self.books.lock().unwrap() = books;
    }

    pub fn set_orders(&self, orders: Vec<Order>) {
        *self.orders.lock().unwrap() = orders;
    }

    pub fn set_approval_response(&self, status: ApprovalStatus) {
        *self.approval_response.lock().unwrap() = status;
    }

    pub fn set_login_response(&self, response: LoginResponse) {
        *self.login_response.lock().unwrap() = Some(response);
    }

    /// Make `operation` fail with a 500; `message` becomes the body's message.
    pub fn fail(&self, operation: &'static str, message: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, message.map(str::to_string));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    pub fn last_upload_admin_id(&self) -> Option<i64> {
        self.last_upload.lock().unwrap().as_ref().map(|u| u.admin_id)
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(operation);
        match self.failures.lock().unwrap().get(operation) {
            Some(message) => Err(Error::HttpError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookstoreBackend for MockBackend {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse> {
        self.record("login")?;
        match self.login_response.lock().unwrap().clone() {
            Some(response) => Ok(response),
            None => Err(Error::HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: None,
            }),
        }
    }

    async fn list_books(&self, _token: &SessionToken) -> Result<Vec<Book>> {
        self.record("list_books")?;
        Ok(self.books.lock().unwrap().clone())
    }

    async fn create_book(&self, _token: &SessionToken, upload: BookUpload) -> Result<Book> {
        self.record("create_book")?;
        let mut books = self.books.lock().unwrap();
        let next_id = books.iter().map(|b| b.book_id).max().unwrap_or(0) + 1;
        let mut created = book(next_id, &upload.title, upload.stock);
        created.author = upload.author.clone();
        created.price = upload.price;
        created.category_id = Some(upload.category_id);
        books.push(created.clone());
        *self.last_upload.lock().unwrap() = Some(upload);
        Ok(created)
    }

    async fn delete_book(&self, _token: &SessionToken, book_id: i64) -> Result<()> {
        self.record("delete_book")?;
        self.books.lock().unwrap().retain(|b| b.book_id != book_id);
        Ok(())
    }

    async fn toggle_approval(
        &self,
        _token: &SessionToken,
        _book_id: i64,
    ) -> Result<ApprovalStatus> {
        self.record("toggle_approval")?;
        Ok(*self.approval_response.lock().unwrap())
    }

    async fn list_categories(&self, _token: &SessionToken) -> Result<Vec<Category>> {
        self.record("list_categories")?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn list_subcategories(
        &self,
        _token: &SessionToken,
        category_id: i64,
    ) -> Result<Vec<Subcategory>> {
        self.record("list_subcategories")?;
        Ok(vec![Subcategory {
            subcategory_id: category_id * 10,
            category_id,
            name: "Classics".to_string(),
        }])
    }

    async fn list_orders(&self, _token: &SessionToken) -> Result<Vec<Order>> {
        self.record("list_orders")?;
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn update_order_status(
        &self,
        _token: &SessionToken,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order> {
        self.record("update_order_status")?;
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.order_id == order_id) {
            Some(existing) => {
                existing.status = status;
                Ok(existing.clone())
            }
            None => Err(Error::HttpError {
                status: StatusCode::NOT_FOUND,
                message: Some("Order not found".to_string()),
            }),
        }
    }

    async fn list_feedback(&self, _token: &SessionToken) -> Result<Vec<Feedback>> {
        self.record("list_feedback")?;
        Ok(self.feedback.lock().unwrap().clone())
    }

    async fn list_customers(&self, _token: &SessionToken) -> Result<Vec<Customer>> {
        self.record("list_customers")?;
        Ok(self.customers.lock().unwrap().clone())
    }
}
