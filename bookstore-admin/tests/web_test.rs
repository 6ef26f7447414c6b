//! Drives the console router end to end against an in-process backend.

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use bookstore_admin::admin::{AdminState, admin_router};
use bookstore_admin::backend::BookstoreBackend;
use bookstore_admin::session::SessionToken;
use bookstore_api::{
    ApprovalStatus, Book, BookUpload, Category, Customer, Error, Feedback, LoginResponse, Order,
    OrderStatus, Result, Subcategory,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const COOKIE: &str = "adminToken=abc.def.ghi";

#[derive(Default)]
struct FakeBackend {
    calls: Mutex<HashMap<&'static str, usize>>,
    fail_books: bool,
}

impl FakeBackend {
    fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    fn hit(&self, op: &'static str) {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
    }
}

fn sample_book(book_id: i64, title: &str) -> Book {
    serde_json::from_value(serde_json::json!({
        "book_id": book_id,
        "title": title,
        "author": "Matt Haig",
        "price": 499.0,
        "stock": 12
    }))
    .unwrap()
}

#[async_trait]
impl BookstoreBackend for FakeBackend {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        self.hit("login");
        if email == "admin@bookverse.test" && password == "secret" {
            Ok(LoginResponse {
                token: "issued.jwt.token".to_string(),
                adminid: Some(1),
                message: None,
            })
        } else {
            Err(Error::HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: Some("Invalid email or password".to_string()),
            })
        }
    }

    async fn list_books(&self, _token: &SessionToken) -> Result<Vec<Book>> {
        self.hit("list_books");
        if self.fail_books {
            return Err(Error::HttpError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
            });
        }
        Ok(vec![sample_book(1, "The Midnight Library"), sample_book(2, "Atomic Habits")])
    }

    async fn create_book(&self, _token: &SessionToken, upload: BookUpload) -> Result<Book> {
        self.hit("create_book");
        Ok(sample_book(3, &upload.title))
    }

    async fn delete_book(&self, _token: &SessionToken, _book_id: i64) -> Result<()> {
        self.hit("delete_book");
        Ok(())
    }

    async fn toggle_approval(
        &self,
        _token: &SessionToken,
        _book_id: i64,
    ) -> Result<ApprovalStatus> {
        self.hit("toggle_approval");
        Ok(ApprovalStatus::Approved)
    }

    async fn list_categories(&self, _token: &SessionToken) -> Result<Vec<Category>> {
        self.hit("list_categories");
        Ok(vec![Category {
            category_id: 1,
            name: "Fiction".to_string(),
        }])
    }

    async fn list_subcategories(
        &self,
        _token: &SessionToken,
        category_id: i64,
    ) -> Result<Vec<Subcategory>> {
        self.hit("list_subcategories");
        Ok(vec![Subcategory {
            subcategory_id: 11,
            category_id,
            name: "Thriller".to_string(),
        }])
    }

    async fn list_orders(&self, _token: &SessionToken) -> Result<Vec<Order>> {
        self.hit("list_orders");
        Ok(vec![])
    }

    async fn update_order_status(
        &self,
        _token: &SessionToken,
        order_id: i64,
        _status: OrderStatus,
    ) -> Result<Order> {
        self.hit("update_order_status");
        Err(Error::HttpError {
            status: StatusCode::NOT_FOUND,
            message: Some(format!("Order {order_id} not found")),
        })
    }

    async fn list_feedback(&self, _token: &SessionToken) -> Result<Vec<Feedback>> {
        self.hit("list_feedback");
        Ok(vec![])
    }

    async fn list_customers(&self, _token: &SessionToken) -> Result<Vec<Customer>> {
        self.hit("list_customers");
        Ok(vec![])
    }
}

fn router(backend: &Arc<FakeBackend>) -> Router {
    admin_router(Arc::new(AdminState::new(backend.clone(), false)))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn location(resp: &axum::response::Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_dashboard_without_token_redirects_to_login() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(get("/dashboard-admin?tab=Inventory", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(backend.count("list_books"), 0);
}

#[tokio::test]
async fn test_dashboard_with_token_renders() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(get("/dashboard-admin", Some(COOKIE)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("BookVerse Admin"));
    assert!(body.contains("Pending Orders"));
}

#[tokio::test]
async fn test_unknown_paths_follow_the_gate() {
    let backend = Arc::new(FakeBackend::default());

    let resp = router(&backend).oneshot(get("/", None)).await.unwrap();
    assert_eq!(location(&resp), "/login");

    let resp = router(&backend)
        .oneshot(get("/somewhere/else", Some(COOKIE)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard-admin");
}

#[tokio::test]
async fn test_login_page_always_renders() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend).oneshot(get("/login", Some(COOKIE))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_sets_cookie_and_redirects() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(post_form(
            "/login",
            None,
            "email=admin%40bookverse.test&password=secret",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard-admin");
    let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("adminToken=issued.jwt.token;"));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_failure_shows_backend_message() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(post_form(
            "/login",
            None,
            "email=admin%40bookverse.test&password=wrong",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(resp).await.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_login_with_empty_password_skips_backend() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(post_form("/login", None, "email=admin%40bookverse.test&password="))
        .await
        .unwrap();

    assert!(body_text(resp).await.contains("Email and password are required"));
    assert_eq!(backend.count("login"), 0);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let backend = Arc::new(FakeBackend::default());
    for method in ["GET", "POST"] {
        let req = Request::builder()
            .method(method)
            .uri("/logout")
            .header(header::COOKIE, COOKIE)
            .body(Body::empty())
            .unwrap();
        let resp = router(&backend).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
        let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("adminToken=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}

#[tokio::test]
async fn test_inventory_shows_section_error() {
    let backend = Arc::new(FakeBackend {
        fail_books: true,
        ..Default::default()
    });
    let resp = router(&backend)
        .oneshot(get("/dashboard-admin?tab=Inventory", Some(COOKIE)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Failed to load books"));
    // the category list still loaded
    assert!(body.contains("Fiction"));
}

#[tokio::test]
async fn test_add_book_without_title_sends_nothing() {
    let backend = Arc::new(FakeBackend::default());
    let boundary = "XBOUNDARY";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"author\"\r\n\r\nPaulo Coelho\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"price\"\r\n\r\n350\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"stock\"\r\n\r\n4\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"category_id\"\r\n\r\n1\r\n\
         --{boundary}--\r\n"
    );
    let req = Request::builder()
        .method("POST")
        .uri("/dashboard-admin/books")
        .header(header::COOKIE, COOKIE)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let resp = router(&backend).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("title is required"));
    assert_eq!(backend.count("create_book"), 0);
}

#[tokio::test]
async fn test_toggle_approval_renders_inventory() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(post_form("/dashboard-admin/books/2/approval", Some(COOKIE), ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Approval updated"));
    assert!(body.contains("Book Inventory"));
    assert_eq!(backend.count("toggle_approval"), 1);
}

#[tokio::test]
async fn test_order_update_failure_is_reported() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(post_form(
            "/dashboard-admin/orders/42/status",
            Some(COOKIE),
            "status=Shipped",
        ))
        .await
        .unwrap();

    let body = body_text(resp).await;
    assert!(body.contains("Order 42 not found"));
    assert!(body.contains("Order Management"));
}

#[tokio::test]
async fn test_order_update_keeps_status_filter() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(post_form(
            "/dashboard-admin/orders/42/status",
            Some(COOKIE),
            "status=Shipped&filter=Processing",
        ))
        .await
        .unwrap();

    let body = body_text(resp).await;
    assert!(body.contains(r#"<option value="Processing" selected>"#));
    assert!(!body.contains(r#"<option value="All" selected>"#));
    assert_eq!(backend.count("update_order_status"), 1);
}

#[tokio::test]
async fn test_mutation_without_token_redirects() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(post_form("/dashboard-admin/books/1/delete", None, ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(backend.count("delete_book"), 0);
}

#[tokio::test]
async fn test_subcategories_json() {
    let backend = Arc::new(FakeBackend::default());
    let resp = router(&backend)
        .oneshot(get("/dashboard-admin/categories/1/subcategories", Some(COOKIE)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: Vec<Subcategory> = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(list[0].name, "Thriller");
}
