//! Admin route handlers.
//!
//! Provides HTTP handlers for the console: login, logout, the tabbed
//! dashboard and the mutations reachable from it. Every request builds its
//! own [`Console`], so no view state is shared between requests.

use crate::admin::middleware::{AdminState, require_session};
use crate::admin::templates::{DashboardTemplate, Flash, LoginTemplate};
use crate::console::{Console, ConsoleError, Navigation};
use crate::forms::NewBookForm;
use crate::mutation::{MutationOutcome, user_message};
use crate::session::{
    self, DASHBOARD_PATH, LOGIN_PATH, LOGOUT_PATH, LoginError, Route, RouteDecision,
    SessionContext, SessionGate,
};
use crate::tabs::Tab;
use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Path, Query, State,
        multipart::{Field, MultipartError},
    },
    http::{StatusCode, header},
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use bookstore_api::{OrderStatus, UploadFile};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Largest accepted add-book submission, files included.
const UPLOAD_LIMIT: usize = 50 * 1024 * 1024;

/// Build the admin router.
pub fn admin_router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login_submit))
        .route(LOGOUT_PATH, get(logout).post(logout))
        .route(DASHBOARD_PATH, get(dashboard))
        .route(
            "/dashboard-admin/books",
            post(book_create).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
        .route("/dashboard-admin/books/{book_id}/delete", post(book_delete))
        .route("/dashboard-admin/books/{book_id}/approval", post(book_approval))
        .route("/dashboard-admin/orders/{order_id}/status", post(order_status))
        .route(
            "/dashboard-admin/categories/{category_id}/subcategories",
            get(subcategories),
        )
        .fallback(fallback)
        .layer(middleware::from_fn(require_session))
        .with_state(state)
}

fn render<T: Template>(template: T) -> Response {
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {e}")),
    )
    .into_response()
}

fn see_other(location: &'static str, cookie: String) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location.to_string()), (header::SET_COOKIE, cookie)],
    )
        .into_response()
}

/// Render the console's active tab.
fn render_console(console: &Console, status: Option<OrderStatus>, flash: Flash) -> Response {
    let admin_id = console.session().claims().admin_id();
    render(DashboardTemplate::new(console.view(), status, flash, admin_id))
}

/// Activate `tab` for a mutation route, or bail out to login.
async fn console_for(
    state: &AdminState,
    session: SessionContext,
    tab: Tab,
) -> Result<Console, Response> {
    let mut console = state.console(session);
    match console.activate(tab).await {
        Navigation::Stay => Ok(console),
        Navigation::RedirectToLogin => Err(Redirect::to(LOGIN_PATH).into_response()),
    }
}

/// Turn a mutation result into the message shown with the re-rendered tab.
fn mutation_flash<T>(
    result: Result<MutationOutcome<T>, ConsoleError>,
    success: String,
    fallback: &str,
) -> Result<Flash, Response> {
    match result {
        Ok(outcome) => Ok(match outcome.failure_message(fallback) {
            Some(message) => Flash::error(message),
            None => Flash::notice(success),
        }),
        Err(ConsoleError::NotAuthenticated) => Err(Redirect::to(LOGIN_PATH).into_response()),
        Err(ConsoleError::Backend(e)) => Ok(Flash::error(user_message(&e, fallback))),
        Err(e) => Ok(Flash::error(e.to_string())),
    }
}

// ============================================================================
// Session
// ============================================================================

/// Login page handler.
async fn login_page() -> Response {
    render(LoginTemplate {
        error: None,
        email: String::new(),
    })
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// Login form submission handler.
async fn login_submit(
    State(state): State<Arc<AdminState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    match session::login(state.backend.as_ref(), &form.email, &form.password).await {
        Ok(token) => see_other(DASHBOARD_PATH, state.session_cookie(&token)),
        Err(e) => {
            if let LoginError::Backend(source) = &e {
                error!("Login error: {source}");
            }
            render(LoginTemplate {
                error: Some(e.user_message()),
                email: form.email,
            })
        }
    }
}

/// Logout handler; always lands on the login page.
async fn logout(State(state): State<Arc<AdminState>>, session: SessionContext) -> Response {
    let mut console = state.console(session);
    console.sign_out();
    see_other(LOGIN_PATH, state.cleared_cookie())
}

/// Anything else goes wherever the gate says.
async fn fallback(session: SessionContext) -> Response {
    match SessionGate::resolve(Route::Other, &session) {
        RouteDecision::Redirect(target) => Redirect::to(target).into_response(),
        RouteDecision::Permit => StatusCode::NOT_FOUND.into_response(),
    }
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    tab: Option<String>,
    status: Option<String>,
}

impl DashboardQuery {
    fn tab(&self) -> Tab {
        match self.tab.as_deref().map(str::parse::<Tab>) {
            Some(Ok(tab)) => tab,
            Some(Err(e)) => {
                debug!("{e}, showing dashboard");
                Tab::default()
            }
            None => Tab::default(),
        }
    }

    fn status(&self) -> Option<OrderStatus> {
        order_filter(self.status.as_deref())
    }
}

/// Unknown values, including "All", mean no filter.
fn order_filter(raw: Option<&str>) -> Option<OrderStatus> {
    raw.and_then(|s| s.parse().ok())
}

/// Dashboard handler.
async fn dashboard(
    State(state): State<Arc<AdminState>>,
    session: SessionContext,
    Query(query): Query<DashboardQuery>,
) -> Response {
    match console_for(&state, session, query.tab()).await {
        Ok(console) => render_console(&console, query.status(), Flash::default()),
        Err(redirect) => redirect,
    }
}

// ============================================================================
// Books
// ============================================================================

async fn book_create(
    State(state): State<Arc<AdminState>>,
    session: SessionContext,
    multipart: Multipart,
) -> Response {
    let mut console = match console_for(&state, session, Tab::Inventory).await {
        Ok(console) => console,
        Err(redirect) => return redirect,
    };

    let form = match read_book_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!("Failed to read book upload: {e}");
            return render_console(&console, None, Flash::error(format!("Upload failed: {e}")));
        }
    };

    let title = form.title.trim().to_string();
    let result = console.create_book(form).await;
    match mutation_flash(result, format!("Added \"{title}\""), "Failed to add book") {
        Ok(flash) => render_console(&console, None, flash),
        Err(redirect) => redirect,
    }
}

async fn book_delete(
    State(state): State<Arc<AdminState>>,
    session: SessionContext,
    Path(book_id): Path<i64>,
) -> Response {
    let mut console = match console_for(&state, session, Tab::Inventory).await {
        Ok(console) => console,
        Err(redirect) => return redirect,
    };

    let result = console.delete_book(book_id).await;
    match mutation_flash(result, "Book deleted".to_string(), "Failed to delete book") {
        Ok(flash) => render_console(&console, None, flash),
        Err(redirect) => redirect,
    }
}

async fn book_approval(
    State(state): State<Arc<AdminState>>,
    session: SessionContext,
    Path(book_id): Path<i64>,
) -> Response {
    let mut console = match console_for(&state, session, Tab::Inventory).await {
        Ok(console) => console,
        Err(redirect) => return redirect,
    };

    let result = console.toggle_approval(book_id).await;
    match mutation_flash(result, "Approval updated".to_string(), "Failed to update approval") {
        Ok(flash) => render_console(&console, None, flash),
        Err(redirect) => redirect,
    }
}

async fn read_book_form(mut multipart: Multipart) -> Result<NewBookForm, MultipartError> {
    let mut form = NewBookForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pdf_file" => form.pdf_file = Some(read_file(field).await?),
            "cover_image" => form.cover_image = Some(read_file(field).await?),
            _ => {
                let value = field.text().await?;
                match name.as_str() {
                    "title" => form.title = value,
                    "author" => form.author = value,
                    "description" => form.description = value,
                    "price" => form.price = value,
                    "stock" => form.stock = value,
                    "category_id" => form.category_id = value,
                    "subcategory_id" => form.subcategory_id = value,
                    "pages" => form.pages = value,
                    "language" => form.language = value,
                    "publisher" => form.publisher = value,
                    "year" => form.year = value,
                    other => debug!("Ignoring unknown form field {other:?}"),
                }
            }
        }
    }
    Ok(form)
}

async fn read_file(field: Field<'_>) -> Result<UploadFile, MultipartError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await?.to_vec();
    Ok(UploadFile {
        file_name,
        content_type,
        bytes,
    })
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Deserialize)]
pub struct OrderStatusForm {
    status: String,
    /// Orders filter in effect when the form was submitted
    #[serde(default)]
    filter: Option<String>,
}

async fn order_status(
    State(state): State<Arc<AdminState>>,
    session: SessionContext,
    Path(order_id): Path<i64>,
    Form(form): Form<OrderStatusForm>,
) -> Response {
    let mut console = match console_for(&state, session, Tab::Orders).await {
        Ok(console) => console,
        Err(redirect) => return redirect,
    };

    let filter = order_filter(form.filter.as_deref());
    let status: OrderStatus = match form.status.parse() {
        Ok(status) => status,
        Err(e) => return render_console(&console, filter, Flash::error(format!("{e}"))),
    };

    let result = console.update_order_status(order_id, status).await;
    let success = format!("Order #{order_id} marked {status}");
    match mutation_flash(result, success, "Failed to update order") {
        Ok(flash) => render_console(&console, filter, flash),
        Err(redirect) => redirect,
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Subcategory lookup for the add-book form.
async fn subcategories(
    State(state): State<Arc<AdminState>>,
    session: SessionContext,
    Path(category_id): Path<i64>,
) -> Response {
    match state.console(session).subcategories(category_id).await {
        Ok(list) => Json(list).into_response(),
        Err(ConsoleError::NotAuthenticated) => StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            warn!(category_id, "Failed to load subcategories: {e}");
            let message = match &e {
                ConsoleError::Backend(source) => {
                    user_message(source, "Failed to load subcategories")
                }
                other => other.to_string(),
            };
            (StatusCode::BAD_GATEWAY, Json(json!({ "message": message }))).into_response()
        }
    }
}
