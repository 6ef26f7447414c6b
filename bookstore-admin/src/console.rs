//! The console: one administrator's session, the active view, and the
//! operations available from it.
//!
//! A `Console` is cheap and short-lived. The web layer builds one per
//! request from the request's [`SessionContext`], activates a tab, and
//! optionally applies a mutation to the freshly loaded view.

use bookstore_api::{Book, Error as ApiError, Order, OrderStatus, Subcategory};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::BookstoreBackend;
use crate::claims::Claims;
use crate::forms::{NewBookForm, ValidationError};
use crate::mutation::{MutationOutcome, user_message};
use crate::session::{SessionContext, SessionToken};
use crate::stats::DashboardStats;
use crate::tabs::Tab;
use crate::view::{TabPayload, ViewState};

/// Where the caller should go after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    RedirectToLogin,
}

/// Reasons an operation was refused before any request was sent.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Administrator id unavailable: {0}")]
    AdminIdUnavailable(String),

    #[error("Backend request failed: {0}")]
    Backend(#[from] ApiError),
}

pub struct Console {
    session: SessionContext,
    backend: Arc<dyn BookstoreBackend>,
    view: ViewState,
}

impl Console {
    pub fn new(session: SessionContext, backend: Arc<dyn BookstoreBackend>) -> Self {
        Self {
            session,
            backend,
            view: ViewState::default(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Drop the token and the view; the caller always lands on login.
    pub fn sign_out(&mut self) -> Navigation {
        self.session.sign_out();
        self.view = ViewState::default();
        info!("Administrator signed out");
        Navigation::RedirectToLogin
    }

    /// Activate `tab` and load its sections.
    ///
    /// Always fetches; a tab that was loaded before is loaded again.
    pub async fn activate(&mut self, tab: Tab) -> Navigation {
        let Some(token) = self.session.token() else {
            debug!(%tab, "No session token, redirecting to login");
            return Navigation::RedirectToLogin;
        };

        let ticket = self.view.begin(tab);
        let payload = fetch_tab(self.backend.as_ref(), token, tab).await;
        self.view.complete(ticket, payload);
        Navigation::Stay
    }

    /// Subcategories of a category, for the add-book form.
    pub async fn subcategories(&self, category_id: i64) -> Result<Vec<Subcategory>, ConsoleError> {
        let token = self.session.token().ok_or(ConsoleError::NotAuthenticated)?;
        Ok(self.backend.list_subcategories(token, category_id).await?)
    }

    pub async fn delete_book(
        &mut self,
        book_id: i64,
    ) -> Result<MutationOutcome<Vec<Book>>, ConsoleError> {
        let token = self.session.token().ok_or(ConsoleError::NotAuthenticated)?;
        match self.backend.delete_book(token, book_id).await {
            Ok(()) => {
                if let Some(books) = self.view.books_mut() {
                    books.retain(|b| b.book_id != book_id);
                }
                info!(book_id, "Book deleted");
                Ok(MutationOutcome::Applied(self.view.books().to_vec()))
            }
            Err(error) => {
                warn!(book_id, "Failed to delete book: {error}");
                Ok(self.books_reverted(error))
            }
        }
    }

    /// Flip a book's approval; the status the server returns is stored.
    pub async fn toggle_approval(
        &mut self,
        book_id: i64,
    ) -> Result<MutationOutcome<Vec<Book>>, ConsoleError> {
        let token = self.session.token().ok_or(ConsoleError::NotAuthenticated)?;
        match self.backend.toggle_approval(token, book_id).await {
            Ok(status) => {
                if let Some(book) = self
                    .view
                    .books_mut()
                    .and_then(|books| books.iter_mut().find(|b| b.book_id == book_id))
                {
                    book.approval_status = status;
                }
                info!(book_id, approved = status.is_approved(), "Book approval changed");
                Ok(MutationOutcome::Applied(self.view.books().to_vec()))
            }
            Err(error) => {
                warn!(book_id, "Failed to toggle approval: {error}");
                Ok(self.books_reverted(error))
            }
        }
    }

    /// Set an order's status; the order the server returns replaces ours.
    pub async fn update_order_status(
        &mut self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<MutationOutcome<Vec<Order>>, ConsoleError> {
        let token = self.session.token().ok_or(ConsoleError::NotAuthenticated)?;
        match self.backend.update_order_status(token, order_id, status).await {
            Ok(updated) => {
                if let Some(slot) = self
                    .view
                    .orders_mut()
                    .and_then(|orders| orders.iter_mut().find(|o| o.order_id == order_id))
                {
                    *slot = updated;
                }
                info!(order_id, %status, "Order status updated");
                Ok(MutationOutcome::Applied(self.view.orders().to_vec()))
            }
            Err(error) => {
                warn!(order_id, "Failed to update order status: {error}");
                Ok(MutationOutcome::Failed {
                    error,
                    reverted: self.view.orders().to_vec(),
                })
            }
        }
    }

    /// Validate the add-book form and upload it.
    ///
    /// Nothing is sent if the form is incomplete or the token carries no
    /// administrator id.
    pub async fn create_book(
        &mut self,
        form: NewBookForm,
    ) -> Result<MutationOutcome<Vec<Book>>, ConsoleError> {
        let token = self.session.token().ok_or(ConsoleError::NotAuthenticated)?;
        form.validate()?;

        let admin_id = match self.session.claims() {
            Claims::Found(claims) => claims.admin_id,
            Claims::Absent => {
                return Err(ConsoleError::AdminIdUnavailable(
                    "session token has no administrator id".to_string(),
                ));
            }
            Claims::Malformed(reason) => return Err(ConsoleError::AdminIdUnavailable(reason)),
        };

        let upload = form.into_upload(admin_id)?;
        match self.backend.create_book(token, upload).await {
            Ok(book) => {
                info!(book_id = book.book_id, admin_id, "Book created");
                if let Some(books) = self.view.books_mut() {
                    books.push(book);
                }
                Ok(MutationOutcome::Applied(self.view.books().to_vec()))
            }
            Err(error) => {
                warn!(admin_id, "Failed to create book: {error}");
                Ok(self.books_reverted(error))
            }
        }
    }

    fn books_reverted(&self, error: ApiError) -> MutationOutcome<Vec<Book>> {
        MutationOutcome::Failed {
            error,
            reverted: self.view.books().to_vec(),
        }
    }
}

fn section<T>(result: bookstore_api::Result<T>, fallback: &str) -> Result<T, String> {
    result.map_err(|e| {
        warn!("{fallback}: {e}");
        user_message(&e, fallback)
    })
}

async fn fetch_tab(backend: &dyn BookstoreBackend, token: &SessionToken, tab: Tab) -> TabPayload {
    match tab {
        Tab::Dashboard => {
            let (books, orders, feedback) = tokio::join!(
                backend.list_books(token),
                backend.list_orders(token),
                backend.list_feedback(token),
            );
            let stats = section(books, "Failed to load books").and_then(|books| {
                let orders = section(orders, "Failed to load orders")?;
                let feedback = section(feedback, "Failed to load reviews")?;
                Ok(DashboardStats::compute(&books, &orders, &feedback))
            });
            TabPayload::Dashboard { stats }
        }
        Tab::Inventory => {
            let (books, categories) =
                tokio::join!(backend.list_books(token), backend.list_categories(token));
            TabPayload::Inventory {
                books: section(books, "Failed to load books"),
                categories: section(categories, "Failed to load categories"),
            }
        }
        Tab::Orders => TabPayload::Orders {
            orders: section(backend.list_orders(token).await, "Failed to load orders"),
        },
        Tab::Customers => TabPayload::Customers {
            customers: section(backend.list_customers(token).await, "Failed to load customers"),
        },
        Tab::Reviews => TabPayload::Reviews {
            feedback: section(backend.list_feedback(token).await, "Failed to load reviews"),
        },
        Tab::Settings => TabPayload::Settings,
    }
}
