//! Transient per-view state for the console tabs.
//!
//! Each tab owns one or more sections. Activating a tab moves its sections
//! to `Loading`, and the fetch result moves each to `Loaded` or `Failed`
//! independently. Nothing survives a re-activation: the next activation
//! starts over.
//!
//! Every activation bumps a generation counter. A completion carrying an
//! older generation is dropped, so a slow response for a tab the user has
//! already left cannot overwrite newer state.

use bookstore_api::{Book, Category, Customer, Feedback, Order, OrderStatus};

use crate::stats::DashboardStats;
use crate::tabs::Tab;

/// Lifecycle of one loaded section.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn from_result(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => LoadState::Loaded(data),
            Err(message) => LoadState::Failed(message),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one activation; handed back with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    tab: Tab,
    generation: u64,
}

impl Ticket {
    pub fn tab(&self) -> Tab {
        self.tab
    }
}

/// Fetch results for one tab, one entry per section.
#[derive(Debug, Clone)]
pub enum TabPayload {
    Dashboard {
        stats: Result<DashboardStats, String>,
    },
    Inventory {
        books: Result<Vec<Book>, String>,
        categories: Result<Vec<Category>, String>,
    },
    Orders {
        orders: Result<Vec<Order>, String>,
    },
    Customers {
        customers: Result<Vec<Customer>, String>,
    },
    Reviews {
        feedback: Result<Vec<Feedback>, String>,
    },
    Settings,
}

impl TabPayload {
    pub fn tab(&self) -> Tab {
        match self {
            TabPayload::Dashboard { .. } => Tab::Dashboard,
            TabPayload::Inventory { .. } => Tab::Inventory,
            TabPayload::Orders { .. } => Tab::Orders,
            TabPayload::Customers { .. } => Tab::Customers,
            TabPayload::Reviews { .. } => Tab::Reviews,
            TabPayload::Settings => Tab::Settings,
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewState {
    active: Tab,
    generation: u64,
    stats: LoadState<DashboardStats>,
    books: LoadState<Vec<Book>>,
    categories: LoadState<Vec<Category>>,
    orders: LoadState<Vec<Order>>,
    customers: LoadState<Vec<Customer>>,
    feedback: LoadState<Vec<Feedback>>,
}

impl ViewState {
    pub fn active_tab(&self) -> Tab {
        self.active
    }

    /// Start an activation of `tab`, putting its sections into `Loading`.
    pub fn begin(&mut self, tab: Tab) -> Ticket {
        self.active = tab;
        self.generation += 1;
        match tab {
            Tab::Dashboard => self.stats = LoadState::Loading,
            Tab::Inventory => {
                self.books = LoadState::Loading;
                self.categories = LoadState::Loading;
            }
            Tab::Orders => self.orders = LoadState::Loading,
            Tab::Customers => self.customers = LoadState::Loading,
            Tab::Reviews => self.feedback = LoadState::Loading,
            Tab::Settings => {}
        }
        Ticket {
            tab,
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Returns `false` if the ticket is stale and the
    /// payload was dropped.
    pub fn complete(&mut self, ticket: Ticket, payload: TabPayload) -> bool {
        if ticket.generation != self.generation || payload.tab() != ticket.tab {
            tracing::debug!(
                tab = %ticket.tab,
                generation = ticket.generation,
                current = self.generation,
                "Dropping stale tab result"
            );
            return false;
        }

        match payload {
            TabPayload::Dashboard { stats } => self.stats = LoadState::from_result(stats),
            TabPayload::Inventory { books, categories } => {
                self.books = LoadState::from_result(books);
                self.categories = LoadState::from_result(categories);
            }
            TabPayload::Orders { orders } => self.orders = LoadState::from_result(orders),
            TabPayload::Customers { customers } => {
                self.customers = LoadState::from_result(customers)
            }
            TabPayload::Reviews { feedback } => self.feedback = LoadState::from_result(feedback),
            TabPayload::Settings => {}
        }
        true
    }

    pub fn stats(&self) -> &LoadState<DashboardStats> {
        &self.stats
    }

    pub fn books_state(&self) -> &LoadState<Vec<Book>> {
        &self.books
    }

    pub fn categories_state(&self) -> &LoadState<Vec<Category>> {
        &self.categories
    }

    pub fn orders_state(&self) -> &LoadState<Vec<Order>> {
        &self.orders
    }

    pub fn customers_state(&self) -> &LoadState<Vec<Customer>> {
        &self.customers
    }

    pub fn feedback_state(&self) -> &LoadState<Vec<Feedback>> {
        &self.feedback
    }

    /// Loaded books, or nothing if the section is not loaded.
    pub fn books(&self) -> &[Book] {
        self.books.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.data().map(Vec::as_slice).unwrap_or_default()
    }

    /// Loaded orders narrowed to `status`; `None` keeps them all.
    pub fn orders_with_status(&self, status: Option<OrderStatus>) -> Vec<&Order> {
        self.orders()
            .iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .collect()
    }

    pub(crate) fn books_mut(&mut self) -> Option<&mut Vec<Book>> {
        self.books.data_mut()
    }

    pub(crate) fn orders_mut(&mut self) -> Option<&mut Vec<Order>> {
        self.orders.data_mut()
    }
}
