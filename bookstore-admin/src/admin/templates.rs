//! Askama templates for the admin UI.
//!
//! Templates only see pre-formatted rows; all formatting happens here.

use askama::Template;
use bookstore_api::{Book, Customer, Feedback, Order, OrderStatus};

use crate::session::DASHBOARD_PATH;
use crate::stats::{DashboardStats, LOW_STOCK_THRESHOLD};
use crate::tabs::Tab;
use crate::view::{LoadState, ViewState};

/// Login page template
#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    /// Echoed back after a failed attempt
    pub email: String,
}

/// One-shot message shown above the active tab.
#[derive(Debug, Default)]
pub struct Flash {
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            notice: Some(message.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            notice: None,
            error: Some(message.into()),
        }
    }
}

pub struct TabLink {
    pub name: &'static str,
    pub href: String,
    pub active: bool,
}

pub struct StatsView {
    pub revenue: String,
    pub pending_orders: usize,
    pub low_stock_books: usize,
    pub review_count: usize,
}

pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub price: String,
    pub stock: i64,
    pub low_stock: bool,
    pub approved: bool,
}

pub struct CategoryOption {
    pub id: i64,
    pub name: String,
}

pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

pub struct OrderRow {
    pub id: i64,
    pub customer: String,
    pub date: String,
    pub items: u32,
    pub total: String,
    pub status: &'static str,
    pub status_options: Vec<StatusOption>,
}

pub struct CustomerRow {
    pub name: String,
    pub email: String,
    pub total_orders: u32,
    pub total_spent: String,
    pub joined: String,
}

pub struct ReviewRow {
    pub book_title: String,
    pub customer: String,
    pub rating: String,
    pub comment: String,
    pub date: String,
}

/// Rows of one section plus its error, if loading failed.
pub struct Section<T> {
    pub rows: Vec<T>,
    pub error: Option<String>,
}

impl<T> Section<T> {
    fn from_state<S>(state: &LoadState<Vec<S>>, row: impl Fn(&S) -> T) -> Self {
        Self {
            rows: state
                .data()
                .map(|items| items.iter().map(row).collect())
                .unwrap_or_default(),
            error: state.error().map(str::to_string),
        }
    }
}

/// Dashboard page template
#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub active: &'static str,
    pub tabs: Vec<TabLink>,
    pub flash: Flash,
    pub admin_id: Option<i64>,
    pub stats: Option<StatsView>,
    pub stats_error: Option<String>,
    pub books: Section<BookRow>,
    pub categories: Section<CategoryOption>,
    pub orders: Section<OrderRow>,
    /// First entry is "All"
    pub status_filter: Vec<StatusOption>,
    /// Selected filter value, echoed back by the order update forms
    pub order_filter: &'static str,
    pub customers: Section<CustomerRow>,
    pub reviews: Section<ReviewRow>,
}

impl DashboardTemplate {
    pub fn new(
        view: &ViewState,
        status: Option<OrderStatus>,
        flash: Flash,
        admin_id: Option<i64>,
    ) -> Self {
        let active = view.active_tab();

        let orders = Section {
            rows: view
                .orders_with_status(status)
                .into_iter()
                .map(order_row)
                .collect(),
            error: view.orders_state().error().map(str::to_string),
        };

        let mut status_filter = vec![StatusOption {
            value: "All",
            selected: status.is_none(),
        }];
        status_filter.extend(OrderStatus::ALL.into_iter().map(|s| StatusOption {
            value: s.as_str(),
            selected: status == Some(s),
        }));

        Self {
            active: active.name(),
            tabs: Tab::ALL
                .into_iter()
                .map(|tab| TabLink {
                    name: tab.name(),
                    href: format!("{DASHBOARD_PATH}?tab={}", tab.name()),
                    active: tab == active,
                })
                .collect(),
            flash,
            admin_id,
            stats: view.stats().data().map(stats_view),
            stats_error: view.stats().error().map(str::to_string),
            books: Section::from_state(view.books_state(), book_row),
            categories: Section::from_state(view.categories_state(), |c| CategoryOption {
                id: c.category_id,
                name: c.name.clone(),
            }),
            orders,
            status_filter,
            order_filter: status.map_or("All", OrderStatus::as_str),
            customers: Section::from_state(view.customers_state(), customer_row),
            reviews: Section::from_state(view.feedback_state(), review_row),
        }
    }
}

fn money(amount: f64) -> String {
    format!("₹{amount:.2}")
}

fn stats_view(stats: &DashboardStats) -> StatsView {
    StatsView {
        revenue: money(stats.revenue),
        pending_orders: stats.pending_orders,
        low_stock_books: stats.low_stock_books,
        review_count: stats.review_count,
    }
}

fn book_row(book: &Book) -> BookRow {
    BookRow {
        id: book.book_id,
        title: book.title.clone(),
        author: book.author.clone(),
        price: money(book.price),
        stock: book.stock,
        low_stock: book.stock < LOW_STOCK_THRESHOLD,
        approved: book.approval_status.is_approved(),
    }
}

fn order_row(order: &Order) -> OrderRow {
    OrderRow {
        id: order.order_id,
        customer: order.customer_name.clone(),
        date: order.order_date.format("%Y-%m-%d").to_string(),
        items: order.items,
        total: money(order.total),
        status: order.status.as_str(),
        status_options: OrderStatus::ALL
            .into_iter()
            .map(|s| StatusOption {
                value: s.as_str(),
                selected: s == order.status,
            })
            .collect(),
    }
}

fn customer_row(customer: &Customer) -> CustomerRow {
    CustomerRow {
        name: customer.name.clone(),
        email: customer.email.clone(),
        total_orders: customer.total_orders,
        total_spent: money(customer.total_spent),
        joined: customer
            .joined
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

fn review_row(feedback: &Feedback) -> ReviewRow {
    ReviewRow {
        book_title: feedback.book_title.clone(),
        customer: feedback.customer_name.clone(),
        rating: format!("{:.1}", feedback.rating),
        comment: feedback.comment.clone(),
        date: feedback
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}
