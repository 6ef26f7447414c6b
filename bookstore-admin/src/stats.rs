//! Dashboard figures derived from the loaded collections.

use bookstore_api::{Book, Feedback, Order, OrderStatus};

/// Books with fewer copies than this are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    /// Sum of all order totals.
    pub revenue: f64,
    pub pending_orders: usize,
    pub low_stock_books: usize,
    pub review_count: usize,
}

impl DashboardStats {
    pub fn compute(books: &[Book], orders: &[Order], feedback: &[Feedback]) -> Self {
        Self {
            revenue: orders.iter().map(|o| o.total).sum(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Processing)
                .count(),
            low_stock_books: books
                .iter()
                .filter(|b| b.stock < LOW_STOCK_THRESHOLD)
                .count(),
            review_count: feedback.len(),
        }
    }
}
