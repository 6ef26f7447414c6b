//! Wire types for the bookstore backend.
//!
//! All entities use one snake_case JSON schema. Dates are plain
//! `YYYY-MM-DD` strings on the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Approval flag gating a book's visibility to customers.
///
/// The backend spells it `"yes"` / `"no"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    #[serde(rename = "yes")]
    Approved,
    #[default]
    #[serde(rename = "no")]
    NotApproved,
}

impl ApprovalStatus {
    pub fn is_approved(self) -> bool {
        matches!(self, ApprovalStatus::Approved)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub subcategory_id: Option<i64>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

/// Order fulfilment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown order status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub customer_name: String,
    pub order_date: NaiveDate,
    pub total: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: u32,
}

/// Per-customer aggregate as computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub joined: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: i64,
    pub book_title: String,
    pub customer_name: String,
    pub rating: f32,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub subcategory_id: i64,
    pub category_id: i64,
    pub name: String,
}

/// Answer to a successful login.
///
/// Non-administrator accounts may come back without a token at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default, deserialize_with = "lenient_admin_id")]
    pub adminid: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Read an administrator id sent as a number or a numeric string.
///
/// `Ok(None)` when there is no id; zero and negative ids count as none.
pub fn admin_id_from_json(value: &Value) -> Result<Option<i64>, String> {
    let id = match value {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("adminid {n} is not an integer"))?,
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("adminid {s:?} is not numeric"))?,
        other => return Err(format!("adminid has unexpected type: {other}")),
    };
    Ok((id > 0).then_some(id))
}

/// An unusable id in a login answer means the account is not an administrator.
fn lenient_admin_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(admin_id_from_json(&value).unwrap_or_default())
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct ApprovalResponse {
    pub current_status: ApprovalStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubcategoryLookup {
    pub category_id: i64,
}

/// Error payload shape used by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A file attached to a book upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Everything the backend needs to create a book.
///
/// Already validated by the caller; this type only describes the
/// multipart request.
#[derive(Debug, Clone)]
pub struct BookUpload {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub pages: Option<u32>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i32>,
    pub admin_id: i64,
    pub pdf_file: Option<UploadFile>,
    pub cover_image: Option<UploadFile>,
}
