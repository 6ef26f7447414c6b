//! Add-book form and its client-side validation.
//!
//! Validation runs before any request is built. A form that fails here
//! never reaches the backend.

use bookstore_api::{BookUpload, UploadFile};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{0} cannot be negative")]
    Negative(&'static str),
}

/// Raw add-book form as submitted; every text field is still a string.
#[derive(Debug, Clone, Default)]
pub struct NewBookForm {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category_id: String,
    pub subcategory_id: String,
    pub pages: String,
    pub language: String,
    pub publisher: String,
    pub year: String,
    pub pdf_file: Option<UploadFile>,
    pub cover_image: Option<UploadFile>,
}

struct ParsedNumbers {
    price: f64,
    stock: i64,
    category_id: i64,
    subcategory_id: Option<i64>,
    pages: Option<u32>,
    year: Option<i32>,
}

impl NewBookForm {
    /// Check required fields and numeric formats.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.parse().map(|_| ())
    }

    /// Validate and build the upload request.
    pub fn into_upload(self, admin_id: i64) -> Result<BookUpload, ValidationError> {
        let numbers = self.parse()?;
        Ok(BookUpload {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            description: optional_text(&self.description),
            price: numbers.price,
            stock: numbers.stock,
            category_id: numbers.category_id,
            subcategory_id: numbers.subcategory_id,
            pages: numbers.pages,
            language: optional_text(&self.language),
            publisher: optional_text(&self.publisher),
            year: numbers.year,
            admin_id,
            pdf_file: self.pdf_file.filter(|f| !f.bytes.is_empty()),
            cover_image: self.cover_image.filter(|f| !f.bytes.is_empty()),
        })
    }

    fn parse(&self) -> Result<ParsedNumbers, ValidationError> {
        required("title", &self.title)?;
        required("author", &self.author)?;
        let raw_price = required("price", &self.price)?;
        let price: f64 = number("price", raw_price)?;
        if !price.is_finite() {
            return Err(ValidationError::InvalidNumber {
                field: "price",
                value: raw_price.to_string(),
            });
        }
        if price < 0.0 {
            return Err(ValidationError::Negative("price"));
        }
        let stock: i64 = number("stock", required("stock", &self.stock)?)?;
        if stock < 0 {
            return Err(ValidationError::Negative("stock"));
        }
        let category_id = number("category", required("category", &self.category_id)?)?;

        Ok(ParsedNumbers {
            price,
            stock,
            category_id,
            subcategory_id: optional_number("subcategory", &self.subcategory_id)?,
            pages: optional_number("pages", &self.pages)?,
            year: optional_number("year", &self.year)?,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn optional_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<Option<T>, ValidationError> {
    match value.trim() {
        "" => Ok(None),
        v => number(field, v).map(Some),
    }
}

fn optional_text(value: &str) -> Option<String> {
    match value.trim() {
        "" => None,
        v => Some(v.to_string()),
    }
}
