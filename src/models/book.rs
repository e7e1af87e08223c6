//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::repository::Entity;

/// Lending category of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookType {
    /// May leave the library for its loan duration
    Loanable,
    /// Must stay in the library; never loaned
    Reference,
}

impl BookType {
    pub fn is_loanable(self) -> bool {
        matches!(self, BookType::Loanable)
    }
}

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Copies currently available for loan
    pub quantity: i32,
    pub book_type: BookType,
    /// Loan duration in days (0 for reference books)
    pub loan_duration_days: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.author.to_lowercase().contains(&needle)
    }
}

impl Entity for Book {
    const KIND: &'static str = "Book";

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Create or replace book request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: String,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    pub book_type: BookType,
    /// Required for loanable books
    pub loan_duration_days: Option<i64>,
}

