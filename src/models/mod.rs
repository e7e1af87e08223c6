//! Data models for Bibliotheca

pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookType};
pub use loan::{Loan, LoanStatus, LoanView};
pub use user::User;

use serde::Deserialize;
use utoipa::IntoParams;

/// Free-text search query
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring
    pub q: Option<String>,
}
