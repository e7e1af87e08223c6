//! Loan store

use std::sync::Arc;

use super::MemoryTable;
use crate::{
    error::AppResult,
    models::loan::{Loan, LoanQuery, LoanStatus},
};

#[derive(Clone, Default)]
pub struct LoansRepository {
    table: Arc<MemoryTable<Loan>>,
}

impl LoansRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new loan. New loans always start out active.
    pub fn create(&self, mut loan: Loan) -> AppResult<Loan> {
        loan.status = LoanStatus::Active;
        loan.returned_at = None;
        self.table.insert(loan)
    }

    /// Replace the full record (used after return)
    pub fn update(&self, loan: Loan) -> AppResult<Loan> {
        self.table.replace(loan.id, loan)
    }

    /// Get loan by ID
    pub fn get_by_id(&self, id: i64) -> AppResult<Loan> {
        self.table.get(id)
    }

    /// Active loans held by a user; empty when there are none
    pub fn get_active_for_user(&self, user_id: i64) -> Vec<Loan> {
        self.table
            .filter(|loan| loan.user_id == user_id && loan.is_active())
    }

    pub fn has_active_for_book(&self, book_id: i64) -> bool {
        self.table
            .any(|loan| loan.book_id == book_id && loan.is_active())
    }

    pub fn has_active_for_user(&self, user_id: i64) -> bool {
        self.table
            .any(|loan| loan.user_id == user_id && loan.is_active())
    }

    pub fn list(&self) -> Vec<Loan> {
        self.table.list()
    }

    pub fn search(&self, query: &LoanQuery) -> Vec<Loan> {
        self.table.filter(|loan| query.matches(loan))
    }

    pub fn list_active(&self) -> Vec<Loan> {
        self.table.filter(Loan::is_active)
    }

    pub fn count(&self) -> usize {
        self.table.len()
    }
}
