//! Circulation statistics

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{clock::SharedClock, repository::Repository};

/// Dashboard counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LibraryStats {
    pub total_books: usize,
    pub total_users: usize,
    pub total_loans: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    /// Books with at least one copy on the shelf
    pub available_books: usize,
    /// Sum of live fines on active loans
    #[schema(value_type = String, example = "12.00")]
    pub outstanding_fines: Decimal,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
    clock: SharedClock,
    daily_fine: Decimal,
}

impl StatsService {
    pub fn new(repository: Repository, clock: SharedClock, daily_fine: Decimal) -> Self {
        Self {
            repository,
            clock,
            daily_fine,
        }
    }

    pub fn get_stats(&self) -> LibraryStats {
        let now = self.clock.now();
        let active = self.repository.loans.list_active();

        let mut outstanding_fines = Decimal::new(0, 2);
        for loan in &active {
            outstanding_fines += loan.current_fine(now, self.daily_fine);
        }

        LibraryStats {
            total_books: self.repository.books.count(),
            total_users: self.repository.users.count(),
            total_loans: self.repository.loans.count(),
            active_loans: active.len(),
            overdue_loans: active.iter().filter(|loan| loan.is_overdue(now)).count(),
            available_books: self.repository.books.count_available(),
            outstanding_fines,
        }
    }
}
