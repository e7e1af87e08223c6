//! Loan model, status machine and fine arithmetic

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::repository::Entity;

/// Loan status. `Active` → `Returned` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
        };
        write!(f, "{}", label)
    }
}

/// Loan record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// Unset while the loan is active
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    /// Frozen at return time; zero while active
    #[schema(value_type = String, example = "0.00")]
    pub fine: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    /// New active loan for a book lent for `duration_days`
    pub fn open(book_id: i64, user_id: i64, now: DateTime<Utc>, duration_days: i64) -> Self {
        Self {
            id: 0,
            book_id,
            user_id,
            borrowed_at: now,
            due_date: now + Duration::days(duration_days),
            returned_at: None,
            status: LoanStatus::Active,
            fine: money(Decimal::ZERO),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && now > self.due_date
    }

    /// Close the loan at `now`, freezing the fine.
    pub fn close(&mut self, now: DateTime<Utc>, daily_fine: Decimal) {
        self.fine = fine_for(self.due_date, now, daily_fine);
        self.status = LoanStatus::Returned;
        self.returned_at = Some(now);
        self.updated_at = now;
    }

    /// Fine as it stands at `now`: the stored fine once returned, otherwise
    /// recomputed live.
    pub fn current_fine(&self, now: DateTime<Utc>, daily_fine: Decimal) -> Decimal {
        match self.status {
            LoanStatus::Returned => self.fine,
            LoanStatus::Active => fine_for(self.due_date, now, daily_fine),
        }
    }
}

impl Entity for Loan {
    const KIND: &'static str = "Loan";

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Whole days elapsed past `due_date`. A day only counts once a full 24
/// hours have passed.
pub fn days_late(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    if now <= due_date {
        return 0;
    }
    (now - due_date).num_hours() / 24
}

pub fn fine_for(due_date: DateTime<Utc>, now: DateTime<Utc>, daily_fine: Decimal) -> Decimal {
    let days = days_late(due_date, now);
    if days > 0 {
        money(Decimal::from(days) * daily_fine)
    } else {
        money(Decimal::ZERO)
    }
}

/// Currency amounts carry exactly two decimal places.
fn money(mut amount: Decimal) -> Decimal {
    amount.rescale(2);
    amount
}

/// Loan with values derived at read time
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanView {
    #[serde(flatten)]
    pub loan: Loan,
    /// Frozen fine for returned loans, live fine for active ones
    #[schema(value_type = String, example = "4.00")]
    pub current_fine: Decimal,
    pub is_overdue: bool,
}

impl LoanView {
    pub fn at(loan: Loan, now: DateTime<Utc>, daily_fine: Decimal) -> Self {
        Self {
            current_fine: loan.current_fine(now, daily_fine),
            is_overdue: loan.is_overdue(now),
            loan,
        }
    }
}

/// Create loan request
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateLoan {
    pub book_id: i64,
    pub user_id: i64,
}

/// Loan search filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoanQuery {
    /// Only loans in this status
    pub status: Option<LoanStatus>,
    /// Substring of the book id or user id
    pub q: Option<String>,
}

impl LoanQuery {
    pub fn matches(&self, loan: &Loan) -> bool {
        if let Some(status) = self.status {
            if loan.status != status {
                return false;
            }
        }

        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                loan.book_id.to_string().contains(q) || loan.user_id.to_string().contains(q)
            }
            _ => true,
        }
    }
}
