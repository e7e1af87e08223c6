//! Loan lifecycle: borrowing and returning books
//!
//! Every operation that reads one store and writes another runs under the
//! repository's circulation lock, so two concurrent borrow requests can never
//! both see the last copy or both see a user without an active loan.

use rust_decimal::Decimal;

use crate::{
    clock::SharedClock,
    error::{AppError, AppResult},
    models::loan::{Loan, LoanQuery, LoanView},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    clock: SharedClock,
    daily_fine: Decimal,
}

impl LoansService {
    pub fn new(repository: Repository, clock: SharedClock, daily_fine: Decimal) -> Self {
        Self {
            repository,
            clock,
            daily_fine,
        }
    }

    /// Lend a book to a user.
    ///
    /// Checks, in order: the book exists, is loanable, has a copy left; the
    /// user exists and holds no active loan. The loan is then recorded and the
    /// book's quantity decremented.
    pub fn create_loan(&self, book_id: i64, user_id: i64) -> AppResult<Loan> {
        let _circulation = self.repository.circulation();

        let mut book = self.repository.books.get_by_id(book_id)?;

        if !book.book_type.is_loanable() {
            tracing::debug!("Refused loan of reference book {}", book_id);
            return Err(AppError::InvalidOperation(format!(
                "Book {} is reference-only and must remain in the library",
                book_id
            )));
        }

        if book.quantity <= 0 {
            tracing::debug!("Refused loan of book {}: no copies left", book_id);
            return Err(AppError::Unavailable(format!(
                "Book {} is not available",
                book_id
            )));
        }

        self.repository.users.get_by_id(user_id)?;

        if !self.repository.loans.get_active_for_user(user_id).is_empty() {
            tracing::debug!("Refused loan for user {}: active loan outstanding", user_id);
            return Err(AppError::Conflict(format!(
                "User {} has an active loan",
                user_id
            )));
        }

        let now = self.clock.now();
        let loan = self
            .repository
            .loans
            .create(Loan::open(book_id, user_id, now, book.loan_duration_days))?;

        book.quantity -= 1;
        book.updated_at = now;
        if let Err(e) = self.repository.books.update(book_id, book) {
            tracing::warn!(
                "Stock update for book {} failed, voiding loan {}: {}",
                book_id,
                loan.id,
                e
            );
            let mut voided = loan.clone();
            voided.close(now, Decimal::ZERO);
            if let Err(rollback) = self.repository.loans.update(voided) {
                return Err(AppError::Internal(format!(
                    "Loan {} could not be voided after failed stock update: {}",
                    loan.id, rollback
                )));
            }
            return Err(e);
        }

        tracing::info!(
            "Loan {} created: book {} to user {}, due {}",
            loan.id,
            book_id,
            user_id,
            loan.due_date
        );

        Ok(loan)
    }

    /// Return a borrowed book, freezing the fine and restoring stock.
    pub fn return_book(&self, loan_id: i64) -> AppResult<Loan> {
        let _circulation = self.repository.circulation();

        let mut loan = self.repository.loans.get_by_id(loan_id)?;

        if !loan.is_active() {
            return Err(AppError::Conflict(format!(
                "Loan {} already returned",
                loan_id
            )));
        }

        let mut book = self.repository.books.get_by_id(loan.book_id)?;
        book.quantity = book.quantity.checked_add(1).ok_or_else(|| {
            AppError::Internal(format!("Book {} quantity overflow on return", loan.book_id))
        })?;

        let now = self.clock.now();
        loan.close(now, self.daily_fine);
        let loan = self.repository.loans.update(loan)?;

        book.updated_at = now;
        self.repository.books.update(book.id, book)?;

        tracing::info!(
            "Loan {} returned: book {} by user {}, fine {}",
            loan.id,
            loan.book_id,
            loan.user_id,
            loan.fine
        );

        Ok(loan)
    }

    /// Get loan by ID
    pub fn get_loan(&self, loan_id: i64) -> AppResult<Loan> {
        self.repository.loans.get_by_id(loan_id)
    }

    /// Active loans for a user
    pub fn get_user_loans(&self, user_id: i64) -> AppResult<Vec<Loan>> {
        // Verify user exists
        self.repository.users.get_by_id(user_id)?;
        Ok(self.repository.loans.get_active_for_user(user_id))
    }

    pub fn get_all_loans(&self) -> Vec<Loan> {
        self.repository.loans.list()
    }

    pub fn search_loans(&self, query: &LoanQuery) -> Vec<Loan> {
        self.repository.loans.search(query)
    }

    /// Fine owed on a loan right now
    pub fn calculate_fine(&self, loan: &Loan) -> Decimal {
        loan.current_fine(self.clock.now(), self.daily_fine)
    }

    /// Attach live fine and overdue flag
    pub fn view(&self, loan: Loan) -> LoanView {
        LoanView::at(loan, self.clock.now(), self.daily_fine)
    }

    pub fn view_all(&self, loans: Vec<Loan>) -> Vec<LoanView> {
        let now = self.clock.now();
        loans
            .into_iter()
            .map(|loan| LoanView::at(loan, now, self.daily_fine))
            .collect()
    }
}
