//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, LoanQuery, LoanView},
};

/// Return response with loan details
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// Loan details, fine frozen
    pub loan: LoanView,
}

/// List all loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "All loans", body = Vec<LoanView>)
    )
)]
pub async fn list_loans(State(state): State<crate::AppState>) -> Json<Vec<LoanView>> {
    let loans = &state.services.loans;
    Json(loans.view_all(loans.get_all_loans()))
}

/// Filter loans by status and book/user id
#[utoipa::path(
    get,
    path = "/loans/search",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "Matching loans", body = Vec<LoanView>)
    )
)]
pub async fn search_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanQuery>,
) -> Json<Vec<LoanView>> {
    let loans = &state.services.loans;
    Json(loans.view_all(loans.search_loans(&query)))
}

/// Get a loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = i64, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = LoanView),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i64>,
) -> AppResult<Json<LoanView>> {
    let loan = state.services.loans.get_loan(loan_id)?;
    Ok(Json(state.services.loans.view(loan)))
}

/// Get active loans for a specific user
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's active loans", body = Vec<LoanView>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<LoanView>>> {
    let loans = state.services.loans.get_user_loans(user_id)?;
    Ok(Json(state.services.loans.view_all(loans)))
}

/// Create a new loan (borrow a book)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanView),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "No copy available or user already has an active loan"),
        (status = 422, description = "Reference-only book")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanView>)> {
    let loan = state
        .services
        .loans
        .create_loan(request.book_id, request.user_id)?;

    Ok((StatusCode::CREATED, Json(state.services.loans.view(loan))))
}

/// Return a borrowed book
#[utoipa::path(
    put,
    path = "/loans/{id}/return",
    tag = "loans",
    params(("id" = i64, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i64>,
) -> AppResult<Json<ReturnResponse>> {
    let loan = state.services.loans.return_book(loan_id)?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        loan: state.services.loans.view(loan),
    }))
}
