use crate::server::dto::ExpenseRequest;
use crate::server::response::ApiError;
use crate::types::{ExpenseInput, parse_calendar_date};

const MIN_PASSWORD_LEN: usize = 6;
const MAX_CATEGORY_NAME_LEN: usize = 100;
const MAX_NOTE_LEN: usize = 500;

/// Trims and lowercases an email address, rejecting anything without an `@`.
pub fn normalize_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("invalid email"));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} chars"
        )));
    }
    Ok(())
}

/// Returns the trimmed category name.
pub fn validate_category_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "name cannot exceed {MAX_CATEGORY_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

pub fn validate_budget_amount(amount: f64) -> Result<f64, ApiError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ApiError::bad_request("amount must be >= 0"));
    }
    Ok(amount)
}

pub fn validate_expense(req: ExpenseRequest) -> Result<ExpenseInput, ApiError> {
    let note = req.note.trim();
    if req.category_id <= 0 || !req.amount.is_finite() || req.amount <= 0.0 || note.is_empty() {
        return Err(ApiError::bad_request("missing fields"));
    }
    if note.chars().count() > MAX_NOTE_LEN {
        return Err(ApiError::bad_request(format!(
            "note cannot exceed {MAX_NOTE_LEN} characters"
        )));
    }

    let spent_at = parse_calendar_date(req.spent_at.trim())
        .ok_or_else(|| ApiError::bad_request("invalid date"))?;

    Ok(ExpenseInput {
        category_id: req.category_id,
        note: note.to_string(),
        amount: req.amount,
        spent_at,
    })
}

/// Parses a path id. Anything that is not a positive integer cannot name a row.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::not_found("not found")),
    }
}
