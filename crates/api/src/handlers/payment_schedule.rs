//! Handlers for the `/payment-schedule` resource.
//!
//! Paid state is resolved before every write: marking an entry paid without
//! a date stamps today, marking it unpaid clears the date.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use sitebook_core::payments::{
    resolve_paid_state, summarize_payments, validate_amount, PaymentSummary,
};
use sitebook_core::types::DbId;
use sitebook_core::validation::validate_input;
use sitebook_db::models::payment_schedule::{
    CreatePaymentSchedule, PaymentSchedule, PaymentScheduleFilter, PaymentScheduleValues,
    UpdatePaymentSchedule,
};
use sitebook_db::repositories::PaymentScheduleRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::access::ensure_project_exists;
use crate::middleware::rbac::{RequireManager, RequireManagerOrTrial};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/payment-schedule?project_id=
pub async fn list(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppQuery(filter): AppQuery<PaymentScheduleFilter>,
) -> AppResult<Json<DataResponse<Vec<PaymentSchedule>>>> {
    let entries = PaymentScheduleRepo::list(&state.pool, filter.project_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/payment-schedule/summary?project_id=
///
/// Totals over one project, or over every project when `project_id` is
/// omitted. Overdue means unpaid with an expected date before today.
pub async fn summary(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppQuery(filter): AppQuery<PaymentScheduleFilter>,
) -> AppResult<Json<DataResponse<PaymentSummary>>> {
    if let Some(project_id) = filter.project_id {
        ensure_project_exists(&state.pool, project_id).await?;
    }
    let lines = PaymentScheduleRepo::lines(&state.pool, filter.project_id).await?;
    Ok(Json(DataResponse {
        data: summarize_payments(&lines, Utc::now().date_naive()),
    }))
}

/// GET /api/v1/payment-schedule/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<PaymentSchedule>>> {
    let entry = PaymentScheduleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("PaymentSchedule", id))?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/payment-schedule
pub async fn create(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppJson(input): AppJson<CreatePaymentSchedule>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentSchedule>>)> {
    validate_input(&input)?;
    validate_amount(input.amount)?;
    ensure_project_exists(&state.pool, input.project_id).await?;

    let (is_paid, actual_date) = resolve_paid_state(
        input.is_paid.unwrap_or(false),
        input.actual_date,
        Utc::now().date_naive(),
    );

    let values = PaymentScheduleValues {
        project_id: input.project_id,
        stage_name: input.stage_name.trim().to_string(),
        amount: input.amount,
        expected_date: input.expected_date,
        actual_date,
        is_paid,
        notes: input.notes,
    };

    let entry = PaymentScheduleRepo::create(&state.pool, &values).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// PATCH /api/v1/payment-schedule/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdatePaymentSchedule>,
) -> AppResult<Json<DataResponse<PaymentSchedule>>> {
    validate_input(&input)?;
    if let Some(amount) = input.amount {
        validate_amount(amount)?;
    }

    let existing = PaymentScheduleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("PaymentSchedule", id))?;

    let (is_paid, actual_date) = resolve_paid_state(
        input.is_paid.unwrap_or(existing.is_paid),
        input.actual_date.or(existing.actual_date),
        Utc::now().date_naive(),
    );

    let values = PaymentScheduleValues {
        project_id: existing.project_id,
        stage_name: input
            .stage_name
            .map(|s| s.trim().to_string())
            .unwrap_or(existing.stage_name),
        amount: input.amount.unwrap_or(existing.amount),
        expected_date: input.expected_date.unwrap_or(existing.expected_date),
        actual_date,
        is_paid,
        notes: input.notes.or(existing.notes),
    };

    let entry = PaymentScheduleRepo::update(&state.pool, id, &values)
        .await?
        .ok_or(AppError::not_found("PaymentSchedule", id))?;
    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/payment-schedule/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if PaymentScheduleRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("PaymentSchedule", id))
    }
}
