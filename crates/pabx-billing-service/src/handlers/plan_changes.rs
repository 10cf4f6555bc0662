//! Plan-change preview handlers.
//!
//! The dashboards post the user's current plan, its expiration and one or
//! more candidate plans, exactly as their backends returned them. Nothing is
//! stored and no plan is switched.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pabx_billing_core::{
    calculate_plan_change, compare_plans, PlanChangeKind, PlanComparison, PlanRecord,
    PlanSnapshot, SubscriptionRecord, SubscriptionState, UserId,
};

use crate::auth::OperatorAuth;
use crate::error::ApiError;

/// Maximum number of candidates accepted by the compare endpoint.
pub const MAX_COMPARE_CANDIDATES: usize = 50;

/// Preview request for a single candidate plan.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    /// The user whose plan would change (for logging only).
    #[serde(default, alias = "userId")]
    pub user_id: Option<UserId>,

    /// Current plan and expiration.
    #[serde(flatten)]
    pub subscription: SubscriptionRecord,

    /// The plan being considered.
    #[serde(alias = "candidatePlan")]
    pub candidate_plan: PlanRecord,

    /// Evaluation instant (default: now).
    #[serde(default)]
    pub today: Option<DateTime<Utc>>,
}

/// Preview response.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// The user, echoed back when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Candidate, change kind and figures.
    #[serde(flatten)]
    pub comparison: PlanComparison,
}

/// Preview switching to one candidate plan.
pub async fn preview_plan_change(
    auth: OperatorAuth,
    Json(body): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let current = SubscriptionState::try_from(body.subscription)?;
    let candidate = PlanSnapshot::try_from(body.candidate_plan)?;
    let today = body.today.unwrap_or_else(Utc::now);

    let result = calculate_plan_change(&current, &candidate, today);
    let kind = PlanChangeKind::from_rates(result.current_daily_rate, result.new_daily_rate);

    tracing::info!(
        operator = %auth.operator,
        user_id = ?body.user_id,
        plan_id = ?candidate.id,
        remaining_days = result.remaining_days,
        amount_due_today = %result.amount_due_today,
        kind = ?kind,
        "Plan change previewed"
    );

    Ok(Json(PreviewResponse {
        user_id: body.user_id,
        comparison: PlanComparison {
            candidate,
            kind,
            result,
        },
    }))
}

/// Compare request for several candidate plans.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    /// The user whose plan would change (for logging only).
    #[serde(default, alias = "userId")]
    pub user_id: Option<UserId>,

    /// Current plan and expiration.
    #[serde(flatten)]
    pub subscription: SubscriptionRecord,

    /// Plans being considered, in display order.
    #[serde(default, alias = "availablePlans")]
    pub candidates: Vec<PlanRecord>,

    /// Evaluation instant (default: now).
    #[serde(default)]
    pub today: Option<DateTime<Utc>>,
}

/// Compare response.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    /// The user, echoed back when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// One entry per candidate, in request order.
    pub comparisons: Vec<PlanComparison>,
}

/// Preview every candidate plan against the same subscription.
pub async fn compare_plan_changes(
    auth: OperatorAuth,
    Json(body): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    if body.candidates.is_empty() {
        return Err(ApiError::BadRequest("At least one candidate plan is required".into()));
    }
    if body.candidates.len() > MAX_COMPARE_CANDIDATES {
        return Err(ApiError::BadRequest(format!(
            "At most {MAX_COMPARE_CANDIDATES} candidate plans can be compared"
        )));
    }

    let current = SubscriptionState::try_from(body.subscription)?;
    let candidates = body
        .candidates
        .into_iter()
        .map(PlanSnapshot::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let today = body.today.unwrap_or_else(Utc::now);

    let comparisons = compare_plans(&current, &candidates, today);

    tracing::info!(
        operator = %auth.operator,
        user_id = ?body.user_id,
        candidates = comparisons.len(),
        chargeable = comparisons.iter().filter(|c| c.result.is_chargeable()).count(),
        "Plan changes compared"
    );

    Ok(Json(CompareResponse {
        user_id: body.user_id,
        comparisons,
    }))
}
