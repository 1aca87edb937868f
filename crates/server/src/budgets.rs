//! Budgets API endpoints

use api_types::{
    ApiResponse,
    budget::{BudgetNew, BudgetPeriod as ApiPeriod, BudgetUpdate, BudgetView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Budget, BudgetReport, MoneyCents, UpdateBudgetCmd, users};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_period(period: engine::BudgetPeriod) -> ApiPeriod {
    match period {
        engine::BudgetPeriod::Daily => ApiPeriod::Daily,
        engine::BudgetPeriod::Weekly => ApiPeriod::Weekly,
        engine::BudgetPeriod::Monthly => ApiPeriod::Monthly,
        engine::BudgetPeriod::Yearly => ApiPeriod::Yearly,
    }
}

fn map_api_period(period: ApiPeriod) -> engine::BudgetPeriod {
    match period {
        ApiPeriod::Daily => engine::BudgetPeriod::Daily,
        ApiPeriod::Weekly => engine::BudgetPeriod::Weekly,
        ApiPeriod::Monthly => engine::BudgetPeriod::Monthly,
        ApiPeriod::Yearly => engine::BudgetPeriod::Yearly,
    }
}

fn view((budget, report): (Budget, BudgetReport)) -> BudgetView {
    BudgetView {
        id: budget.id,
        category_id: budget.category_id,
        name: budget.name,
        amount_minor: budget.amount.minor(),
        period: map_period(budget.period),
        start_date: budget.start_date,
        end_date: budget.end_date,
        description: budget.description,
        spent_minor: report.spent.minor(),
        remaining_minor: report.remaining.minor(),
        percentage_used: report.percentage_used,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<ApiResponse<BudgetView>>), ServerError> {
    let created = state
        .engine
        .new_budget(
            &user.username,
            payload.category_id,
            &payload.name,
            MoneyCents::new(payload.amount_minor),
            map_api_period(payload.period),
            payload.start_date,
            payload.end_date,
            payload.description,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(view(created), "budget created")),
    ))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<BudgetView>>>, ServerError> {
    let budgets = state.engine.budgets(&user.username).await?;
    Ok(Json(ApiResponse::ok(
        budgets.into_iter().map(view).collect(),
    )))
}

pub async fn detail(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BudgetView>>, ServerError> {
    let budget = state.engine.budget(id, &user.username).await?;
    Ok(Json(ApiResponse::ok(view(budget))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<ApiResponse<BudgetView>>, ServerError> {
    let mut cmd = UpdateBudgetCmd::new();
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(amount_minor) = payload.amount_minor {
        cmd = cmd.amount(MoneyCents::new(amount_minor));
    }
    if let Some(period) = payload.period {
        cmd = cmd.period(map_api_period(period));
    }
    if let Some(start_date) = payload.start_date {
        cmd = cmd.start_date(start_date);
    }
    if let Some(end_date) = payload.end_date {
        cmd = cmd.end_date(end_date);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let updated = state.engine.update_budget(id, &user.username, cmd).await?;
    Ok(Json(ApiResponse::ok_with_message(
        view(updated),
        "budget updated",
    )))
}

pub async fn deactivate(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state.engine.deactivate_budget(id, &user.username).await?;
    Ok(Json(ApiResponse::ok_with_message((), "budget removed")))
}
