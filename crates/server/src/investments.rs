//! Investments API endpoints

use api_types::{
    ApiResponse,
    investment::{InvestmentKind as ApiKind, InvestmentNew, InvestmentUpdate, InvestmentView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Investment, MoneyCents, UpdateInvestmentCmd, users};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::InvestmentKind) -> ApiKind {
    match kind {
        engine::InvestmentKind::Stock => ApiKind::Stock,
        engine::InvestmentKind::Bond => ApiKind::Bond,
        engine::InvestmentKind::Etf => ApiKind::Etf,
        engine::InvestmentKind::Crypto => ApiKind::Crypto,
        engine::InvestmentKind::MutualFund => ApiKind::MutualFund,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::InvestmentKind {
    match kind {
        ApiKind::Stock => engine::InvestmentKind::Stock,
        ApiKind::Bond => engine::InvestmentKind::Bond,
        ApiKind::Etf => engine::InvestmentKind::Etf,
        ApiKind::Crypto => engine::InvestmentKind::Crypto,
        ApiKind::MutualFund => engine::InvestmentKind::MutualFund,
    }
}

fn view(investment: Investment) -> InvestmentView {
    let total_value_minor = investment.total_value().minor();
    let gain_loss_minor = investment.gain_loss().minor();
    let gain_loss_percentage = investment.gain_loss_percentage();
    InvestmentView {
        id: investment.id,
        symbol: investment.symbol,
        kind: map_kind(investment.kind),
        quantity: investment.quantity,
        purchase_price_minor: investment.purchase_price.minor(),
        current_price_minor: investment.current_price.minor(),
        purchase_date: investment.purchase_date,
        total_value_minor,
        gain_loss_minor,
        gain_loss_percentage,
        name: investment.name,
        notes: investment.notes,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<InvestmentNew>,
) -> Result<(StatusCode, Json<ApiResponse<InvestmentView>>), ServerError> {
    let investment = state
        .engine
        .new_investment(
            &user.username,
            &payload.name,
            payload.symbol,
            map_api_kind(payload.kind),
            payload.quantity,
            MoneyCents::new(payload.purchase_price_minor),
            payload.current_price_minor.map(MoneyCents::new),
            payload.purchase_date,
            payload.notes,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            view(investment),
            "investment created",
        )),
    ))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<InvestmentView>>>, ServerError> {
    let investments = state.engine.investments(&user.username).await?;
    Ok(Json(ApiResponse::ok(
        investments.into_iter().map(view).collect(),
    )))
}

pub async fn detail(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InvestmentView>>, ServerError> {
    let investment = state.engine.investment(id, &user.username).await?;
    Ok(Json(ApiResponse::ok(view(investment))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InvestmentUpdate>,
) -> Result<Json<ApiResponse<InvestmentView>>, ServerError> {
    let mut cmd = UpdateInvestmentCmd::new();
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(symbol) = payload.symbol {
        cmd = cmd.symbol(symbol);
    }
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(map_api_kind(kind));
    }
    if let Some(quantity) = payload.quantity {
        cmd = cmd.quantity(quantity);
    }
    if let Some(purchase_price_minor) = payload.purchase_price_minor {
        cmd = cmd.purchase_price(MoneyCents::new(purchase_price_minor));
    }
    if let Some(current_price_minor) = payload.current_price_minor {
        cmd = cmd.current_price(MoneyCents::new(current_price_minor));
    }
    if let Some(purchase_date) = payload.purchase_date {
        cmd = cmd.purchase_date(purchase_date);
    }
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }

    let investment = state
        .engine
        .update_investment(id, &user.username, cmd)
        .await?;
    Ok(Json(ApiResponse::ok_with_message(
        view(investment),
        "investment updated",
    )))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state.engine.delete_investment(id, &user.username).await?;
    Ok(Json(ApiResponse::ok_with_message((), "investment deleted")))
}
