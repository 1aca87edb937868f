//! Transactions API endpoints

use api_types::{
    ApiResponse,
    transaction::{
        TransactionKind as ApiKind, TransactionList, TransactionNew, TransactionUpdate,
        TransactionView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{
    CreateTransactionCmd, MoneyCents, TransactionDetail, TransactionListFilter,
    UpdateTransactionCmd, users,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Transfer => ApiKind::Transfer,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::Transfer => engine::TransactionKind::Transfer,
    }
}

fn view(detail: TransactionDetail) -> TransactionView {
    TransactionView {
        id: detail.transaction.id,
        account_id: detail.account.id,
        account_name: detail.account.name,
        category_id: detail.category.id,
        category_name: detail.category.name,
        kind: map_kind(detail.transaction.kind),
        amount_minor: detail.transaction.amount.minor(),
        description: detail.transaction.description,
        occurred_on: detail.transaction.occurred_on,
        created_at: detail.transaction.created_at,
        to_account_id: detail.transaction.transfer_to_account_id,
        to_account_name: detail.transfer_to_account.map(|account| account.name),
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionView>>), ServerError> {
    let mut cmd = CreateTransactionCmd::new(
        &user.username,
        payload.account_id,
        payload.category_id,
        map_api_kind(payload.kind),
        MoneyCents::new(payload.amount_minor),
        payload.description,
    );
    if let Some(occurred_on) = payload.occurred_on {
        cmd = cmd.occurred_on(occurred_on);
    }
    if let Some(to_account_id) = payload.to_account_id {
        cmd = cmd.to_account_id(to_account_id);
    }

    let detail = state.engine.create_transaction(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            view(detail),
            "transaction created",
        )),
    ))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionList>,
) -> Result<Json<ApiResponse<Vec<TransactionView>>>, ServerError> {
    let filter = TransactionListFilter {
        account_id: query.account_id,
        category_id: query.category_id,
        kind: query.kind.map(map_api_kind),
        from: query.from,
        to: query.to,
        limit: query.limit,
    };
    let details = state.engine.list_transactions(&user.username, filter).await?;
    Ok(Json(ApiResponse::ok(
        details.into_iter().map(view).collect(),
    )))
}

pub async fn detail(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionView>>, ServerError> {
    let detail = state.engine.transaction_detail(id, &user.username).await?;
    Ok(Json(ApiResponse::ok(view(detail))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<ApiResponse<TransactionView>>, ServerError> {
    let mut cmd = UpdateTransactionCmd::new(id, &user.username);
    if let Some(account_id) = payload.account_id {
        cmd = cmd.account_id(account_id);
    }
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(map_api_kind(kind));
    }
    if let Some(amount_minor) = payload.amount_minor {
        cmd = cmd.amount(MoneyCents::new(amount_minor));
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(occurred_on) = payload.occurred_on {
        cmd = cmd.occurred_on(occurred_on);
    }
    if let Some(to_account_id) = payload.to_account_id {
        cmd = cmd.to_account_id(to_account_id);
    }

    let detail = state.engine.update_transaction(cmd).await?;
    Ok(Json(ApiResponse::ok_with_message(
        view(detail),
        "transaction updated",
    )))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state.engine.delete_transaction(id, &user.username).await?;
    Ok(Json(ApiResponse::ok_with_message((), "transaction deleted")))
}
