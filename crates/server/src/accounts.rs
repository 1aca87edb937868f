//! Accounts API endpoints

use api_types::{
    ApiResponse,
    account::{AccountKind as ApiKind, AccountNew, AccountUpdate, AccountView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{MoneyCents, UpdateAccountCmd, users};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::AccountKind) -> ApiKind {
    match kind {
        engine::AccountKind::Bank => ApiKind::Bank,
        engine::AccountKind::Cash => ApiKind::Cash,
        engine::AccountKind::Ewallet => ApiKind::Ewallet,
        engine::AccountKind::Investment => ApiKind::Investment,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::AccountKind {
    match kind {
        ApiKind::Bank => engine::AccountKind::Bank,
        ApiKind::Cash => engine::AccountKind::Cash,
        ApiKind::Ewallet => engine::AccountKind::Ewallet,
        ApiKind::Investment => engine::AccountKind::Investment,
    }
}

fn view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        kind: map_kind(account.kind),
        balance_minor: account.balance.minor(),
        color: account.color,
        description: account.description,
        archived: account.archived,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<ApiResponse<AccountView>>), ServerError> {
    let account = state
        .engine
        .new_account(
            &user.username,
            &payload.name,
            map_api_kind(payload.kind),
            MoneyCents::new(payload.balance_minor.unwrap_or(0)),
            payload.color,
            payload.description,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(view(account), "account created")),
    ))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<AccountView>>>, ServerError> {
    let accounts = state.engine.accounts(&user.username).await?;
    Ok(Json(ApiResponse::ok(
        accounts.into_iter().map(view).collect(),
    )))
}

pub async fn detail(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccountView>>, ServerError> {
    let account = state.engine.account(id, &user.username).await?;
    Ok(Json(ApiResponse::ok(view(account))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<ApiResponse<AccountView>>, ServerError> {
    let mut cmd = UpdateAccountCmd::new();
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(map_api_kind(kind));
    }
    if let Some(color) = payload.color {
        cmd = cmd.color(color);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let account = state.engine.update_account(id, &user.username, cmd).await?;
    Ok(Json(ApiResponse::ok_with_message(
        view(account),
        "account updated",
    )))
}

pub async fn archive(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state.engine.archive_account(id, &user.username).await?;
    Ok(Json(ApiResponse::ok_with_message((), "account archived")))
}
