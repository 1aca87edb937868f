//! Categories API endpoints

use api_types::{
    ApiResponse,
    category::{CategoryKind as ApiKind, CategoryList, CategoryNew, CategoryUpdate, CategoryView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{UpdateCategoryCmd, users};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::CategoryKind) -> ApiKind {
    match kind {
        engine::CategoryKind::Income => ApiKind::Income,
        engine::CategoryKind::Expense => ApiKind::Expense,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::CategoryKind {
    match kind {
        ApiKind::Income => engine::CategoryKind::Income,
        ApiKind::Expense => engine::CategoryKind::Expense,
    }
}

fn view(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        kind: map_kind(category.kind),
        is_default: category.is_system_default(),
        name: category.name,
        icon: category.icon,
        color: category.color,
        description: category.description,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryView>>), ServerError> {
    let category = state
        .engine
        .new_category(
            &user.username,
            &payload.name,
            map_api_kind(payload.kind),
            payload.icon,
            payload.color,
            payload.description,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            view(category),
            "category created",
        )),
    ))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<CategoryList>,
) -> Result<Json<ApiResponse<Vec<CategoryView>>>, ServerError> {
    let categories = state
        .engine
        .categories(&user.username, query.kind.map(map_api_kind))
        .await?;
    Ok(Json(ApiResponse::ok(
        categories.into_iter().map(view).collect(),
    )))
}

pub async fn detail(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryView>>, ServerError> {
    let category = state.engine.category(id, &user.username).await?;
    Ok(Json(ApiResponse::ok(view(category))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<ApiResponse<CategoryView>>, ServerError> {
    let mut cmd = UpdateCategoryCmd::new();
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(icon) = payload.icon {
        cmd = cmd.icon(icon);
    }
    if let Some(color) = payload.color {
        cmd = cmd.color(color);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let category = state
        .engine
        .update_category(id, &user.username, cmd)
        .await?;
    Ok(Json(ApiResponse::ok_with_message(
        view(category),
        "category updated",
    )))
}

pub async fn deactivate(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state.engine.deactivate_category(id, &user.username).await?;
    Ok(Json(ApiResponse::ok_with_message((), "category removed")))
}
