//! Category operations.
//!
//! Categories come in two flavours: system defaults (`owner_id` NULL,
//! shared, immutable) and user-owned ones.

use sea_orm::{ActiveValue, Condition, ConnectionTrait, QueryFilter, QueryOrder, entity::prelude::*};
use uuid::Uuid;

use crate::{Category, CategoryKind, EngineError, ResultEngine, UpdateCategoryCmd, categories};

use super::Engine;

/// Fetches a category for use as a payload reference: it must be active and
/// readable by the owner, otherwise it is reported as missing.
pub(crate) async fn require_category<C: ConnectionTrait>(
    conn: &C,
    category_id: Uuid,
    owner_id: &str,
) -> ResultEngine<categories::Model> {
    let model = categories::Entity::find_by_id(category_id.to_string())
        .one(conn)
        .await?
        .filter(|model| {
            model.active && model.owner_id.as_deref().is_none_or(|owner| owner == owner_id)
        })
        .ok_or_else(|| EngineError::not_found("category"))?;
    Ok(model)
}

impl Engine {
    /// Creates a user-owned category.
    pub async fn new_category(
        &self,
        owner_id: &str,
        name: &str,
        kind: CategoryKind,
        icon: Option<String>,
        color: Option<String>,
        description: Option<String>,
    ) -> ResultEngine<Category> {
        let category = Category::new(
            Some(owner_id.to_string()),
            name.to_string(),
            kind,
            icon,
            color,
            description,
        )?;
        categories::ActiveModel::from(&category)
            .insert(&self.database)
            .await?;
        Ok(category)
    }

    /// Returns one category addressed by id.
    pub async fn category(&self, category_id: Uuid, owner_id: &str) -> ResultEngine<Category> {
        let model = categories::Entity::find_by_id(category_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("category"))?;
        let category = Category::try_from(model)?;
        if !category.readable_by(owner_id) {
            return Err(EngineError::forbidden("category belongs to another user"));
        }
        Ok(category)
    }

    /// Lists active categories visible to the owner: their own plus the
    /// shared system defaults, optionally narrowed to one kind.
    pub async fn categories(
        &self,
        owner_id: &str,
        kind: Option<CategoryKind>,
    ) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find()
            .filter(
                Condition::any()
                    .add(categories::Column::OwnerId.eq(owner_id))
                    .add(categories::Column::OwnerId.is_null()),
            )
            .filter(categories::Column::Active.eq(true))
            .order_by_asc(categories::Column::Name);
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(Category::try_from).collect()
    }

    /// Updates a user-owned category. System defaults are read-only.
    pub async fn update_category(
        &self,
        category_id: Uuid,
        owner_id: &str,
        cmd: UpdateCategoryCmd,
    ) -> ResultEngine<Category> {
        self.require_owned_category(category_id, owner_id).await?;

        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(EngineError::validation("name", "name must not be empty"));
            }
        }

        let model = categories::ActiveModel {
            id: ActiveValue::Set(category_id.to_string()),
            name: match cmd.name {
                Some(name) => ActiveValue::Set(name.trim().to_string()),
                None => ActiveValue::NotSet,
            },
            icon: match cmd.icon {
                Some(icon) => ActiveValue::Set(Some(icon)),
                None => ActiveValue::NotSet,
            },
            color: match cmd.color {
                Some(color) => ActiveValue::Set(Some(color)),
                None => ActiveValue::NotSet,
            },
            description: match cmd.description {
                Some(description) => ActiveValue::Set(Some(description)),
                None => ActiveValue::NotSet,
            },
            ..Default::default()
        };
        let updated = model.update(&self.database).await?;
        Category::try_from(updated)
    }

    /// Deactivates a user-owned category (soft delete). Transactions keep
    /// their reference, so history stays intact.
    pub async fn deactivate_category(&self, category_id: Uuid, owner_id: &str) -> ResultEngine<()> {
        self.require_owned_category(category_id, owner_id).await?;
        let model = categories::ActiveModel {
            id: ActiveValue::Set(category_id.to_string()),
            active: ActiveValue::Set(false),
            ..Default::default()
        };
        model.update(&self.database).await?;
        Ok(())
    }

    async fn require_owned_category(
        &self,
        category_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<Category> {
        let category = self.category(category_id, owner_id).await?;
        if category.is_system_default() {
            return Err(EngineError::forbidden(
                "system default categories cannot be modified",
            ));
        }
        Ok(category)
    }
}
