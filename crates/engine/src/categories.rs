//! Spending/income categories.
//!
//! A category with `owner_id = NULL` is a shared system default: readable by
//! every user, writable and deletable by none.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::validation(
                "type",
                format!("invalid category type: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    /// `None` marks a shared system default.
    pub owner_id: Option<String>,
    pub name: String,
    pub kind: CategoryKind,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub active: bool,
}

impl Category {
    pub fn new(
        owner_id: Option<String>,
        name: String,
        kind: CategoryKind,
        icon: Option<String>,
        color: Option<String>,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        if name.trim().is_empty() {
            return Err(EngineError::validation("name", "name must not be empty"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.trim().to_string(),
            kind,
            icon,
            color,
            description,
            active: true,
        })
    }

    pub fn is_system_default(&self) -> bool {
        self.owner_id.is_none()
    }

    /// Readable by the owner, or by anyone when it is a system default.
    pub fn readable_by(&self, owner_id: &str) -> bool {
        match &self.owner_id {
            None => true,
            Some(owner) => owner == owner_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: Option<String>,
    pub name: String,
    pub kind: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Set(category.id.to_string()),
            owner_id: ActiveValue::Set(category.owner_id.clone()),
            name: ActiveValue::Set(category.name.clone()),
            kind: ActiveValue::Set(category.kind.as_str().to_string()),
            icon: ActiveValue::Set(category.icon.clone()),
            color: ActiveValue::Set(category.color.clone()),
            description: ActiveValue::Set(category.description.clone()),
            active: ActiveValue::Set(category.active),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::not_found("category".to_string()))?,
            owner_id: model.owner_id,
            name: model.name,
            kind: CategoryKind::try_from(model.kind.as_str())?,
            icon: model.icon,
            color: model.color,
            description: model.description,
            active: model.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_defaults_are_readable_by_everyone() {
        let category = Category::new(
            None,
            "Food & Drink".to_string(),
            CategoryKind::Expense,
            None,
            None,
            None,
        )
        .unwrap();
        assert!(category.is_system_default());
        assert!(category.readable_by("alice"));
        assert!(category.readable_by("bob"));
    }

    #[test]
    fn owned_categories_are_private() {
        let category = Category::new(
            Some("alice".to_string()),
            "Side projects".to_string(),
            CategoryKind::Income,
            None,
            None,
            None,
        )
        .unwrap();
        assert!(category.readable_by("alice"));
        assert!(!category.readable_by("bob"));
    }
}
