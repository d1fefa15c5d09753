use scopecrate::{EntityDescriptor, FilterError, LookupTarget, ScopedResource};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::SimpleExpr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub token_hash: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            organization_id: model.organization_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
        }
    }
}

impl ScopedResource for User {
    type EntityType = Entity;
    const ENTITY_TYPE: &'static str = "user";

    fn describe() -> EntityDescriptor {
        EntityDescriptor::from_entity::<Entity>(Self::ENTITY_TYPE)
            .relation("organization", "organization")
            .owned_directly("organization_id")
    }

    /// Users are found by first name, last name or "first last".
    fn related_lookup(target: &LookupTarget<'_>, value: &str) -> Result<SimpleExpr, FilterError> {
        let first = target.column("first_name")?;
        let last = target.column("last_name")?;
        let full = target.concat_with_space(first.clone(), last.clone());
        Ok(target
            .contains(first, value)
            .or(target.contains(last, value))
            .or(target.contains(full, value)))
    }
}
