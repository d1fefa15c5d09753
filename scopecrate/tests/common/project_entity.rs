use scopecrate::{EntityDescriptor, ScopedResource};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub budget: i32,
    pub archived: bool,
    pub settings: Json,
    pub deleted: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub budget: i32,
}

impl From<Model> for Project {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            organization_id: model.organization_id,
            owner_id: model.owner_id,
            name: model.name,
            budget: model.budget,
        }
    }
}

impl ScopedResource for Project {
    type EntityType = Entity;
    const ENTITY_TYPE: &'static str = "project";

    fn describe() -> EntityDescriptor {
        EntityDescriptor::from_entity::<Entity>(Self::ENTITY_TYPE)
            .relation("owner", "user")
            .relation("organization", "organization")
            .owned_directly("organization_id")
            .soft_delete("deleted")
    }
}
