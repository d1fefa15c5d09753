use scopecrate::{EntityDescriptor, ScopedResource};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
}

impl From<Model> for Organization {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl ScopedResource for Organization {
    type EntityType = Entity;
    const ENTITY_TYPE: &'static str = "organization";

    fn describe() -> EntityDescriptor {
        EntityDescriptor::from_entity::<Entity>(Self::ENTITY_TYPE).tenant_root()
    }
}
