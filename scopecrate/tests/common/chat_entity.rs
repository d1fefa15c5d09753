use scopecrate::{EntityDescriptor, ScopedResource};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "chats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq)]
pub struct Chat {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
}

impl From<Model> for Chat {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            title: model.title,
        }
    }
}

impl ScopedResource for Chat {
    type EntityType = Entity;
    const ENTITY_TYPE: &'static str = "chat";

    fn describe() -> EntityDescriptor {
        EntityDescriptor::from_entity::<Entity>(Self::ENTITY_TYPE)
            .relation("project", "project")
            .owned_via("project")
    }
}
