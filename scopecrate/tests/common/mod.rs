use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use scopecrate::{AccessPrincipal, CollectionQueryEngine, EntityRegistry};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;
use uuid::Uuid;

pub mod chat_entity;
pub mod organization_entity;
pub mod project_entity;
pub mod user_entity;

use chat_entity::Chat;
use organization_entity::Organization;
use project_entity::Project;
use user_entity::User;

// Helper function to get database URL from environment or default to SQLite
fn get_test_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

// Engine logs show up with RUST_LOG=scopecrate=debug and --nocapture
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Cleanup function for persistent databases
async fn cleanup_test_tables(db: &DatabaseConnection) {
    // Drop tables in reverse dependency order to avoid foreign key issues
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS chats").await;
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS projects").await;
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS users").await;
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS organizations").await;
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS seaql_migrations").await;
}

#[allow(dead_code)]
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let database_url = get_test_database_url();
    let db = Database::connect(&database_url).await?;

    // For persistent databases, clean up any existing tables
    if !database_url.starts_with("sqlite::memory:") {
        cleanup_test_tables(&db).await;
    }

    Migrator::up(&db, None).await?;
    Ok(db)
}

#[allow(dead_code)]
pub fn test_registry() -> EntityRegistry {
    EntityRegistry::builder()
        .register::<Organization>()
        .register::<User>()
        .register::<Project>()
        .register::<Chat>()
        .build()
        .expect("test entities register cleanly")
}

#[allow(dead_code)]
pub fn test_engine() -> CollectionQueryEngine {
    CollectionQueryEngine::new(Arc::new(test_registry()))
}

/// The authenticated caller as the auth layer would hand it over.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub organization_id: Option<Uuid>,
}

impl Actor {
    #[allow(dead_code)]
    pub fn member_of(organization_id: Uuid) -> Self {
        Self {
            organization_id: Some(organization_id),
        }
    }
}

impl AccessPrincipal for Actor {
    fn tenant_id(&self) -> Option<Uuid> {
        self.organization_id
    }
}

#[allow(dead_code)]
pub fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::days(offset)
}

#[allow(dead_code)]
pub async fn seed_organization(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    organization_entity::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        created_at: Set(day(0)),
    }
    .insert(db)
    .await
    .expect("insert organization");
    id
}

#[allow(dead_code)]
pub async fn seed_user(
    db: &DatabaseConnection,
    organization_id: Uuid,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Uuid {
    let id = Uuid::new_v4();
    user_entity::ActiveModel {
        id: Set(id),
        organization_id: Set(organization_id),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(email.to_string()),
        password: Set(format!("hunter2-{first_name}")),
        token_hash: Set(Some("deadbeef".to_string())),
        created_at: Set(day(0)),
    }
    .insert(db)
    .await
    .expect("insert user");
    id
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct NewProject<'a> {
    pub organization_id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub budget: i32,
    pub created_at: DateTime<Utc>,
    pub deleted: bool,
}

#[allow(dead_code)]
pub async fn seed_project(db: &DatabaseConnection, project: NewProject<'_>) -> Uuid {
    let id = Uuid::new_v4();
    project_entity::ActiveModel {
        id: Set(id),
        organization_id: Set(project.organization_id),
        owner_id: Set(project.owner_id),
        name: Set(project.name.to_string()),
        description: Set(None),
        budget: Set(project.budget),
        archived: Set(false),
        settings: Set(serde_json::json!({"theme": "dark"})),
        deleted: Set(project.deleted),
        created_at: Set(project.created_at),
    }
    .insert(db)
    .await
    .expect("insert project");
    id
}

#[allow(dead_code)]
pub async fn seed_chat(db: &DatabaseConnection, project_id: Uuid, title: &str) -> Uuid {
    let id = Uuid::new_v4();
    chat_entity::ActiveModel {
        id: Set(id),
        project_id: Set(project_id),
        title: Set(title.to_string()),
        created_at: Set(day(0)),
    }
    .insert(db)
    .await
    .expect("insert chat");
    id
}

#[allow(dead_code)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateTenantTables)]
    }
}

pub struct CreateTenantTables;

#[async_trait::async_trait]
impl MigrationName for CreateTenantTables {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_tenant_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateTenantTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Organizations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Organizations::Name).text().not_null())
                    .col(
                        ColumnDef::new(Organizations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Users::FirstName).text().not_null())
                    .col(ColumnDef::new(Users::LastName).text().not_null())
                    .col(ColumnDef::new(Users::Email).text().not_null())
                    .col(ColumnDef::new(Users::Password).text().not_null())
                    .col(ColumnDef::new(Users::TokenHash).text().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Projects::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Projects::Name).text().not_null())
                    .col(ColumnDef::new(Projects::Description).text().null())
                    .col(ColumnDef::new(Projects::Budget).integer().not_null())
                    .col(
                        ColumnDef::new(Projects::Archived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Projects::Settings).json().not_null())
                    .col(
                        ColumnDef::new(Projects::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Chats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Chats::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Chats::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Chats::Title).text().not_null())
                    .col(
                        ColumnDef::new(Chats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Chats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    OrganizationId,
    FirstName,
    LastName,
    Email,
    Password,
    TokenHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    OrganizationId,
    OwnerId,
    Name,
    Description,
    Budget,
    Archived,
    Settings,
    Deleted,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Chats {
    Table,
    Id,
    ProjectId,
    Title,
    CreatedAt,
}
