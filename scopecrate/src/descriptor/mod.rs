//! # Entity Descriptors
//!
//! A descriptor is the static, per-entity-type schema the filter compiler works
//! against: which native columns exist and what kind of value they hold, which
//! columns must never be searched, which to-one relations can be traversed, how
//! rows are ordered by default and how a row belongs to a tenant.
//!
//! Descriptors are derived from Sea-ORM column metadata once at startup and are
//! never mutated afterwards. See [`EntityRegistry`] for validation.

pub mod lookup;
pub mod registry;

use std::collections::BTreeSet;

use sea_orm::{
    ColumnTrait, ColumnType, EntityName, EntityTrait, IdenStatic, Iterable, PrimaryKeyToColumn,
};

pub use lookup::{LookupTarget, RelatedLookupFn, identifier_lookup};
pub use registry::{EntityRegistry, RegistryBuilder};

/// Columns that are never searchable on any entity.
pub const DEFAULT_DENYLIST: &[&str] = &["password", "token_hash"];

/// Order column used when an entity doesn't declare one and has this field.
pub const FALLBACK_ORDER_FIELD: &str = "created_at";

/// Scalar kind of a native field. Drives value coercion in the predicate compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Timestamp,
    Json,
    Uuid,
}

impl FieldKind {
    /// Map a Sea-ORM column type onto a filterable kind.
    ///
    /// Returns `None` for column types the filter language can't address
    /// (binary blobs, arrays, network types, custom types).
    #[must_use]
    pub fn from_column_type(column_type: &ColumnType) -> Option<Self> {
        match column_type {
            ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => Some(Self::String),
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned
            | ColumnType::Float
            | ColumnType::Double
            | ColumnType::Decimal(_) => Some(Self::Number),
            ColumnType::Boolean => Some(Self::Boolean),
            ColumnType::DateTime
            | ColumnType::Timestamp
            | ColumnType::TimestampWithTimeZone
            | ColumnType::Date => Some(Self::Timestamp),
            ColumnType::Json | ColumnType::JsonBinary => Some(Self::Json),
            ColumnType::Uuid => Some(Self::Uuid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

/// A one-level, to-one relation. Joined on `{name}_id = foreign.id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationField {
    pub name: String,
    pub foreign_entity: String,
}

impl RelationField {
    /// The local column holding the foreign identifier.
    #[must_use]
    pub fn join_key(&self) -> String {
        format!("{}_id", self.name)
    }
}

/// How rows of an entity belong to a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// The entity carries the tenant identifier in `tenant_field`.
    Direct { tenant_field: String },
    /// The entity belongs to the tenant of the entity reached through `relation`.
    Via { relation: String },
    /// The entity *is* the tenant; its identifier is the tenant identifier.
    TenantRoot,
}

/// Static schema metadata for one entity type.
#[derive(Clone)]
pub struct EntityDescriptor {
    entity_type: String,
    table: String,
    id_field: String,
    fields: Vec<FieldDef>,
    denied: BTreeSet<String>,
    relations: Vec<RelationField>,
    default_order: Option<String>,
    ownership: Option<Ownership>,
    soft_delete: Option<String>,
    related_lookup: RelatedLookupFn,
}

impl std::fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("entity_type", &self.entity_type)
            .field("table", &self.table)
            .field("id_field", &self.id_field)
            .field("fields", &self.fields)
            .field("denied", &self.denied)
            .field("relations", &self.relations)
            .field("default_order", &self.default_order)
            .field("ownership", &self.ownership)
            .field("soft_delete", &self.soft_delete)
            .finish_non_exhaustive()
    }
}

impl EntityDescriptor {
    /// Start a descriptor by hand. Mostly useful in tests; entities normally go
    /// through [`EntityDescriptor::from_entity`].
    pub fn new(
        entity_type: impl Into<String>,
        table: impl Into<String>,
        id_field: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            table: table.into(),
            id_field: id_field.into(),
            fields: Vec::new(),
            denied: DEFAULT_DENYLIST.iter().map(|f| (*f).to_string()).collect(),
            relations: Vec::new(),
            default_order: None,
            ownership: None,
            soft_delete: None,
            related_lookup: identifier_lookup,
        }
    }

    /// Build a descriptor from a Sea-ORM entity's column metadata.
    ///
    /// Every column whose type maps to a [`FieldKind`] becomes a native field,
    /// in declaration order. The first primary key column is the identifier.
    #[must_use]
    pub fn from_entity<E: EntityTrait>(entity_type: impl Into<String>) -> Self {
        let table = E::default().table_name().to_owned();
        let id_field = E::PrimaryKey::iter()
            .next()
            .map_or_else(|| "id".to_string(), |pk| pk.into_column().as_str().to_string());

        let mut descriptor = Self::new(entity_type, table, id_field);
        for column in E::Column::iter() {
            if let Some(kind) = FieldKind::from_column_type(column.def().get_column_type()) {
                descriptor = descriptor.field(column.as_str(), kind);
            }
        }
        descriptor
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        self.fields.retain(|f| f.name != name);
        self.fields.push(FieldDef { name, kind });
        self
    }

    /// Never allow filtering on `name`.
    #[must_use]
    pub fn deny(mut self, name: impl Into<String>) -> Self {
        self.denied.insert(name.into());
        self
    }

    /// Declare a to-one relation to `foreign_entity`, joined through `{name}_id`.
    #[must_use]
    pub fn relation(mut self, name: impl Into<String>, foreign_entity: impl Into<String>) -> Self {
        self.relations.push(RelationField {
            name: name.into(),
            foreign_entity: foreign_entity.into(),
        });
        self
    }

    #[must_use]
    pub fn order_by_default(mut self, name: impl Into<String>) -> Self {
        self.default_order = Some(name.into());
        self
    }

    #[must_use]
    pub fn owned_directly(mut self, tenant_field: impl Into<String>) -> Self {
        self.ownership = Some(Ownership::Direct {
            tenant_field: tenant_field.into(),
        });
        self
    }

    #[must_use]
    pub fn owned_via(mut self, relation: impl Into<String>) -> Self {
        self.ownership = Some(Ownership::Via {
            relation: relation.into(),
        });
        self
    }

    #[must_use]
    pub fn tenant_root(mut self) -> Self {
        self.ownership = Some(Ownership::TenantRoot);
        self
    }

    /// Rows with `name = true` are treated as deleted and never listed.
    #[must_use]
    pub fn soft_delete(mut self, name: impl Into<String>) -> Self {
        self.soft_delete = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_related_lookup(mut self, lookup: RelatedLookupFn) -> Self {
        self.related_lookup = lookup;
        self
    }

    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    #[must_use]
    pub fn relations(&self) -> &[RelationField] {
        &self.relations
    }

    #[must_use]
    pub fn ownership(&self) -> Option<&Ownership> {
        self.ownership.as_ref()
    }

    #[must_use]
    pub fn soft_delete_field(&self) -> Option<&str> {
        self.soft_delete.as_deref()
    }

    #[must_use]
    pub fn related_lookup(&self) -> RelatedLookupFn {
        self.related_lookup
    }

    #[must_use]
    pub fn native_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn relation_field(&self, name: &str) -> Option<&RelationField> {
        self.relations.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn is_denied(&self, name: &str) -> bool {
        self.denied.contains(name)
    }

    /// The field rows are ordered by when the request names none (or an invalid one).
    ///
    /// Declared default first, then `created_at` if present, then the identifier.
    #[must_use]
    pub fn default_order_field(&self) -> &str {
        if let Some(field) = &self.default_order {
            return field;
        }
        if self.native_field(FALLBACK_ORDER_FIELD).is_some() {
            return FALLBACK_ORDER_FIELD;
        }
        &self.id_field
    }

    pub(crate) fn declared_default_order(&self) -> Option<&str> {
        self.default_order.as_deref()
    }
}
