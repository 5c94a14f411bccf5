//! Static per-entity field schemas and the registry that holds them.
//!
//! A schema maps lower-cased field names to accessor functions, so lookups
//! stay case-insensitive and tolerant of unknown names without any runtime
//! type introspection. Schemas are built once at startup and only read after.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::value::FieldValue;

/// Reads one field out of an entity.
pub type Accessor<T> = fn(&T) -> FieldValue;

/// A declared field: canonical name plus accessor.
pub struct FieldDef<T> {
    name: &'static str,
    accessor: Accessor<T>,
}

impl<T> FieldDef<T> {
    /// Declared (canonical) casing of the field name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn read(&self, entity: &T) -> FieldValue {
        (self.accessor)(entity)
    }
}

impl<T> Clone for FieldDef<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            accessor: self.accessor,
        }
    }
}

impl<T> fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldDef").field(&self.name).finish()
    }
}

/// Field schema of one entity type.
pub struct EntitySchema<T> {
    entity: &'static str,
    fields: Vec<FieldDef<T>>,
    by_lower: HashMap<String, usize>,
    identifier: usize,
}

impl<T> EntitySchema<T> {
    pub fn builder(entity: &'static str) -> EntitySchemaBuilder<T> {
        EntitySchemaBuilder {
            entity,
            fields: Vec::new(),
            identifier: None,
        }
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldDef<T>] {
        &self.fields
    }

    /// The field that is always present in shaped output.
    pub fn identifier(&self) -> &FieldDef<T> {
        &self.fields[self.identifier]
    }

    /// Case-insensitive lookup; `None` for names the entity does not declare.
    pub fn resolve(&self, name: &str) -> Option<&FieldDef<T>> {
        self.by_lower
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.fields[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

impl<T> fmt::Debug for EntitySchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySchema")
            .field("entity", &self.entity)
            .field("fields", &self.fields)
            .field("identifier", &self.identifier().name)
            .finish()
    }
}

pub struct EntitySchemaBuilder<T> {
    entity: &'static str,
    fields: Vec<FieldDef<T>>,
    identifier: Option<usize>,
}

impl<T> EntitySchemaBuilder<T> {
    /// Declare the identifier field. Declaring it twice keeps the last one.
    pub fn id(mut self, name: &'static str, accessor: Accessor<T>) -> Self {
        self.identifier = Some(self.fields.len());
        self.fields.push(FieldDef { name, accessor });
        self
    }

    pub fn field(mut self, name: &'static str, accessor: Accessor<T>) -> Self {
        self.fields.push(FieldDef { name, accessor });
        self
    }

    pub fn build(self) -> Result<EntitySchema<T>> {
        let identifier = self.identifier.ok_or(Error::MissingIdentifier {
            entity: self.entity,
        })?;

        let mut by_lower = HashMap::with_capacity(self.fields.len());
        for (idx, field) in self.fields.iter().enumerate() {
            if by_lower.insert(field.name.to_lowercase(), idx).is_some() {
                return Err(Error::DuplicateField {
                    entity: self.entity,
                    field: field.name.to_string(),
                });
            }
        }

        Ok(EntitySchema {
            entity: self.entity,
            fields: self.fields,
            by_lower,
            identifier,
        })
    }
}

/// Registry key: identity is the `TypeId`, the name is kept for messages.
#[derive(Clone, Copy)]
struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    #[inline]
    fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type Boxed = Box<dyn Any + Send + Sync>;

/// Read-only registry of entity schemas keyed by entity type.
///
/// Populated once through [`SchemaRegistryBuilder`] and then shared by
/// reference (usually behind an `Arc`) with every request handler. No locks:
/// nothing is inserted after `build()`.
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: HashMap<TypeKey, Boxed>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    pub fn get<T: 'static>(&self) -> Result<&EntitySchema<T>> {
        let key = TypeKey::of::<T>();
        self.schemas
            .get(&key)
            .and_then(|boxed| boxed.downcast_ref::<EntitySchema<T>>())
            .ok_or(Error::SchemaNotFound(key.name))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.schemas.keys()).finish()
    }
}

#[derive(Default)]
pub struct SchemaRegistryBuilder {
    schemas: HashMap<TypeKey, Boxed>,
}

impl SchemaRegistryBuilder {
    pub fn register<T: 'static>(mut self, schema: EntitySchema<T>) -> Result<Self> {
        let key = TypeKey::of::<T>();
        if self.schemas.contains_key(&key) {
            return Err(Error::DuplicateSchema(key.name));
        }
        self.schemas.insert(key, Box::new(schema));
        Ok(self)
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}
