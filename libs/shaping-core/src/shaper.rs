//! Projection of entities onto a per-request subset of their fields.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::fields::FieldSelection;
use crate::schema::EntitySchema;
use crate::value::FieldValue;

/// Ordered `field name -> value` record produced by shaping one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapedRecord {
    entries: Vec<(&'static str, FieldValue)>,
}

impl ShapedRecord {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace the value stored under `name`.
    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ShapedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Shape a single entity.
pub fn shape_one<T>(entity: &T, selection: &FieldSelection<'_, T>) -> ShapedRecord {
    let mut record = ShapedRecord::with_capacity(selection.len());
    for field in selection.fields() {
        record.insert(field.name(), field.read(entity));
    }
    record
}

/// Shape every entity with the same, already resolved, selection.
pub fn shape<'a, T, I>(entities: I, selection: &FieldSelection<'_, T>) -> Vec<ShapedRecord>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
{
    entities
        .into_iter()
        .map(|entity| shape_one(entity, selection))
        .collect()
}

/// Resolve `field_spec` against `schema` and shape `entities` with it.
pub fn shape_fields<T>(
    entities: &[T],
    field_spec: Option<&str>,
    schema: &EntitySchema<T>,
) -> Vec<ShapedRecord> {
    let selection = FieldSelection::resolve(field_spec, schema);
    shape(entities, &selection)
}

/// Single-entity counterpart of [`shape_fields`].
pub fn shape_one_fields<T>(
    entity: &T,
    field_spec: Option<&str>,
    schema: &EntitySchema<T>,
) -> ShapedRecord {
    let selection = FieldSelection::resolve(field_spec, schema);
    shape_one(entity, &selection)
}
