use std::fmt;

use crate::schema::{EntitySchema, FieldDef};

/// The set of fields to keep when shaping entities of one type.
///
/// Resolve once per request and reuse it for every entity of the result.
/// The schema's identifier is always part of the selection.
pub struct FieldSelection<'s, T> {
    fields: Vec<&'s FieldDef<T>>,
    all: bool,
    unresolved: Vec<String>,
}

impl<'s, T> FieldSelection<'s, T> {
    /// Every declared field, in declaration order.
    pub fn all(schema: &'s EntitySchema<T>) -> Self {
        Self {
            fields: schema.fields().iter().collect(),
            all: true,
            unresolved: Vec::new(),
        }
    }

    /// Resolve a comma-separated field spec. A missing or blank spec selects
    /// all fields; otherwise requested order is kept, unknown names are
    /// skipped and the identifier is appended when it was not requested.
    pub fn resolve(field_spec: Option<&str>, schema: &'s EntitySchema<T>) -> Self {
        let tokens: Vec<&str> = field_spec
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return Self::all(schema);
        }

        let mut selection = Self {
            fields: Vec::with_capacity(tokens.len() + 1),
            all: false,
            unresolved: Vec::new(),
        };

        for token in tokens {
            match schema.resolve(token) {
                Some(field) => selection.push(field),
                None => selection.unresolved.push(token.to_string()),
            }
        }
        selection.push(schema.identifier());

        selection
    }

    fn push(&mut self, field: &'s FieldDef<T>) {
        if !self.contains(field.name()) {
            self.fields.push(field);
        }
    }

    pub fn fields(&self) -> &[&'s FieldDef<T>] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// True when no field spec narrowed the selection.
    pub fn is_all(&self) -> bool {
        self.all
    }

    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> Clone for FieldSelection<'_, T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            all: self.all,
            unresolved: self.unresolved.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldSelection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSelection")
            .field("fields", &self.names().collect::<Vec<_>>())
            .field("all", &self.all)
            .field("unresolved", &self.unresolved)
            .finish()
    }
}
