use std::fmt;

use crate::schema::EntitySchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }

    /// Direction of one sort token: descending iff the token has a trailing
    /// word equal to `desc` or `descending` (case-insensitive).
    fn of_token(token: &str) -> Self {
        let mut words = token.split_whitespace();
        words.next();
        match words.last() {
            Some(w) if w.eq_ignore_ascii_case("desc") || w.eq_ignore_ascii_case("descending") => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved `(field, direction)` pair. `field` is the declared casing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderClause {
    pub field: &'static str,
    pub direction: SortDirection,
}

/// Normalized, validated ordering over an entity's declared fields.
///
/// `Display` renders the canonical form `"Age descending, Name ascending"`;
/// an empty expression renders as the empty string.
#[derive(Clone, Debug, Default)]
pub struct OrderExpression {
    clauses: Vec<OrderClause>,
    unresolved: Vec<String>,
}

impl OrderExpression {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a comma-separated sort spec against `schema`.
    ///
    /// Tokens naming unknown fields are dropped (and remembered in
    /// [`unresolved`](Self::unresolved)); repeated fields keep their first
    /// occurrence.
    pub fn parse<T>(sort_spec: &str, schema: &EntitySchema<T>) -> Self {
        let mut expr = Self::empty();

        for token in sort_spec.split(',').map(str::trim) {
            if token.is_empty() {
                continue;
            }
            let candidate = token.split_whitespace().next().unwrap_or(token);
            let Some(field) = schema.resolve(candidate) else {
                expr.unresolved.push(candidate.to_string());
                continue;
            };
            if expr.contains(field.name()) {
                continue;
            }
            expr.clauses.push(OrderClause {
                field: field.name(),
                direction: SortDirection::of_token(token),
            });
        }

        expr
    }

    pub fn clauses(&self) -> &[OrderClause] {
        &self.clauses
    }

    /// Candidate names from the sort spec that matched no declared field.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.clauses
            .iter()
            .any(|c| c.field.eq_ignore_ascii_case(field))
    }

    /// Use `field` as the whole ordering when nothing resolved.
    pub fn with_fallback(mut self, field: &'static str, direction: SortDirection) -> Self {
        if self.clauses.is_empty() {
            self.clauses.push(OrderClause { field, direction });
        }
        self
    }

    /// Append `field` as a final sort key unless it is already present, so
    /// that rows with equal leading keys keep a stable order between pages.
    pub fn ensure_tiebreaker(mut self, field: &'static str, direction: SortDirection) -> Self {
        if !self.contains(field) {
            self.clauses.push(OrderClause { field, direction });
        }
        self
    }
}

/// Equivalence ignores the unresolved-token side list.
impl PartialEq for OrderExpression {
    fn eq(&self, other: &Self) -> bool {
        self.clauses == other.clauses
    }
}

impl Eq for OrderExpression {}

impl fmt::Display for OrderExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", clause.field, clause.direction)?;
        }
        Ok(())
    }
}

/// Build the normalized order expression for `sort_spec`. A missing spec
/// yields an empty expression; callers pick their own default order.
pub fn build_order_expression<T>(sort_spec: Option<&str>, schema: &EntitySchema<T>) -> OrderExpression {
    match sort_spec {
        Some(spec) => OrderExpression::parse(spec, schema),
        None => OrderExpression::empty(),
    }
}
