//! Searchable column allow-list and multi-column criteria.
//!
//! # Responsibility
//! - Map user-entered column names onto the fixed table schema.
//! - Hold ordered `(column, term)` pairs combined with logical AND.
//!
//! # Invariants
//! - Only `SearchField` values reach SQL as identifiers.
//! - A field appears at most once in a `SearchCriteria`.

use std::fmt::{Display, Formatter};

/// One column of `travel_expenses` that can be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    RefNumber,
    DisclosureGroup,
    TitleEn,
    TitleFr,
    Name,
    PurposeEn,
}

impl SearchField {
    /// All searchable columns in schema order.
    pub const ALL: [SearchField; 6] = [
        SearchField::RefNumber,
        SearchField::DisclosureGroup,
        SearchField::TitleEn,
        SearchField::TitleFr,
        SearchField::Name,
        SearchField::PurposeEn,
    ];

    /// Parses a column name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for names outside the schema.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.column() == normalized)
    }

    /// Literal SQL column identifier.
    pub fn column(self) -> &'static str {
        match self {
            Self::RefNumber => "ref_number",
            Self::DisclosureGroup => "disclosure_group",
            Self::TitleEn => "title_en",
            Self::TitleFr => "title_fr",
            Self::Name => "name",
            Self::PurposeEn => "purpose_en",
        }
    }
}

impl Display for SearchField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Substring conditions over one or more columns, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    terms: Vec<(SearchField, String)>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition; a repeated field replaces its earlier term.
    pub fn with(mut self, field: SearchField, term: impl Into<String>) -> Self {
        self.insert(field, term);
        self
    }

    /// Adds a condition in place; a repeated field replaces its earlier term.
    pub fn insert(&mut self, field: SearchField, term: impl Into<String>) {
        let term = term.into();
        match self.terms.iter_mut().find(|(existing, _)| *existing == field) {
            Some(slot) => slot.1 = term,
            None => self.terms.push((field, term)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Conditions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SearchField, &str)> {
        self.terms.iter().map(|(field, term)| (*field, term.as_str()))
    }
}
