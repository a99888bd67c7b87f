use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;

/// A fixed vocabulary identifier (class or predicate) with its
/// human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub label: String,
}

impl Term {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The vocabulary terms of one authoring session.
///
/// Terms are write-once: registering the same id with the same label again is
/// a no-op, with a different label it is a [`DefinitionError::DuplicateLabelConflict`].
/// Iteration follows registration order, which is the order term labels are
/// written to the exchange format.
#[derive(Debug, Clone, Default)]
pub struct TermRegistry {
    terms: Vec<Term>,
    index: HashMap<String, usize>,
}

impl TermRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from terms, failing on the first label conflict.
    pub fn from_terms(iter: impl IntoIterator<Item = Term>) -> Result<Self, DefinitionError> {
        let mut registry = Self::new();
        for term in iter {
            registry.register(term)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, term: Term) -> Result<(), DefinitionError> {
        if let Some(&i) = self.index.get(&term.id) {
            let existing = &self.terms[i];
            if existing.label == term.label {
                return Ok(());
            }
            return Err(DefinitionError::DuplicateLabelConflict {
                id: term.id,
                existing: existing.label.clone(),
                attempted: term.label,
            });
        }
        self.index.insert(term.id.clone(), self.terms.len());
        self.terms.push(term);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<&Term> {
        self.index.get(id).map(|&i| &self.terms[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }
}
