//! One templated triple plus the rules for when it is realized.

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::placeholder::{Placeholder, PlaceholderKind};
use crate::term::TermRegistry;
use crate::vocab;

/// A position of a statement: either a fixed vocabulary term or a
/// placeholder filled in at instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Slot {
    Term(String),
    Placeholder(String),
}

impl Slot {
    pub fn id(&self) -> &str {
        match self {
            Slot::Term(id) | Slot::Placeholder(id) => id,
        }
    }

    pub fn as_placeholder(&self) -> Option<&str> {
        match self {
            Slot::Placeholder(id) => Some(id),
            Slot::Term(_) => None,
        }
    }
}

/// Inclusion modifiers. Neither flag set means the statement is mandatory
/// and realized exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub repeatable: bool,
}

impl Modifiers {
    pub const MANDATORY: Modifiers = Modifiers {
        optional: false,
        repeatable: false,
    };
    pub const OPTIONAL: Modifiers = Modifiers {
        optional: true,
        repeatable: false,
    };
    pub const REPEATABLE: Modifiers = Modifiers {
        optional: false,
        repeatable: true,
    };
    pub const OPTIONAL_REPEATABLE: Modifiers = Modifiers {
        optional: true,
        repeatable: true,
    };

    pub fn is_mandatory(self) -> bool {
        !self.optional && !self.repeatable
    }
}

/// A templated triple.
///
/// Statements are produced by [`Session::define_statement`](crate::Session::define_statement)
/// or parsed from the exchange format; both paths resolve every slot, so a
/// slot is never a bare string of unknown meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: String,
    pub subject: Slot,
    pub predicate: Slot,
    pub object: Slot,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Placeholder whose bound value gates this statement. Consumed at
    /// instantiation, never asserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Statement {
    pub fn slots(&self) -> [&Slot; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// Distinct placeholder ids in subject, predicate, object order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(3);
        for id in self.slots().into_iter().filter_map(Slot::as_placeholder) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Check references against the registered terms and declared
    /// placeholders of a session.
    pub(crate) fn check<'a>(
        &self,
        terms: &TermRegistry,
        placeholder: impl Fn(&str) -> Option<&'a Placeholder>,
    ) -> Result<(), DefinitionError> {
        for (position, slot) in ["subject", "predicate", "object"].into_iter().zip(self.slots()) {
            match slot {
                Slot::Term(id) => {
                    if !terms.contains(id) {
                        return Err(DefinitionError::UnknownTerm {
                            referenced_by: format!("statement {:?}", self.id),
                            term: id.clone(),
                        });
                    }
                }
                Slot::Placeholder(id) => {
                    let p = placeholder(id).ok_or_else(|| {
                        DefinitionError::DanglingPlaceholderReference {
                            referenced_by: format!("statement {:?}", self.id),
                            placeholder: id.clone(),
                        }
                    })?;
                    if position != "object" && p.kind() == PlaceholderKind::Literal {
                        return Err(DefinitionError::InvalidConstraintCombination {
                            placeholder: id.clone(),
                            reason: format!(
                                "a literal placeholder cannot be the {position} of statement {:?}",
                                self.id
                            ),
                        });
                    }
                }
            }
        }

        if let Slot::Term(predicate) = &self.predicate {
            if vocab::is_reserved_predicate(predicate) {
                return Err(DefinitionError::ReservedPredicate {
                    statement: self.id.clone(),
                    predicate: predicate.clone(),
                });
            }
        }

        if let Some(condition) = &self.condition {
            if placeholder(condition).is_none() {
                return Err(DefinitionError::DanglingPlaceholderReference {
                    referenced_by: format!("condition of statement {:?}", self.id),
                    placeholder: condition.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Whether an activation condition holds for the condition placeholder's
/// first bound value. Unbound is false.
pub fn condition_holds(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true" | "1"))
}

// --- tests -------------------------------------------------------------------
