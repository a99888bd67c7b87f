//! Declarative template definitions and binding files.
//!
//! A [`TemplateDefinition`] is a template written as data (JSON): metadata,
//! terms, placeholders, and statements, with names written either as
//! `prefix:local`, as absolute IRIs, or as bare names under the definition's
//! `base`. [`TemplateDefinition::build`] replays it through a [`Session`] so
//! the same checks apply as for hand-written authoring code.
//!
//! ```json
//! {
//!   "base": "https://w3id.org/np/RAScientificPaperTemplate#",
//!   "prefixes": { "fabio": "http://purl.org/spar/fabio/" },
//!   "label": "Scientific paper",
//!   "terms": [{ "id": "rdf:type", "label": "is a" },
//!             { "id": "fabio:ScholarlyWork", "label": "scholarly work" }],
//!   "placeholders": [{ "id": "paper", "kind": "external-resource", "label": "DOI" }],
//!   "statements": [{ "subject": "paper", "predicate": "rdf:type",
//!                    "object": "fabio:ScholarlyWork" }]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::Bindings;
use crate::error::{DefinitionError, InstantiationError};
use crate::placeholder::{is_absolute_iri, Constraints, Datatype, Placeholder, PlaceholderKind};
use crate::rdf::Node;
use crate::statement::Modifiers;
use crate::template::{Session, Template, TemplateMetadata};
use crate::term::Term;
use crate::vocab;

/// A whole template as data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDefinition {
    /// Namespace of placeholder and statement ids. The template id is
    /// `<base>assertion`.
    pub base: String,
    /// Extra prefixes on top of [`vocab::STANDARD_PREFIXES`].
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub target_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_pattern: Option<String>,
    #[serde(default)]
    pub terms: Vec<Term>,
    pub placeholders: Vec<PlaceholderDefinition>,
    pub statements: Vec<StatementDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderDefinition {
    pub id: String,
    pub kind: PlaceholderKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<AllowedValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_label: Option<String>,
}

/// An allowed value. A bare string is an IRI when it expands to one and a
/// plain literal otherwise; `{"literal": "..."}` forces a literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedValue {
    Text(String),
    Literal { literal: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementDefinition {
    /// Statement id; minted as `<base>stNN` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub repeatable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl TemplateDefinition {
    pub fn template_id(&self) -> String {
        format!("{}assertion", self.base)
    }

    /// Expand a name: `prefix:local` for a known prefix, an absolute IRI
    /// as is, anything else under `base`.
    pub fn expand(&self, name: &str) -> String {
        if let Some((prefix, local)) = name.split_once(':') {
            let ns = self.prefixes.get(prefix).map(String::as_str).or_else(|| {
                vocab::STANDARD_PREFIXES
                    .iter()
                    .find(|(p, _)| *p == prefix)
                    .map(|(_, ns)| *ns)
            });
            return match ns {
                Some(ns) => format!("{ns}{local}"),
                None => name.to_string(),
            };
        }
        format!("{}{name}", self.base)
    }

    /// Build the template through an authoring session.
    pub fn build(&self) -> Result<Template, DefinitionError> {
        let mut session = Session::new(self.base.clone());

        for term in &self.terms {
            session.register_term(self.expand(&term.id), term.label.clone())?;
        }

        for def in &self.placeholders {
            session.declare(self.placeholder(def)?)?;
        }

        for def in &self.statements {
            let modifiers = Modifiers {
                optional: def.optional,
                repeatable: def.repeatable,
            };
            let subject = self.expand(&def.subject);
            let predicate = self.expand(&def.predicate);
            let object = self.expand(&def.object);
            let condition = def.condition.as_deref().map(|c| self.expand(c));
            match &def.id {
                Some(id) => session.define_statement_with_id(
                    self.expand(id),
                    &subject,
                    &predicate,
                    &object,
                    modifiers,
                    condition.as_deref(),
                )?,
                None => session.define_statement(
                    &subject,
                    &predicate,
                    &object,
                    modifiers,
                    condition.as_deref(),
                )?,
            };
        }

        let mut metadata = TemplateMetadata::new(self.template_id(), self.label.clone())
            .description(self.description.clone());
        metadata.tags = self.tags.clone();
        metadata.target_types = self.target_types.iter().map(|t| self.expand(t)).collect();
        metadata.label_pattern = self.label_pattern.clone();

        session.assemble(metadata)
    }

    fn placeholder(&self, def: &PlaceholderDefinition) -> Result<Placeholder, DefinitionError> {
        let constraints = Constraints {
            regex: def.regex.clone(),
            datatype: def
                .datatype
                .as_deref()
                .map(|dt| Datatype::from_iri(&self.expand(dt))),
            allowed_values: def
                .allowed_values
                .iter()
                .map(|v| match v {
                    AllowedValue::Literal { literal } => Node::literal(literal.clone()),
                    AllowedValue::Text(text) if text.contains(':') => {
                        let expanded = self.expand(text);
                        if is_absolute_iri(&expanded) {
                            Node::iri(expanded)
                        } else {
                            Node::literal(text.clone())
                        }
                    }
                    AllowedValue::Text(text) => Node::literal(text.clone()),
                })
                .collect(),
            value_sources: def.value_sources.clone(),
            prefix: def.prefix.clone(),
            prefix_label: def.prefix_label.clone(),
        };
        Placeholder::new(self.expand(&def.id), def.kind, def.label.clone(), constraints)
    }
}

/// Binding input as data: placeholder name to one value or a list, plus
/// the optional statements to leave out.
///
/// Names are placeholder (or statement) ids or their local names.
///
/// ```json
/// { "bindings": { "paper": "https://doi.org/10.1000/1", "keyword": ["rdf", "templates"] },
///   "omit": ["st03"] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingsFile {
    #[serde(default)]
    pub bindings: BTreeMap<String, BindingValue>,
    #[serde(default)]
    pub omit: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingValue {
    One(String),
    Many(Vec<String>),
}

impl BindingsFile {
    /// Resolve names against `template` and build [`Bindings`].
    pub fn into_bindings(self, template: &Template) -> Result<Bindings, InstantiationError> {
        let mut bindings = Bindings::new();
        for (name, value) in self.bindings {
            let id = template
                .placeholders()
                .iter()
                .find(|p| p.id() == name || p.name() == name)
                .map(|p| p.id().to_string())
                .ok_or(InstantiationError::UndeclaredPlaceholder(name))?;
            bindings = match value {
                BindingValue::One(v) => bindings.bind(id, v),
                BindingValue::Many(vs) => bindings.bind_all(id, vs),
            };
        }
        for name in self.omit {
            let id = template
                .statements()
                .iter()
                .find(|s| s.id == name || vocab::local_name(&s.id) == name)
                .map(|s| s.id.clone())
                .ok_or_else(|| InstantiationError::InvalidOmission {
                    statement: name.clone(),
                    reason: "the template has no such statement".into(),
                })?;
            bindings = bindings.omit(id);
        }
        Ok(bindings)
    }
}

// --- tests -------------------------------------------------------------------
