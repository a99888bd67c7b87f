//! Template assembly and the authoring session.
//!
//! [`assemble`] is the only way to obtain a [`Template`]: it folds metadata,
//! placeholder declarations, and statements into one immutable value after
//! checking that every reference resolves. [`Session`] is the incremental
//! front end to it, owning the term registry and the placeholder
//! declarations of one authoring run.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::DefinitionError;
use crate::placeholder::{Constraints, Placeholder, PlaceholderKind};
use crate::statement::{Modifiers, Slot, Statement};
use crate::term::{Term, TermRegistry};

/// Template-level metadata supplied by the author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Term ids classifying the documents this template produces.
    #[serde(default)]
    pub target_types: Vec<String>,
    /// Document label with `${name}` markers naming placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_pattern: Option<String>,
}

impl TemplateMetadata {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn target_type(mut self, term: impl Into<String>) -> Self {
        self.target_types.push(term.into());
        self
    }

    pub fn label_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.label_pattern = Some(pattern.into());
        self
    }
}

/// An assembled, immutable template.
///
/// Equality compares every field, including full placeholder definitions.
#[derive(Debug, Clone)]
pub struct Template {
    id: String,
    label: String,
    description: String,
    tags: Vec<String>,
    target_types: Vec<String>,
    label_pattern: Option<String>,
    terms: Vec<Term>,
    placeholders: Vec<Placeholder>,
    statements: Vec<Statement>,
}

impl Template {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn target_types(&self) -> &[String] {
        &self.target_types
    }

    pub fn label_pattern(&self) -> Option<&str> {
        self.label_pattern.as_deref()
    }

    /// Every term registered when the template was assembled.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn placeholder(&self, id: &str) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.id() == id)
    }

    pub fn statement(&self, id: &str) -> Option<&Statement> {
        self.statements.iter().find(|s| s.id == id)
    }

    pub fn term_label(&self, id: &str) -> Option<&str> {
        self.terms.iter().find(|t| t.id == id).map(|t| t.label.as_str())
    }

    /// The placeholder marking the concept a document introduces, if any.
    pub fn introduced_placeholder(&self) -> Option<&Placeholder> {
        self.placeholders
            .iter()
            .find(|p| p.kind() == PlaceholderKind::IntroducedResource)
    }

    /// Substitute `${name}` markers of the label pattern. Markers `value_of`
    /// cannot fill are replaced by the empty string.
    pub fn render_label(
        &self,
        value_of: impl Fn(&Placeholder) -> Option<String>,
    ) -> Option<String> {
        let pattern = self.label_pattern.as_deref()?;
        let rendered = LABEL_MARKER_RE.replace_all(pattern, |caps: &regex::Captures<'_>| {
            self.placeholders
                .iter()
                .find(|p| p.name() == &caps[1])
                .and_then(&value_of)
                .unwrap_or_default()
        });
        Some(rendered.trim().to_string())
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.label == other.label
            && self.description == other.description
            && self.tags == other.tags
            && self.target_types == other.target_types
            && self.label_pattern == other.label_pattern
            && self.terms == other.terms
            && self.statements == other.statements
            && self.placeholders.len() == other.placeholders.len()
            && self
                .placeholders
                .iter()
                .zip(&other.placeholders)
                .all(|(a, b)| a.same_definition(b))
    }
}

/// Fold metadata, placeholders, and statements into a [`Template`].
///
/// Pure and deterministic: identical inputs give equal templates, and the
/// registry is only read. Statement order is kept as given.
pub fn assemble(
    terms: &TermRegistry,
    metadata: TemplateMetadata,
    placeholders: Vec<Placeholder>,
    statements: Vec<Statement>,
) -> Result<Template, DefinitionError> {
    if statements.is_empty() {
        return Err(DefinitionError::EmptyTemplate);
    }

    let mut declared: Vec<Placeholder> = Vec::with_capacity(placeholders.len());
    for p in placeholders {
        match declared.iter().find(|d| d.id() == p.id()) {
            Some(existing) if existing.same_definition(&p) => {}
            Some(_) => return Err(DefinitionError::DuplicatePlaceholder(p.id().to_string())),
            None => declared.push(p),
        }
    }

    let mut introduced = declared
        .iter()
        .filter(|p| p.kind() == PlaceholderKind::IntroducedResource);
    if let (Some(first), Some(second)) = (introduced.next(), introduced.next()) {
        return Err(DefinitionError::MultipleIntroducedResources {
            first: first.id().to_string(),
            second: second.id().to_string(),
        });
    }

    let mut seen = HashSet::new();
    for st in &statements {
        if !seen.insert(st.id.as_str()) {
            return Err(DefinitionError::DuplicateStatement(st.id.clone()));
        }
        st.check(terms, |id| declared.iter().find(|p| p.id() == id))?;
    }

    if let Some(pattern) = &metadata.label_pattern {
        for caps in LABEL_MARKER_RE.captures_iter(pattern) {
            let name = &caps[1];
            if !declared.iter().any(|p| p.name() == name) {
                return Err(DefinitionError::DanglingPlaceholderReference {
                    referenced_by: "label pattern".into(),
                    placeholder: name.to_string(),
                });
            }
        }
    }

    let mut target_types: Vec<String> = Vec::with_capacity(metadata.target_types.len());
    for t in metadata.target_types {
        if !terms.contains(&t) {
            return Err(DefinitionError::UnknownTerm {
                referenced_by: "target types".into(),
                term: t,
            });
        }
        if !target_types.contains(&t) {
            target_types.push(t);
        }
    }

    info!(
        template = %metadata.id,
        statements = statements.len(),
        placeholders = declared.len(),
        "template assembled"
    );

    Ok(Template {
        id: metadata.id,
        label: metadata.label,
        description: metadata.description,
        tags: metadata.tags,
        target_types,
        label_pattern: metadata.label_pattern,
        // A placeholder shadows a term with the same id.
        terms: terms
            .iter()
            .filter(|t| !declared.iter().any(|p| p.id() == t.id))
            .cloned()
            .collect(),
        placeholders: declared,
        statements,
    })
}

/// One authoring run: registered terms, declared placeholders, and the
/// statements defined so far.
///
/// Every method either succeeds completely or leaves the session as it was.
#[derive(Debug, Clone, Default)]
pub struct Session {
    base: String,
    terms: TermRegistry,
    placeholders: Vec<Placeholder>,
    index: HashMap<String, usize>,
    statements: Vec<Statement>,
}

impl Session {
    /// Start a session whose minted statement ids live under `base`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    /// Start a session with an existing registry.
    pub fn with_terms(base: impl Into<String>, terms: TermRegistry) -> Self {
        Self {
            base: base.into(),
            terms,
            ..Self::default()
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn terms(&self) -> &TermRegistry {
        &self.terms
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn placeholder(&self, id: &str) -> Option<&Placeholder> {
        self.index.get(id).map(|&i| &self.placeholders[i])
    }

    pub fn register_term(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<(), DefinitionError> {
        self.terms.register(Term::new(id, label))
    }

    /// Declare a placeholder. Re-declaring an identical one is a no-op.
    pub fn define_placeholder(
        &mut self,
        id: impl Into<String>,
        kind: PlaceholderKind,
        label: impl Into<String>,
        constraints: Constraints,
    ) -> Result<Placeholder, DefinitionError> {
        let p = Placeholder::new(id, kind, label, constraints)?;
        self.declare(p.clone())?;
        Ok(p)
    }

    /// Add an already constructed placeholder.
    pub fn declare(&mut self, placeholder: Placeholder) -> Result<(), DefinitionError> {
        if let Some(existing) = self.placeholder(placeholder.id()) {
            if existing.same_definition(&placeholder) {
                return Ok(());
            }
            return Err(DefinitionError::DuplicatePlaceholder(placeholder.id().to_string()));
        }
        if placeholder.kind() == PlaceholderKind::IntroducedResource {
            if let Some(first) = self
                .placeholders
                .iter()
                .find(|p| p.kind() == PlaceholderKind::IntroducedResource)
            {
                return Err(DefinitionError::MultipleIntroducedResources {
                    first: first.id().to_string(),
                    second: placeholder.id().to_string(),
                });
            }
        }
        self.index
            .insert(placeholder.id().to_string(), self.placeholders.len());
        self.placeholders.push(placeholder);
        Ok(())
    }

    /// Define a statement with a minted id (`<base>st01`, `<base>st02`, ...).
    ///
    /// `subject`, `predicate`, and `object` are ids of declared placeholders
    /// or registered terms; a placeholder wins when an id is both.
    pub fn define_statement(
        &mut self,
        subject: &str,
        predicate: &str,
        object: &str,
        modifiers: Modifiers,
        condition: Option<&str>,
    ) -> Result<Statement, DefinitionError> {
        let id = format!("{}st{:02}", self.base, self.statements.len() + 1);
        self.define_statement_with_id(id, subject, predicate, object, modifiers, condition)
    }

    pub fn define_statement_with_id(
        &mut self,
        id: impl Into<String>,
        subject: &str,
        predicate: &str,
        object: &str,
        modifiers: Modifiers,
        condition: Option<&str>,
    ) -> Result<Statement, DefinitionError> {
        let id = id.into();
        if self.statements.iter().any(|s| s.id == id) {
            return Err(DefinitionError::DuplicateStatement(id));
        }

        let statement = Statement {
            subject: self.resolve_slot(&id, subject)?,
            predicate: self.resolve_slot(&id, predicate)?,
            object: self.resolve_slot(&id, object)?,
            modifiers,
            condition: condition.map(str::to_string),
            id,
        };
        statement.check(&self.terms, |p| self.placeholder(p))?;

        debug!(statement = %statement.id, "statement defined");
        self.statements.push(statement.clone());
        Ok(statement)
    }

    /// Assemble everything defined so far. The session stays usable.
    pub fn assemble(&self, metadata: TemplateMetadata) -> Result<Template, DefinitionError> {
        assemble(
            &self.terms,
            metadata,
            self.placeholders.clone(),
            self.statements.clone(),
        )
    }

    fn resolve_slot(&self, statement: &str, reference: &str) -> Result<Slot, DefinitionError> {
        if self.index.contains_key(reference) {
            Ok(Slot::Placeholder(reference.to_string()))
        } else if self.terms.contains(reference) {
            Ok(Slot::Term(reference.to_string()))
        } else {
            Err(DefinitionError::UnresolvedReference {
                statement: statement.to_string(),
                reference: reference.to_string(),
            })
        }
    }
}

static LABEL_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("invalid label marker regex"));

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::Node;
    use crate::vocab;

    const BASE: &str = "http://purl.org/nanopub/temp/np/";
    const EX: &str = "http://example.org/";

    fn session() -> Session {
        let mut s = Session::new(BASE);
        s.register_term(vocab::RDF_TYPE, "is a").unwrap();
        s.register_term(format!("{EX}Thing"), "Thing").unwrap();
        s.register_term(format!("{EX}hasTag"), "has tag").unwrap();
        s.define_placeholder(
            format!("{BASE}P1"),
            PlaceholderKind::ExternalResource,
            "the thing",
            Constraints::new(),
        )
        .unwrap();
        s.define_placeholder(
            format!("{BASE}P2"),
            PlaceholderKind::Literal,
            "a tag",
            Constraints::new(),
        )
        .unwrap();
        s
    }

    fn define_thing(s: &mut Session) -> Statement {
        s.define_statement(
            &format!("{BASE}P1"),
            vocab::RDF_TYPE,
            &format!("{EX}Thing"),
            Modifiers::MANDATORY,
            None,
        )
        .unwrap()
    }

    fn metadata() -> TemplateMetadata {
        TemplateMetadata::new(format!("{BASE}assertion"), "Tagging things")
            .description("Tags a thing")
            .tag("Example")
            .target_type(format!("{EX}Thing"))
            .label_pattern("Thing ${P1}")
    }

    #[test]
    fn statement_ids_are_minted_in_order() {
        let mut s = session();
        let a = define_thing(&mut s);
        let b = s
            .define_statement(
                &format!("{BASE}P1"),
                &format!("{EX}hasTag"),
                &format!("{BASE}P2"),
                Modifiers::OPTIONAL_REPEATABLE,
                None,
            )
            .unwrap();
        assert_eq!(a.id, format!("{BASE}st01"));
        assert_eq!(b.id, format!("{BASE}st02"));
        assert_eq!(b.object, Slot::Placeholder(format!("{BASE}P2")));
    }

    #[test]
    fn unresolved_reference_leaves_session_untouched() {
        let mut s = session();
        let err = s
            .define_statement(
                &format!("{BASE}P1"),
                vocab::RDF_TYPE,
                &format!("{EX}Missing"),
                Modifiers::MANDATORY,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, DefinitionError::UnresolvedReference { .. }));
        assert!(s.statements().is_empty());
    }

    #[test]
    fn placeholder_wins_over_term() {
        let mut s = session();
        s.register_term(format!("{BASE}P1"), "shadowed").unwrap();
        let st = define_thing(&mut s);
        assert_eq!(st.subject, Slot::Placeholder(format!("{BASE}P1")));

        let t = s.assemble(metadata()).unwrap();
        assert!(t.terms().iter().all(|term| term.id != format!("{BASE}P1")));
        assert_eq!(t.term_label(&format!("{BASE}P1")), None);
    }

    #[test]
    fn empty_template_is_rejected() {
        assert_eq!(
            session().assemble(metadata()).unwrap_err(),
            DefinitionError::EmptyTemplate
        );
    }

    #[test]
    fn dangling_label_marker_is_rejected() {
        let mut s = session();
        define_thing(&mut s);
        let err = s
            .assemble(metadata().label_pattern("Thing ${nope}"))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DanglingPlaceholderReference { .. }));
    }

    #[test]
    fn unknown_target_type_is_rejected() {
        let mut s = session();
        define_thing(&mut s);
        let err = s
            .assemble(metadata().target_type(format!("{EX}Unregistered")))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::UnknownTerm { .. }));
    }

    #[test]
    fn assemble_is_idempotent_and_dedupes_target_types() {
        let mut s = session();
        define_thing(&mut s);
        let md = metadata().target_type(format!("{EX}Thing"));
        let a = s.assemble(md.clone()).unwrap();
        let b = s.assemble(md).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.target_types(), [format!("{EX}Thing")]);
    }

    #[test]
    fn duplicate_statement_ids_are_rejected() {
        let s = session();
        let st = Statement {
            id: format!("{BASE}st01"),
            subject: Slot::Placeholder(format!("{BASE}P1")),
            predicate: Slot::Term(vocab::RDF_TYPE.into()),
            object: Slot::Term(format!("{EX}Thing")),
            modifiers: Modifiers::MANDATORY,
            condition: None,
        };
        let placeholders = vec![s.placeholder(&format!("{BASE}P1")).unwrap().clone()];
        let err = assemble(s.terms(), metadata(), placeholders, vec![st.clone(), st]).unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateStatement(format!("{BASE}st01")));
    }

    #[test]
    fn conflicting_redeclaration_is_rejected() {
        let mut s = session();
        let p2 = format!("{BASE}P2");
        let err = s
            .define_placeholder(&p2, PlaceholderKind::Literal, "another label", Constraints::new())
            .unwrap_err();
        assert_eq!(err, DefinitionError::DuplicatePlaceholder(p2.clone()));
        // Identical re-declaration is fine.
        s.define_placeholder(&p2, PlaceholderKind::Literal, "a tag", Constraints::new())
            .unwrap();
    }

    #[test]
    fn only_one_introduced_resource() {
        let mut s = session();
        let introduced = PlaceholderKind::IntroducedResource;
        s.define_placeholder(format!("{BASE}a"), introduced, "a", Constraints::new())
            .unwrap();
        let err = s
            .define_placeholder(format!("{BASE}b"), introduced, "b", Constraints::new())
            .unwrap_err();
        assert!(matches!(err, DefinitionError::MultipleIntroducedResources { .. }));
    }

    #[test]
    fn label_pattern_renders_bound_values() {
        let mut s = session();
        define_thing(&mut s);
        let t = s.assemble(metadata()).unwrap();
        let label = t.render_label(|p| {
            p.resolve("urn:x:1")
                .ok()
                .map(|n: Node| n.value().to_string())
        });
        assert_eq!(label.as_deref(), Some("Thing urn:x:1"));
    }
}
