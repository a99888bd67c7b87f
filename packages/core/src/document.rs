//! Instantiation: from a template and caller bindings to an unsigned
//! three-segment document.
//!
//! The document is built in the temporary namespace [`vocab::TEMP_NS`]; a
//! [`Gateway`](crate::Gateway) later assigns the final, content-addressed IRI.
//!
//! Realized statements, in template order:
//!
//! 1. a statement whose activation condition does not hold is dropped;
//! 2. a statement the caller omitted is dropped (only optional ones may be);
//! 3. a statement with an unbound placeholder is dropped if optional and
//!    fails with [`InstantiationError::MissingBinding`] otherwise;
//! 4. a repeatable statement is realized once per value: value lists of
//!    length 1 are shared by every repetition, longer lists advance together.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::InstantiationError;
use crate::identity::AuthorIdentity;
use crate::rdf::{Node, Quad, Segment, Triple};
use crate::statement::{condition_holds, Slot};
use crate::template::Template;
use crate::vocab;

/// Caller-supplied values for one document.
///
/// Values are raw strings; each placeholder checks and converts its own.
/// Binding the same placeholder more than once appends, so a repeatable
/// statement can be fed one value at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: HashMap<String, Vec<String>>,
    omitted: HashSet<String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        self.values
            .entry(placeholder.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn bind_all<I, V>(mut self, placeholder: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.values
            .entry(placeholder.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Leave an optional statement out even if its placeholders are bound.
    pub fn omit(mut self, statement: impl Into<String>) -> Self {
        self.omitted.insert(statement.into());
        self
    }

    /// Bound values, or `None` when the placeholder is unbound. An empty
    /// list counts as unbound.
    pub fn values(&self, placeholder: &str) -> Option<&[String]> {
        self.values
            .get(placeholder)
            .filter(|v| !v.is_empty())
            .map(Vec::as_slice)
    }

    pub fn first(&self, placeholder: &str) -> Option<&str> {
        self.values(placeholder)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn is_omitted(&self, statement: &str) -> bool {
        self.omitted.contains(statement)
    }
}

/// An unsigned document: the three segments plus what it introduces.
///
/// The head graph (document IRI to segment graphs) is derived, see
/// [`Document::head`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub(crate) iri: String,
    pub(crate) assertion: Vec<Triple>,
    pub(crate) provenance: Vec<Triple>,
    pub(crate) pubinfo: Vec<Triple>,
    pub(crate) introduces: Option<String>,
}

impl Document {
    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn assertion(&self) -> &[Triple] {
        &self.assertion
    }

    pub fn provenance(&self) -> &[Triple] {
        &self.provenance
    }

    pub fn pubinfo(&self) -> &[Triple] {
        &self.pubinfo
    }

    /// The concept this document introduces, if any.
    pub fn introduces(&self) -> Option<&str> {
        self.introduces.as_deref()
    }

    /// IRI of one of the document's named graphs.
    pub fn segment_iri(&self, segment: Segment) -> String {
        segment_iri(&self.iri, segment)
    }

    pub fn segment(&self, segment: Segment) -> Vec<Triple> {
        match segment {
            Segment::Head => self.head(),
            Segment::Assertion => self.assertion.clone(),
            Segment::Provenance => self.provenance.clone(),
            Segment::Pubinfo => self.pubinfo.clone(),
        }
    }

    /// Packaging triples linking the document to its three segments.
    pub fn head(&self) -> Vec<Triple> {
        vec![
            Triple::new(&self.iri, vocab::RDF_TYPE, Node::iri(vocab::NP_NANOPUBLICATION)),
            Triple::new(
                &self.iri,
                vocab::NP_HAS_ASSERTION,
                Node::iri(self.segment_iri(Segment::Assertion)),
            ),
            Triple::new(
                &self.iri,
                vocab::NP_HAS_PROVENANCE,
                Node::iri(self.segment_iri(Segment::Provenance)),
            ),
            Triple::new(
                &self.iri,
                vocab::NP_HAS_PUBINFO,
                Node::iri(self.segment_iri(Segment::Pubinfo)),
            ),
        ]
    }

    /// Every quad of the document, head first, segments in order.
    pub fn quads(&self) -> Vec<Quad> {
        [
            Segment::Head,
            Segment::Assertion,
            Segment::Provenance,
            Segment::Pubinfo,
        ]
        .into_iter()
        .flat_map(|seg| {
            let graph = self.segment_iri(seg);
            self.segment(seg)
                .into_iter()
                .map(move |t| t.in_graph(graph.clone()))
        })
        .collect()
    }
}

pub(crate) fn segment_iri(document: &str, segment: Segment) -> String {
    if document.ends_with(['/', '#']) {
        format!("{document}{}", segment.local_name())
    } else {
        format!("{document}/{}", segment.local_name())
    }
}

/// Instantiate `template`, stamping the document with the current time.
pub fn instantiate(
    template: &Template,
    bindings: &Bindings,
    author: &AuthorIdentity,
) -> Result<Document, InstantiationError> {
    instantiate_at(template, bindings, author, Utc::now())
}

/// Instantiate `template` with an explicit creation time.
pub fn instantiate_at(
    template: &Template,
    bindings: &Bindings,
    author: &AuthorIdentity,
    created: DateTime<Utc>,
) -> Result<Document, InstantiationError> {
    // Every bound value is checked before anything is realized.
    let mut undeclared: Vec<&String> = bindings
        .values
        .keys()
        .filter(|id| template.placeholder(id).is_none())
        .collect();
    undeclared.sort();
    if let Some(id) = undeclared.first() {
        return Err(InstantiationError::UndeclaredPlaceholder((*id).clone()));
    }

    let mut resolved: HashMap<&str, Vec<Node>> = HashMap::new();
    for p in template.placeholders() {
        if let Some(values) = bindings.values(p.id()) {
            let nodes = values
                .iter()
                .map(|v| p.resolve(v))
                .collect::<Result<Vec<_>, _>>()?;
            resolved.insert(p.id(), nodes);
        }
    }

    let mut omitted: Vec<&String> = bindings.omitted.iter().collect();
    omitted.sort();
    for id in omitted {
        match template.statement(id) {
            Some(st) if st.modifiers.optional => {}
            Some(_) => {
                return Err(InstantiationError::InvalidOmission {
                    statement: id.clone(),
                    reason: "the statement is not optional".into(),
                })
            }
            None => {
                return Err(InstantiationError::InvalidOmission {
                    statement: id.clone(),
                    reason: "the template has no such statement".into(),
                })
            }
        }
    }

    let mut assertion: Vec<Triple> = Vec::new();
    let mut seen: HashSet<Triple> = HashSet::new();

    for st in template.statements() {
        if let Some(condition) = &st.condition {
            if !condition_holds(bindings.first(condition)) {
                debug!(statement = %st.id, "condition not met, statement dropped");
                continue;
            }
        }
        if bindings.is_omitted(&st.id) {
            debug!(statement = %st.id, "statement omitted by caller");
            continue;
        }

        let placeholders = st.placeholders();
        if let Some(unbound) = placeholders.iter().find(|p| !resolved.contains_key(*p)) {
            if st.modifiers.optional {
                debug!(statement = %st.id, placeholder = %unbound, "optional statement unbound");
                continue;
            }
            return Err(InstantiationError::MissingBinding {
                statement: st.id.clone(),
                placeholder: unbound.to_string(),
            });
        }

        let count = placeholders
            .iter()
            .map(|p| resolved[p].len())
            .max()
            .unwrap_or(1);
        for p in &placeholders {
            let found = resolved[p].len();
            if !st.modifiers.repeatable && found > 1 {
                return Err(InstantiationError::UnexpectedRepetition {
                    statement: st.id.clone(),
                    placeholder: p.to_string(),
                    count: found,
                });
            }
            if found != 1 && found != count {
                return Err(InstantiationError::RepetitionMismatch {
                    statement: st.id.clone(),
                    placeholder: p.to_string(),
                    expected: count,
                    found,
                });
            }
        }

        for i in 0..count {
            let node = |slot: &Slot| -> Node {
                match slot {
                    Slot::Term(id) => Node::iri(id),
                    Slot::Placeholder(id) => {
                        let values = &resolved[id.as_str()];
                        values[if values.len() == 1 { 0 } else { i }].clone()
                    }
                }
            };
            let subject = iri_in_position(&node(&st.subject), &st.subject, "subject")?;
            let predicate = iri_in_position(&node(&st.predicate), &st.predicate, "predicate")?;
            if vocab::is_reserved_predicate(&predicate) {
                return Err(InstantiationError::ConstraintViolation {
                    placeholder: st.predicate.id().to_string(),
                    reason: format!("{predicate} is reserved for provenance and signatures"),
                });
            }
            let triple = Triple::new(subject, predicate, node(&st.object));
            if seen.insert(triple.clone()) {
                assertion.push(triple);
            }
        }
        debug!(statement = %st.id, repetitions = count, "statement realized");
    }

    if assertion.is_empty() {
        return Err(InstantiationError::EmptyAssertion);
    }

    let introduces = match template.introduced_placeholder() {
        Some(p) => match resolved.get(p.id()).map(Vec::as_slice) {
            Some([single]) => single
                .as_iri()
                .filter(|iri| {
                    assertion
                        .iter()
                        .any(|t| t.subject == *iri || t.object.as_iri() == Some(*iri))
                })
                .map(str::to_string),
            Some(many) if many.len() > 1 => {
                return Err(InstantiationError::UnexpectedRepetition {
                    statement: vocab::NPX_INTRODUCES.to_string(),
                    placeholder: p.id().to_string(),
                    count: many.len(),
                })
            }
            _ => None,
        },
        None => None,
    };

    let iri = vocab::TEMP_NS.to_string();
    let provenance = vec![Triple::new(
        segment_iri(&iri, Segment::Assertion),
        vocab::PROV_WAS_ATTRIBUTED_TO,
        Node::iri(&author.id),
    )];

    let mut pubinfo = vec![
        Triple::new(&author.id, vocab::FOAF_NAME, Node::literal(&author.name)),
        Triple::new(
            &iri,
            vocab::DCT_CREATED,
            Node::typed(
                created.to_rfc3339_opts(SecondsFormat::Secs, true),
                vocab::XSD_DATE_TIME,
            ),
        ),
        Triple::new(&iri, vocab::NT_WAS_CREATED_FROM_TEMPLATE, Node::iri(template.id())),
    ];
    if let Some(label) = template.render_label(|p| bindings.first(p.id()).map(str::to_string)) {
        pubinfo.push(Triple::new(&iri, vocab::RDFS_LABEL, Node::literal(label)));
    }
    if let Some(concept) = &introduces {
        pubinfo.push(Triple::new(&iri, vocab::NPX_INTRODUCES, Node::iri(concept)));
    }

    info!(
        template = %template.id(),
        triples = assertion.len(),
        introduces = introduces.as_deref().unwrap_or("-"),
        "document instantiated"
    );

    Ok(Document {
        iri,
        assertion,
        provenance,
        pubinfo,
        introduces,
    })
}

/// Package the template itself as a document, so it can be signed and
/// published like any other.
pub fn package_template(template: &Template, author: &AuthorIdentity) -> Document {
    package_template_at(template, author, Utc::now())
}

pub fn package_template_at(
    template: &Template,
    author: &AuthorIdentity,
    created: DateTime<Utc>,
) -> Document {
    let iri = vocab::TEMP_NS.to_string();
    let assertion = template.to_triples();
    let provenance = vec![Triple::new(
        segment_iri(&iri, Segment::Assertion),
        vocab::PROV_WAS_ATTRIBUTED_TO,
        Node::iri(&author.id),
    )];
    let pubinfo = vec![
        Triple::new(&author.id, vocab::FOAF_NAME, Node::literal(&author.name)),
        Triple::new(
            &iri,
            vocab::DCT_CREATED,
            Node::typed(
                created.to_rfc3339_opts(SecondsFormat::Secs, true),
                vocab::XSD_DATE_TIME,
            ),
        ),
        Triple::new(&iri, vocab::RDFS_LABEL, Node::literal(template.label())),
    ];

    info!(template = %template.id(), triples = assertion.len(), "template packaged");

    Document {
        iri,
        assertion,
        provenance,
        pubinfo,
        introduces: None,
    }
}

// A subject or predicate must come out as an IRI.
fn iri_in_position(node: &Node, slot: &Slot, position: &str) -> Result<String, InstantiationError> {
    node.as_iri()
        .map(str::to_string)
        .ok_or_else(|| InstantiationError::ConstraintViolation {
            placeholder: slot.id().to_string(),
            reason: format!("the {position} must be an IRI, got literal {node}"),
        })
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::{Constraints, PlaceholderKind};
    use crate::statement::Modifiers;
    use crate::template::{Session, TemplateMetadata};
    use chrono::TimeZone;

    const BASE: &str = "https://w3id.org/np/RAExample#";
    const EX: &str = "http://example.org/";

    fn p(name: &str) -> String {
        format!("{BASE}{name}")
    }

    fn author() -> AuthorIdentity {
        AuthorIdentity::new("https://orcid.org/0000-0002-1784-2920", "Anne Fouilloux")
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    fn template() -> Template {
        let mut s = Session::new(BASE);
        s.register_term(vocab::RDF_TYPE, "is a").unwrap();
        s.register_term(format!("{EX}Thing"), "Thing").unwrap();
        s.register_term(format!("{EX}hasTag"), "has tag").unwrap();
        s.define_placeholder(
            p("P1"),
            PlaceholderKind::IntroducedResource,
            "the thing",
            Constraints::new(),
        )
        .unwrap();
        s.define_placeholder(p("P2"), PlaceholderKind::Literal, "a tag", Constraints::new())
            .unwrap();
        s.define_statement(
            &p("P1"),
            vocab::RDF_TYPE,
            &format!("{EX}Thing"),
            Modifiers::MANDATORY,
            None,
        )
        .unwrap();
        s.define_statement(
            &p("P1"),
            &format!("{EX}hasTag"),
            &p("P2"),
            Modifiers::OPTIONAL_REPEATABLE,
            None,
        )
        .unwrap();
        s.assemble(TemplateMetadata::new(p("assertion"), "Things").label_pattern("Thing ${P1}"))
            .unwrap()
    }

    /// A single `<S> ex:hasTag <O>` statement with the given modifiers.
    fn tag_pairs(modifiers: Modifiers) -> Template {
        let mut s = Session::new(BASE);
        s.register_term(format!("{EX}hasTag"), "has tag").unwrap();
        s.define_placeholder(p("S"), PlaceholderKind::ExternalResource, "thing", Constraints::new())
            .unwrap();
        s.define_placeholder(p("O"), PlaceholderKind::Literal, "tag", Constraints::new())
            .unwrap();
        s.define_statement(&p("S"), &format!("{EX}hasTag"), &p("O"), modifiers, None)
            .unwrap();
        s.assemble(TemplateMetadata::new(p("assertion"), "Tags"))
            .unwrap()
    }

    #[test]
    fn segments_are_filled() {
        let t = template();
        let b = Bindings::new().bind(p("P1"), "thing1");
        let doc = instantiate_at(&t, &b, &author(), created()).unwrap();

        let concept = format!("{}thing1", vocab::TEMP_NS);
        assert_eq!(
            doc.assertion(),
            [Triple::new(&concept, vocab::RDF_TYPE, Node::iri(format!("{EX}Thing")))]
        );
        assert_eq!(doc.introduces(), Some(concept.as_str()));
        assert_eq!(doc.provenance().len(), 1);
        assert_eq!(doc.provenance()[0].subject, format!("{}assertion", vocab::TEMP_NS));
        assert!(doc.pubinfo().contains(&Triple::new(
            vocab::TEMP_NS,
            vocab::DCT_CREATED,
            Node::typed("2025-01-02T03:04:05Z", vocab::XSD_DATE_TIME)
        )));
        assert!(doc.pubinfo().contains(&Triple::new(
            vocab::TEMP_NS,
            vocab::RDFS_LABEL,
            Node::literal("Thing thing1")
        )));
    }

    #[test]
    fn missing_binding_names_statement_and_placeholder() {
        let err = instantiate_at(&template(), &Bindings::new(), &author(), created()).unwrap_err();
        assert_eq!(
            err,
            InstantiationError::MissingBinding {
                statement: p("st01"),
                placeholder: p("P1"),
            }
        );
    }

    #[test]
    fn undeclared_binding_is_rejected() {
        let b = Bindings::new().bind(p("P1"), "x").bind(p("nope"), "y");
        assert_eq!(
            instantiate_at(&template(), &b, &author(), created()).unwrap_err(),
            InstantiationError::UndeclaredPlaceholder(p("nope"))
        );
    }

    #[test]
    fn omitting_a_mandatory_statement_fails() {
        let b = Bindings::new().bind(p("P1"), "x").omit(p("st01"));
        assert!(matches!(
            instantiate_at(&template(), &b, &author(), created()),
            Err(InstantiationError::InvalidOmission { .. })
        ));
    }

    #[test]
    fn omitted_optional_statement_is_dropped() {
        let b = Bindings::new()
            .bind(p("P1"), "x")
            .bind(p("P2"), "alpha")
            .omit(p("st02"));
        let doc = instantiate_at(&template(), &b, &author(), created()).unwrap();
        assert_eq!(doc.assertion().len(), 1);
    }

    #[test]
    fn non_repeatable_rejects_many_values() {
        let b = Bindings::new().bind_all(p("P1"), ["a", "b"]);
        assert!(matches!(
            instantiate_at(&template(), &b, &author(), created()),
            Err(InstantiationError::UnexpectedRepetition { .. })
        ));
    }

    #[test]
    fn mandatory_repeatable_needs_at_least_one_value() {
        let b = Bindings::new()
            .bind(p("S"), "urn:x:1")
            .bind_all(p("O"), Vec::<String>::new());
        assert_eq!(
            instantiate_at(&tag_pairs(Modifiers::REPEATABLE), &b, &author(), created())
                .unwrap_err(),
            InstantiationError::MissingBinding {
                statement: p("st01"),
                placeholder: p("O"),
            }
        );
    }

    #[test]
    fn repeated_lists_must_have_equal_lengths() {
        let b = Bindings::new()
            .bind_all(p("S"), ["urn:x:1", "urn:x:2"])
            .bind_all(p("O"), ["a", "b", "c"]);
        assert_eq!(
            instantiate_at(&tag_pairs(Modifiers::REPEATABLE), &b, &author(), created())
                .unwrap_err(),
            InstantiationError::RepetitionMismatch {
                statement: p("st01"),
                placeholder: p("S"),
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn repeated_lists_pair_up_by_position() {
        let b = Bindings::new()
            .bind_all(p("S"), ["urn:x:1", "urn:x:2"])
            .bind_all(p("O"), ["a", "b"]);
        let doc =
            instantiate_at(&tag_pairs(Modifiers::REPEATABLE), &b, &author(), created()).unwrap();
        let has_tag = format!("{EX}hasTag");
        assert_eq!(
            doc.assertion(),
            [
                Triple::new("urn:x:1", &has_tag, Node::literal("a")),
                Triple::new("urn:x:2", &has_tag, Node::literal("b")),
            ]
        );
    }

    #[test]
    fn dropping_every_statement_leaves_nothing_to_assert() {
        let unbound = Bindings::new();
        assert_eq!(
            instantiate_at(&tag_pairs(Modifiers::OPTIONAL), &unbound, &author(), created())
                .unwrap_err(),
            InstantiationError::EmptyAssertion
        );

        let omitted = Bindings::new()
            .bind(p("S"), "urn:x:1")
            .bind(p("O"), "a")
            .omit(p("st01"));
        assert_eq!(
            instantiate_at(&tag_pairs(Modifiers::OPTIONAL), &omitted, &author(), created())
                .unwrap_err(),
            InstantiationError::EmptyAssertion
        );
    }

    #[test]
    fn reserved_local_name_is_rejected_before_anything_is_built() {
        let b = Bindings::new().bind(p("P1"), "pubinfo");
        match instantiate_at(&template(), &b, &author(), created()) {
            Err(InstantiationError::ConstraintViolation { placeholder, .. }) => {
                assert_eq!(placeholder, p("P1"));
            }
            other => panic!("expected a constraint violation, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_values_collapse() {
        let b = Bindings::new()
            .bind(p("P1"), "x")
            .bind_all(p("P2"), ["alpha", "alpha"]);
        let doc = instantiate_at(&template(), &b, &author(), created()).unwrap();
        assert_eq!(doc.assertion().len(), 2);
    }

    #[test]
    fn head_links_the_segments() {
        let b = Bindings::new().bind(p("P1"), "x");
        let doc = instantiate_at(&template(), &b, &author(), created()).unwrap();
        let quads = doc.quads();
        let head_graph = format!("{}Head", vocab::TEMP_NS);
        assert_eq!(quads.iter().filter(|q| q.graph == head_graph).count(), 4);
        assert!(quads.iter().any(|q| q.predicate == vocab::NP_HAS_ASSERTION
            && q.object == Node::iri(format!("{}assertion", vocab::TEMP_NS))));
    }

    #[test]
    fn packaged_template_carries_its_definition() {
        let t = template();
        let doc = package_template_at(&t, &author(), created());
        assert!(doc.assertion().contains(&Triple::new(
            t.id(),
            vocab::RDF_TYPE,
            Node::iri(vocab::NT_ASSERTION_TEMPLATE)
        )));
        assert_eq!(doc.introduces(), None);
    }
}
