//! The triple form of a template.
//!
//! Every field of a [`Template`] is written as triples about the template,
//! placeholder, statement, and term IRIs, in the `nt:` vocabulary used by
//! published nanopublication templates:
//!
//! ```text
//! <T>   a nt:AssertionTemplate ; rdfs:label "..." ; dct:description "..." ;
//!       nt:hasTag "..." ; nt:hasTargetNanopubType <type> ;
//!       nt:hasNanopubLabelPattern "... ${name} ..." ; nt:hasStatement <st01> .
//! <p>   a nt:LiteralPlaceholder ; rdfs:label "..." ; nt:hasRegex "..." ;
//!       nt:hasDatatype xsd:date ; nt:possibleValue <v> ;
//!       nt:possibleValuesFromApi "..." ; nt:hasPrefix "..." ; nt:hasPrefixLabel "..." .
//! <st01> rdf:subject <p> ; rdf:predicate <term> ; rdf:object <p2> ;
//!       a nt:OptionalStatement, nt:RepeatableStatement ; nt:statementIri <cond> .
//! <term> rdfs:label "..." .
//! ```
//!
//! Reading preserves the order triples appear in, and the result goes
//! through [`assemble`] again, so a parsed template satisfies the same
//! invariants as an authored one.

use std::collections::HashMap;

use crate::error::ExchangeError;
use crate::placeholder::{Constraints, Datatype, Placeholder, PlaceholderKind};
use crate::rdf::{Node, Quad, Triple};
use crate::statement::{Modifiers, Slot, Statement};
use crate::template::{assemble, Template, TemplateMetadata};
use crate::term::{Term, TermRegistry};
use crate::vocab;

impl Template {
    /// The template as triples, in a stable order: template metadata,
    /// placeholders, statements, then term labels.
    pub fn to_triples(&self) -> Vec<Triple> {
        let t = self.id();
        let mut out = vec![
            Triple::new(t, vocab::RDF_TYPE, Node::iri(vocab::NT_ASSERTION_TEMPLATE)),
            Triple::new(t, vocab::RDFS_LABEL, Node::literal(self.label())),
        ];
        if !self.description().is_empty() {
            out.push(Triple::new(t, vocab::DCT_DESCRIPTION, Node::literal(self.description())));
        }
        for tag in self.tags() {
            out.push(Triple::new(t, vocab::NT_HAS_TAG, Node::literal(tag)));
        }
        for ty in self.target_types() {
            out.push(Triple::new(t, vocab::NT_HAS_TARGET_TYPE, Node::iri(ty)));
        }
        if let Some(pattern) = self.label_pattern() {
            out.push(Triple::new(t, vocab::NT_HAS_LABEL_PATTERN, Node::literal(pattern)));
        }
        for st in self.statements() {
            out.push(Triple::new(t, vocab::NT_HAS_STATEMENT, Node::iri(&st.id)));
        }

        for p in self.placeholders() {
            let id = p.id();
            let c = p.constraints();
            out.push(Triple::new(id, vocab::RDF_TYPE, Node::iri(p.kind().class_iri())));
            out.push(Triple::new(id, vocab::RDFS_LABEL, Node::literal(p.label())));
            if let Some(regex) = &c.regex {
                out.push(Triple::new(id, vocab::NT_HAS_REGEX, Node::literal(regex)));
            }
            if let Some(dt) = &c.datatype {
                out.push(Triple::new(id, vocab::NT_HAS_DATATYPE, Node::iri(dt.iri())));
            }
            for v in &c.allowed_values {
                out.push(Triple::new(id, vocab::NT_POSSIBLE_VALUE, v.clone()));
            }
            for api in &c.value_sources {
                out.push(Triple::new(id, vocab::NT_POSSIBLE_VALUES_FROM_API, Node::literal(api)));
            }
            if let Some(prefix) = &c.prefix {
                out.push(Triple::new(id, vocab::NT_HAS_PREFIX, Node::literal(prefix)));
            }
            if let Some(label) = &c.prefix_label {
                out.push(Triple::new(id, vocab::NT_HAS_PREFIX_LABEL, Node::literal(label)));
            }
        }

        for st in self.statements() {
            let id = st.id.as_str();
            out.push(Triple::new(id, vocab::RDF_SUBJECT, Node::iri(st.subject.id())));
            out.push(Triple::new(id, vocab::RDF_PREDICATE, Node::iri(st.predicate.id())));
            out.push(Triple::new(id, vocab::RDF_OBJECT, Node::iri(st.object.id())));
            if st.modifiers.optional {
                out.push(Triple::new(id, vocab::RDF_TYPE, Node::iri(vocab::NT_OPTIONAL_STATEMENT)));
            }
            if st.modifiers.repeatable {
                out.push(Triple::new(
                    id,
                    vocab::RDF_TYPE,
                    Node::iri(vocab::NT_REPEATABLE_STATEMENT),
                ));
            }
            if let Some(condition) = &st.condition {
                out.push(Triple::new(id, vocab::NT_STATEMENT_IRI, Node::iri(condition)));
            }
        }

        for term in self.terms() {
            out.push(Triple::new(&term.id, vocab::RDFS_LABEL, Node::literal(&term.label)));
        }

        out
    }

    /// The template as quads in one named graph.
    pub fn to_quads(&self, graph: &str) -> Vec<Quad> {
        self.to_triples()
            .into_iter()
            .map(|t| t.in_graph(graph))
            .collect()
    }

    /// Read a template back from quads. Only the graph holding the
    /// `nt:AssertionTemplate` triple is considered, so a whole published
    /// document can be passed in.
    pub fn from_quads(quads: &[Quad]) -> Result<Template, ExchangeError> {
        let graph = quads
            .iter()
            .find(|q| {
                q.predicate == vocab::RDF_TYPE
                    && q.object.as_iri() == Some(vocab::NT_ASSERTION_TEMPLATE)
            })
            .map(|q| q.graph.as_str())
            .ok_or(ExchangeError::MissingTemplate)?;
        let triples: Vec<Triple> = quads
            .iter()
            .filter(|q| q.graph == graph)
            .map(Quad::triple)
            .collect();
        Template::from_triples(&triples)
    }

    /// Read a template back from triples.
    ///
    /// Terms referenced by a statement or target type but carrying no
    /// `rdfs:label` are registered under their local name.
    pub fn from_triples(triples: &[Triple]) -> Result<Template, ExchangeError> {
        let index = Index::new(triples);

        let mut templates = index.subjects_typed(vocab::NT_ASSERTION_TEMPLATE);
        let id = templates.next().ok_or(ExchangeError::MissingTemplate)?;
        if let Some(second) = templates.next() {
            return Err(ExchangeError::MultipleTemplates {
                first: id.to_string(),
                second: second.to_string(),
            });
        }

        let metadata = TemplateMetadata {
            id: id.to_string(),
            label: index.literal(id, vocab::RDFS_LABEL)?.unwrap_or_default(),
            description: index.literal(id, vocab::DCT_DESCRIPTION)?.unwrap_or_default(),
            tags: index.literals(id, vocab::NT_HAS_TAG)?,
            target_types: index.iris(id, vocab::NT_HAS_TARGET_TYPE)?,
            label_pattern: index.literal(id, vocab::NT_HAS_LABEL_PATTERN)?,
        };

        let placeholders = read_placeholders(&index)?;
        let is_placeholder = |iri: &str| placeholders.iter().any(|p| p.id() == iri);

        let mut statements = Vec::new();
        for st in index.iris(id, vocab::NT_HAS_STATEMENT)? {
            let slot = |predicate: &str, position: &str| -> Result<Slot, ExchangeError> {
                let iri = index.iri(&st, predicate)?.ok_or_else(|| {
                    ExchangeError::IncompleteStatement {
                        statement: st.clone(),
                        position: position.to_string(),
                    }
                })?;
                Ok(if is_placeholder(&iri) {
                    Slot::Placeholder(iri)
                } else {
                    Slot::Term(iri)
                })
            };
            let types = index.iris(&st, vocab::RDF_TYPE)?;
            statements.push(Statement {
                subject: slot(vocab::RDF_SUBJECT, "subject")?,
                predicate: slot(vocab::RDF_PREDICATE, "predicate")?,
                object: slot(vocab::RDF_OBJECT, "object")?,
                modifiers: Modifiers {
                    optional: types.iter().any(|t| t == vocab::NT_OPTIONAL_STATEMENT),
                    repeatable: types.iter().any(|t| t == vocab::NT_REPEATABLE_STATEMENT),
                },
                condition: index.iri(&st, vocab::NT_STATEMENT_IRI)?,
                id: st,
            });
        }

        // Labelled terms in order of appearance, then any unlabelled term a
        // statement or target type still needs.
        let mut terms = TermRegistry::new();
        for t in triples.iter().filter(|t| t.predicate == vocab::RDFS_LABEL) {
            if t.subject == id || is_placeholder(&t.subject) {
                continue;
            }
            if let Node::Literal { value, .. } = &t.object {
                terms.register(Term::new(&t.subject, value))?;
            }
        }
        let referenced = statements
            .iter()
            .flat_map(|s| s.slots())
            .filter_map(|slot| match slot {
                Slot::Term(iri) => Some(iri.as_str()),
                Slot::Placeholder(_) => None,
            })
            .chain(metadata.target_types.iter().map(String::as_str));
        for iri in referenced.collect::<Vec<_>>() {
            if !terms.contains(iri) {
                terms.register(Term::new(iri, vocab::local_name(iri)))?;
            }
        }

        Ok(assemble(&terms, metadata, placeholders, statements)?)
    }
}

fn read_placeholders(index: &Index<'_>) -> Result<Vec<Placeholder>, ExchangeError> {
    // Kind classes per subject, in order of first appearance.
    let mut order: Vec<&str> = Vec::new();
    let mut kinds: HashMap<&str, Vec<PlaceholderKind>> = HashMap::new();
    for t in index.triples {
        if t.predicate != vocab::RDF_TYPE {
            continue;
        }
        let Some(kind) = t.object.as_iri().and_then(PlaceholderKind::from_class_iri) else {
            continue;
        };
        let entry = kinds.entry(t.subject.as_str()).or_insert_with(|| {
            order.push(t.subject.as_str());
            Vec::new()
        });
        if !entry.contains(&kind) {
            entry.push(kind);
        }
    }

    let mut placeholders = Vec::with_capacity(order.len());
    for id in order {
        let kind = single_kind(id, &kinds[id])?;
        let constraints = Constraints {
            regex: index.literal(id, vocab::NT_HAS_REGEX)?,
            datatype: index
                .iri(id, vocab::NT_HAS_DATATYPE)?
                .map(|dt| Datatype::from_iri(&dt)),
            allowed_values: index.objects(id, vocab::NT_POSSIBLE_VALUE).cloned().collect(),
            value_sources: index
                .objects(id, vocab::NT_POSSIBLE_VALUES_FROM_API)
                .map(|n| n.value().to_string())
                .collect(),
            prefix: index
                .objects(id, vocab::NT_HAS_PREFIX)
                .next()
                .map(|n| n.value().to_string()),
            prefix_label: index.literal(id, vocab::NT_HAS_PREFIX_LABEL)?,
        };
        let label = index.literal(id, vocab::RDFS_LABEL)?.unwrap_or_default();
        placeholders.push(Placeholder::new(id, kind, label, constraints)?);
    }
    Ok(placeholders)
}

// An introduced resource may also carry the class of the IRI kind its value
// takes; any other combination is ambiguous.
fn single_kind(id: &str, kinds: &[PlaceholderKind]) -> Result<PlaceholderKind, ExchangeError> {
    match kinds {
        [kind] => Ok(*kind),
        [a, b]
            if kinds.contains(&PlaceholderKind::IntroducedResource)
                && [*a, *b].iter().all(|k| {
                    matches!(
                        k,
                        PlaceholderKind::IntroducedResource
                            | PlaceholderKind::Resource
                            | PlaceholderKind::ExternalResource
                            | PlaceholderKind::GuidedChoice
                    )
                }) =>
        {
            Ok(PlaceholderKind::IntroducedResource)
        }
        _ => Err(ExchangeError::AmbiguousKind {
            placeholder: id.to_string(),
            kinds: kinds
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Lookup helpers over a triple slice. Multi-valued properties keep the
/// order their triples appear in.
struct Index<'a> {
    triples: &'a [Triple],
}

impl<'a> Index<'a> {
    fn new(triples: &'a [Triple]) -> Self {
        Self { triples }
    }

    fn objects<'s>(
        &'s self,
        subject: &'s str,
        predicate: &'s str,
    ) -> impl Iterator<Item = &'a Node> + 's {
        self.triples
            .iter()
            .filter(move |t| t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    fn subjects_typed<'s>(&'s self, class: &'s str) -> impl Iterator<Item = &'a str> + 's {
        self.triples
            .iter()
            .filter(move |t| t.predicate == vocab::RDF_TYPE && t.object.as_iri() == Some(class))
            .map(|t| t.subject.as_str())
    }

    fn literals(&self, subject: &str, predicate: &str) -> Result<Vec<String>, ExchangeError> {
        self.objects(subject, predicate)
            .map(|n| match n {
                Node::Literal { value, .. } => Ok(value.clone()),
                Node::Iri { value } => Err(ExchangeError::Malformed {
                    subject: subject.to_string(),
                    predicate: predicate.to_string(),
                    reason: format!("expected a literal, found <{value}>"),
                }),
            })
            .collect()
    }

    fn iris(&self, subject: &str, predicate: &str) -> Result<Vec<String>, ExchangeError> {
        self.objects(subject, predicate)
            .map(|n| match n {
                Node::Iri { value } => Ok(value.clone()),
                Node::Literal { value, .. } => Err(ExchangeError::Malformed {
                    subject: subject.to_string(),
                    predicate: predicate.to_string(),
                    reason: format!("expected an IRI, found literal {value:?}"),
                }),
            })
            .collect()
    }

    fn literal(&self, subject: &str, predicate: &str) -> Result<Option<String>, ExchangeError> {
        Ok(self.literals(subject, predicate)?.into_iter().next())
    }

    fn iri(&self, subject: &str, predicate: &str) -> Result<Option<String>, ExchangeError> {
        Ok(self.iris(subject, predicate)?.into_iter().next())
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Session;

    const BASE: &str = "https://w3id.org/np/RAExample#";
    const EX: &str = "http://example.org/";

    fn p(name: &str) -> String {
        format!("{BASE}{name}")
    }

    fn template() -> Template {
        let mut s = Session::new(BASE);
        s.register_term(vocab::RDF_TYPE, "is a").unwrap();
        s.register_term(format!("{EX}Paper"), "paper").unwrap();
        s.register_term(format!("{EX}hasMethods"), "has methods section").unwrap();
        s.register_term(format!("{EX}keyword"), "keyword").unwrap();
        s.define_placeholder(
            p("paper"),
            PlaceholderKind::IntroducedResource,
            "the paper",
            Constraints::new(),
        )
        .unwrap();
        s.define_placeholder(
            p("keyword"),
            PlaceholderKind::Literal,
            "keyword",
            Constraints::new().regex(".{2,50}"),
        )
        .unwrap();
        s.define_placeholder(
            p("hasMethods"),
            PlaceholderKind::RestrictedChoice,
            "has a methods section?",
            Constraints::new()
                .allow(Node::literal("true"))
                .allow(Node::literal("false"))
                .datatype(Datatype::Boolean),
        )
        .unwrap();
        s.define_placeholder(
            p("methods"),
            PlaceholderKind::LocalResource,
            "methods section",
            Constraints::new(),
        )
        .unwrap();
        s.define_statement(
            &p("paper"),
            vocab::RDF_TYPE,
            &format!("{EX}Paper"),
            Modifiers::MANDATORY,
            None,
        )
        .unwrap();
        s.define_statement(
            &p("paper"),
            &format!("{EX}keyword"),
            &p("keyword"),
            Modifiers::OPTIONAL_REPEATABLE,
            None,
        )
        .unwrap();
        s.define_statement(
            &p("paper"),
            &format!("{EX}hasMethods"),
            &p("methods"),
            Modifiers::OPTIONAL,
            Some(&p("hasMethods")),
        )
        .unwrap();
        s.assemble(
            TemplateMetadata::new(p("assertion"), "Papers")
                .description("<p>Describe a paper.</p>")
                .tag("Papers")
                .tag("Science")
                .target_type(format!("{EX}Paper"))
                .label_pattern("Paper: ${paper}"),
        )
        .unwrap()
    }

    #[test]
    fn roundtrip_reproduces_the_template() {
        let t = template();
        let parsed = Template::from_quads(&t.to_quads("urn:graph")).unwrap();
        assert_eq!(parsed, t);
        assert!(parsed.statements()[1].modifiers.optional);
        assert!(parsed.statements()[1].modifiers.repeatable);
        assert_eq!(
            parsed.statements()[2].condition.as_deref(),
            Some(p("hasMethods").as_str())
        );
    }

    #[test]
    fn roundtrip_with_a_term_shadowed_by_a_placeholder() {
        let mut s = Session::new(BASE);
        s.register_term(vocab::RDF_TYPE, "is a").unwrap();
        s.register_term(format!("{EX}Paper"), "paper").unwrap();
        s.register_term(p("paper"), "a term that is also a placeholder")
            .unwrap();
        s.define_placeholder(
            p("paper"),
            PlaceholderKind::LocalResource,
            "the paper",
            Constraints::new(),
        )
        .unwrap();
        s.define_statement(
            &p("paper"),
            vocab::RDF_TYPE,
            &format!("{EX}Paper"),
            Modifiers::MANDATORY,
            None,
        )
        .unwrap();
        let t = s
            .assemble(TemplateMetadata::new(p("assertion"), "Papers"))
            .unwrap();

        let labels = t
            .to_triples()
            .into_iter()
            .filter(|tr| tr.subject == p("paper") && tr.predicate == vocab::RDFS_LABEL)
            .count();
        assert_eq!(labels, 1);
        assert_eq!(Template::from_quads(&t.to_quads("urn:graph")).unwrap(), t);
    }

    #[test]
    fn modifiers_are_type_triples() {
        let triples = template().to_triples();
        assert!(triples.contains(&Triple::new(
            p("st02"),
            vocab::RDF_TYPE,
            Node::iri(vocab::NT_REPEATABLE_STATEMENT)
        )));
        assert!(triples.contains(&Triple::new(
            p("st03"),
            vocab::NT_STATEMENT_IRI,
            Node::iri(p("hasMethods"))
        )));
    }

    #[test]
    fn unlabelled_terms_get_their_local_name() {
        let triples: Vec<Triple> = template()
            .to_triples()
            .into_iter()
            .filter(|t| {
                !(t.subject == format!("{EX}keyword") && t.predicate == vocab::RDFS_LABEL)
            })
            .collect();
        let parsed = Template::from_triples(&triples).unwrap();
        assert_eq!(parsed.term_label(&format!("{EX}keyword")), Some("keyword"));
    }

    #[test]
    fn missing_template_is_reported() {
        let triples = vec![Triple::new(p("x"), vocab::RDFS_LABEL, Node::literal("x"))];
        assert_eq!(
            Template::from_triples(&triples).unwrap_err(),
            ExchangeError::MissingTemplate
        );
    }

    #[test]
    fn incomplete_statement_is_reported() {
        let triples: Vec<Triple> = template()
            .to_triples()
            .into_iter()
            .filter(|t| !(t.subject == p("st01") && t.predicate == vocab::RDF_OBJECT))
            .collect();
        assert!(matches!(
            Template::from_triples(&triples),
            Err(ExchangeError::IncompleteStatement { .. })
        ));
    }

    #[test]
    fn introduced_external_iri_is_accepted() {
        let mut triples = template().to_triples();
        triples.push(Triple::new(
            p("paper"),
            vocab::RDF_TYPE,
            Node::iri(PlaceholderKind::ExternalResource.class_iri()),
        ));
        let parsed = Template::from_triples(&triples).unwrap();
        assert_eq!(
            parsed.placeholder(&p("paper")).map(|p| p.kind()),
            Some(PlaceholderKind::IntroducedResource)
        );
    }

    #[test]
    fn conflicting_kinds_are_ambiguous() {
        let mut triples = template().to_triples();
        triples.push(Triple::new(
            p("keyword"),
            vocab::RDF_TYPE,
            Node::iri(PlaceholderKind::Resource.class_iri()),
        ));
        assert!(matches!(
            Template::from_triples(&triples),
            Err(ExchangeError::AmbiguousKind { .. })
        ));
    }
}
