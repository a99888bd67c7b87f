//! The minimal RDF model the engine emits: IRIs and literals, triples, and
//! quads labelled with a named graph.
//!
//! Blank nodes are deliberately absent. Every resource a document mints lives
//! in the temporary document namespace and becomes a real IRI when signed.

use serde::{Deserialize, Serialize};

use crate::vocab;

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Iri { value: String },
    Literal {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
    },
}

impl Node {
    pub fn iri(value: impl Into<String>) -> Self {
        Node::Iri { value: value.into() }
    }

    /// A plain (`xsd:string`) literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal {
            value: value.into(),
            datatype: None,
        }
    }

    /// A literal with an explicit datatype. `xsd:string` is normalised to a
    /// plain literal so both spellings compare equal.
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Node::Literal {
            value: value.into(),
            datatype: (datatype != vocab::XSD_STRING).then_some(datatype),
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri { value } => Some(value),
            Node::Literal { .. } => None,
        }
    }

    /// The lexical value, for IRIs and literals alike.
    pub fn value(&self) -> &str {
        match self {
            Node::Iri { value } | Node::Literal { value, .. } => value,
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Iri { value } => write!(f, "<{value}>"),
            Node::Literal { value, datatype: None } => write!(f, "{value:?}"),
            Node::Literal {
                value,
                datatype: Some(dt),
            } => write!(f, "{value:?}^^<{dt}>"),
        }
    }
}

/// A single statement. Subjects and predicates are always IRIs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Node) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    pub fn in_graph(&self, graph: impl Into<String>) -> Quad {
        Quad {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
            graph: graph.into(),
        }
    }
}

/// A triple plus the named graph it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub subject: String,
    pub predicate: String,
    pub object: Node,
    pub graph: String,
}

impl Quad {
    pub fn triple(&self) -> Triple {
        Triple::new(self.subject.clone(), self.predicate.clone(), self.object.clone())
    }
}

/// The named graphs of a document.
///
/// `Head` is packaging: it links the document IRI to the other three and is
/// produced by the serializers, never by the packager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Head,
    Assertion,
    Provenance,
    Pubinfo,
}

impl Segment {
    /// The local name of the segment's graph under the document IRI.
    pub fn local_name(self) -> &'static str {
        match self {
            Segment::Head => "Head",
            Segment::Assertion => "assertion",
            Segment::Provenance => "provenance",
            Segment::Pubinfo => "pubinfo",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.local_name())
    }
}
