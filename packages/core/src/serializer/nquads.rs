//! N-Quads writer. Reading goes through [`parse`](super::parse).

use crate::rdf::{Node, Quad};

/// Serialize quads, one per line, in the given order.
pub fn to_nquads(quads: &[Quad]) -> String {
    let mut out = String::with_capacity(quads.len() * 128);
    for q in quads {
        out.push_str(&iri(&q.subject));
        out.push(' ');
        out.push_str(&iri(&q.predicate));
        out.push(' ');
        out.push_str(&node(&q.object));
        if !q.graph.is_empty() {
            out.push(' ');
            out.push_str(&iri(&q.graph));
        }
        out.push_str(" .\n");
    }
    out
}

pub(crate) fn iri(s: &str) -> String {
    format!("<{}>", s)
}

pub(crate) fn node(n: &Node) -> String {
    match n {
        Node::Iri { value } => iri(value),
        Node::Literal {
            value,
            datatype: None,
        } => format!("\"{}\"", escape(value)),
        Node::Literal {
            value,
            datatype: Some(dt),
        } => format!("\"{}\"^^{}", escape(value), iri(dt)),
    }
}

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
