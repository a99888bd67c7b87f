//! N-Quads and TriG readers, backed by `sophia_turtle`.
//!
//! Parsed quads are mapped onto the engine's model: IRIs, plain and
//! datatyped literals, and a graph label (quads in the default graph get
//! `""`). Blank nodes and language-tagged literals have no place in a
//! document and are reported as [`ExchangeError::UnsupportedTerm`].

use sophia_api::quad::Quad as _;
use sophia_api::source::{QuadSource, StreamError};
use sophia_api::term::{Term, TermKind};
use sophia_turtle::parser::{nq, trig};

use crate::error::ExchangeError;
use crate::rdf::{Node, Quad};

/// Parse an N-Quads document.
pub fn parse_nquads(input: &str) -> Result<Vec<Quad>, ExchangeError> {
    collect(nq::parse_str(input))
}

/// Parse a TriG document, prefixes and all.
pub fn parse_trig(input: &str) -> Result<Vec<Quad>, ExchangeError> {
    collect(trig::parse_str(input))
}

fn collect<S: QuadSource>(mut source: S) -> Result<Vec<Quad>, ExchangeError> {
    let mut quads = Vec::new();
    source
        .try_for_each_quad(|q| {
            quads.push(Quad {
                subject: iri(q.s())?,
                predicate: iri(q.p())?,
                object: node(q.o())?,
                graph: match q.g() {
                    Some(g) => iri(g)?,
                    None => String::new(),
                },
            });
            Ok::<_, ExchangeError>(())
        })
        .map_err(|e| match e {
            StreamError::SourceError(e) => ExchangeError::Syntax(e.to_string()),
            StreamError::SinkError(e) => e,
        })?;
    Ok(quads)
}

fn iri<T: Term>(t: T) -> Result<String, ExchangeError> {
    match t.iri() {
        Some(iri) => Ok(iri.as_str().to_string()),
        None => Err(unsupported(&t)),
    }
}

fn node<T: Term>(t: T) -> Result<Node, ExchangeError> {
    match t.kind() {
        TermKind::Iri => iri(t).map(Node::iri),
        TermKind::Literal if t.language_tag().is_none() => {
            let value = t.lexical_form().map(|v| v.to_string()).unwrap_or_default();
            Ok(match t.datatype() {
                Some(dt) => Node::typed(value, dt.as_str()),
                None => Node::literal(value),
            })
        }
        _ => Err(unsupported(&t)),
    }
}

fn unsupported<T: Term>(t: &T) -> ExchangeError {
    let what = match t.kind() {
        TermKind::BlankNode => "blank node",
        TermKind::Literal => "language-tagged literal",
        TermKind::Iri => "IRI",
        _ => "term",
    };
    ExchangeError::UnsupportedTerm(what.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::{to_nquads, to_trig};
    use crate::vocab;

    const GRAPH: &str = "http://purl.org/nanopub/temp/np/assertion";

    fn quad(object: Node) -> Quad {
        Quad {
            subject: "http://purl.org/nanopub/temp/np/claim".into(),
            predicate: vocab::RDFS_LABEL.into(),
            object,
            graph: GRAPH.into(),
        }
    }

    fn sample() -> Vec<Quad> {
        vec![
            quad(Node::literal("line one\nsays \"hi\" \\ bye\t!")),
            quad(Node::typed("2024-01-01", vocab::XSD_DATE)),
            quad(Node::literal("<p>rich text</p>")),
            quad(Node::iri("http://example.org/Claim")),
        ]
    }

    #[test]
    fn nquads_escapes_survive_a_reparse() {
        assert_eq!(parse_nquads(&to_nquads(&sample())).unwrap(), sample());
    }

    #[test]
    fn trig_output_reads_back() {
        let prefixes = [("this".to_string(), "http://purl.org/nanopub/temp/np/".to_string())];
        let text = to_trig(&sample(), &prefixes);
        assert_eq!(parse_trig(&text).unwrap(), sample());
    }

    #[test]
    fn default_graph_comments_and_unicode_escapes() {
        let input = "# a comment\n\n<urn:a> <urn:b> \"caf\\u00E9\" .\n";
        let quads = parse_nquads(input).unwrap();
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].graph, "");
        assert_eq!(quads[0].object, Node::literal("café"));
    }

    #[test]
    fn explicit_xsd_string_is_a_plain_literal() {
        let input = "<urn:a> <urn:b> \"x\"^^<http://www.w3.org/2001/XMLSchema#string> .\n";
        assert_eq!(parse_nquads(input).unwrap()[0].object, Node::literal("x"));
    }

    #[test]
    fn blank_nodes_and_language_tags_are_unsupported() {
        assert!(matches!(
            parse_nquads("<urn:a> <urn:b> _:b0 .\n"),
            Err(ExchangeError::UnsupportedTerm(_))
        ));
        assert!(matches!(
            parse_nquads("<urn:a> <urn:b> \"x\"@en .\n"),
            Err(ExchangeError::UnsupportedTerm(_))
        ));
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(matches!(
            parse_nquads("<urn:a> <urn:b> <urn:c>\n"),
            Err(ExchangeError::Syntax(_))
        ));
        assert!(matches!(
            parse_trig("@prefix ex: <urn:x:> .\nex:a ex:b"),
            Err(ExchangeError::Syntax(_))
        ));
    }
}
