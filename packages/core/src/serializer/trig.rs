//! TriG writer.
//!
//! Graphs are written in order of first appearance, subjects within a graph
//! likewise, and each subject's predicates joined with `;`. IRIs are
//! shortened with the standard prefixes plus any the caller supplies.

use crate::rdf::{Node, Quad};
use crate::serializer::nquads::escape;
use crate::vocab;

/// Serialize quads as TriG. `extra` prefixes take precedence over the
/// standard ones.
pub fn to_trig(quads: &[Quad], extra: &[(String, String)]) -> String {
    let mut prefixes: Vec<(&str, &str)> = extra
        .iter()
        .map(|(p, ns)| (p.as_str(), ns.as_str()))
        .collect();
    for (p, ns) in vocab::STANDARD_PREFIXES {
        if !prefixes.iter().any(|(q, n)| q == p || n == ns) {
            prefixes.push((*p, *ns));
        }
    }

    let mut out = String::with_capacity(quads.len() * 96);
    for (p, ns) in &prefixes {
        out.push_str(&format!("@prefix {p}: <{ns}> .\n"));
    }

    let mut graphs: Vec<&str> = Vec::new();
    for q in quads {
        if !graphs.contains(&q.graph.as_str()) {
            graphs.push(&q.graph);
        }
    }

    for graph in graphs {
        out.push('\n');
        if graph.is_empty() {
            out.push_str("{\n");
        } else {
            out.push_str(&format!("{} {{\n", term(graph, &prefixes)));
        }

        let in_graph: Vec<&Quad> = quads.iter().filter(|q| q.graph == graph).collect();
        let mut subjects: Vec<&str> = Vec::new();
        for q in &in_graph {
            if !subjects.contains(&q.subject.as_str()) {
                subjects.push(&q.subject);
            }
        }

        for subject in subjects {
            let pairs: Vec<String> = in_graph
                .iter()
                .filter(|q| q.subject == subject)
                .map(|q| {
                    let predicate = if q.predicate == vocab::RDF_TYPE {
                        "a".to_string()
                    } else {
                        term(&q.predicate, &prefixes)
                    };
                    format!("{predicate} {}", object(&q.object, &prefixes))
                })
                .collect();
            out.push_str(&format!(
                "  {} {} .\n",
                term(subject, &prefixes),
                pairs.join(" ;\n    ")
            ));
        }
        out.push_str("}\n");
    }
    out
}

fn term(iri: &str, prefixes: &[(&str, &str)]) -> String {
    prefixes
        .iter()
        .find_map(|(p, ns)| {
            let local = iri.strip_prefix(ns)?;
            plain_local(local).then(|| format!("{p}:{local}"))
        })
        .unwrap_or_else(|| format!("<{iri}>"))
}

fn object(node: &Node, prefixes: &[(&str, &str)]) -> String {
    match node {
        Node::Iri { value } => term(value, prefixes),
        Node::Literal {
            value,
            datatype: None,
        } => format!("\"{}\"", escape(value)),
        Node::Literal {
            value,
            datatype: Some(dt),
        } => format!("\"{}\"^^{}", escape(value), term(dt, prefixes)),
    }
}

// Local names written after a prefix; anything fancier stays a full IRI.
fn plain_local(local: &str) -> bool {
    !local.is_empty()
        && !local.ends_with('.')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !local.starts_with(['-', '.'])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMP: &str = "http://purl.org/nanopub/temp/np/";

    fn quads() -> Vec<Quad> {
        let g = format!("{TEMP}assertion");
        vec![
            Quad {
                subject: format!("{TEMP}claim"),
                predicate: vocab::RDF_TYPE.into(),
                object: Node::iri("http://example.org/Claim"),
                graph: g.clone(),
            },
            Quad {
                subject: format!("{TEMP}claim"),
                predicate: vocab::RDFS_LABEL.into(),
                object: Node::literal("say \"hi\""),
                graph: g.clone(),
            },
            Quad {
                subject: TEMP.into(),
                predicate: vocab::DCT_CREATED.into(),
                object: Node::typed("2025-01-02T03:04:05Z", vocab::XSD_DATE_TIME),
                graph: format!("{TEMP}pubinfo"),
            },
        ]
    }

    #[test]
    fn groups_by_graph_and_subject() {
        let out = to_trig(&quads(), &[("this".into(), TEMP.into())]);
        assert!(out.starts_with("@prefix this: <http://purl.org/nanopub/temp/np/> .\n"));
        assert!(out.contains("this:assertion {\n"));
        assert!(out.contains("  this:claim a <http://example.org/Claim> ;\n    rdfs:label \"say \\\"hi\\\"\" .\n"));
        assert!(out.contains("\"2025-01-02T03:04:05Z\"^^xsd:dateTime"));
        assert_eq!(out.matches("}\n").count(), 2);
    }

    #[test]
    fn dcterms_alias_is_not_repeated() {
        let out = to_trig(&quads(), &[]);
        assert!(out.contains("@prefix dct: "));
        assert!(!out.contains("@prefix dcterms: "));
    }

    #[test]
    fn document_iri_itself_stays_a_full_iri() {
        let out = to_trig(&quads(), &[("this".into(), TEMP.into())]);
        assert!(out.contains(&format!("  <{TEMP}> dct:created")));
    }
}
