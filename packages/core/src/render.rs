//! Human-readable text rendering of [`Template`]s and [`Document`]s.
//!
//! The output is stable plain text for terminals and logs. It is not an
//! exchange format; only the RDF serializations are normative.

use crate::document::Document;
use crate::rdf::{Node, Triple};
use crate::statement::Slot;
use crate::template::Template;
use crate::vocab;

/// Render a template as its numbered statement list.
///
/// ```text
/// Scientific paper
/// ────────────────
/// Describes a scientific paper with its title and publication date.
///
///  1. <paper> is a ScholarlyArticle
///  2. <paper> has title <title>
///  3. <paper> publication date <date>  [optional]
///  4. <paper> uses method <method>  [optional, repeatable, if has methods]
///
/// Placeholders:
///   paper   introduced-resource  "paper"
///   title   literal              "title"
/// ```
pub fn render_template(template: &Template) -> String {
    let header = template.label().to_string();
    let rule = "─".repeat(header.chars().count().max(1));
    let mut out = format!("{header}\n{rule}\n");
    if !template.description().is_empty() {
        out.push_str(&wrap(template.description(), 80));
        out.push('\n');
    }
    if !template.tags().is_empty() {
        out.push_str(&format!("tags: {}\n", template.tags().join(", ")));
    }

    out.push('\n');
    for (i, st) in template.statements().iter().enumerate() {
        let mut line = format!(
            "{:>2}. {} {} {}",
            i + 1,
            slot(template, &st.subject),
            slot(template, &st.predicate),
            slot(template, &st.object)
        );

        let mut notes = Vec::new();
        if st.modifiers.optional {
            notes.push("optional".to_string());
        }
        if st.modifiers.repeatable {
            notes.push("repeatable".to_string());
        }
        if let Some(condition) = &st.condition {
            let label = template
                .placeholder(condition)
                .map(|p| p.label())
                .unwrap_or_else(|| vocab::local_name(condition));
            notes.push(format!("if {label}"));
        }
        if !notes.is_empty() {
            line.push_str(&format!("  [{}]", notes.join(", ")));
        }
        out.push_str(&line);
        out.push('\n');
    }

    if !template.placeholders().is_empty() {
        out.push_str("\nPlaceholders:\n");
        let width = template
            .placeholders()
            .iter()
            .map(|p| p.name().len())
            .max()
            .unwrap_or(0);
        for p in template.placeholders() {
            out.push_str(&format!(
                "  {:<width$}  {:<20} \"{}\"\n",
                p.name(),
                p.kind().to_string(),
                p.label()
            ));
        }
    }
    out
}

/// Render a document segment by segment.
///
/// ```text
/// Document http://purl.org/nanopub/temp/np/
/// ─────────────────────────────────────────
///
/// ASSERTION (2)
///   <urn:x:1> rdfs:label "alpha"
///   <urn:x:1> rdfs:label "beta"
///
/// PROVENANCE (1)
///   ...
/// ```
pub fn render_document(document: &Document) -> String {
    let header = format!("Document {}", document.iri());
    let rule = "─".repeat(header.chars().count());
    let mut out = format!("{header}\n{rule}\n");
    if let Some(concept) = document.introduces() {
        out.push_str(&format!("introduces: {concept}\n"));
    }

    let sections = [
        ("ASSERTION", document.assertion()),
        ("PROVENANCE", document.provenance()),
        ("PUBINFO", document.pubinfo()),
    ];
    for (name, triples) in sections {
        out.push('\n');
        out.push_str(&format!("{name} ({})\n", triples.len()));
        for t in triples {
            out.push_str(&format!("  {}\n", triple(t)));
        }
    }
    out
}

// --- helpers -----------------------------------------------------------------

fn slot(template: &Template, slot: &Slot) -> String {
    match slot {
        Slot::Placeholder(id) => {
            let label = template.placeholder(id).map(|p| p.label()).unwrap_or(id.as_str());
            format!("<{label}>")
        }
        Slot::Term(id) => template
            .term_label(id)
            .map(str::to_string)
            .or_else(|| vocab::compact(id))
            .unwrap_or_else(|| format!("<{id}>")),
    }
}

fn triple(t: &Triple) -> String {
    format!("{} {} {}", iri(&t.subject), iri(&t.predicate), node(&t.object))
}

fn iri(value: &str) -> String {
    vocab::compact(value).unwrap_or_else(|| format!("<{value}>"))
}

fn node(n: &Node) -> String {
    match n {
        Node::Iri { value } => iri(value),
        Node::Literal {
            value,
            datatype: None,
        } => format!("\"{}\"", truncate(value, 72)),
        Node::Literal {
            value,
            datatype: Some(dt),
        } => format!("\"{}\"^^{}", truncate(value, 72), iri(dt)),
    }
}

fn wrap(content: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0usize;
    for word in content.split_whitespace() {
        if line_len > 0 && line_len + word.len() + 1 > width {
            result.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }
    result
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max {
        s.replace('\n', " ")
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{}…", cut.replace('\n', " "))
    }
}

// --- tests -------------------------------------------------------------------
