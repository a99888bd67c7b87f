//! IRIs of the template wire vocabulary.
//!
//! These are the engine's own terms (how templates, placeholders, statements,
//! and nanopublication segments are described). Domain vocabulary used by a
//! particular template is registered through [`TermRegistry`](crate::TermRegistry)
//! instead and never appears here.

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const DCT: &str = "http://purl.org/dc/terms/";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const PROV: &str = "http://www.w3.org/ns/prov#";
pub const NP: &str = "http://www.nanopub.org/nschema#";
pub const NPX: &str = "http://purl.org/nanopub/x/";
pub const NT: &str = "https://w3id.org/np/o/ntemplate/";

/// Namespace of an unsigned document. Every IRI under it is rewritten to the
/// document's final, content-addressed IRI when the document is signed.
pub const TEMP_NS: &str = "http://purl.org/nanopub/temp/np/";

/// Base of final document IRIs; the artifact code is appended.
pub const FINAL_BASE: &str = "https://w3id.org/np/";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_SUBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#subject";
pub const RDF_PREDICATE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#predicate";
pub const RDF_OBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#object";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const DCT_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
pub const DCT_CREATED: &str = "http://purl.org/dc/terms/created";
pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
pub const PROV_WAS_ATTRIBUTED_TO: &str = "http://www.w3.org/ns/prov#wasAttributedTo";

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
pub const XSD_DURATION: &str = "http://www.w3.org/2001/XMLSchema#duration";
pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

pub const NP_NANOPUBLICATION: &str = "http://www.nanopub.org/nschema#Nanopublication";
pub const NP_HAS_ASSERTION: &str = "http://www.nanopub.org/nschema#hasAssertion";
pub const NP_HAS_PROVENANCE: &str = "http://www.nanopub.org/nschema#hasProvenance";
pub const NP_HAS_PUBINFO: &str = "http://www.nanopub.org/nschema#hasPublicationInfo";

pub const NPX_SIGNED_BY: &str = "http://purl.org/nanopub/x/signedBy";
pub const NPX_HAS_SIGNATURE: &str = "http://purl.org/nanopub/x/hasSignature";
pub const NPX_HAS_SIGNATURE_TARGET: &str = "http://purl.org/nanopub/x/hasSignatureTarget";
pub const NPX_HAS_PUBLIC_KEY: &str = "http://purl.org/nanopub/x/hasPublicKey";
pub const NPX_HAS_ALGORITHM: &str = "http://purl.org/nanopub/x/hasAlgorithm";
pub const NPX_INTRODUCES: &str = "http://purl.org/nanopub/x/introduces";

pub const NT_ASSERTION_TEMPLATE: &str = "https://w3id.org/np/o/ntemplate/AssertionTemplate";
pub const NT_HAS_STATEMENT: &str = "https://w3id.org/np/o/ntemplate/hasStatement";
pub const NT_HAS_TAG: &str = "https://w3id.org/np/o/ntemplate/hasTag";
pub const NT_HAS_TARGET_TYPE: &str = "https://w3id.org/np/o/ntemplate/hasTargetNanopubType";
pub const NT_HAS_LABEL_PATTERN: &str = "https://w3id.org/np/o/ntemplate/hasNanopubLabelPattern";
pub const NT_OPTIONAL_STATEMENT: &str = "https://w3id.org/np/o/ntemplate/OptionalStatement";
pub const NT_REPEATABLE_STATEMENT: &str = "https://w3id.org/np/o/ntemplate/RepeatableStatement";
pub const NT_STATEMENT_IRI: &str = "https://w3id.org/np/o/ntemplate/statementIri";
pub const NT_HAS_REGEX: &str = "https://w3id.org/np/o/ntemplate/hasRegex";
pub const NT_HAS_DATATYPE: &str = "https://w3id.org/np/o/ntemplate/hasDatatype";
pub const NT_POSSIBLE_VALUE: &str = "https://w3id.org/np/o/ntemplate/possibleValue";
pub const NT_POSSIBLE_VALUES_FROM_API: &str =
    "https://w3id.org/np/o/ntemplate/possibleValuesFromApi";
pub const NT_HAS_PREFIX: &str = "https://w3id.org/np/o/ntemplate/hasPrefix";
pub const NT_HAS_PREFIX_LABEL: &str = "https://w3id.org/np/o/ntemplate/hasPrefixLabel";
pub const NT_WAS_CREATED_FROM_TEMPLATE: &str =
    "https://w3id.org/np/o/ntemplate/wasCreatedFromTemplate";

/// Predicates that belong to provenance, publication info, or the signature
/// block. They must never occur in an assertion segment.
pub const RESERVED_PREDICATES: &[&str] = &[
    PROV_WAS_ATTRIBUTED_TO,
    NPX_SIGNED_BY,
    NPX_HAS_SIGNATURE,
    NPX_HAS_SIGNATURE_TARGET,
    NPX_HAS_PUBLIC_KEY,
    NPX_HAS_ALGORITHM,
    NPX_INTRODUCES,
    NP_HAS_ASSERTION,
    NP_HAS_PROVENANCE,
    NP_HAS_PUBINFO,
];

/// Prefixes used when rendering or when expanding compact names in a
/// [`TemplateDefinition`](crate::TemplateDefinition).
pub const STANDARD_PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("xsd", XSD),
    ("dct", DCT),
    ("dcterms", DCT),
    ("foaf", FOAF),
    ("prov", PROV),
    ("np", NP),
    ("npx", NPX),
    ("nt", NT),
];

pub fn is_reserved_predicate(iri: &str) -> bool {
    RESERVED_PREDICATES.contains(&iri)
}

/// Local names the document itself occupies under [`TEMP_NS`]: the segment
/// graphs and the signature node. The empty name is the document IRI.
pub const RESERVED_LOCAL_NAMES: &[&str] =
    &["", "Head", "assertion", "provenance", "pubinfo", "sig"];

pub fn is_reserved_local_name(name: &str) -> bool {
    RESERVED_LOCAL_NAMES.contains(&name)
}

/// The text after the last `#` or `/` of an IRI, falling back to the text
/// after the last `:` (for `urn:` style identifiers).
///
/// Label-pattern markers (`${name}`) and binding files refer to placeholders
/// by this name.
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['#', '/']) {
        Some(i) if i + 1 < iri.len() => &iri[i + 1..],
        _ => iri.rsplit(':').next().unwrap_or(iri),
    }
}

/// Shorten an IRI to `prefix:local` using [`STANDARD_PREFIXES`], if one matches
/// and the remainder is a plain name.
pub fn compact(iri: &str) -> Option<String> {
    STANDARD_PREFIXES.iter().find_map(|(prefix, ns)| {
        let rest = iri.strip_prefix(ns)?;
        let plain = !rest.is_empty()
            && rest
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        plain.then(|| format!("{prefix}:{rest}"))
    })
}
