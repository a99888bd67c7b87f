//! Typed, constrained slots that are filled in when a template is used.
//!
//! A [`Placeholder`] is created once through [`Placeholder::new`], which
//! rejects contradictory constraint sets, and is afterwards only referenced.
//! At instantiation time [`Placeholder::resolve`] checks a raw binding value
//! against the placeholder's constraints and turns it into the RDF node that
//! appears in the assertion.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, InstantiationError};
use crate::rdf::Node;
use crate::vocab;

/// What kind of value a placeholder accepts and how it is rendered.
///
/// Serialises as a kebab-case string (e.g. `"restricted-choice"`). On the
/// wire each kind is one `nt:` class, see [`PlaceholderKind::class_iri`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceholderKind {
    /// Free text, emitted as a literal.
    Literal,
    /// Any IRI.
    Resource,
    /// An IRI minted outside the document (a DOI, an ORCID, ...).
    ExternalResource,
    /// An IRI picked with the help of lookup endpoints.
    GuidedChoice,
    /// One of a fixed list of values.
    RestrictedChoice,
    /// The concept this document introduces: a local name minted at signing,
    /// or an existing IRI.
    IntroducedResource,
    /// Free text, percent-encoded under a prefix to form an IRI.
    #[serde(rename = "auto-escaped-uri")]
    AutoEscapedUri,
    /// A resource local to the document; named locally, minted at signing.
    LocalResource,
}

impl PlaceholderKind {
    pub const ALL: [PlaceholderKind; 8] = [
        PlaceholderKind::Literal,
        PlaceholderKind::Resource,
        PlaceholderKind::ExternalResource,
        PlaceholderKind::GuidedChoice,
        PlaceholderKind::RestrictedChoice,
        PlaceholderKind::IntroducedResource,
        PlaceholderKind::AutoEscapedUri,
        PlaceholderKind::LocalResource,
    ];

    /// The `nt:` class that marks a placeholder of this kind.
    pub fn class_iri(self) -> &'static str {
        match self {
            PlaceholderKind::Literal => "https://w3id.org/np/o/ntemplate/LiteralPlaceholder",
            PlaceholderKind::Resource => "https://w3id.org/np/o/ntemplate/UriPlaceholder",
            PlaceholderKind::ExternalResource => {
                "https://w3id.org/np/o/ntemplate/ExternalUriPlaceholder"
            }
            PlaceholderKind::GuidedChoice => {
                "https://w3id.org/np/o/ntemplate/GuidedChoicePlaceholder"
            }
            PlaceholderKind::RestrictedChoice => {
                "https://w3id.org/np/o/ntemplate/RestrictedChoicePlaceholder"
            }
            PlaceholderKind::IntroducedResource => {
                "https://w3id.org/np/o/ntemplate/IntroducedResource"
            }
            PlaceholderKind::AutoEscapedUri => {
                "https://w3id.org/np/o/ntemplate/AutoEscapeUriPlaceholder"
            }
            PlaceholderKind::LocalResource => "https://w3id.org/np/o/ntemplate/LocalResource",
        }
    }

    pub fn from_class_iri(iri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.class_iri() == iri)
    }

    /// Whether values of this kind become IRIs minted inside the document.
    pub fn is_document_local(self) -> bool {
        matches!(
            self,
            PlaceholderKind::IntroducedResource | PlaceholderKind::LocalResource
        )
    }
}

/// Formats the kind as its kebab-case string (e.g. `"guided-choice"`).
impl std::fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlaceholderKind::Literal => "literal",
            PlaceholderKind::Resource => "resource",
            PlaceholderKind::ExternalResource => "external-resource",
            PlaceholderKind::GuidedChoice => "guided-choice",
            PlaceholderKind::RestrictedChoice => "restricted-choice",
            PlaceholderKind::IntroducedResource => "introduced-resource",
            PlaceholderKind::AutoEscapedUri => "auto-escaped-uri",
            PlaceholderKind::LocalResource => "local-resource",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PlaceholderKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.to_string() == s)
            .ok_or_else(|| {
                format!(
                    "unknown placeholder kind {:?}; expected one of: literal, resource, \
                     external-resource, guided-choice, restricted-choice, \
                     introduced-resource, auto-escaped-uri, local-resource",
                    s
                )
            })
    }
}

/// Datatype tag of a literal placeholder.
///
/// The XSD types below are checked lexically; any other datatype IRI is
/// carried through to the emitted literal without a lexical check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Datatype {
    String,
    Boolean,
    Integer,
    Decimal,
    Date,
    DateTime,
    Duration,
    AnyUri,
    Other(String),
}

impl Datatype {
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            vocab::XSD_STRING => Datatype::String,
            vocab::XSD_BOOLEAN => Datatype::Boolean,
            vocab::XSD_INTEGER => Datatype::Integer,
            vocab::XSD_DECIMAL => Datatype::Decimal,
            vocab::XSD_DATE => Datatype::Date,
            vocab::XSD_DATE_TIME => Datatype::DateTime,
            vocab::XSD_DURATION => Datatype::Duration,
            vocab::XSD_ANY_URI => Datatype::AnyUri,
            other => Datatype::Other(other.to_string()),
        }
    }

    pub fn iri(&self) -> &str {
        match self {
            Datatype::String => vocab::XSD_STRING,
            Datatype::Boolean => vocab::XSD_BOOLEAN,
            Datatype::Integer => vocab::XSD_INTEGER,
            Datatype::Decimal => vocab::XSD_DECIMAL,
            Datatype::Date => vocab::XSD_DATE,
            Datatype::DateTime => vocab::XSD_DATE_TIME,
            Datatype::Duration => vocab::XSD_DURATION,
            Datatype::AnyUri => vocab::XSD_ANY_URI,
            Datatype::Other(iri) => iri,
        }
    }

    /// Check that `value` is in the lexical space of this datatype.
    pub fn check(&self, value: &str) -> Result<(), String> {
        let ok = match self {
            Datatype::String | Datatype::Other(_) => true,
            Datatype::Boolean => matches!(value, "true" | "false" | "1" | "0"),
            Datatype::Integer => INTEGER_RE.is_match(value),
            Datatype::Decimal => DECIMAL_RE.is_match(value),
            Datatype::Date => {
                DATE_RE.is_match(value)
                    && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
            }
            Datatype::DateTime => {
                chrono::DateTime::parse_from_rfc3339(value).is_ok()
                    || chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                        .is_ok()
            }
            Datatype::Duration => {
                DURATION_RE.is_match(value) && !value.ends_with(['P', 'T'])
            }
            Datatype::AnyUri => is_absolute_iri(value),
        };
        if ok {
            Ok(())
        } else {
            Err(format!("{value:?} is not a valid {}", self.iri()))
        }
    }
}

impl From<String> for Datatype {
    fn from(iri: String) -> Self {
        Datatype::from_iri(&iri)
    }
}

impl From<Datatype> for String {
    fn from(dt: Datatype) -> Self {
        dt.iri().to_string()
    }
}

/// Declared constraints of a placeholder. All present constraints must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Full-match regular expression on the raw value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Datatype>,

    /// Ordered list of permitted values (IRIs or plain literals).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<Node>,

    /// Lookup endpoints for interactive value search. Carried, never called.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_sources: Vec<String>,

    /// IRI prefix for [`PlaceholderKind::AutoEscapedUri`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_label: Option<String>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    pub fn datatype(mut self, datatype: Datatype) -> Self {
        self.datatype = Some(datatype);
        self
    }

    pub fn allow(mut self, value: Node) -> Self {
        self.allowed_values.push(value);
        self
    }

    pub fn value_source(mut self, endpoint: impl Into<String>) -> Self {
        self.value_sources.push(endpoint.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>, label: Option<String>) -> Self {
        self.prefix = Some(prefix.into());
        self.prefix_label = label;
        self
    }
}

/// A named, typed, constrained slot.
///
/// Two placeholders are equal iff their ids match; use
/// [`Placeholder::same_definition`] to compare every field.
#[derive(Debug, Clone)]
pub struct Placeholder {
    id: String,
    kind: PlaceholderKind,
    label: String,
    constraints: Constraints,
    pattern: Option<Regex>,
}

impl Placeholder {
    /// Declare a placeholder, rejecting constraint sets that cannot be
    /// satisfied or make no sense for `kind`.
    pub fn new(
        id: impl Into<String>,
        kind: PlaceholderKind,
        label: impl Into<String>,
        constraints: Constraints,
    ) -> Result<Self, DefinitionError> {
        let id = id.into();
        let label = label.into();
        let invalid = |reason: String| DefinitionError::InvalidConstraintCombination {
            placeholder: id.clone(),
            reason,
        };

        if label.trim().is_empty() {
            return Err(invalid("label must not be empty".into()));
        }
        if kind == PlaceholderKind::RestrictedChoice && constraints.allowed_values.is_empty() {
            return Err(invalid(
                "a restricted choice needs at least one allowed value".into(),
            ));
        }
        if kind == PlaceholderKind::Literal && !constraints.value_sources.is_empty() {
            return Err(invalid(
                "value source endpoints only apply to resource-valued placeholders".into(),
            ));
        }
        if kind != PlaceholderKind::AutoEscapedUri
            && (constraints.prefix.is_some() || constraints.prefix_label.is_some())
        {
            return Err(invalid(format!("a prefix only applies to auto-escaped URIs, not {kind}")));
        }
        if constraints.datatype.is_some()
            && !matches!(
                kind,
                PlaceholderKind::Literal | PlaceholderKind::RestrictedChoice
            )
        {
            return Err(invalid(format!("a datatype does not apply to {kind} placeholders")));
        }

        let pattern = match &constraints.regex {
            Some(source) => Some(
                Regex::new(&format!("^(?:{source})$"))
                    .map_err(|e| invalid(format!("invalid regex {source:?}: {e}")))?,
            ),
            None => None,
        };

        let placeholder = Self {
            id: id.clone(),
            kind,
            label,
            constraints,
            pattern,
        };

        // Every literal option of a restricted choice must pass the
        // placeholder's own checks, otherwise it could never be chosen.
        for option in &placeholder.constraints.allowed_values {
            if let Node::Literal { value, .. } = option {
                if let Err(reason) = placeholder.check_lexical(value) {
                    return Err(invalid(format!("allowed value {value:?} is unusable: {reason}")));
                }
            }
        }

        Ok(placeholder)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> PlaceholderKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// The local name used by label-pattern markers and binding files.
    pub fn name(&self) -> &str {
        vocab::local_name(&self.id)
    }

    /// Field-by-field equality (as opposed to `==`, which compares ids).
    pub fn same_definition(&self, other: &Placeholder) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.label == other.label
            && self.constraints == other.constraints
    }

    /// Validate a raw binding value and turn it into the node that replaces
    /// this placeholder in the assertion.
    pub fn resolve(&self, raw: &str) -> Result<Node, InstantiationError> {
        let violation = |reason: String| InstantiationError::ConstraintViolation {
            placeholder: self.id.clone(),
            reason,
        };

        self.check_lexical(raw).map_err(violation)?;

        if !self.constraints.allowed_values.is_empty() {
            let chosen = self
                .constraints
                .allowed_values
                .iter()
                .find(|v| v.value() == raw)
                .ok_or_else(|| violation(format!("{raw:?} is not one of the allowed values")))?;
            if self.kind == PlaceholderKind::RestrictedChoice {
                return Ok(match (chosen, &self.constraints.datatype) {
                    (Node::Literal { value, .. }, Some(dt)) => Node::typed(value.clone(), dt.iri()),
                    _ => chosen.clone(),
                });
            }
        }

        match self.kind {
            PlaceholderKind::Literal => Ok(match &self.constraints.datatype {
                Some(dt) => Node::typed(raw, dt.iri()),
                None => Node::literal(raw),
            }),
            PlaceholderKind::Resource
            | PlaceholderKind::ExternalResource
            | PlaceholderKind::GuidedChoice
            | PlaceholderKind::RestrictedChoice => {
                if is_absolute_iri(raw) {
                    Ok(Node::iri(raw))
                } else {
                    Err(violation(format!("{raw:?} is not an absolute IRI")))
                }
            }
            // An introduced concept may also be an existing IRI (a DOI, say).
            PlaceholderKind::IntroducedResource if is_absolute_iri(raw) => Ok(Node::iri(raw)),
            PlaceholderKind::IntroducedResource | PlaceholderKind::LocalResource => {
                if !LOCAL_NAME_RE.is_match(raw) {
                    Err(violation(format!(
                        "{raw:?} is not a valid local name (letters, digits, '_', '-', '.')"
                    )))
                } else if vocab::is_reserved_local_name(raw) {
                    Err(violation(format!("{raw:?} names a part of the document itself")))
                } else {
                    Ok(Node::iri(format!("{}{raw}", vocab::TEMP_NS)))
                }
            }
            PlaceholderKind::AutoEscapedUri => {
                let escaped = urlencoding::encode(raw);
                match self.constraints.prefix.as_deref() {
                    Some(base) => Ok(Node::iri(format!("{base}{escaped}"))),
                    None if vocab::is_reserved_local_name(&escaped) => {
                        Err(violation(format!("{raw:?} names a part of the document itself")))
                    }
                    None => Ok(Node::iri(format!("{}{escaped}", vocab::TEMP_NS))),
                }
            }
        }
    }

    // Regex and datatype checks on the raw value.
    fn check_lexical(&self, raw: &str) -> Result<(), String> {
        if let Some(re) = &self.pattern {
            if !re.is_match(raw) {
                return Err(format!(
                    "{raw:?} does not match pattern {:?}",
                    self.constraints.regex.as_deref().unwrap_or_default()
                ));
            }
        }
        if let Some(dt) = &self.constraints.datatype {
            dt.check(raw)?;
        }
        Ok(())
    }
}

impl PartialEq for Placeholder {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Placeholder {}

impl std::hash::Hash for Placeholder {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Whether `s` looks like an absolute IRI (`scheme:rest`, no whitespace).
pub fn is_absolute_iri(s: &str) -> bool {
    IRI_RE.is_match(s)
}

// --- helpers -----------------------------------------------------------------

static IRI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>"{}|\\^`]+$"#).expect("invalid IRI regex")
});

static LOCAL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("invalid local name regex")
});

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("invalid integer regex"));

static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("invalid decimal regex")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("invalid date regex"));

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?P(\d+Y)?(\d+M)?(\d+D)?(T(\d+H)?(\d+M)?(\d+(\.\d+)?S)?)?$")
        .expect("invalid duration regex")
});

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://w3id.org/np/RAScientificPaperTemplate#";

    fn id(name: &str) -> String {
        format!("{BASE}{name}")
    }

    fn date_placeholder() -> Placeholder {
        Placeholder::new(
            id("publicationDate"),
            PlaceholderKind::Literal,
            "Publication date (YYYY-MM-DD format)",
            Constraints::new()
                .regex(r"\d{4}-\d{2}-\d{2}")
                .datatype(Datatype::Date),
        )
        .unwrap()
    }

    fn boolean_choice() -> Placeholder {
        Placeholder::new(
            id("hasMethods"),
            PlaceholderKind::RestrictedChoice,
            "Does the paper have a methods section?",
            Constraints::new()
                .allow(Node::literal("true"))
                .allow(Node::literal("false")),
        )
        .unwrap()
    }

    #[test]
    fn restricted_choice_requires_values() {
        let err = Placeholder::new(
            id("citationType"),
            PlaceholderKind::RestrictedChoice,
            "Type of citation",
            Constraints::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidConstraintCombination { .. }));
    }

    #[test]
    fn literal_rejects_value_sources() {
        let err = Placeholder::new(
            id("title"),
            PlaceholderKind::Literal,
            "Title",
            Constraints::new().value_source("https://www.wikidata.org/w/api.php?search="),
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidConstraintCombination { .. }));
    }

    #[test]
    fn guided_choice_keeps_value_sources() {
        let p = Placeholder::new(
            id("researchField"),
            PlaceholderKind::GuidedChoice,
            "Research field",
            Constraints::new().value_source("https://www.wikidata.org/w/api.php?search="),
        )
        .unwrap();
        assert_eq!(p.constraints().value_sources.len(), 1);
    }

    #[test]
    fn prefix_only_on_auto_escaped() {
        let err = Placeholder::new(
            id("paper"),
            PlaceholderKind::ExternalResource,
            "Paper",
            Constraints::new().prefix("http://purl.org/aida/", None),
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidConstraintCombination { .. }));
    }

    #[test]
    fn invalid_regex_is_a_definition_error() {
        let err = Placeholder::new(
            id("title"),
            PlaceholderKind::Literal,
            "Title",
            Constraints::new().regex("(unclosed"),
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidConstraintCombination { .. }));
    }

    #[test]
    fn regex_and_datatype_must_both_hold() {
        let p = date_placeholder();
        assert_eq!(
            p.resolve("2024-03-01").unwrap(),
            Node::typed("2024-03-01", vocab::XSD_DATE)
        );
        // Matches the regex but is not a calendar date.
        assert!(matches!(
            p.resolve("2024-02-30"),
            Err(InstantiationError::ConstraintViolation { .. })
        ));
        assert!(matches!(
            p.resolve("next Tuesday"),
            Err(InstantiationError::ConstraintViolation { .. })
        ));
    }

    #[test]
    fn regex_is_full_match() {
        let p = Placeholder::new(
            id("title"),
            PlaceholderKind::Literal,
            "Title",
            Constraints::new().regex(".{5,10}"),
        )
        .unwrap();
        assert!(p.resolve("short").is_ok());
        assert!(p.resolve("much longer than ten").is_err());
    }

    #[test]
    fn restricted_choice_returns_the_allowed_node() {
        let cito = "http://purl.org/spar/cito/";
        let p = Placeholder::new(
            id("citationType"),
            PlaceholderKind::RestrictedChoice,
            "Type of citation",
            Constraints::new()
                .allow(Node::iri(format!("{cito}cites")))
                .allow(Node::iri(format!("{cito}extends"))),
        )
        .unwrap();
        assert_eq!(
            p.resolve(&format!("{cito}extends")).unwrap(),
            Node::iri(format!("{cito}extends"))
        );
        assert!(p.resolve(&format!("{cito}refutes")).is_err());

        assert_eq!(boolean_choice().resolve("false").unwrap(), Node::literal("false"));
    }

    #[test]
    fn resource_values_must_be_absolute() {
        let p = Placeholder::new(
            id("journal"),
            PlaceholderKind::ExternalResource,
            "Journal",
            Constraints::new(),
        )
        .unwrap();
        assert_eq!(p.resolve("urn:x:1").unwrap(), Node::iri("urn:x:1"));
        assert!(p.resolve("not an iri").is_err());
    }

    #[test]
    fn auto_escaped_uses_prefix() {
        let p = Placeholder::new(
            id("aida"),
            PlaceholderKind::AutoEscapedUri,
            "AIDA sentence",
            Constraints::new()
                .regex(r"[\S ]{5,500}\.")
                .prefix("http://purl.org/aida/", Some("The sentence".into())),
        )
        .unwrap();
        assert_eq!(
            p.resolve("Water boils.").unwrap(),
            Node::iri("http://purl.org/aida/Water%20boils.")
        );
    }

    #[test]
    fn local_resources_live_in_the_document_namespace() {
        let p = Placeholder::new(
            id("claim"),
            PlaceholderKind::IntroducedResource,
            "The claim",
            Constraints::new(),
        )
        .unwrap();
        assert_eq!(
            p.resolve("claim1").unwrap(),
            Node::iri(format!("{}claim1", vocab::TEMP_NS))
        );
        assert!(p.resolve("has space").is_err());
        assert_eq!(
            p.resolve("https://doi.org/10.1000/182").unwrap(),
            Node::iri("https://doi.org/10.1000/182")
        );
    }

    #[test]
    fn local_names_cannot_collide_with_document_parts() {
        for kind in [PlaceholderKind::LocalResource, PlaceholderKind::IntroducedResource] {
            let p = Placeholder::new(id("thing"), kind, "Thing", Constraints::new()).unwrap();
            for name in ["pubinfo", "assertion", "provenance", "Head", "sig"] {
                assert!(
                    matches!(
                        p.resolve(name),
                        Err(InstantiationError::ConstraintViolation { .. })
                    ),
                    "{kind} accepted {name:?}"
                );
            }
            assert!(p.resolve("pubinfo2").is_ok());
        }

        let unprefixed = Placeholder::new(
            id("sentence"),
            PlaceholderKind::AutoEscapedUri,
            "Sentence",
            Constraints::new(),
        )
        .unwrap();
        assert!(unprefixed.resolve("assertion").is_err());
        assert!(unprefixed.resolve("").is_err());
    }

    #[test]
    fn restricted_choice_checks_its_options_at_declaration() {
        let err = Placeholder::new(
            id("year"),
            PlaceholderKind::RestrictedChoice,
            "Year",
            Constraints::new()
                .regex(r"\d{4}")
                .allow(Node::literal("2024"))
                .allow(Node::literal("soon")),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::InvalidConstraintCombination { ref placeholder, .. }
                if placeholder == &id("year")
        ));
    }

    #[test]
    fn equality_is_by_id() {
        let a = date_placeholder();
        let b = Placeholder::new(
            id("publicationDate"),
            PlaceholderKind::Literal,
            "Another label",
            Constraints::new(),
        )
        .unwrap();
        assert_eq!(a, b);
        assert!(!a.same_definition(&b));
    }

    #[test]
    fn kind_string_roundtrip() {
        for kind in PlaceholderKind::ALL {
            assert_eq!(kind.to_string().parse::<PlaceholderKind>(), Ok(kind));
            assert_eq!(PlaceholderKind::from_class_iri(kind.class_iri()), Some(kind));
        }
    }

    #[test]
    fn datatype_lexical_checks() {
        assert!(Datatype::Decimal.check("0.75").is_ok());
        assert!(Datatype::Decimal.check("abc").is_err());
        assert!(Datatype::DateTime.check("2024-01-01T10:00:00Z").is_ok());
        assert!(Datatype::DateTime.check("2024-01-01T10:00:00").is_ok());
        assert!(Datatype::Duration.check("P1Y2M").is_ok());
        assert!(Datatype::Duration.check("PT").is_err());
        assert!(Datatype::Boolean.check("yes").is_err());
        assert!(Datatype::Other("http://example.org/dt".into()).check("anything").is_ok());
    }
}
