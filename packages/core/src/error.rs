//! Authoring, instantiation, and exchange errors.
//!
//! A [`DefinitionError`] is fatal to the authoring call that raised it and
//! leaves prior session state untouched. An [`InstantiationError`] is fatal to
//! one document only; the template is never affected. An [`ExchangeError`]
//! covers reading quads back. Gateway failures live next to the gateway in
//! [`signing`](crate::signing).

use thiserror::Error;

/// Errors raised while registering terms, declaring placeholders, defining
/// statements, or assembling a template.
#[derive(Debug, Error, PartialEq)]
pub enum DefinitionError {
    #[error("term {id:?} is already registered with label {existing:?}, cannot relabel it {attempted:?}")]
    DuplicateLabelConflict {
        id: String,
        existing: String,
        attempted: String,
    },

    #[error("placeholder {placeholder:?}: {reason}")]
    InvalidConstraintCombination { placeholder: String, reason: String },

    #[error("statement {statement:?} references {reference:?}, which is neither a registered term nor a declared placeholder")]
    UnresolvedReference { statement: String, reference: String },

    #[error("{referenced_by} references unregistered term {term:?}")]
    UnknownTerm { referenced_by: String, term: String },

    #[error("{referenced_by} references undeclared placeholder {placeholder:?}")]
    DanglingPlaceholderReference {
        referenced_by: String,
        placeholder: String,
    },

    #[error("a template must contain at least one statement")]
    EmptyTemplate,

    #[error("statement {statement:?} uses reserved predicate {predicate:?}; attribution and signature predicates belong outside the assertion")]
    ReservedPredicate { statement: String, predicate: String },

    #[error("statement id {0:?} is defined more than once")]
    DuplicateStatement(String),

    #[error("placeholder {0:?} is declared more than once with different definitions")]
    DuplicatePlaceholder(String),

    #[error("only one introduced resource is allowed per template, found {first:?} and {second:?}")]
    MultipleIntroducedResources { first: String, second: String },
}

/// Errors raised while instantiating one document from a template.
#[derive(Debug, Error, PartialEq)]
pub enum InstantiationError {
    #[error("statement {statement:?} is required but placeholder {placeholder:?} has no binding")]
    MissingBinding { statement: String, placeholder: String },

    #[error("value for placeholder {placeholder:?} rejected: {reason}")]
    ConstraintViolation { placeholder: String, reason: String },

    #[error("binding given for {0:?}, which is not a placeholder of this template")]
    UndeclaredPlaceholder(String),

    #[error("cannot omit statement {statement:?}: {reason}")]
    InvalidOmission { statement: String, reason: String },

    #[error("statement {statement:?} is not repeatable but placeholder {placeholder:?} has {count} values")]
    UnexpectedRepetition {
        statement: String,
        placeholder: String,
        count: usize,
    },

    #[error("statement {statement:?} repeats {expected} times but placeholder {placeholder:?} has {found} values")]
    RepetitionMismatch {
        statement: String,
        placeholder: String,
        expected: usize,
        found: usize,
    },

    #[error("no statement was realized; the assertion would be empty")]
    EmptyAssertion,
}

/// Errors raised while reading a template or document back from quads.
#[derive(Debug, Error, PartialEq)]
pub enum ExchangeError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unsupported term: {0}")]
    UnsupportedTerm(String),

    #[error("no resource is typed nt:AssertionTemplate")]
    MissingTemplate,

    #[error("more than one assertion template: {first:?} and {second:?}")]
    MultipleTemplates { first: String, second: String },

    #[error("placeholder {placeholder:?} has conflicting kinds: {kinds}")]
    AmbiguousKind { placeholder: String, kinds: String },

    #[error("{subject:?} {predicate:?}: {reason}")]
    Malformed {
        subject: String,
        predicate: String,
        reason: String,
    },

    #[error("statement {statement:?} has no rdf:{position}")]
    IncompleteStatement { statement: String, position: String },

    #[error("not a signed document: {0}")]
    NotADocument(String),

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}
