//! Nanopublication template engine.
//!
//! This crate provides the data model, validation, instantiation, exchange
//! format, and signing gateway for assertion templates: reusable patterns of
//! RDF triples with typed, constrained placeholders. Filling a template's
//! placeholders yields a [`Document`] with three segments (assertion,
//! provenance, publication info) that can be signed into a permanent,
//! content-addressed artifact. It is the foundation for the `nanotpl` CLI.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`vocab`] | IRI constants, reserved predicates, standard prefixes |
//! | [`rdf`] | Minimal RDF model: [`Node`], [`Triple`], [`Quad`], [`Segment`] |
//! | [`term`] | Fixed vocabulary terms and the [`TermRegistry`] |
//! | [`placeholder`] | [`Placeholder`] kinds, [`Constraints`], value resolution |
//! | [`statement`] | Templated triples with [`Modifiers`] and activation conditions |
//! | [`template`] | [`Template`] assembly and the incremental [`Session`] |
//! | [`definition`] | JSON template definitions and binding files |
//! | [`document`] | [`Bindings`] and instantiation into a [`Document`] |
//! | [`exchange`] | Template ↔ RDF, so templates can be published like any other document |
//! | [`serializer`] | N-Quads and TriG writers and readers |
//! | [`identity`] | Author identity and Ed25519 signing keys |
//! | [`signing`] | The [`Gateway`] trait, [`LocalSigner`], and [`verify_signature`] |
//! | [`render`] | Human-readable text for templates and documents |
//! | [`error`] | Error enums for definition, instantiation, and exchange |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use nanotemplate::{instantiate, AuthorIdentity, Bindings, Gateway, LocalSigner,
//!                    SigningIdentity, TemplateDefinition};
//!
//! let definition: TemplateDefinition = serde_json::from_str(&json)?;
//! let template = definition.build()?;
//!
//! let bindings = Bindings::new()
//!     .bind("https://w3id.org/np/RAPaperTemplate#paper", "paper1")
//!     .bind("https://w3id.org/np/RAPaperTemplate#title", "On nanopublications");
//! let author = AuthorIdentity::new("https://orcid.org/0000-0002-1784-2920", "Anne");
//! let document = instantiate(&template, &bindings, &author)?;
//!
//! let signer = LocalSigner::new(SigningIdentity::generate(), &author.id);
//! let signed = signer.sign(&document)?;
//! println!("{}", signed.iri());
//! ```

pub mod definition;
pub mod document;
pub mod error;
pub mod exchange;
pub mod identity;
pub mod placeholder;
pub mod rdf;
pub mod render;
pub mod serializer;
pub mod signing;
pub mod statement;
pub mod template;
pub mod term;
pub mod vocab;

pub use definition::{BindingsFile, TemplateDefinition};
pub use document::{
    instantiate, instantiate_at, package_template, package_template_at, Bindings, Document,
};
pub use error::{DefinitionError, ExchangeError, InstantiationError};
pub use identity::{AuthorIdentity, SigningIdentity};
pub use placeholder::{Constraints, Datatype, Placeholder, PlaceholderKind};
pub use rdf::{Node, Quad, Segment, Triple};
pub use render::{render_document, render_template};
pub use serializer::{parse_nquads, parse_trig, Format};
pub use signing::{verify_signature, Gateway, GatewayError, LocalSigner, ProofError, SignedDocument};
pub use statement::{Modifiers, Slot, Statement};
pub use template::{assemble, Session, Template, TemplateMetadata};
pub use term::{Term, TermRegistry};
