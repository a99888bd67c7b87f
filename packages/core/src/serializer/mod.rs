//! Named-graph serializations of documents and templates.
//!
//! Two formats are supported, both written here and read back through
//! [`parse`]:
//! - **N-Quads** ([`nquads`]): one quad per line, absolute IRIs.
//! - **TriG** ([`trig`]): prefixed, one block per named graph, for people.

pub mod nquads;
pub mod parse;
pub mod trig;

use crate::error::ExchangeError;
use crate::rdf::Quad;

pub use nquads::to_nquads;
pub use parse::{parse_nquads, parse_trig};
pub use trig::to_trig;

/// Output format of a serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    NQuads,
    #[default]
    TriG,
}

impl Format {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::NQuads => "nq",
            Format::TriG => "trig",
        }
    }

    /// The format a file extension (without the dot) conventionally holds.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "nq" | "nquads" => Some(Format::NQuads),
            "trig" => Some(Format::TriG),
            _ => None,
        }
    }

    /// Parse `input` written in this format.
    pub fn read(self, input: &str) -> Result<Vec<Quad>, ExchangeError> {
        match self {
            Format::NQuads => parse_nquads(input),
            Format::TriG => parse_trig(input),
        }
    }

    /// Serialize `quads`. `prefixes` are used by TriG only, on top of the
    /// standard ones.
    pub fn write(self, quads: &[Quad], prefixes: &[(String, String)]) -> String {
        match self {
            Format::NQuads => to_nquads(quads),
            Format::TriG => to_trig(quads, prefixes),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Format::NQuads => "nquads",
            Format::TriG => "trig",
        })
    }
}

impl std::str::FromStr for Format {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nquads" | "nq" => Ok(Format::NQuads),
            "trig" => Ok(Format::TriG),
            other => Err(format!(
                "unknown format {:?}; expected one of: trig, nquads",
                other
            )),
        }
    }
}
