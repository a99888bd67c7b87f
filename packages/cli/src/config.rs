//! CLI configuration, populated from environment variables.

use nanotemplate::{AuthorIdentity, Format, SigningIdentity};

/// Settings shared by the signing subcommands.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `NANOTPL_AUTHOR_ID` | (absent) | Author identity IRI, e.g. an ORCID |
/// | `NANOTPL_AUTHOR_NAME` | (absent) | Author display name |
/// | `NANOTPL_KEY_SEED` | (absent = fresh key per run) | 32-byte Ed25519 seed, hex |
/// | `NANOTPL_FORMAT` | `trig` | Output format: `trig` or `nquads` |
///
/// Command-line flags take precedence; see [`CliConfig::with_overrides`].
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    /// Decoded `NANOTPL_KEY_SEED`.
    pub key_seed: Option<[u8; 32]>,
    pub format: Format,
}

impl CliConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let key_seed = var("NANOTPL_KEY_SEED")
            .map(|hex| parse_seed(&hex))
            .transpose()
            .map_err(|e| format!("NANOTPL_KEY_SEED: {e}"))?;
        let format = match var("NANOTPL_FORMAT") {
            Some(f) => f.parse().map_err(|e| format!("NANOTPL_FORMAT: {e}"))?,
            None => Format::default(),
        };
        Ok(Self {
            author_id: var("NANOTPL_AUTHOR_ID").filter(|s| !s.is_empty()),
            author_name: var("NANOTPL_AUTHOR_NAME").filter(|s| !s.is_empty()),
            key_seed,
            format,
        })
    }

    /// Apply command-line flags on top of the environment.
    pub fn with_overrides(
        mut self,
        author_id: Option<String>,
        author_name: Option<String>,
        format: Option<Format>,
    ) -> Self {
        if author_id.is_some() {
            self.author_id = author_id;
        }
        if author_name.is_some() {
            self.author_name = author_name;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    /// The author, required by `publish` and `instantiate`.
    pub fn author(&self) -> Result<AuthorIdentity, String> {
        match (&self.author_id, &self.author_name) {
            (Some(id), Some(name)) => Ok(AuthorIdentity::new(id, name)),
            (None, _) => Err("no author id: set NANOTPL_AUTHOR_ID or pass --author-id".into()),
            (_, None) => {
                Err("no author name: set NANOTPL_AUTHOR_NAME or pass --author-name".into())
            }
        }
    }

    /// The configured key, or a fresh one.
    pub fn signing_key(&self) -> SigningIdentity {
        match &self.key_seed {
            Some(seed) => SigningIdentity::from_seed(seed),
            None => SigningIdentity::generate(),
        }
    }
}

pub fn parse_seed(hex_seed: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(hex_seed.trim()).map_err(|e| format!("invalid hex: {e}"))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| format!("expected 32 bytes, got {}", b.len()))
}
