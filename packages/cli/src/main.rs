//! `nanotpl`: nanopublication template command-line interface.
//!
//! Subcommands:
//!
//! - **`check`**: build a template definition and report problems.
//! - **`render`**: print a template's numbered statement list, or a document.
//! - **`export`**: print a template as RDF, unsigned.
//! - **`publish`**: package a template as a document, sign it, write it.
//! - **`instantiate`**: fill a template from a bindings file, sign, write.
//! - **`verify`**: check the signature and artifact code of a signed document.
//! - **`keygen`**: print a fresh Ed25519 seed and its public key.
//!
//! Templates are read from a JSON definition, or from RDF (`.nq`, `.nquads`,
//! `.trig`) as written by `export`. Signed documents are read as N-Quads or
//! TriG by extension, falling back to the configured format. Pass `-` to
//! read stdin. Logs go to stderr; stdout carries results only.

mod config;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use nanotemplate::{
    instantiate, package_template, render_document, render_template, verify_signature, vocab,
    BindingsFile, Format, Gateway, LocalSigner, SignedDocument, SigningIdentity, Template,
    TemplateDefinition,
};
use tracing::info;

use crate::config::CliConfig;

/// nanotpl: nanopublication template CLI
///
/// Check, render, publish, and instantiate assertion templates.
#[derive(Parser)]
#[command(name = "nanotpl", version, about, long_about = None)]
struct Cli {
    /// Author identity IRI (overrides NANOTPL_AUTHOR_ID).
    #[arg(long, global = true, value_name = "IRI")]
    author_id: Option<String>,

    /// Author display name (overrides NANOTPL_AUTHOR_NAME).
    #[arg(long, global = true, value_name = "NAME")]
    author_name: Option<String>,

    /// Output format: trig | nquads (overrides NANOTPL_FORMAT).
    #[arg(long, global = true, value_name = "FORMAT")]
    format: Option<Format>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a template and report whether it is valid.
    ///
    /// Exits 0 if the template assembles, 1 otherwise.
    Check {
        /// Template definition (JSON, N-Quads, or TriG), or `-` for stdin.
        file: PathBuf,
    },

    /// Print a template's numbered statement list.
    ///
    /// With --document, FILE is a signed document instead.
    Render {
        file: PathBuf,

        #[arg(long)]
        document: bool,
    },

    /// Print the template as RDF without signing it.
    Export { file: PathBuf },

    /// Package the template as a document and sign it.
    ///
    /// Prints the document IRI. Without --out the signed document goes to
    /// stdout instead.
    Publish {
        file: PathBuf,

        /// Where to write the signed document.
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Fill a template from a bindings file, sign, and write the document.
    ///
    /// The bindings file maps placeholder names to a value or a list of values:
    ///   { "bindings": { "paper": "paper1", "method": ["urn:a", "urn:b"] },
    ///     "omit": ["st04"] }
    Instantiate {
        file: PathBuf,

        /// JSON bindings file.
        #[arg(short, long, value_name = "JSON")]
        bindings: PathBuf,

        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Verify a signed document (N-Quads or TriG).
    ///
    /// Exits 0 if signature and artifact code check out, 1 otherwise.
    Verify { file: PathBuf },

    /// Generate a signing key and print its seed (hex) and public key.
    ///
    /// Store the seed in NANOTPL_KEY_SEED to sign with a stable key.
    Keygen,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nanotpl=info,nanotemplate=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env()
        .unwrap_or_else(|e| fatal(&e))
        .with_overrides(cli.author_id, cli.author_name, cli.format);

    match cli.command {
        Command::Check { file } => {
            let (template, _) = load_template(&file);
            println!(
                "valid: {} placeholders, {} statements",
                template.placeholders().len(),
                template.statements().len()
            );
        }

        Command::Render { file, document } => {
            if document {
                let signed = load_signed(&file, config.format);
                print!("{}", render_document(signed.document()));
            } else {
                let (template, _) = load_template(&file);
                print!("{}", render_template(&template));
            }
        }

        Command::Export { file } => {
            let (template, prefixes) = load_template(&file);
            let graph = format!("{}assertion", vocab::TEMP_NS);
            print!("{}", config.format.write(&template.to_quads(&graph), &prefixes));
        }

        Command::Publish { file, out } => {
            let (template, _) = load_template(&file);
            let author = config.author().unwrap_or_else(|e| fatal(&e));
            let document = package_template(&template, &author);
            let signer = LocalSigner::new(config.signing_key(), &author.id);
            let signed = signer.sign(&document).unwrap_or_else(|e| fatal(&e.to_string()));
            emit(&signer, &signed, config.format, out.as_deref());
        }

        Command::Instantiate {
            file,
            bindings,
            out,
        } => {
            let (template, _) = load_template(&file);
            let author = config.author().unwrap_or_else(|e| fatal(&e));

            let json = read_input(&bindings);
            let bindings_file: BindingsFile = serde_json::from_str(&json).unwrap_or_else(|e| {
                fatal(&format!("failed to parse {}: {}", bindings.display(), e))
            });
            let bindings = bindings_file.into_bindings(&template).unwrap_or_else(|e| {
                eprintln!("error: {}", e);
                process::exit(1);
            });

            let document = instantiate(&template, &bindings, &author).unwrap_or_else(|e| {
                eprintln!("error: {}", e);
                process::exit(1);
            });
            let signer = LocalSigner::new(config.signing_key(), &author.id);
            let signed = signer.sign(&document).unwrap_or_else(|e| fatal(&e.to_string()));
            emit(&signer, &signed, config.format, out.as_deref());
        }

        Command::Verify { file } => {
            let signed = load_signed(&file, config.format);
            match verify_signature(&signed) {
                Ok(()) => println!("valid {}", signed.iri()),
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            }
        }

        Command::Keygen => {
            let key = SigningIdentity::generate();
            println!("seed:       {}", hex::encode(key.seed()));
            println!("public key: {}", key.public_key_multibase());
        }
    }
}

/// Write the signed document to `out`, printing its IRIs, or print the
/// document itself when there is no `out`.
fn emit(signer: &LocalSigner, signed: &SignedDocument, format: Format, out: Option<&Path>) {
    match out {
        Some(path) => {
            signer
                .serialize(signed, format, path)
                .unwrap_or_else(|e| fatal(&e.to_string()));
            info!(path = %path.display(), "document written");
            println!("{}", signed.iri());
            if let Some(concept) = signed.concept_iri() {
                println!("{}", concept);
            }
        }
        None => print!("{}", signed.to_string_in(format)),
    }
}

/// Load a template and any extra prefixes its definition declares.
///
/// Definition errors exit with code 1; unreadable input with code 2.
fn load_template(path: &Path) -> (Template, Vec<(String, String)>) {
    let input = read_input(path);
    if let Some(format) = rdf_format(path) {
        let quads = format
            .read(&input)
            .unwrap_or_else(|e| fatal(&format!("{}: {}", path.display(), e)));
        let template = Template::from_quads(&quads).unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            process::exit(1);
        });
        return (template, Vec::new());
    }

    let definition: TemplateDefinition = serde_json::from_str(&input).unwrap_or_else(|e| {
        fatal(&format!(
            "failed to parse {} as a template definition: {}",
            path.display(),
            e
        ))
    });
    let template = definition.build().unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        process::exit(1);
    });
    let prefixes = definition.prefixes.into_iter().collect();
    (template, prefixes)
}

/// Read a signed document in the format its extension names, or `default`.
fn load_signed(path: &Path, default: Format) -> SignedDocument {
    let format = rdf_format(path).unwrap_or(default);
    let quads = format
        .read(&read_input(path))
        .unwrap_or_else(|e| fatal(&format!("{}: {}", path.display(), e)));
    SignedDocument::from_quads(&quads).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        process::exit(1);
    })
}

fn rdf_format(path: &Path) -> Option<Format> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Format::from_extension)
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &Path) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            fatal(&format!("failed to read {}: {}", path.display(), e))
        })
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("nanotpl: {}", msg);
    process::exit(2);
}
