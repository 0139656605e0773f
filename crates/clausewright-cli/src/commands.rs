//! CLI command definitions, startup wiring, and tracing setup.

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clausewright_ai::PatternRecognizer;
use clausewright_core::request::DEFAULT_DOC_TYPE;
use clausewright_core::{
    Catalog, DocumentAssembler, DraftRequest, DraftResponse, EntityExtractor, ErrorResponse,
    handle,
};
use tracing::{info, warn};

use crate::display;

/// Exit status for a request the caller got wrong.
const EXIT_REJECTED: u8 = 2;

// ── CLI structure ──

/// Clausewright: draft agreements from a clause library.
#[derive(Parser)]
#[command(
    name = "clausewright",
    version,
    about = "Assemble draft agreements from a clause library and free-text requirements.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Clause catalog JSON file. Defaults to the built-in library.
    #[arg(long, env = "CLAUSEWRIGHT_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Entity recognizer: pattern (built in) or onnx.
    #[arg(
        long,
        value_enum,
        default_value = "pattern",
        env = "CLAUSEWRIGHT_RECOGNIZER",
        global = true
    )]
    pub recognizer: RecognizerKind,

    /// NER model directory containing model.onnx, tokenizer.json, and config.json.
    #[arg(long, env = "CLAUSEWRIGHT_MODEL_DIR", global = true)]
    pub model_dir: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum RecognizerKind {
    Pattern,
    Onnx,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Assemble one draft and print it.
    Generate {
        /// Document type key.
        #[arg(short = 't', long, default_value = DEFAULT_DOC_TYPE)]
        doc_type: String,

        /// Requirements text. Read from --input or stdin when omitted.
        #[arg(short, long, conflicts_with = "input")]
        requirements: Option<String>,

        /// File holding the requirements text.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the full JSON response instead of the draft text.
        #[arg(long)]
        json: bool,
    },

    /// Answer a JSON request ({"docType", "requirements"}) with a JSON response.
    Handle {
        /// File holding the request. Read from stdin when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List document types and keyword rules.
    Catalog,

    /// Run only the recognizer and print the entities it finds.
    Entities {
        /// Text to analyse. Read from --input or stdin when omitted.
        #[arg(conflicts_with = "input")]
        text: Option<String>,

        /// File holding the text.
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

// ── Tracing setup ──

/// Logs go to stderr; stdout carries only drafts and responses.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "clausewright=info",
        1 => "clausewright=debug",
        _ => "clausewright=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ── Command dispatch ──

pub(crate) fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Command::Catalog => {
            print!("{}", display::render_catalog(&catalog));
            Ok(ExitCode::SUCCESS)
        }
        Command::Generate {
            doc_type,
            requirements,
            input,
            json,
        } => {
            let assembler = startup(catalog, cli.recognizer, cli.model_dir.as_deref())?;
            let requirements = match requirements {
                Some(text) => text,
                None => read_input(input.as_deref())?,
            };
            let result = assembler.generate(&doc_type, &requirements)?;
            if json {
                let response = DraftResponse::from(result);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", result.draft);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Handle { input } => {
            let assembler = startup(catalog, cli.recognizer, cli.model_dir.as_deref())?;
            let body = read_input(input.as_deref())?;
            let reply = respond(&assembler, &body)?;
            println!("{}", reply.body);
            Ok(if reply.accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_REJECTED)
            })
        }
        Command::Entities { text, input } => {
            let extractor = build_extractor(cli.recognizer, cli.model_dir.as_deref())?;
            let text = match text {
                Some(text) => text,
                None => read_input(input.as_deref())?,
            };
            let entities = extractor.try_extract(&text)?;
            print!("{}", display::render_entities(&entities));
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ── Startup ──

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => {
            Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))
        }
        None => {
            let catalog = Catalog::builtin();
            info!(
                documents = catalog.documents().len(),
                keyword_rules = catalog.keyword_rules().len(),
                "using built-in clause catalog"
            );
            Ok(catalog)
        }
    }
}

/// Build the assembler. The recognizer is loaded here, once, before any
/// request is read; failing to load it aborts the run.
fn startup(
    catalog: Catalog,
    kind: RecognizerKind,
    model_dir: Option<&Path>,
) -> anyhow::Result<DocumentAssembler<Box<dyn EntityExtractor>>> {
    let extractor = build_extractor(kind, model_dir)?;
    Ok(DocumentAssembler::new(catalog, extractor))
}

fn build_extractor(
    kind: RecognizerKind,
    model_dir: Option<&Path>,
) -> anyhow::Result<Box<dyn EntityExtractor>> {
    match kind {
        RecognizerKind::Pattern => {
            let recognizer = PatternRecognizer::new();
            info!(places = recognizer.place_count(), "using pattern recognizer");
            Ok(Box::new(recognizer))
        }
        RecognizerKind::Onnx => load_onnx(model_dir),
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(model_dir: Option<&Path>) -> anyhow::Result<Box<dyn EntityExtractor>> {
    let dir = model_dir.context("--model-dir is required for the onnx recognizer")?;
    let recognizer = clausewright_ai::OnnxRecognizer::load(dir).context("loading NER model")?;
    Ok(Box::new(recognizer))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_model_dir: Option<&Path>) -> anyhow::Result<Box<dyn EntityExtractor>> {
    anyhow::bail!("built without ONNX support; rebuild with `--features onnx`")
}

/// Read a file, or stdin when it is piped. An interactive stdin reads as empty.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    if let Some(path) = path {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf).context("reading stdin")?;
    Ok(buf)
}

// ── Request handling ──

/// Serialised reply to one JSON request.
pub(crate) struct Reply {
    pub body: String,
    /// False when the request was rejected as a client error.
    pub accepted: bool,
}

/// Answer one JSON request. A malformed body or an unknown document type is
/// rejected with an [`ErrorResponse`] rather than failing the process.
pub(crate) fn respond<E: EntityExtractor>(
    assembler: &DocumentAssembler<E>,
    body: &str,
) -> anyhow::Result<Reply> {
    let request: DraftRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "malformed draft request");
            let error = ErrorResponse {
                error: format!("invalid request: {e}"),
            };
            return Ok(Reply {
                body: serde_json::to_string(&error)?,
                accepted: false,
            });
        }
    };

    let reply = match handle(assembler, &request) {
        Ok(response) => Reply {
            body: serde_json::to_string(&response)?,
            accepted: true,
        },
        Err(e) => Reply {
            body: serde_json::to_string(&ErrorResponse::from(&e))?,
            accepted: false,
        },
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn assembler() -> DocumentAssembler<PatternRecognizer> {
        DocumentAssembler::new(Catalog::builtin(), PatternRecognizer::new())
    }

    #[test]
    fn cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "clausewright",
            "generate",
            "--doc-type",
            "employment",
            "--requirements",
            "remote intern",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Generate {
                doc_type,
                requirements,
                json,
                ..
            } => {
                assert_eq!(doc_type, "employment");
                assert_eq!(requirements.as_deref(), Some("remote intern"));
                assert!(json);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn cli_generate_defaults_to_nda() {
        let cli = Cli::try_parse_from(["clausewright", "generate"]).unwrap();
        assert!(matches!(cli.recognizer, RecognizerKind::Pattern));
        match cli.command {
            Command::Generate { doc_type, .. } => assert_eq!(doc_type, "nda"),
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn cli_rejects_requirements_with_input() {
        let parsed = Cli::try_parse_from([
            "clausewright",
            "generate",
            "--requirements",
            "x",
            "--input",
            "req.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn respond_success() {
        let body = r#"{"docType": "nda", "requirements": "Startup NDA between Acme Corp and Jane Doe in Berlin"}"#;
        let reply = respond(&assembler(), body).unwrap();
        assert!(reply.accepted);

        let json: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(json["keywords"], serde_json::json!(["startup"]));
        assert_eq!(json["adaptive_count"], 1);
        let draft = json["draft"].as_str().unwrap();
        assert!(draft.contains("is made between Acme Corp and Jane Doe."));
        assert!(draft.contains("governed by the laws of Berlin."));
    }

    #[test]
    fn respond_defaults_for_empty_object() {
        let reply = respond(&assembler(), "{}").unwrap();
        assert!(reply.accepted);
        let json: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert!(
            json["draft"]
                .as_str()
                .unwrap()
                .starts_with("Non-Disclosure Agreement\n\n")
        );
        assert_eq!(json["adaptive_count"], 0);
        assert_eq!(json["entities"], serde_json::json!([]));
    }

    #[test]
    fn respond_unknown_doc_type() {
        let reply = respond(&assembler(), r#"{"docType": "lease"}"#).unwrap();
        assert!(!reply.accepted);
        assert_eq!(reply.body, r#"{"error":"unknown document type: lease"}"#);
    }

    #[test]
    fn respond_malformed_body() {
        let reply = respond(&assembler(), "not json").unwrap();
        assert!(!reply.accepted);
        assert!(reply.body.contains("invalid request"));
    }

    #[test]
    fn read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"remote work").unwrap();
        assert_eq!(read_input(Some(file.path())).unwrap(), "remote work");
    }

    #[test]
    fn builtin_catalog_when_no_path() {
        let catalog = load_catalog(None).unwrap();
        assert!(catalog.document("nda").is_ok());
    }

    #[test]
    fn missing_catalog_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_catalog(Some(dir.path().join("none.json").as_path())).is_err());
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn onnx_unavailable_without_feature() {
        assert!(build_extractor(RecognizerKind::Onnx, None).is_err());
    }
}
