//! Stacker CLI - Scripted document edits
//!
//! Commands: catalog, init, validate, add, delete, reorder, render, replay
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use stacker_core::{
    Document, EditPipeline, EditRequest, EditorConfig, MarkupRenderer, ModuleKind, ModuleRenderer,
    ReplayScript, StudioError, ADDABLE_MODULES,
};

#[derive(Parser)]
#[command(name = "stacker-cli")]
#[command(about = "Stacker CLI - module document editing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an editor config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List module types the add menu offers
    Catalog,

    /// Print a new stacker document
    Init {
        #[arg(long, default_value = "")]
        heading: String,

        #[arg(long, default_value = "")]
        footer: String,
    },

    /// Validate a document
    Validate {
        /// Document JSON file
        document: PathBuf,
    },

    /// Append a module of the given type
    Add {
        document: PathBuf,

        #[arg(short, long, value_parser = parse_kind)]
        kind: ModuleKind,
    },

    /// Delete a module by id
    Delete {
        document: PathBuf,

        #[arg(long)]
        id: String,
    },

    /// Move module ACTIVE to the position held by OVER
    Reorder {
        document: PathBuf,

        #[arg(long)]
        active: String,

        #[arg(long)]
        over: String,
    },

    /// Render a document to HTML fragments
    Render {
        document: PathBuf,
    },

    /// Feed a script of editor inputs through the editor
    Replay {
        document: PathBuf,

        /// Replay script JSON file
        #[arg(short, long)]
        script: PathBuf,
    },
}

fn parse_kind(tag: &str) -> Result<ModuleKind, String> {
    ModuleKind::from_tag(tag).ok_or_else(|| format!("unknown module type '{}'", tag))
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to serialize output: {}"}}"#, e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(e: &StudioError) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": e.to_string(),
    });
    println!("{}", output);
    match e {
        StudioError::ValidationFailed(_) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn edit(pipeline: &EditPipeline, path: &Path, request: EditRequest) -> ExitCode {
    let result = Document::load(path).and_then(|doc| pipeline.apply(&doc, &request));
    match result {
        Ok(outcome) => print_json(&outcome),
        Err(e) => print_error(&e),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.config.as_deref().map(EditorConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to load config: {}"}}"#, e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = EditPipeline::new(config);

    match cli.command {
        Commands::Catalog => print_json(&ADDABLE_MODULES),

        Commands::Init { heading, footer } => print_json(&Document::new_stacker(&heading, &footer)),

        Commands::Validate { document } => {
            match Document::load(&document).and_then(|doc| pipeline.validate(&doc)) {
                Ok(result) => {
                    let code = print_json(&result);
                    if result.valid {
                        code
                    } else {
                        ExitCode::from(2)
                    }
                }
                Err(e) => print_error(&e),
            }
        }

        Commands::Add { document, kind } => edit(&pipeline, &document, EditRequest::Add { kind }),

        Commands::Delete { document, id } => edit(&pipeline, &document, EditRequest::Delete { id }),

        Commands::Reorder { document, active, over } => edit(
            &pipeline,
            &document,
            EditRequest::Reorder {
                active_id: active,
                over_id: over,
            },
        ),

        Commands::Render { document } => match Document::load(&document) {
            Ok(doc) => {
                let fragments: Vec<_> = doc
                    .modules
                    .iter()
                    .filter_map(|m| {
                        MarkupRenderer.render(m).map(|html| {
                            serde_json::json!({ "id": m.id, "html": html })
                        })
                    })
                    .collect();
                print_json(&fragments)
            }
            Err(e) => print_error(&e),
        },

        Commands::Replay { document, script } => {
            let started = Instant::now();
            let result = Document::load(&document).and_then(|doc| {
                let content = std::fs::read_to_string(&script)?;
                let script: ReplayScript = serde_json::from_str(&content)?;
                pipeline.replay(&doc, &script)
            });
            tracing::debug!(elapsed = ?started.elapsed(), "replay finished");
            match result {
                Ok(outcome) => print_json(&outcome),
                Err(e) => print_error(&e),
            }
        }
    }
}
