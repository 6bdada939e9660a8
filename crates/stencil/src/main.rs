//! Stencil CLI - interprets template directives embedded in an import
//! manifest and writes the resulting document to stdout or a file.

mod error;
mod output;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use error::CliError;
use output::Output;
use stencil_engine::{MultilineHandling, ParseError};

/// stencil - single-pass template interpreter for import manifests.
#[derive(Parser)]
#[command(name = "stencil", version, about)]
struct Cli {
    /// Path of the manifest to interpret.
    file: PathBuf,

    /// Where the result is written; stdout when omitted.
    #[arg(short = 'o', long)]
    output_file: Option<PathBuf>,

    /// Maximum function calls plus modifier applications per document;
    /// 0 lifts the limit.
    #[arg(long, default_value_t = 200, env = "STENCIL_MAX_FUNCTION_CALLS")]
    max_function_calls: usize,

    /// How multiline function results are written out.
    #[arg(long, value_enum, default_value = "preserve", env = "STENCIL_MULTILINE")]
    multiline: MultilineMode,

    /// Error presentation on stderr.
    #[arg(long, value_enum, default_value = "text")]
    error_format: ErrorFormat,

    /// Verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum MultilineMode {
    /// Keep generated newlines untouched.
    Preserve,
    /// Squash multiline results onto one line with literal `\n` sequences.
    Squash,
    /// Re-indent continuation lines to the directive's column.
    Reindent,
}

impl From<MultilineMode> for MultilineHandling {
    fn from(mode: MultilineMode) -> Self {
        match mode {
            MultilineMode::Preserve => Self::Preserve,
            MultilineMode::Squash => Self::Squash,
            MultilineMode::Reindent => Self::Reindent,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ErrorFormat {
    /// Message plus a sorted `key: [values]` metadata block.
    Text,
    /// One JSON object with `error` and `meta` fields.
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // --verbose enables DEBUG level, otherwise RUST_LOG decides
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let output = Output::new();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&output, cli.error_format, &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let input = File::open(&cli.file).map_err(|source| CliError::OpenInput {
        path: cli.file.clone(),
        source,
    })?;

    let out: Box<dyn Write> = match &cli.output_file {
        Some(path) => Box::new(File::create(path).map_err(|source| CliError::CreateOutput {
            path: path.clone(),
            source,
        })?),
        None => Box::new(io::stdout().lock()),
    };

    // 0 means unlimited
    let limit = (cli.max_function_calls > 0).then_some(cli.max_function_calls);

    tracing::debug!(file = %cli.file.display(), limit = ?limit, "interpreting manifest");
    let mut parser = stencil_engine::Parser::new(input, out)
        .with_function_call_limit(limit)
        .with_multiline_handling(cli.multiline.into());
    parser.parse()?;
    Ok(())
}

/// Prints a failure to stderr in the selected format.
fn report(output: &Output, format: ErrorFormat, err: &CliError) {
    if let CliError::Parse(ParseError::Meta(meta)) = err {
        match format {
            ErrorFormat::Json => output.plain(&meta.to_json().to_string()),
            ErrorFormat::Text => {
                output.error(&format!("error: {meta}"));
                for line in meta.meta_string().lines() {
                    output.detail(line);
                }
            }
        }
        return;
    }
    output.error(&format!("error: {err}"));
}
