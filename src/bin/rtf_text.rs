//! rtf-text - RTF to plain text converter
//!
//! With one file, prints the converted text to stdout. With two files,
//! writes the converted text to the second one as Latin-1.
//!
//! # Usage
//!
//! ```bash
//! rtf-text letter.rtf
//! rtf-text letter.rtf letter.txt
//! rtf-text --replacement '?' letter.rtf letter.txt
//! RUST_LOG=debug rtf-text letter.rtf
//! ```

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rtf_text::config::parse_replacement;
use rtf_text::{CachedDocument, Config, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "rtf-text")]
#[command(version)]
#[command(about = "Convert RTF documents to plain text", long_about = None)]
struct CliArgs {
    /// Input RTF file, optionally followed by the output file
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Character written in place of text Latin-1 cannot encode
    #[arg(long, value_name = "CHAR")]
    replacement: Option<String>,

    /// Keep CR and CRLF line endings of the input as they are
    #[arg(long)]
    no_normalize_newlines: bool,

    /// Do not end printed text with a newline
    #[arg(long)]
    no_trailing_newline: bool,

    /// Report results as JSON on stdout
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = CliArgs::parse();

    let default_filter = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = load_config(&args)?;
    tracing::debug!(?config, "configuration loaded");

    match args.files.as_slice() {
        [input] => print_text(input, &config, args.json),
        [input, output] => write_text(input, output, &config, args.json),
        _ => {
            print_usage();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(args: &CliArgs) -> Result<Config, ConfigError> {
    let mut config = Config::load(args.config.as_deref())?;

    if let Some(replacement) = &args.replacement {
        config.output.replacement = parse_replacement("--replacement", replacement)?;
    }
    if args.no_normalize_newlines {
        config.input.normalize_newlines = false;
    }
    if args.no_trailing_newline {
        config.output.trailing_newline = false;
    }

    config.validate()?;
    Ok(config)
}

fn print_text(input: &Path, config: &Config, as_json: bool) -> Result<ExitCode, Box<dyn Error>> {
    let doc = CachedDocument::with_options(input, config.document_options());

    if as_json {
        let (value, code) = match doc.get_text() {
            Ok(text) => (json!({ "text": text }), ExitCode::SUCCESS),
            Err(rtf_text::Error::Parse(e)) => (
                json!({ "error": { "kind": e.kind, "offset": e.offset } }),
                ExitCode::FAILURE,
            ),
            Err(e) => return Err(e.into()),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(code);
    }

    let text = doc.get_text()?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if config.output.trailing_newline {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn write_text(
    input: &Path,
    output: &Path,
    config: &Config,
    as_json: bool,
) -> Result<ExitCode, Box<dyn Error>> {
    let doc = CachedDocument::with_options(input, config.document_options());
    let written = doc.write_to(output)?;

    if as_json {
        let value = json!({ "written": written, "path": output.display().to_string() });
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    if written {
        tracing::info!("Wrote {}", output.display());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("Error: could not write '{}'", output.display());
        Ok(ExitCode::FAILURE)
    }
}

fn print_usage() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "rtf-text".to_string());
    println!("Usage: {} <input_file> [output_file]", program);
}
