//! `xjson` CLI — transcode, map, and validate XJSON/JSON files from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Transcode XJSON to canonical JSON (stdin → stdout)
//! printf '// note\n"a": 1,\n"b": 2\n' | xjson transcode
//!
//! # Transcode from file to file
//! xjson transcode -i config.xjson -o config.json
//!
//! # Map a document (no target type) and pretty-print the result
//! xjson map -i config.xjson
//!
//! # Map JSON arriving on stdin
//! echo '{"a": 1}' | xjson map
//!
//! # Validate: parse + version gate only
//! xjson check -i config.xjson
//! ```
//!
//! Warnings from the mapping engine (unknown members, unparseable version
//! strings) are printed to stderr; they never affect the exit code.

use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use xjson_core::{Options, Severity, TypeHint};

#[derive(Parser)]
#[command(name = "xjson", version, about = "XJSON transcoding and mapping CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcode XJSON to canonical JSON
    Transcode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Parse, version-gate, and map a document; print the result as JSON
    Map {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Treat the input as XJSON even without an .xjson extension
        #[arg(long)]
        xjson: bool,
    },
    /// Parse and version-gate only; report ok or the failure
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Treat the input as XJSON even without an .xjson extension
        #[arg(long)]
        xjson: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = stderr_options();

    match cli.command {
        Commands::Transcode { input, output } => {
            let source = read_input(input.as_deref())?;
            let json = xjson_core::transcode(&source, &TypeHint::Unspecified, &options);
            write_output(output.as_deref(), &json)?;
        }
        Commands::Map {
            input,
            output,
            xjson,
        } => {
            let source = read_input(input.as_deref())?;
            let result = if is_xjson(input.as_deref(), xjson) {
                xjson_core::deserialize_xjson(&source, &TypeHint::Unspecified, &options)
            } else {
                xjson_core::deserialize(&source, &TypeHint::Unspecified, &options)
            }
            .context("Failed to map input")?;
            let pretty = serde_json::to_string_pretty(&result.to_json())?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Check { input, xjson } => {
            let source = read_input(input.as_deref())?;
            let text = if is_xjson(input.as_deref(), xjson) {
                xjson_core::transcode(&source, &TypeHint::Unspecified, &options)
            } else {
                source
            };
            let node: serde_json::Value =
                serde_json::from_str(&text).context("Input is not valid JSON")?;
            xjson_core::version::check(&node, &options).context("Version check failed")?;
            println!("ok");
        }
    }

    Ok(())
}

/// Options with a sink that forwards engine messages to stderr.
fn stderr_options() -> Options {
    Options {
        log: Some(Arc::new(|severity: Severity, message: &str| {
            eprintln!("[{severity}] {message}");
        })),
        ..Options::default()
    }
}

/// XJSON when the flag says so or the input path carries the extension.
fn is_xjson(input: Option<&str>, flag: bool) -> bool {
    flag || input.is_some_and(|path| {
        std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xjson"))
    })
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
