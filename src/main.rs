use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rule_tree_validation::{DataContext, EngineOptions, Registry, Schema, SchemaValidator};
use serde_json::{json, Value};
use tracing::Level;

/// Validate a JSON record against a JSON rule tree.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the schema (a JSON array of rules)
    schema: PathBuf,
    /// Data record as inline JSON, or `@path` to read it from a file
    data: String,
    /// Only evaluate rules whose `range` admits this tag (e.g. `server`)
    #[arg(long)]
    range: Option<String>,
    /// Abort when a failing rule has a blocking ancestor
    #[arg(long)]
    inherit_blocking: bool,
    /// Omit the `_parent` chain from reported failures
    #[arg(long)]
    strip_parents: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok((valid, report)) => {
            match serde_json::to_string_pretty(&report) {
                Ok(out) => println!("{out}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(2);
                }
            }
            if valid { ExitCode::SUCCESS } else { ExitCode::from(1) }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> rule_tree_validation::Result<(bool, Value)> {
    let schema = Schema::from_path(&args.schema)?;

    let raw = match args.data.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => args.data.clone(),
    };
    let data = DataContext::from_value(serde_json::from_str(&raw)?)?;

    let mut options = EngineOptions::default().inherit_blocking(args.inherit_blocking);
    if let Some(tag) = &args.range {
        options = options.range(tag.as_str());
    }

    let mut validator = SchemaValidator::with_resolver(schema, data, Registry::with_builtins(), options);
    let valid = validator.valid()?;
    let report = json!({
        "valid": valid,
        "failed": validator.failed_rules(!args.strip_parents),
        "stored": validator.stored_data(),
    });
    Ok((valid, report))
}
