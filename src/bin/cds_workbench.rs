//! CLI for the CDS workbench core
//!
//! Exposes the pure cores from the command line: natural-language query
//! interpretation, CQL scanning, hook validation, export to the backend
//! service-configuration shape, and hook invocation against a running
//! backend.

use anyhow::{Context, Result};
use cds_workbench::hooks::model::{CdsRequest, HookDefinition};
use cds_workbench::hooks::transform::to_service_config;
use cds_workbench::hooks::validate::validate_hook;
use cds_workbench::{CdsClient, QueryInterpreter, scan_cql};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(name = "cds-workbench")]
#[command(about = "CDS workbench tools: NL query interpretation, CQL scanning, hook validation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a natural-language query into a FHIR search
    Query {
        /// Free-text query (e.g. "recent glucose labs for John Smith")
        text: String,
        /// Emit the full interpretation as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Scan a CQL file and report its structure
    Scan {
        /// CQL file (reads from stdin if not provided)
        file: Option<String>,
        /// Emit the report as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Validate a hook definition JSON file
    Validate {
        /// Hook JSON file (reads from stdin if not provided)
        file: Option<String>,
        /// Suppress informational messages
        #[arg(short, long)]
        quiet: bool,
    },
    /// Export a hook definition to the backend service-configuration shape
    Export {
        /// Hook JSON file (reads from stdin if not provided)
        file: Option<String>,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Invoke a hook against a running CDS backend and print its cards
    Invoke {
        /// Hook JSON file
        file: String,
        /// Backend base URL
        #[arg(long, default_value = "http://localhost:8080")]
        base_url: String,
        /// Patient id placed in the hook context
        #[arg(long)]
        patient: String,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() {
    human_panic::setup_panic!();
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query { text, json } => handle_query(&text, json),
        Commands::Scan { file, json } => handle_scan(file.as_deref(), json),
        Commands::Validate { file, quiet } => handle_validate(file.as_deref(), quiet),
        Commands::Export { file, pretty } => handle_export(file.as_deref(), pretty),
        Commands::Invoke {
            file,
            base_url,
            patient,
            pretty,
        } => handle_invoke(&file, &base_url, &patient, pretty).await,
    };

    if let Err(error) = result {
        eprintln!("Error: {error:#}");
        process::exit(1);
    }
}

fn handle_query(text: &str, json: bool) -> Result<()> {
    let result = QueryInterpreter::new().interpret(text);
    if json {
        print_json(&result, true)?;
        return Ok(());
    }
    match result.resource_type {
        Some(resource_type) => println!("Resource type: {resource_type}"),
        None => println!("Resource type: (none matched, defaulting to Patient)"),
    }
    println!("Query: {}", result.query.to_query_string());
    println!("Confidence: {:.2}", result.confidence);
    if !result.matched_terms.is_empty() {
        println!("Matched: {}", result.matched_terms.join(", "));
    }
    if let Some(disclaimer) = &result.disclaimer {
        eprintln!("Note: {disclaimer}");
    }
    Ok(())
}

fn handle_scan(file: Option<&str>, json: bool) -> Result<()> {
    let source = read_input(file)?;
    let report = scan_cql(&source);
    if json {
        print_json(&report, true)?;
        return Ok(());
    }
    match &report.library {
        Some(library) => println!(
            "Library: {} {}",
            library.name,
            library.version.as_deref().unwrap_or("(no version)")
        ),
        None => println!("Library: (none)"),
    }
    println!(
        "Definitions: {} ({} functions), value sets: {}, parameters: {}",
        report.statistics.definition_count + report.statistics.function_count,
        report.statistics.function_count,
        report.statistics.value_set_count,
        report.statistics.parameter_count,
    );
    if !report.resources.is_empty() {
        println!("Resources: {}", report.resources.join(", "));
    }
    println!("Complexity: {}", report.complexity);
    for suggestion in &report.suggestions {
        println!("Suggestion: {suggestion}");
    }
    Ok(())
}

fn handle_validate(file: Option<&str>, quiet: bool) -> Result<()> {
    let hook = read_hook(file)?;
    let diags = validate_hook(&hook);
    if diags.is_empty() {
        if !quiet {
            println!("OK: no issues found");
        }
        return Ok(());
    }
    for diag in diags.iter() {
        println!("{diag}");
    }
    if diags.has_errors() {
        process::exit(1);
    }
    Ok(())
}

fn handle_export(file: Option<&str>, pretty: bool) -> Result<()> {
    let hook = read_hook(file)?;
    print_json(&to_service_config(&hook), pretty)
}

async fn handle_invoke(file: &str, base_url: &str, patient: &str, pretty: bool) -> Result<()> {
    let hook = read_hook(Some(file))?;
    let context = serde_json::json!({ "patientId": patient });
    let request = CdsRequest::for_hook(&hook, uuid_ish(), context);

    let client = CdsClient::new(base_url, base_url);
    let response = client
        .invoke(&hook.id, &request)
        .await
        .with_context(|| format!("invoking hook '{}' at {base_url}", hook.id))?;

    if pretty {
        print_json(&response, true)?;
    } else {
        println!("{} card(s)", response.cards.len());
        for card in &response.cards {
            println!("[{}] {}", card.indicator, card.summary);
        }
    }
    Ok(())
}

/// Hook instance ids only need to be unique per invocation
fn uuid_ish() -> String {
    format!("wb-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

fn read_hook(file: Option<&str>) -> Result<HookDefinition> {
    let content = read_input(file)?;
    serde_json::from_str(&content).context("parsing hook JSON")
}

fn read_input(file: Option<&str>) -> Result<String> {
    match file {
        Some(filename) => {
            fs::read_to_string(filename).with_context(|| format!("reading file '{filename}'"))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading from stdin")?;
            Ok(buffer)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
