//! Checks a GQL script against a catalog and reports diagnostics.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use gql_frontend::config::FrontendConfig;
use gql_frontend::diag::SourceFile;
use gql_frontend::semantic::ExecutionContext;
use gql_frontend::{ExecuteError, InMemoryCatalog, Session, http_error};
use miette::{IntoDiagnostic, WrapErr};

#[derive(Debug, Parser)]
#[command(name = "gql-check", about = "Parse and validate a GQL script")]
struct Cli {
    /// Script file to check
    script: PathBuf,

    /// TOML file with [session] and [catalog] sections
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Role to check permissions for
    #[arg(long)]
    role: Option<String>,

    /// Graph active before the first USE
    #[arg(long)]
    graph: Option<String>,

    /// Schema active before the first USE
    #[arg(long)]
    schema: Option<String>,

    /// Print the JSON error payload instead of rendered diagnostics
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> miette::Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let session = build_session(&cli)?;
    let path = cli.script.display().to_string();
    let content = fs::read_to_string(&cli.script)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {path}"))?;

    match session.check(&ExecutionContext::new(), &content) {
        Ok(output) => {
            for checked in output.iter() {
                let position = checked.statement.position();
                println!(
                    "{position} {} graph={} schema={} vars=[{}]",
                    checked.statement.kind_name(),
                    checked.graph.name,
                    checked.schema,
                    checked.variables.join(", ")
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if cli.json => {
            let (_, body) = http_error(&err);
            println!("{body}");
            Ok(ExitCode::FAILURE)
        }
        Err(ExecuteError::Diagnostics(diagnostics)) => {
            let source = SourceFile::with_name(content, path);
            eprintln!("{:?}", diagnostics.to_report(&source));
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err).into_diagnostic(),
    }
}

fn build_session(cli: &Cli) -> miette::Result<Session> {
    let config = match &cli.catalog {
        Some(path) => FrontendConfig::load(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load {}", path.display()))?,
        None => FrontendConfig::default(),
    };

    let mut session_config = config.session;
    if let Some(role) = &cli.role {
        session_config.role = role.clone();
    }
    if let Some(graph) = &cli.graph {
        session_config.default_graph = graph.clone();
    }
    if let Some(schema) = &cli.schema {
        session_config.default_schema = schema.clone();
    }

    let mut session = Session::new(session_config);
    if cli.catalog.is_some() {
        session = session.with_catalog(Arc::new(InMemoryCatalog::from_config(&config.catalog)));
    }
    Ok(session)
}
