// crates/sc_cli/src/main.rs
//
// Exit codes, typed error mapping, logger setup, and the run paths:
//   simulate: request (+config) + seed → SimulationOutput → evaluate_all
//   evaluate: ballot file → validation → one or every method
//   analyze:  analysis request (+config) + seed → AnalysisOutput
// Each run writes one canonical JSON document whose `id` is `RES:<sha256>`
// over the document body.

mod args;

mod exitcodes {
    pub const OK: u8 = 0;
    pub const VALIDATION: u8 = 2;
    pub const IO: u8 = 4;
    pub const ARGS: u8 = 5;
}

use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitCode;

use clap::error::ErrorKind;
use log::{debug, info};
use serde::Serialize;

use args::{parse_and_validate, Args, CliError, Command};
use sc_core::SimConfig;
use sc_io::{canonical_json, hasher, loader, IoError};
use sc_pipeline::{
    analyze, evaluate, evaluate_all, simulate, validate_ballots, AnalysisOutput, Method, MethodParams, MethodResult, PipelineError,
    SimulationOutput, ValidationReport,
};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Configuration, request shape, or ballot validation failures.
    Validation(String),
    /// Read/write/path/limit failures.
    Io(String),
}

/// Everything a run produced, minus its id.
#[derive(Debug, Serialize)]
struct ResultBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    simulation: Option<&'a SimulationOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<&'a ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a AnalysisOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<&'a BTreeMap<String, MethodResult>>,
}

#[derive(Debug, Serialize)]
struct ResultDoc<'a> {
    id: String,
    #[serde(flatten)]
    body: ResultBody<'a>,
}

fn main() -> ExitCode {
    let args = match parse_and_validate() {
        Ok(a) => a,
        Err(CliError::Clap(e)) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::from(exitcodes::OK),
                _ => ExitCode::from(exitcodes::ARGS),
            };
        }
        Err(e) => {
            eprintln!("sc: error: {e}");
            return ExitCode::from(exitcodes::ARGS);
        }
    };
    init_logger(&args);

    let res = match &args.command {
        Command::Simulate { request, config, seed, approval_threshold, out } => {
            run_simulate(request, config.as_deref(), *seed, *approval_threshold, out.as_deref())
        }
        Command::Evaluate { ballots, method, out } => run_evaluate(ballots, method.as_deref(), out.as_deref()),
        Command::Analyze { request, config, seed, out } => run_analyze(request, config.as_deref(), *seed, out.as_deref()),
    };
    match res {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            let (code, msg) = map_error(&e);
            eprintln!("sc: error: {msg}");
            ExitCode::from(code)
        }
    }
}

fn init_logger(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}

fn map_error(e: &MainError) -> (u8, &str) {
    match e {
        MainError::Validation(m) => (exitcodes::VALIDATION, m),
        MainError::Io(m) => (exitcodes::IO, m),
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { path, msg } => MainError::Validation(format!("json {path}: {msg}")),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        IoError::Limit(m) => MainError::Io(format!("limit: {m}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    MainError::Validation(e.to_string())
}

// ------------------------------------------------------------------------------------------------
// Run paths
// ------------------------------------------------------------------------------------------------

fn run_simulate(
    request: &Path,
    config: Option<&Path>,
    seed: u64,
    approval_threshold: Option<usize>,
    out: Option<&Path>,
) -> Result<(), MainError> {
    let req = loader::load_request(request).map_err(map_io_err)?;
    let cfg = load_config(config)?;
    let mut params = MethodParams::default();
    if let Some(k) = approval_threshold {
        params.approval_threshold = k;
    }

    let sim = simulate(&req, &cfg, seed).map_err(map_pipeline_err)?;
    let set = sim.ballot_set().map_err(map_pipeline_err)?;
    let results = evaluate_all(&set, &sim.candidates, &params).map_err(map_pipeline_err)?;
    info!("simulate: {} methods evaluated", results.len());

    emit(ResultBody { simulation: Some(&sim), validation: None, analysis: None, results: Some(&results) }, out)
}

fn run_evaluate(ballots: &Path, method: Option<&str>, out: Option<&Path>) -> Result<(), MainError> {
    let file = loader::load_ballots(ballots).map_err(map_io_err)?;
    let report = validate_ballots(&file.ballots, &file.candidates);
    if !report.pass {
        let first = report.errors().next().map(|i| i.message.clone()).unwrap_or_default();
        return Err(MainError::Validation(format!(
            "{} ballot error(s), first: {first}",
            report.errors().count()
        )));
    }

    let results = match method {
        Some(name) => {
            let m: Method = name.parse().map_err(map_pipeline_err)?;
            let r = evaluate(m, &file.ballots, &file.candidates, &file.params).map_err(map_pipeline_err)?;
            BTreeMap::from([(m.as_str().to_string(), r)])
        }
        None => evaluate_all(&file.ballots, &file.candidates, &file.params).map_err(map_pipeline_err)?,
    };
    debug!("evaluate: {} result(s)", results.len());

    let validation = (!report.issues.is_empty()).then_some(&report);
    emit(ResultBody { simulation: None, validation, analysis: None, results: Some(&results) }, out)
}

fn run_analyze(request: &Path, config: Option<&Path>, seed: u64, out: Option<&Path>) -> Result<(), MainError> {
    let req = loader::load_analysis(request).map_err(map_io_err)?;
    let cfg = load_config(config)?;
    let analysis = analyze(&req, &cfg, seed).map_err(map_pipeline_err)?;
    emit(ResultBody { simulation: None, validation: None, analysis: Some(&analysis), results: None }, out)
}

fn load_config(config: Option<&Path>) -> Result<SimConfig, MainError> {
    match config {
        Some(p) => loader::load_config(p).map_err(map_io_err),
        None => Ok(SimConfig::default()),
    }
}

/// Stamp the body with its digest and write it to `out` (printing the id)
/// or to stdout.
fn emit(body: ResultBody<'_>, out: Option<&Path>) -> Result<(), MainError> {
    let id = hasher::res_id_from_canonical(&body).map_err(map_io_err)?;
    let doc = ResultDoc { id, body };
    match out {
        Some(path) => {
            canonical_json::write_canonical_file(path, &doc).map_err(map_io_err)?;
            info!("wrote {}", path.display());
            println!("{}", doc.id);
        }
        None => {
            let bytes = canonical_json::to_canonical_bytes(&doc).map_err(map_io_err)?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
    }
    Ok(())
}
