// crates/sc_cli/src/args.rs
//
// Deterministic, offline CLI argument surface.
// - Subcommands: `simulate` (request → ballots → every method),
//   `evaluate` (ballot file → one or every method), and `analyze`
//   (utility grid and segments, or the spatial model)
// - Paths are local files only; any `scheme://` is rejected
// - Seed is a u64, decimal or 0x-hex (1..=16 nybbles)

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "sc",
    version,
    disable_help_subcommand = true,
    about = "Offline, deterministic social-choice simulator and voting-method evaluator"
)]
pub struct Args {
    /// Debug-level logging on stderr.
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Warnings only.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Simulate an electorate, then evaluate every applicable method on its ballots.
    Simulate {
        /// Simulation request JSON (tagged by `model`: influence | utility).
        #[arg(long)]
        request: PathBuf,
        /// Configuration override JSON; missing fields keep the built-in tables.
        #[arg(long)]
        config: Option<PathBuf>,
        /// RNG seed: decimal u64 or 0x-hex.
        #[arg(long, value_parser = parse_seed)]
        seed: u64,
        /// Leading ranks counted as approvals.
        #[arg(long)]
        approval_threshold: Option<usize>,
        /// Output file; without it the document goes to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Utility grid with segment summaries, or the spatial model.
    Analyze {
        /// Analysis request JSON (tagged by `analysis`: utility | spatial).
        #[arg(long)]
        request: PathBuf,
        /// Configuration override JSON.
        #[arg(long)]
        config: Option<PathBuf>,
        /// RNG seed: decimal u64 or 0x-hex.
        #[arg(long, value_parser = parse_seed)]
        seed: u64,
        /// Output file; without it the document goes to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Evaluate one method (or all applicable ones) on a ballot file.
    Evaluate {
        /// Ballot file JSON: { candidates, ballots: { kind, ballots }, params? }.
        #[arg(long)]
        ballots: PathBuf,
        /// Method name, e.g. `schulze`; omit to run every applicable method.
        #[arg(long)]
        method: Option<String>,
        /// Output file; without it the document goes to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Errors surfaced by argument parsing.
#[derive(Debug)]
pub enum CliError {
    Clap(clap::Error),
    NonLocalPath(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Clap(e) => write!(f, "{e}"),
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into())
    }
}

#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    match p.to_str() {
        Some(s) if has_scheme(s) => Err(CliError::NonLocalPath(s.to_string())),
        _ => Ok(()),
    }
}

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    let paths: [Option<&Path>; 3] = match &args.command {
        Command::Simulate { request, config, out, .. } | Command::Analyze { request, config, out, .. } => {
            [Some(request.as_path()), config.as_deref(), out.as_deref()]
        }
        Command::Evaluate { ballots, out, .. } => [Some(ballots.as_path()), out.as_deref(), None],
    };
    paths.into_iter().flatten()
}

/// Entry point used by main.rs. File existence is left to the loaders so a
/// missing input reports as an I/O failure.
pub fn parse_and_validate() -> Result<Args, CliError> {
    let args = Args::try_parse().map_err(CliError::Clap)?;
    for p in iter_all_paths(&args) {
        ensure_local_path(p)?;
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parser_decimal_and_hex() {
        assert_eq!(parse_seed("42").unwrap(), 42u64);
        assert_eq!(parse_seed("0x2A").unwrap(), 42u64);
        assert_eq!(parse_seed(" 7 ").unwrap(), 7u64);
        assert!(parse_seed("0x").is_err());
        assert!(parse_seed("0xFFFFFFFFFFFFFFFFF").is_err());
        assert!(parse_seed("-1").is_err());
    }

    #[test]
    fn local_paths_only() {
        assert!(ensure_local_path(Path::new("https://x/req.json")).is_err());
        assert!(ensure_local_path(Path::new("file://tmp/req.json")).is_err());
        assert!(ensure_local_path(Path::new("/tmp/req.json")).is_ok());
        assert!(ensure_local_path(Path::new("fixtures/ballots.json")).is_ok());
    }

    #[test]
    fn simulate_flags_parse() {
        let a = Args::try_parse_from(["sc", "-v", "simulate", "--request", "r.json", "--seed", "0x10"]).unwrap();
        assert!(a.verbose);
        match a.command {
            Command::Simulate { seed, config, out, .. } => {
                assert_eq!(seed, 16);
                assert!(config.is_none());
                assert!(out.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn analyze_flags_parse() {
        let a = Args::try_parse_from(["sc", "analyze", "--request", "a.json", "--seed", "3", "--config", "c.json"]).unwrap();
        let got: Vec<&Path> = iter_all_paths(&a).collect();
        assert_eq!(got, vec![Path::new("a.json"), Path::new("c.json")]);
        assert!(matches!(a.command, Command::Analyze { seed: 3, .. }));
    }

    #[test]
    fn simulate_requires_seed() {
        assert!(Args::try_parse_from(["sc", "simulate", "--request", "r.json"]).is_err());
    }

    #[test]
    fn paths_cover_every_flag() {
        let a = Args::try_parse_from(["sc", "evaluate", "--ballots", "b.json", "--out", "o.json"]).unwrap();
        let got: Vec<&Path> = iter_all_paths(&a).collect();
        assert_eq!(got, vec![Path::new("b.json"), Path::new("o.json")]);
    }
}
