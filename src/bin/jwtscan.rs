//! Command-line front end for jwtscan
//!
//! Reads a token from the first argument or from stdin, runs the analysis
//! pipeline and prints the report. Exits with 0 when the token is
//! well-formed, 1 when it is not and 2 on usage or I/O errors.

use clap::{Parser, ValueEnum};
use jwtscan::{
    AlgorithmPolicy, AnalysisReport, FixedClock, RuleSet, StageReport, SystemClock, TokenAnalyzer,
};
use std::io::{self, Read};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full report as JSON
    Json,
    /// One line per phase and diagnostic
    Pretty,
    /// Derivation tree outline
    Tree,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Token to analyze; read from stdin when omitted
    token: Option<String>,

    /// Unix timestamp used as "now" for temporal checks
    #[arg(long, env = "JWTSCAN_NOW")]
    now: Option<i64>,

    /// Comma-separated algorithm allow-list (e.g. "HS256,RS256")
    #[arg(long, value_delimiter = ',', env = "JWTSCAN_ALGORITHMS")]
    algorithms: Vec<String>,

    /// Value the `typ` header is expected to carry
    #[arg(long, default_value = "JWT")]
    expected_typ: String,

    #[arg(long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Print the active rule set as JSON and exit
    #[arg(long)]
    rules: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("jwtscan: {message}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let mut rules = RuleSet::new().expected_typ(cli.expected_typ);
    if !cli.algorithms.is_empty() {
        let policy = AlgorithmPolicy::from_names(&cli.algorithms).map_err(|e| e.to_string())?;
        rules = rules.algorithms(policy);
    }

    if cli.rules {
        let json = serde_json::to_string_pretty(&rules.describe()).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(ExitCode::SUCCESS);
    }

    let token = read_token(cli.token, io::stdin())?;

    let analyzer = TokenAnalyzer::new().rules(rules);
    let analyzer = match cli.now {
        Some(now) => analyzer.clock(FixedClock(now)),
        None => analyzer.clock(SystemClock),
    };

    let report = analyzer.analyze(&token);
    tracing::info!(
        success = report.overall_success,
        stopped_at = ?report.stopped_at,
        "analyzed token"
    );

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
            println!("{json}");
        }
        OutputFormat::Pretty => print!("{}", pretty(&report)),
        OutputFormat::Tree => match report.syntactic.as_ref().and_then(|s| s.details.tree.as_ref()) {
            Some(tree) => print!("{}", tree.render()),
            None => println!("(no derivation tree) {}", report.summary),
        },
    }

    Ok(if report.overall_success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Token from the argument as given, or from `input` without its line ending
fn read_token(argument: Option<String>, mut input: impl Read) -> Result<String, String> {
    if let Some(token) = argument {
        return Ok(token);
    }

    let mut token = String::new();
    input
        .read_to_string(&mut token)
        .map_err(|e| format!("failed to read token from stdin: {e}"))?;
    let len = token.trim_end_matches(['\n', '\r']).len();
    token.truncate(len);
    Ok(token)
}

fn pretty(report: &AnalysisReport) -> String {
    let mut out = String::new();
    stage(&mut out, &report.lexical);
    if let Some(syntactic) = &report.syntactic {
        stage(&mut out, syntactic);
    }
    if let Some(error) = &report.decode_error {
        out.push_str(&format!("[decode] FAIL\n  error: {error}\n"));
    }
    if let Some(semantic) = &report.semantic {
        stage(&mut out, semantic);
    }
    out.push_str(&report.summary);
    out.push('\n');
    out
}

fn stage<T>(out: &mut String, report: &StageReport<T>) {
    let status = if report.success { "ok" } else { "FAIL" };
    out.push_str(&format!("[{}] {status}\n", report.phase));
    for diagnostic in &report.diagnostics {
        out.push_str(&format!("  {diagnostic}\n"));
    }
}
