//! burst-core - burst level inference CLI
//!
//! Reads one timestamp per line, infers an activity level for every
//! inter-event gap and prints the constant-level segments:
//!
//! ```text
//! burst-core viterbi offsets.txt
//! burst-core -s 3 -g 0.5 --debug trellis offsets.txt
//! ```

use std::io::Write;
use std::path::PathBuf;

use burst_core::config::{load_config, ConfigSource};
use burst_core::error::BurstError;
use burst_core::exit_codes::ExitCode;
use burst_core::inference::Algorithm;
use burst_core::input::{intervals, read_timestamps};
use burst_core::log_event;
use burst_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use burst_core::report::{OutputFormat, Report, REPORT_SCHEMA_VERSION};
use clap::Parser;
use tracing::field::display;

/// Identify the activity periods of an event stream
#[derive(Parser, Debug)]
#[command(name = "burst-core")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Evaluation strategy (both give the same segments; they trace differently)
    #[arg(value_enum)]
    algorithm: Algorithm,

    /// File with one event timestamp per line
    offsets_file: PathBuf,

    /// Growth factor between adjacent rate levels (default 2)
    #[arg(short = 's', allow_negative_numbers = true)]
    s: Option<f64>,

    /// Penalty per level of escalation (default 1)
    #[arg(short = 'g', long, allow_negative_numbers = true)]
    gamma: Option<f64>,

    /// Trace the trellis fill to stderr
    #[arg(short = 'd', long)]
    debug: bool,

    /// Solver config file (JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Log format on stderr
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

/// An error together with the stage it stopped.
struct Failure {
    stage: Stage,
    error: BurstError,
}

fn at(stage: Stage) -> impl FnOnce(BurstError) -> Failure {
    move |error| Failure { stage, error }
}

fn main() {
    let cli = Cli::parse();

    let mut log_config =
        LogConfig::from_env(LogLevel::from_verbosity(cli.verbose, cli.quiet), cli.log_format);
    if cli.debug {
        log_config = log_config.at_least(LogLevel::Debug);
    }
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());
    let exit_code = match run(&cli, &ctx) {
        Ok(()) => ExitCode::Clean,
        Err(failure) => output_error(&cli, &ctx, &failure),
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli, ctx: &LogContext) -> Result<(), Failure> {
    log_event!(
        ctx,
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "starting burst level inference",
        algorithm = display(cli.algorithm),
        input = display(cli.offsets_file.display())
    );

    let resolved = load_config(cli.config.as_deref())
        .map_err(BurstError::from)
        .map_err(at(Stage::Init))?;
    match (&resolved.source, &resolved.path) {
        (ConfigSource::BuiltinDefault, _) | (_, None) => log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_DEFAULT_USED,
            Stage::Init,
            "using built-in solver defaults"
        ),
        (source, Some(path)) => log_event!(
            ctx,
            INFO,
            event_names::CONFIG_LOADED,
            Stage::Init,
            "loaded solver config",
            source = display(source),
            path = display(path.display())
        ),
    }
    let params = resolved
        .solver
        .with_overrides(cli.s, cli.gamma)
        .params()
        .map_err(at(Stage::Init))?;

    let times = read_timestamps(&cli.offsets_file).map_err(at(Stage::Parse))?;
    let gaps = intervals(&times).map_err(at(Stage::Parse))?;

    log_event!(
        ctx,
        INFO,
        event_names::SOLVE_STARTED,
        Stage::Solve,
        "filling trellis",
        intervals = gaps.len(),
        s = params.s(),
        gamma = params.gamma()
    );
    let path = cli
        .algorithm
        .run(&gaps, &params, cli.debug)
        .map_err(at(Stage::Solve))?;
    log_event!(
        ctx,
        INFO,
        event_names::SOLVE_FINISHED,
        Stage::Solve,
        "level path found",
        total_cost = path.total_cost,
        max_level = path.max_level,
        changes = path.changes()
    );

    let report = Report::new(ctx.run_id.clone(), cli.algorithm, params, &path, &times)
        .map_err(at(Stage::Report))?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report
        .write(cli.format, &mut out)
        .and_then(|()| out.flush())
        .map_err(BurstError::from)
        .map_err(at(Stage::Report))?;
    log_event!(
        ctx,
        DEBUG,
        event_names::REPORT_WRITTEN,
        Stage::Report,
        "report written",
        segments = report.segments.len(),
        format = display(cli.format)
    );

    Ok(())
}

/// Log the failure and describe it on stderr; returns the exit code.
fn output_error(cli: &Cli, ctx: &LogContext, failure: &Failure) -> ExitCode {
    let error = &failure.error;
    let exit_code = error.exit_code();

    match error {
        BurstError::Internal(_) => log_event!(
            ctx,
            ERROR,
            event_names::INTERNAL_ERROR,
            failure.stage,
            "internal error",
            error = display(error)
        ),
        BurstError::Config(_) => log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_ERROR,
            failure.stage,
            "config rejected",
            error = display(error)
        ),
        _ => log_event!(
            ctx,
            DEBUG,
            event_names::RUN_FAILED,
            failure.stage,
            "run failed",
            kind = error.kind(),
            exit_code = exit_code.as_i32()
        ),
    }

    match cli.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": REPORT_SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "error": {
                    "kind": error.kind(),
                    "stage": failure.stage,
                    "code": exit_code.code_name(),
                    "exit_code": exit_code.as_i32(),
                    "message": error.to_string(),
                }
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string())
            );
        }
        OutputFormat::Human | OutputFormat::Summary => {
            eprintln!("burst-core: {}", error);
        }
    }

    exit_code
}
