//! swiftreq
//!
//! Generates Swift request/model files for one endpoint and registers them
//! in the project.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use colored::Colorize;
use swiftreq_define::OutputMode;
use swiftreq_gen::annotations::parse_method;
use swiftreq_gen::config::ProjectLayout;
use swiftreq_gen::output::{Invocation, ResponseSource, generate};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// swiftreq - scaffold Swift networking requests and response models
#[derive(Parser, Debug)]
#[command(name = "swiftreq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP method (GET or POST)
    #[arg(short, long)]
    method: String,

    /// URL path, e.g. /user/profile
    #[arg(short, long)]
    path: String,

    /// Human-readable summary, written above the path binding
    #[arg(short, long)]
    summary: String,

    /// Server domain, e.g. api.example.com
    #[arg(long)]
    server: String,

    /// Comma-separated parameters, e.g. "userId:int,name:string"
    #[arg(long)]
    params: Option<String>,

    /// Inline response: JSON, or a field list such as "id:int,tags:[string]"
    #[arg(short, long)]
    response: Option<String>,

    /// JSON file with a sample response
    #[arg(long, conflicts_with = "response")]
    response_file: Option<PathBuf>,

    /// Project root directory
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// What to write: print (stdout only), files, or full (also patch project.pbxproj)
    #[arg(short, long, default_value_t = OutputMode::Files)]
    output_mode: OutputMode,

    /// Warn and skip group membership when a manifest group is missing
    #[arg(long)]
    allow_missing_group: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize tracing subscriber based on verbosity level.
///
/// Verbosity levels:
/// - 0 (default): WARN only, so diagnostics are always shown
/// - 1 (-v): INFO (bindings added, files written)
/// - 2 (-vv): DEBUG (lookups, skipped patches)
/// - 3+ (-vvv): TRACE with file/line numbers
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,swiftreq_gen=info".to_string(),
            2 => "info,swiftreq_gen=debug".to_string(),
            _ => "debug,swiftreq_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose > 0)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let invocation = Invocation {
        method: parse_method(&cli.method)?,
        path: cli.path,
        summary: cli.summary,
        server: cli.server,
        params: cli.params,
        response: ResponseSource::from_args(cli.response, cli.response_file),
        mode: cli.output_mode,
        allow_missing_group: cli.allow_missing_group,
    };

    let layout = ProjectLayout::load(&cli.project_root)?;
    let plan = generate(&invocation, &cli.project_root, &layout)?;

    if plan.mode == OutputMode::Print {
        print!("{}", plan.print_source());
        return Ok(());
    }

    if plan.writes.is_empty() {
        eprintln!("{} nothing to write", "✓".green());
    }
    for write in &plan.writes {
        eprintln!("{} {}", "✓".green(), write.path.display().to_string().bold());
    }

    Ok(())
}
