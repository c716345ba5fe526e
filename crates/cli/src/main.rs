mod echo;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use renderdot_core::{
    DepGraph, DepGraphExtractor, ErrorKind, GraphSummary, JsonConfig, JsonFormatter, RenderDotError, fetch_file,
    fetch_stdin,
};
use tracing::debug;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_INPUT: &str = "blueprint/web/dep_graph_document.html";
const DEFAULT_OUTPUT: &str = "atomization/dep_graph.json";

/// Shape of the written JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Raw graph record with `node_info`
    Graph,
    /// Per-node blueprint view (kind, statuses, dependencies)
    Blueprint,
}

/// Extract the DOT dependency graph embedded in an HTML page and write it as JSON
#[derive(Parser, Debug)]
#[command(name = "renderdot")]
#[command(author = "renderdot contributors")]
#[command(version)]
#[command(about = "Extract the renderDot dependency graph from an HTML document", long_about = None)]
struct Args {
    /// HTML document to read, or "-" for stdin
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    input: String,

    /// Output file, or "-" for stdout
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Graph, value_name = "FORMAT")]
    format: OutputFormat,

    /// Write single-line JSON instead of pretty printing
    #[arg(long)]
    compact: bool,

    /// Suppress progress and summary output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Skip the graph summary
    #[arg(long)]
    no_analysis: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "renderdot", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    if let Err(err) = init_tracing(args.quiet, args.verbose) {
        echo::print_error(&format!("{:#}", err));
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = error_kind(&err);
            echo::print_error(&format!("{}: {:#}", kind_label(kind), err));
            ExitCode::from(exit_code(kind))
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("RENDERDOT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
    let started = Instant::now();
    let chatty = !args.quiet;

    if args.verbose {
        echo::print_banner();
    }

    let html = if args.input == "-" {
        if chatty {
            echo::print_step(1, 3, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else {
        if chatty {
            echo::print_step(1, 3, &format!("Reading from file {}", args.input.bright_white()));
        }
        fetch_file(&args.input).context("Failed to read document")?
    };

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(html.len()).bright_white());
    }

    if chatty {
        echo::print_step(2, 3, "Extracting dependency graph");
    }

    let graph = DepGraphExtractor::new()
        .and_then(|extractor| extractor.extract(&html))
        .context("Failed to extract dependency graph")?;
    debug!(input = %args.input, bytes = html.len(), "document processed");

    if args.verbose {
        echo::print_parse_details(&graph);
    }

    if chatty {
        echo::print_step(3, 3, "Writing output");
    }

    let output = render(&graph, args.format, !args.compact).context("Failed to serialize output")?;
    write_output(&args.output, &output)?;

    if chatty {
        if args.output != "-" {
            echo::print_success(&format!("Output written to {}", args.output.bright_white()));
        }
        if !args.no_analysis {
            echo::print_summary(&GraphSummary::from_graph(&graph));
        }
    }

    if args.verbose {
        echo::print_timing("Total", started.elapsed());
    }

    Ok(())
}

fn render(graph: &DepGraph, format: OutputFormat, pretty: bool) -> renderdot_core::Result<String> {
    let formatter = JsonFormatter::new(JsonConfig { pretty, ..Default::default() });
    match format {
        OutputFormat::Graph => formatter.convert(graph),
        OutputFormat::Blueprint => formatter.blueprint(graph),
    }
}

/// Writes to stdout for `-`, otherwise to a file whose parent directories are
/// created as needed.
fn write_output(target: &str, output: &str) -> anyhow::Result<()> {
    if target == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes()).context("Failed to write to stdout")?;
        return stdout.flush().context("Failed to write to stdout");
    }

    let path = Path::new(target);
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))
}

fn error_kind(err: &anyhow::Error) -> ErrorKind {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<RenderDotError>())
        .map(RenderDotError::kind)
        .unwrap_or(ErrorKind::Other)
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InputNotFound => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::MalformedInput => 4,
        ErrorKind::Other => 1,
    }
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InputNotFound => "input not found",
        ErrorKind::NotFound => "no renderDot call",
        ErrorKind::MalformedInput => "malformed input",
        ErrorKind::Other => "error",
    }
}
