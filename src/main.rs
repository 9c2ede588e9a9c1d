use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use log::info;

use overlap_assembler::{assemble, parse_threshold, read_kmers, AssemblyConfig, GraphExport};

/// Reassemble sequences from equal-length overlapping k-mers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File with one k-mer per line (FASTA/FASTQ and .gz are also accepted)
    input: PathBuf,

    /// Only print assembled sequences at least this long
    #[arg(allow_hyphen_values = true)]
    min_output_length: String,

    /// Ignore sources that have no successors
    #[arg(long)]
    require_successor: bool,

    /// Enumerate paths from independent sources on a thread pool (needs the `parallel` feature)
    #[arg(long, default_value_t = false)]
    threads: bool,

    /// Number of worker threads for path enumeration (default: max available - 1)
    #[arg(long, default_value_t = num_cpus::get().saturating_sub(1).max(1))]
    max_workers: usize,

    /// Write the final contig graph as JSON (nodes and edges)
    #[arg(long)]
    export_graph_json: Option<PathBuf>,

    /// Print adjacency lists for every phase (same as DNA_DEBUG=1)
    #[arg(long)]
    dump_graph: bool,

    /// Verbose/info output (default: quiet)
    #[arg(long, short = 'v', alias = "info")]
    verbose: bool,

    /// Debug output
    #[arg(long)]
    debug: bool,

    /// Trace output
    #[arg(long)]
    trace: bool,
}

fn usage() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "overlap-assembler".to_string());
    println!("Usage: {program} <input-file> <min-output-length>");
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::MissingRequiredArgument
            | ErrorKind::UnknownArgument
            | ErrorKind::TooManyValues
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                usage();
                return ExitCode::SUCCESS;
            }
            _ => err.exit(),
        },
    };

    let log_level = if args.trace {
        "trace"
    } else if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "error"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Assembly failed: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let min_output_len = parse_threshold(&args.min_output_length)?;
    let kmers = read_kmers(&args.input)
        .with_context(|| format!("Failed to load k-mers from {}", args.input.display()))?;
    info!("Loaded {} k-mers from {}", kmers.len(), args.input.display());

    let config = AssemblyConfig {
        min_output_len,
        require_successor: args.require_successor,
        use_threads: args.threads,
        max_workers: args.max_workers,
        debug_dump: args.dump_graph || AssemblyConfig::debug_from_env(),
    };
    let assembly = assemble(&kmers, &config)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for solution in &assembly.solutions {
        writeln!(out, "{solution}")?;
    }
    out.flush()?;

    if let Some(path) = &args.export_graph_json {
        export_graph(path, &GraphExport::new(&assembly.graph, &assembly.contigs))?;
        info!("Contig graph written to {}", path.display());
    }
    Ok(())
}

fn export_graph(path: &Path, export: &GraphExport<'_>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(file, "{}", serde_json::to_string_pretty(export)?)?;
    Ok(())
}
