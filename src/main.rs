use anyhow::Context;
use clap::{Parser, ValueEnum};
use graph_rank::{rank_stream, Options, SnapshotOrder};
use log::LevelFilter;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Order {
    /// Internal heap order, the worst admitted graph first.
    Heap,
    /// Ascending by score, ties by graph id.
    Score,
}

/// Keeps the k graphs with the smallest sum of shortest paths from vertex 0.
///
/// Reads `d k`, then a stream of `AggiungiGrafo` records (d rows of d comma-separated
/// weights) and `TopK` queries. Prints the admitted graph ids for every query.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Input file. Reads standard input if omitted.
    input: Option<PathBuf>,

    /// Order of the ids printed for each query.
    #[arg(long, value_enum, default_value = "heap")]
    order: Order,

    /// Always read full records, even when the source row proves they cannot be admitted.
    #[arg(long)]
    no_prune_rows: bool,

    /// Always run shortest-path searches to completion.
    #[arg(long)]
    no_prune_paths: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Overrides RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = Options {
        prune_rows: !args.no_prune_rows,
        prune_paths: !args.no_prune_paths,
        order: match args.order {
            Order::Heap => SnapshotOrder::Heap,
            Order::Score => SnapshotOrder::Score,
        },
    };

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());

    match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            rank_stream(BufReader::new(file), &mut output, options)
                .with_context(|| format!("failed to process {}", path.display()))?;
        }
        None => {
            let stdin = io::stdin();
            rank_stream(stdin.lock(), &mut output, options)
                .context("failed to process standard input")?;
        }
    }
    Ok(())
}
