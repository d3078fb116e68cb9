use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use readmap_core::io::{fasta, fastq};
use readmap_core::render::render_alignment;
use readmap_core::{ReadAligner, ReferenceIndex, SearchParams};

#[derive(Parser)]
#[command(name = "readmap")]
#[command(about = "readmap - approximate short-read alignment via seed-and-extend")]
#[command(version)]
#[command(long_about = "
readmap locates, for each unique read of a FASTQ file, the best-matching
region of a reference sequence under bounded edit distance, and prints
each alignment padded to its reference coordinate.

Examples:
  readmap --reference ref.fa --reads short_reads.fq
  readmap --reference ref.fa.gz --reads reads.fq.gz -k 8 --window 5 --threshold 3
")]
struct Cli {
    /// Reference FASTA file (optionally gzipped)
    #[arg(long, required = true)]
    reference: PathBuf,

    /// Read FASTQ file (optionally gzipped)
    #[arg(long, required = true)]
    reads: PathBuf,

    /// Seed (k-mer) length
    #[arg(short, long, default_value_t = 8)]
    k: usize,

    /// Read sampling interval for seeding
    #[arg(long, default_value_t = 4)]
    stride: usize,

    /// Extension window size (must not exceed k)
    #[arg(short, long, default_value_t = 5)]
    window: usize,

    /// Maximum edit distance per extension window
    #[arg(short, long, default_value_t = 3)]
    threshold: u32,

    /// Fraction of the read length an extension must exceed to be kept
    #[arg(long, default_value_t = 0.10)]
    min_keep_frac: f64,

    /// Minimum aligned length for a read to be reported (defaults to k)
    #[arg(long)]
    min_report_len: Option<usize>,

    /// Skip index buckets with at least this many reference positions
    #[arg(long, default_value_t = 10)]
    repeat_cutoff: usize,

    /// Near-duplicate gate as a fraction of the read length
    #[arg(long, default_value_t = 0.05)]
    similarity_gate: f64,

    /// Disable all intra-read parallelism
    #[arg(long)]
    sequential: bool,

    /// Do not print the reference line above the alignments
    #[arg(long)]
    no_reference_line: bool,

    /// Number of threads
    #[arg(long)]
    threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to set thread count")?;
    }

    let params = SearchParams {
        k: cli.k,
        stride: cli.stride,
        window: cli.window,
        threshold: cli.threshold,
        min_keep_frac: cli.min_keep_frac,
        min_report_len: cli.min_report_len.unwrap_or(cli.k),
        repeat_cutoff: cli.repeat_cutoff,
        similarity_gate: cli.similarity_gate,
        parallel_seeds: !cli.sequential,
        parallel_extend: !cli.sequential,
    };
    params.validate()?;

    let start = Instant::now();

    let reference = fasta::read_reference(&cli.reference)
        .with_context(|| format!("failed to load reference from {}", cli.reference.display()))?;
    let reads = fastq::read_reads(&cli.reads)
        .with_context(|| format!("failed to load reads from {}", cli.reads.display()))?;
    log::info!(
        "loaded reference ({} bases) and {} reads ({} unique) in {:.2?}",
        reference.len(),
        reads.total_reads(),
        reads.unique_len(),
        start.elapsed()
    );

    let index_start = Instant::now();
    let index = ReferenceIndex::build(&reference, params.k).context("failed to index reference")?;
    log::info!(
        "indexed {} distinct {}-mers in {:.2?}",
        index.distinct_kmers(),
        params.k,
        index_start.elapsed()
    );

    let aligner = ReadAligner::new(&reference, &index, params)?;
    let (alignments, stats) = aligner.align_all(&reads)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if !cli.no_reference_line {
        out.write_all(&reference)?;
        writeln!(out)?;
    }
    for alignment in &alignments {
        writeln!(out, "{}", render_alignment(&alignment.sequence, alignment.ref_offset))?;
    }
    out.flush()?;

    log::info!(
        "run finished in {:.2?}: {} of {} unique reads reported",
        start.elapsed(),
        stats.alignments_emitted,
        stats.unique_reads
    );
    Ok(())
}
