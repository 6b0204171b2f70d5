use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use log::{info, warn};
use rayon::prelude::*;

use fm_index::index::{IndexFile, IndexMeta};
use fm_index::io::fasta::FastaReader;
use fm_index::io::fastq::FastqReader;
use fm_index::{report, BuildOptions, Matcher};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "fm",
    author,
    version,
    about = "FM-index exact pattern matching",
    override_usage = "fm -p <GENOME>\n       fm <GENOME> <READS>"
)]
struct Cli {
    /// Preprocess the genome: build the index and write it to disk
    #[arg(short = 'p')]
    preprocess: bool,
    /// Simple-FASTA file containing the genome
    genome: PathBuf,
    /// Simple-FASTQ file containing the reads
    reads: Option<PathBuf>,
    /// Index path: written by -p, read when searching (defaults to <GENOME>.fm)
    #[arg(short = 'i', long = "index")]
    index: Option<PathBuf>,
    /// Output simple-sam path when searching (stdout if omitted)
    #[arg(short, long, conflicts_with = "preprocess")]
    out: Option<PathBuf>,
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,
    /// Terminator appended to every genome record; must not occur in the genome
    #[arg(long, default_value = "$", value_parser = parse_terminator)]
    terminator: u8,
}

fn parse_terminator(s: &str) -> std::result::Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("terminator must be a single ASCII character, got '{}'", s)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let index_path = cli.index.clone().unwrap_or_else(|| default_index_path(&cli.genome));

    if cli.preprocess {
        return run_preprocess(&cli.genome, &index_path, cli.terminator);
    }
    // searching needs the reads argument
    let Some(reads) = cli.reads.as_deref() else {
        Cli::command().print_help()?;
        std::process::exit(1);
    };
    run_search(&cli.genome, &index_path, reads, cli.out.as_deref(), cli.threads, cli.terminator)
}

fn default_index_path(genome: &Path) -> PathBuf {
    let mut p = genome.as_os_str().to_owned();
    p.push(".fm");
    PathBuf::from(p)
}

fn build_index(genome: &Path, terminator: u8) -> Result<IndexFile> {
    let fh = std::fs::File::open(genome)
        .with_context(|| format!("cannot open genome FASTA '{}'", genome.display()))?;
    let opts = BuildOptions { terminator };
    let mut index = IndexFile::new(IndexMeta {
        reference_file: Some(genome.display().to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
        terminator,
    });

    for rec in FastaReader::new(BufReader::new(fh)) {
        let rec = rec?;
        let mut text = rec.seq;
        text.push(terminator);
        let matcher = Matcher::build_with(&text, &opts)
            .with_context(|| format!("cannot index record '{}'", rec.name))?;
        info!("indexed '{}' ({} bp)", rec.name, text.len() - 1);
        index.push(rec.name, matcher);
    }

    if index.entries.is_empty() {
        bail!("FASTA file '{}' contains no sequences", genome.display());
    }
    Ok(index)
}

fn run_preprocess(genome: &Path, index_path: &Path, terminator: u8) -> Result<()> {
    let index = build_index(genome, terminator)?;
    let total_len: usize = index.entries.iter().map(|e| e.seq_len()).sum();
    println!("genome: {}", genome.display());
    println!("sequences: {}", index.entries.len());
    println!("total_len: {}", total_len);

    index
        .save_to_file(index_path)
        .with_context(|| format!("cannot write index to '{}'", index_path.display()))?;
    println!("FM index saved: {}", index_path.display());
    Ok(())
}

/// Loads the index at `index_path` if present and built with the same terminator.
/// A different terminator means the index is rebuilt; a different genome path only warns.
fn load_existing_index(
    genome: &Path,
    index_path: &Path,
    terminator: u8,
) -> Result<Option<IndexFile>> {
    if !index_path.exists() {
        return Ok(None);
    }
    info!("loading index {}", index_path.display());
    let index = IndexFile::load_from_file(index_path)
        .with_context(|| format!("cannot load index '{}'", index_path.display()))?;

    if index.meta.terminator != terminator {
        warn!(
            "index {} was built with terminator '{}' but '{}' was requested, rebuilding",
            index_path.display(),
            index.meta.terminator.escape_ascii(),
            terminator.escape_ascii()
        );
        return Ok(None);
    }
    let genome_name = genome.display().to_string();
    if index.meta.reference_file.as_deref() != Some(genome_name.as_str()) {
        warn!(
            "index {} was built from '{}', not '{}'",
            index_path.display(),
            index.meta.reference_file.as_deref().unwrap_or("<unknown>"),
            genome_name
        );
    }
    Ok(Some(index))
}

fn run_search(
    genome: &Path,
    index_path: &Path,
    reads_path: &Path,
    out_path: Option<&Path>,
    threads: usize,
    terminator: u8,
) -> Result<()> {
    let index = match load_existing_index(genome, index_path, terminator)? {
        Some(index) => index,
        None => {
            info!("building index for {} in memory", genome.display());
            build_index(genome, terminator)?
        }
    };

    let fq = std::fs::File::open(reads_path)
        .with_context(|| format!("cannot open reads FASTQ '{}'", reads_path.display()))?;
    let reads = FastqReader::new(BufReader::new(fq)).collect::<Result<Vec<_>>>()?;

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?;
    let hits: Vec<Vec<report::Hit>> = pool.install(|| {
        reads
            .par_iter()
            .map(|r| report::collect_hits(&index.entries, &r.seq))
            .collect()
    });

    let mut out: Box<dyn Write> = match out_path {
        Some(p) => Box::new(BufWriter::new(
            std::fs::File::create(p).with_context(|| format!("cannot create '{}'", p.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    for (read, h) in reads.iter().zip(&hits) {
        report::write_read(&mut out, read, h, &index.entries)?;
    }
    out.flush()?;

    let mapped = hits.iter().filter(|h| !h.is_empty()).count();
    info!("{} reads, {} with exact matches", reads.len(), mapped);
    Ok(())
}
