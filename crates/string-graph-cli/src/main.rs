//! Command-line driver that wires the library's stages into the full
//! pipeline (`§6`): load reads, build the k-mer index, compute `B = A·Aᵀ`,
//! enrich surviving candidates with alignments, run transitive reduction,
//! and write both Matrix Market outputs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use string_graph::aligner::{FullAligner, NoAligner, XDropAligner};
use string_graph::config::{Alphabet, AlignerKind, Config, ScoringScheme};
use string_graph::errors::ConfigError;
use string_graph::impls::{build_kmer_index, ThreadGrid};
use string_graph::mm::parallel_write_mm;
use string_graph::reads::{load_idxmap, ReadTable};
use string_graph::semirings::kmer_intersection::{CommonKmers, KmerIntersectionSemiring};
use string_graph::spgemm::spgemm;
use string_graph::traits::{Aligner, ProcessGrid, SeedPair};
use string_graph::tr::transitive_reduction;
use string_graph::types::DEFAULT_FUZZ;

/// Builds a transitively-reduced string graph from a FASTA of long reads
/// (`§1`, `§6`).
#[derive(Debug, Parser)]
#[command(name = "string-graph", version, about)]
struct Cli {
    /// FASTA input path.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Expected sequence count, used to size distributed structures.
    #[arg(short = 'c', long = "count")]
    count: u32,

    /// K-mer length.
    #[arg(short = 'k', long = "klen")]
    kmer_length: u16,

    /// K-mer stride.
    #[arg(short = 's', long = "stride", default_value_t = 1)]
    stride: u32,

    /// Max seeds retained per overlap cell.
    #[arg(long = "sc", default_value_t = 2)]
    seed_count: usize,

    /// Match score.
    #[arg(long = "ma", default_value_t = 1)]
    match_score: i32,

    /// Mismatch score.
    #[arg(long = "mi", default_value_t = -1)]
    mismatch_score: i32,

    /// Gap-open score.
    #[arg(short = 'g', long = "gap-open", default_value_t = -1)]
    gap_open: i32,

    /// Gap-extend score.
    #[arg(short = 'e', long = "gap-ext", default_value_t = -1)]
    gap_extend: i32,

    /// X-drop threshold; selects the X-drop aligner.
    #[arg(long = "xa")]
    xdrop_threshold: Option<i32>,

    /// Selects the full dynamic-programming aligner.
    #[arg(long = "fa", default_value_t = false)]
    full_align: bool,

    /// Skips alignment entirely; seeds are reported verbatim.
    #[arg(long = "na", default_value_t = false)]
    no_align: bool,

    /// Index-map file path.
    #[arg(long = "idxmap")]
    idx_map: PathBuf,

    /// Input alphabet.
    #[arg(long = "alph", default_value = "dna")]
    alphabet: String,

    /// Process-grid side; defaults to the square root of the available
    /// thread count (ambient substrate detail, not part of `§6`'s CLI).
    #[arg(long = "grid-side")]
    grid_side: Option<usize>,

    /// Transitive-reduction slack.
    #[arg(long = "fuzz", default_value_t = DEFAULT_FUZZ)]
    fuzz: u32,

    /// Overrides the pre-TR overlap graph's output path.
    #[arg(long = "out-overlap")]
    out_overlap: Option<PathBuf>,

    /// Overrides the post-TR string graph's output path.
    #[arg(long = "out-string-graph")]
    out_string_graph: Option<PathBuf>,
}

impl Cli {
    /// Builds and validates a [`Config`] from parsed arguments (`§6`,
    /// `§7` "Configuration errors").
    fn into_config(&self) -> Result<Config, ConfigError> {
        let alphabet = match self.alphabet.as_str() {
            "dna" => Alphabet::Dna,
            other => return Err(ConfigError::UnknownAlphabet(other.to_string())),
        };

        let selected = usize::from(self.xdrop_threshold.is_some()) + usize::from(self.full_align) + usize::from(self.no_align);
        if selected != 1 {
            return Err(ConfigError::AmbiguousAlignerSelection);
        }
        let aligner = if let Some(threshold) = self.xdrop_threshold {
            AlignerKind::XDrop { threshold }
        } else if self.full_align {
            AlignerKind::Full
        } else {
            AlignerKind::None
        };

        let config = Config {
            input_file: self.input.clone(),
            sequence_count: self.count,
            kmer_length: self.kmer_length,
            kmer_stride: self.stride,
            max_seeds: self.seed_count,
            scoring: ScoringScheme {
                match_score: self.match_score,
                mismatch_score: self.mismatch_score,
                gap_open: self.gap_open,
                gap_extend: self.gap_extend,
            },
            aligner,
            idx_map_file: self.idx_map.clone(),
            alphabet,
        };
        config.validate()?;
        Ok(config)
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn build_aligner(config: &Config) -> Box<dyn Aligner> {
    match config.aligner {
        AlignerKind::XDrop { threshold } => Box::new(XDropAligner::new(config.scoring, threshold)),
        AlignerKind::Full => Box::new(FullAligner::new(config.scoring)),
        AlignerKind::None => Box::new(NoAligner),
    }
}

/// Derives a sibling output path next to the input FASTA, e.g.
/// `reads.fa` + `"overlap.mtx"` -> `reads.overlap.mtx`.
fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    input.with_file_name(format!("{stem}.{suffix}"))
}

/// Formats one cell for Matrix Market output: `"score dir sfx sfxT"`
/// (`§6` "Matrix Market output").
fn format_cell(cell: &CommonKmers) -> String {
    format!("{} {} {} {}", cell.score, cell.dir, cell.sfx, cell.sfx_t)
}

/// Batch-runs the selected aligner over every surviving candidate cell of
/// `b` and folds each result back in (`§5`, `§6` "Aligner contract").
fn enrich_with_alignments(
    b: &string_graph::impls::DistMatrix<CommonKmers>,
    reads: &ReadTable,
    grid: &impl ProcessGrid,
    aligner: &dyn Aligner,
    kmer_length: u32,
) -> anyhow::Result<string_graph::impls::DistMatrix<CommonKmers>> {
    let triples = b.collective_triples(grid).context("gathering overlap candidates")?;

    let mut seeds = Vec::with_capacity(triples.len());
    let mut seqs_h = Vec::with_capacity(triples.len());
    let mut seqs_v = Vec::with_capacity(triples.len());
    for (row, col, cell) in &triples {
        let (pos_h, pos_v) = cell.seeds[0].unwrap_or((0, 0));
        seeds.push(SeedPair { read_h: *row, read_v: *col, begin_h: pos_h, begin_v: pos_v, seed_length: kmer_length });
        seqs_h.push(reads.sequence(*row));
        seqs_v.push(reads.sequence(*col));
    }

    let alignments = aligner.run_batch(&seqs_h, &seqs_v, &seeds);

    let enriched: Vec<(u32, u32, CommonKmers)> = triples
        .into_iter()
        .zip(alignments)
        .map(|((row, col, cell), alignment)| {
            let row_len = reads.sequence(row).len() as u32;
            let col_len = reads.sequence(col).len() as u32;
            (row, col, cell.enrich(&alignment, row_len, col_len, false))
        })
        .collect();

    Ok(string_graph::impls::DistMatrix::from_global_triples(b.n_rows(), b.n_cols(), b.grid_side(), enriched))
}

fn run_pipeline(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let reads = ReadTable::from_fasta(&config.input_file).with_context(|| format!("loading reads from {}", config.input_file.display()))?;
    let _idx_map = load_idxmap(&config.idx_map_file).with_context(|| format!("loading index map from {}", config.idx_map_file.display()))?;

    let grid_side = cli.grid_side.unwrap_or_else(|| (rayon::current_num_threads() as f64).sqrt().floor().max(1.0) as usize);
    let grid = ThreadGrid::new(grid_side);

    tracing::info!(reads = reads.len(), grid_side, "building k-mer index");
    let a = build_kmer_index(&reads, config.kmer_length, config.kmer_stride, grid_side);
    let a_t = a.transpose();

    tracing::info!("computing overlap candidates");
    let b = spgemm::<KmerIntersectionSemiring>(&a, &a_t);
    let b = b.prune(|row, col, cell| row != col && cell.count > 0);

    let aligner = build_aligner(config);
    tracing::info!(candidates = b.nnz(), "enriching candidates with alignments");
    let enriched = enrich_with_alignments(&b, &reads, &grid, aligner.as_ref(), u32::from(config.kmer_length))?;

    tracing::info!("running transitive reduction");
    let output = transitive_reduction(&enriched, &reads, cli.fuzz);

    let overlap_path = cli.out_overlap.clone().unwrap_or_else(|| sibling_path(&config.input_file, "overlap.mtx"));
    let string_graph_path = cli.out_string_graph.clone().unwrap_or_else(|| sibling_path(&config.input_file, "strings.mtx"));

    parallel_write_mm(&overlap_path, &grid, &output.symmetric_overlap_graph, "symmetric overlap graph", format_cell)
        .with_context(|| format!("writing {}", overlap_path.display()))?;
    parallel_write_mm(&string_graph_path, &grid, &output.string_graph, "transitively-reduced string graph", format_cell)
        .with_context(|| format!("writing {}", string_graph_path.display()))?;

    tracing::info!(
        overlap_edges = output.symmetric_overlap_graph.nnz(),
        string_graph_edges = output.string_graph.nnz(),
        "pipeline complete"
    );
    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("string-graph: configuration error: {err}");
            std::process::exit(-1);
        }
    };

    if let Err(err) = run_pipeline(&cli, &config) {
        tracing::error!(error = %err, "pipeline failed");
        eprintln!("string-graph: {err:#}");
        std::process::exit(1);
    }
}
