use std::collections::{BTreeSet, HashMap};
use std::env;
use std::time::Instant;

use clap::Parser;
use log::info;

use binner_core::coverage::CoverageTable;
use binner_core::errors::BinnerError;
use binner_core::io::writers::{
    anchored_cluster_rows, ensemble_rows_as_label_contig, final_label_rows, write_denovo_tables,
    write_diagnostics, write_label_contig_table,
};
use binner_core::io::{read_anchor_table, read_contigs};
use binner_core::params::{Params, Preset};
use binner_core::pipeline;

#[derive(Parser, Debug)]
#[clap(name = "binner")]
#[clap(about = "Bins metagenomic contigs by tetranucleotide and coverage profile, optionally anchored by a trusted-genome table.", long_about = None)]
struct Args {
    /// input FASTA of assembled contigs
    #[clap(long, short = 'i')]
    contigs: String,
    /// tab-separated per-sample coverage table (subcontig_id, sample_1, ...)
    #[clap(long, short = 'c')]
    coverage: String,
    /// tab-separated anchor table (anchor_id, q_contig_id, jacc_sim, jacc_sim_max); omit to run
    /// only the de-novo stages
    #[clap(long, short = 'a')]
    anchors: Option<String>,
    /// output prefix; five `<prefix>.*.tsv` tables and a diagnostics table are written
    #[clap(long, short = 'o')]
    out_prefix: String,
    /// named preset overriding the cluster/recruiter defaults: very_relaxed, relaxed, strict, very_strict
    #[clap(long)]
    preset: Option<String>,
    #[clap(long, default_value_t = 10_000)]
    window_size: usize,
    #[clap(long, default_value_t = 2_000)]
    overlap: usize,
    #[clap(long, default_value_t = 42)]
    random_seed: u64,
    /// enable the optional k-means denoising pre-pass before the one-class recruiters
    #[clap(long, action)]
    kmeans_denoise: bool,
    #[clap(short = 'v', long, action)]
    verbose: bool,
}

impl Args {
    fn build_params(&self) -> Result<Params, BinnerError> {
        let mut params = Params::default();
        if let Some(name) = &self.preset {
            let preset = Preset::parse(name).ok_or_else(|| BinnerError::InvalidParameter {
                name: "preset".into(),
                value: name.clone(),
            })?;
            params = params.with_preset(preset);
        }
        params.window_size = self.window_size;
        params.overlap = self.overlap;
        params.random_seed = self.random_seed;
        params.kmeans_denoise_enabled = self.kmeans_denoise;
        params.validate()?;
        Ok(params)
    }
}

fn main() -> Result<(), BinnerError> {
    unsafe {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();
    let args = Args::parse();
    if args.verbose {
        info!("verbose mode requested; RUST_LOG governs actual log level");
    }

    let params = args.build_params()?;

    let start = Instant::now();
    let contigs = read_contigs(&args.contigs)?;
    info!("loaded {} contigs from {}", contigs.len(), args.contigs);

    let coverage = CoverageTable::read_tsv(&args.coverage)?;
    info!("loaded coverage table with {} samples", coverage.n_samples());

    let anchors: HashMap<String, BTreeSet<String>> = match &args.anchors {
        Some(path) => {
            let table = read_anchor_table(path)?;
            info!("loaded {} anchors from {}", table.len(), path);
            table
        }
        None => HashMap::new(),
    };

    let output = pipeline::run(&contigs, &coverage, &anchors, &params)?;
    info!("pipeline finished in {:?}", start.elapsed());

    write_denovo_tables(
        &format!("{}.denovo_clusters.tsv", args.out_prefix),
        &format!("{}.denovo_noise.tsv", args.out_prefix),
        &output.denovo_rows,
        &output.denovo_decisions,
    )?;
    write_label_contig_table(
        &format!("{}.hdbscan_clusters.tsv", args.out_prefix),
        &anchored_cluster_rows(&output.anchored_clusters),
    )?;
    write_label_contig_table(
        &format!("{}.ocsvm_clusters.tsv", args.out_prefix),
        &ensemble_rows_as_label_contig(&output.ensemble_rows),
    )?;
    write_label_contig_table(
        &format!("{}.inter_clusters.tsv", args.out_prefix),
        &final_label_rows(&output.final_labels),
    )?;
    write_diagnostics(&format!("{}.diagnostics.tsv", args.out_prefix), &output.diagnostics)?;

    info!("wrote output tables with prefix {}", args.out_prefix);
    Ok(())
}
