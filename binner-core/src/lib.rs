//! The binner's domain pipeline: turns assembled contigs, a coverage table, and a trusted-anchor
//! table into a reconciled set of contig-to-bin labels.
//!
//! Components run in dependency order: subcontig tiling (`contig`) feeds both the tetranucleotide
//! featurizer (`tnf`) and the coverage joiner (`coverage`); their concatenation is projected to a
//! low-dimensional manifold (`embedding`); density-based clustering (`denovo`) and per-contig
//! label collapse (`denoise`) produce a de-novo binning; a second, anchor-tuned clustering pass
//! feeds the anchor-ownership step (`anchor`); three one-class recruiters (`recruiters`) vote per
//! anchor, combined by `ensemble`; `reconcile` folds everything into the final label table.
//! `pipeline` wires all of it together; `io` handles the surrounding file formats.

pub mod anchor;
pub mod contig;
pub mod coverage;
pub mod denoise;
pub mod denovo;
pub mod diagnostics;
pub mod embedding;
pub mod ensemble;
pub mod errors;
pub mod io;
pub mod params;
pub mod pipeline;
pub mod reconcile;
pub mod recruiters;
pub mod tnf;

pub use errors::BinnerError;
pub use params::{EmbeddingMetric, Params, Preset, RecruiterThresholds};
