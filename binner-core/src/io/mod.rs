//! Collaborator-facing I/O (§6): input readers and the output table writers. Full FASTA
//! handling, read alignment, and coverage computation live outside the core; what's here is the
//! minimum needed to run the pipeline end to end from the command line.

pub mod anchors;
pub mod fasta;
pub mod writers;

pub use anchors::read_anchor_table;
pub use fasta::read_contigs;
