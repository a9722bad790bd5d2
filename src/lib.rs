//! taxstat - reference assembly length and protein-coding gene counts per taxon
//!
//! For every taxon given on the command line (or in a taxa file) the NCBI
//! `datasets` tool is asked for the reference genome summary and the gene
//! summary. One value is pulled out of each JSON answer and a tab-separated
//! row is printed:
//!
//! ```text
//! taxon	assembly_length	num_protein_coding_genes
//! mus musculus	2728206152	26251
//! ```
//!
//! Modules:
//!
//! - `cli`: argument parsing and the top-level run.
//! - `taxon_list`: taxa file loading and list merging.
//! - `datasets`: locating and invoking the `datasets` program.
//! - `summary_parser`: typed views of the two JSON summaries.
//! - `fetcher`: the per-taxon fetch loop.
//! - `tsv_report`: the output table.

pub mod cli;
pub mod datasets;
pub mod error;
pub mod fetcher;
pub mod summary_parser;
pub mod taxon_list;
pub mod tsv_report;

pub use cli::{parse_args, run, Options, ParseOutcome};
pub use error::{Result, TaxstatError};
