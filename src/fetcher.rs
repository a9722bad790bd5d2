use std::io::Write;

use log::{info, warn};

use crate::datasets::SummarySource;
use crate::error::Result;
use crate::summary_parser::{count_protein_coding_genes, parse_assembly_length};
use crate::tsv_report::{AssemblyRecord, TsvReport};

/// Total sequence length of the taxon's reference assembly.
pub fn fetch_assembly_length<S: SummarySource + ?Sized>(source: &S, taxon: &str) -> Result<String> {
    let json = source.genome_summary(taxon)?;
    parse_assembly_length(taxon, &json)
}

/// Number of genes reported as `PROTEIN_CODING` for the taxon.
pub fn fetch_protein_coding_gene_count<S: SummarySource + ?Sized>(
    source: &S,
    taxon: &str,
) -> Result<u64> {
    let json = source.gene_summary(taxon)?;
    count_protein_coding_genes(taxon, &json)
}

pub fn fetch_record<S: SummarySource + ?Sized>(source: &S, taxon: &str) -> Result<AssemblyRecord> {
    let assembly_length = fetch_assembly_length(source, taxon)?;
    let num_protein_coding_genes = fetch_protein_coding_gene_count(source, taxon)?;
    Ok(AssemblyRecord {
        taxon: taxon.to_string(),
        assembly_length,
        num_protein_coding_genes,
    })
}

/// Outcome of a finished batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub fetched: usize,
    pub failed: usize,
}

/// Fetches every taxon in order and writes its row before moving on.
///
/// Without `ignore_errors` the first fetch error stops the batch; rows
/// already written stay written. With it, the failing taxon gets an `NA` row
/// and the loop continues. Output errors always stop the batch.
pub fn run_batch<S, W>(
    source: &S,
    taxa: &[String],
    report: &mut TsvReport<W>,
    ignore_errors: bool,
) -> Result<BatchSummary>
where
    S: SummarySource + ?Sized,
    W: Write,
{
    let mut summary = BatchSummary::default();

    for (idx, taxon) in taxa.iter().enumerate() {
        info!("Fetching taxon {}/{}: {}", idx + 1, taxa.len(), taxon);

        match fetch_record(source, taxon) {
            Ok(record) => {
                report.write_record(&record)?;
                summary.fetched += 1;
            }
            Err(e) if ignore_errors && e.is_fetch_error() => {
                warn!("Skipping taxon '{}': {}", taxon, e);
                report.write_missing(taxon)?;
                summary.failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}
