use std::fmt;

use serde::Deserialize;

use crate::error::{Result, TaxstatError};

pub const PROTEIN_CODING: &str = "PROTEIN_CODING";

// `datasets summary genome taxon ... --reference`
#[derive(Debug, Deserialize)]
pub struct GenomeSummary {
    #[serde(default)]
    pub reports: Vec<AssemblyReport>,
}

#[derive(Debug, Deserialize)]
pub struct AssemblyReport {
    pub assembly_stats: Option<AssemblyStats>,
}

#[derive(Debug, Deserialize)]
pub struct AssemblyStats {
    pub total_sequence_length: Option<SequenceLength>,
}

/// NCBI reports large counts as strings, but plain numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SequenceLength {
    Number(u64),
    Text(String),
}

impl fmt::Display for SequenceLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceLength::Number(n) => write!(f, "{}", n),
            SequenceLength::Text(s) => write!(f, "{}", s.trim_matches('"')),
        }
    }
}

// `datasets summary gene taxon ...`
#[derive(Debug, Deserialize)]
pub struct GeneSummary {
    // absent when nothing matched the query
    #[serde(default)]
    pub reports: Vec<GeneReport>,
}

#[derive(Debug, Deserialize)]
pub struct GeneReport {
    pub gene: Option<Gene>,
}

#[derive(Debug, Deserialize)]
pub struct Gene {
    #[serde(rename = "type")]
    pub gene_type: Option<String>,
}

impl GeneReport {
    fn is_protein_coding(&self) -> bool {
        self.gene
            .as_ref()
            .and_then(|g| g.gene_type.as_deref())
            .is_some_and(|t| t == PROTEIN_CODING)
    }
}

/// Extracts `reports[0].assembly_stats.total_sequence_length`, quotes stripped.
pub fn parse_assembly_length(taxon: &str, json: &[u8]) -> Result<String> {
    let summary: GenomeSummary =
        serde_json::from_slice(json).map_err(|source| TaxstatError::MalformedJson {
            taxon: taxon.to_string(),
            summary: "genome",
            source,
        })?;

    let missing = |field| TaxstatError::MissingField {
        taxon: taxon.to_string(),
        field,
    };

    let report = summary
        .reports
        .first()
        .ok_or_else(|| missing("reference assembly"))?;
    let stats = report
        .assembly_stats
        .as_ref()
        .ok_or_else(|| missing("assembly_stats"))?;
    let length = stats
        .total_sequence_length
        .as_ref()
        .ok_or_else(|| missing("total_sequence_length"))?;

    Ok(length.to_string())
}

/// Counts the `reports` entries whose `gene.type` is `PROTEIN_CODING`.
pub fn count_protein_coding_genes(taxon: &str, json: &[u8]) -> Result<u64> {
    let summary: GeneSummary =
        serde_json::from_slice(json).map_err(|source| TaxstatError::MalformedJson {
            taxon: taxon.to_string(),
            summary: "gene",
            source,
        })?;

    Ok(summary
        .reports
        .iter()
        .filter(|r| r.is_protein_coding())
        .count() as u64)
}
