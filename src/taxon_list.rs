use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::{Result, TaxstatError};

const COMMENT_CHAR: char = '#';

/// Reads one taxon per line. Surrounding whitespace is trimmed, blank lines
/// and `#` comments are skipped; everything else is kept verbatim, spaces
/// included.
pub fn read_taxa_file(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| {
        TaxstatError::argument(format!("cannot read taxa file {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);
    let mut taxa = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if name.is_empty() || name.starts_with(COMMENT_CHAR) {
            continue;
        }
        taxa.push(name.to_string());
    }

    debug!("Read {} taxa from {}", taxa.len(), path.display());
    Ok(taxa)
}

/// Builds the final ordered list: command-line taxa first, then file taxa.
/// No deduplication.
pub fn merge_taxa(cli_taxa: Vec<String>, file_taxa: Vec<String>) -> Result<Vec<String>> {
    let mut taxa = cli_taxa;
    taxa.extend(file_taxa);

    if taxa.iter().any(|t| t.trim().is_empty()) {
        return Err(TaxstatError::argument("taxon names must not be empty"));
    }
    if taxa.is_empty() {
        return Err(TaxstatError::argument(
            "no taxa given; use --taxons NAME [NAME ...] or --taxons-file PATH",
        ));
    }

    Ok(taxa)
}
