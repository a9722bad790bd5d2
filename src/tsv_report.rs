use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Result;

pub const HEADER: [&str; 3] = ["taxon", "assembly_length", "num_protein_coding_genes"];

// Placeholder for values of a taxon whose fetch failed under --ignore-errors
pub const MISSING_VALUE: &str = "NA";

/// One finished row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRecord {
    pub taxon: String,
    pub assembly_length: String,
    pub num_protein_coding_genes: u64,
}

/// Writes the table row by row. Every row is flushed as soon as it is
/// written, so a later failure leaves the earlier rows in place.
pub struct TsvReport<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> TsvReport<W> {
    /// Writes the header line.
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "{}", HEADER.join("\t"))?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_record(&mut self, record: &AssemblyRecord) -> Result<()> {
        self.write_row(
            &record.taxon,
            &record.assembly_length,
            &record.num_protein_coding_genes.to_string(),
        )
    }

    pub fn write_missing(&mut self, taxon: &str) -> Result<()> {
        self.write_row(taxon, MISSING_VALUE, MISSING_VALUE)
    }

    fn write_row(&mut self, taxon: &str, length: &str, genes: &str) -> Result<()> {
        writeln!(self.writer, "{}\t{}\t{}", taxon, length, genes)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Table destination: the given file (which must not exist yet) or stdout.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = OpenOptions::new().write(true).create_new(true).open(path)?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
