use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{info, Level};

use crate::datasets::{DatasetsCli, DATASETS_ENV_BIN, DEFAULT_DATASETS_BIN};
use crate::error::{Result, TaxstatError};
use crate::fetcher::run_batch;
use crate::taxon_list::{merge_taxa, read_taxa_file};
use crate::tsv_report::{open_output, TsvReport};

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

const ABOUT: &str = "Reference assembly length and protein-coding gene count per taxon";
const LONG_ABOUT: &str = "\
Reference assembly length and protein-coding gene count per taxon.

For each taxon, queries NCBI datasets for the reference genome summary and the
gene summary, and prints one tab-separated row:

    taxon<TAB>assembly_length<TAB>num_protein_coding_genes

Rows appear in the order the taxa were given. Diagnostics go to stderr.";

const AFTER_HELP: &str = "\
Examples:
  taxstat --taxons \"mus musculus\" \"Drosophila melanogaster\"
  taxstat --taxons-file taxa.txt -o stats.tsv

A taxon list ends at the next argument starting with '--' (or at the end).
Arguments starting with a single '-' are read as taxon names while a list
is open, so options such as -o or -v must come before --taxons. Names that
start with '--' can only be given through --taxons-file (one taxon per
line, '#' starts a comment).";

const TAXONS_FLAG: &str = "--taxons";

/// Immutable result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub taxa: Vec<String>,
    pub taxons_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub ignore_errors: bool,
    pub level: Level,
    pub datasets: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Run(Options),
    Help(String),
    Version(String),
    Failure(String),
}

pub fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author(AUTHORS)
        .about(ABOUT)
        .long_about(LONG_ABOUT)
        .after_help(AFTER_HELP)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(Arg::new("TAXONS")
            .help("One or more taxon names (quote names containing spaces)")
            .long("taxons")
            .value_name("TAXON")
            .num_args(1..)
            .action(ArgAction::Append))
        .arg(Arg::new("TAXONS_FILE")
            .help("File with one taxon name per line, added after --taxons")
            .long("taxons-file")
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("OUTPUT")
            .help("Write the table to this new file instead of stdout")
            .short('o')
            .long("output")
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("IGNORE_ERRORS")
            .help("Write NA for taxa that fail instead of stopping")
            .short('I')
            .long("ignore-errors")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("LEVEL")
            .help("Logging verbosity level")
            .short('L')
            .long("level")
            .value_name("LEVEL")
            .default_value("warn")
            .value_parser(["trace", "debug", "info", "warn", "error"]))
        .arg(Arg::new("DATASETS")
            .help("NCBI datasets program to run")
            .long("datasets")
            .value_name("PROGRAM")
            .env(DATASETS_ENV_BIN)
            .default_value(DEFAULT_DATASETS_BIN))
        .arg(Arg::new("VERSION")
            .help("Print version")
            .short('v')
            .long("version")
            .action(ArgAction::Version))
        .arg(Arg::new("HELP")
            .help("Print help")
            .short('h')
            .short_alias('u')
            .long("help")
            .alias("usage")
            .action(ArgAction::Help))
}

pub fn version_text() -> String {
    format!("{} {}\nWritten by {}\n", NAME, VERSION, AUTHORS)
}

/// Parses a full argument vector, program name included.
pub fn parse_args<I, T>(args: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match build_cli().try_get_matches_from(attach_taxon_values(args)) {
        Ok(matches) => matches,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    ParseOutcome::Help(e.to_string())
                }
                ErrorKind::DisplayVersion => ParseOutcome::Version(version_text()),
                _ => ParseOutcome::Failure(e.to_string()),
            }
        }
    };

    match options_from_matches(&matches) {
        Ok(options) => ParseOutcome::Run(options),
        Err(e) => ParseOutcome::Failure(
            build_cli()
                .error(ErrorKind::InvalidValue, e.to_string())
                .to_string(),
        ),
    }
}

/// Rewrites every token of a `--taxons` run into an attached
/// `--taxons=<token>` value. A run goes on until a token starting with `--`
/// or the end of input, so single-dash tokens such as `-x` stay taxon names.
/// A bare `--taxons` with nothing to take is passed through for clap to
/// reject.
fn attach_taxon_values<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut rewritten = Vec::new();
    let mut in_taxons = false;
    let mut args = args.into_iter().map(Into::into).peekable();

    while let Some(arg) = args.next() {
        let is_long = arg.to_str().is_some_and(|s| s.starts_with("--"));

        if in_taxons && !is_long {
            let mut attached = OsString::from(format!("{}=", TAXONS_FLAG));
            attached.push(&arg);
            rewritten.push(attached);
            continue;
        }
        in_taxons = false;

        if arg == TAXONS_FLAG {
            let has_value = args
                .peek()
                .is_some_and(|next| !next.to_str().is_some_and(|s| s.starts_with("--")));
            if has_value {
                in_taxons = true;
                continue;
            }
        }
        rewritten.push(arg);
    }

    rewritten
}

fn options_from_matches(matches: &ArgMatches) -> Result<Options> {
    let cli_taxa: Vec<String> = matches
        .get_many::<String>("TAXONS")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let taxons_file = matches.get_one::<PathBuf>("TAXONS_FILE").cloned();
    let output = matches.get_one::<PathBuf>("OUTPUT").cloned();

    if let Some(path) = &output {
        check_output_free(path)?;
    }

    let file_taxa = match &taxons_file {
        Some(path) => read_taxa_file(path)?,
        None => Vec::new(),
    };
    let taxa = merge_taxa(cli_taxa, file_taxa)?;

    // restricted by the value parser above
    let level = matches
        .get_one::<String>("LEVEL")
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::Warn);

    Ok(Options {
        taxa,
        taxons_file,
        output,
        ignore_errors: matches.get_flag("IGNORE_ERRORS"),
        level,
        datasets: matches
            .get_one::<String>("DATASETS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_DATASETS_BIN.to_string()),
    })
}

fn check_output_free(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(TaxstatError::argument(format!(
            "output file {} already exists",
            path.display()
        )));
    }
    Ok(())
}

/// Runs a parsed invocation: tool check, then the fetch loop.
pub fn run(options: &Options) -> Result<()> {
    let datasets = DatasetsCli::locate(&options.datasets)?;

    let writer = open_output(options.output.as_deref())?;
    let mut report = TsvReport::new(writer)?;
    let summary = run_batch(&datasets, &options.taxa, &mut report, options.ignore_errors)?;

    info!(
        "Done: {} taxa fetched, {} failed",
        summary.fetched, summary.failed
    );
    Ok(())
}
