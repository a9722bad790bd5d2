use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::{Result, TaxstatError};

pub const DEFAULT_DATASETS_BIN: &str = "datasets";
pub const DATASETS_ENV_BIN: &str = "TAXSTAT_DATASETS_BIN";

/// Where the raw JSON summaries come from. The fetch loop only sees this.
pub trait SummarySource {
    /// Reference genome assembly summary for `taxon`.
    fn genome_summary(&self, taxon: &str) -> Result<Vec<u8>>;

    /// Gene summary for `taxon`.
    fn gene_summary(&self, taxon: &str) -> Result<Vec<u8>>;
}

/// The NCBI `datasets` command-line tool.
#[derive(Debug, Clone)]
pub struct DatasetsCli {
    program: PathBuf,
}

impl DatasetsCli {
    /// Resolves `program` once; fails with `ToolMissing` when it is not there.
    pub fn locate(program: &str) -> Result<Self> {
        let resolved = find_program(program, env::var_os("PATH")).ok_or_else(|| {
            TaxstatError::ToolMissing {
                program: program.to_string(),
                env: DATASETS_ENV_BIN,
            }
        })?;
        debug!("Using {} at {}", program, resolved.display());
        Ok(Self { program: resolved })
    }

    fn run(&self, taxon: &str, args: &[&str]) -> Result<Vec<u8>> {
        debug!("Running {} {}", self.program.display(), args.join(" "));

        let failed = |detail: String| TaxstatError::ToolFailed {
            program: self.program.display().to_string(),
            taxon: taxon.to_string(),
            detail,
        };

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| failed(format!("could not execute: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            };
            return Err(failed(detail));
        }

        Ok(output.stdout)
    }
}

impl SummarySource for DatasetsCli {
    fn genome_summary(&self, taxon: &str) -> Result<Vec<u8>> {
        self.run(
            taxon,
            &["summary", "genome", "taxon", taxon, "--reference"],
        )
    }

    fn gene_summary(&self, taxon: &str) -> Result<Vec<u8>> {
        self.run(taxon, &["summary", "gene", "taxon", taxon])
    }
}

/// A name with a path separator must exist as given; a bare name is looked
/// up in each `PATH` entry.
fn find_program(program: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = path_var?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|full| is_executable(full))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn install(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_find_program_on_path() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = install(second.path(), "datasets", 0o755);

        let path_var = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(find_program("datasets", Some(path_var)), Some(expected));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_program_skips_non_executable() {
        let dir = TempDir::new().unwrap();
        install(dir.path(), "datasets", 0o644);

        let path_var = env::join_paths([dir.path()]).unwrap();
        assert_eq!(find_program("datasets", Some(path_var)), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_program_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = install(dir.path(), "my-datasets", 0o755);

        let as_str = path.to_str().unwrap();
        assert_eq!(find_program(as_str, None), Some(path.clone()));
        assert_eq!(
            find_program(dir.path().join("absent").to_str().unwrap(), None),
            None
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_find_program_explicit_path_not_executable() {
        let dir = TempDir::new().unwrap();
        let path = install(dir.path(), "my-datasets", 0o644);

        assert_eq!(find_program(path.to_str().unwrap(), None), None);
        assert!(matches!(
            DatasetsCli::locate(path.to_str().unwrap()),
            Err(TaxstatError::ToolMissing { .. })
        ));
    }

    #[test]
    fn test_find_program_without_path_var() {
        assert_eq!(find_program("datasets", None), None);
    }

    #[test]
    fn test_locate_reports_tool_missing() {
        let err = DatasetsCli::locate("/nonexistent/dir/datasets").unwrap_err();
        assert!(matches!(err, TaxstatError::ToolMissing { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_tool_failure() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datasets");
        fs::write(&path, "#!/bin/sh\necho 'Error: no such taxon' >&2\nexit 1\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let cli = DatasetsCli::locate(path.to_str().unwrap()).unwrap();
        match cli.gene_summary("nothing here") {
            Err(TaxstatError::ToolFailed { taxon, detail, .. }) => {
                assert_eq!(taxon, "nothing here");
                assert_eq!(detail, "Error: no such taxon");
            }
            other => panic!("expected ToolFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_arguments_passed_to_tool() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datasets");
        // echo each argument on its own line so spaces survive
        fs::write(&path, "#!/bin/sh\nfor a in \"$@\"; do echo \"$a\"; done\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let cli = DatasetsCli::locate(path.to_str().unwrap()).unwrap();
        let genome = cli.genome_summary("mus musculus").unwrap();
        assert_eq!(
            String::from_utf8(genome).unwrap(),
            "summary\ngenome\ntaxon\nmus musculus\n--reference\n"
        );
        let gene = cli.gene_summary("mus musculus").unwrap();
        assert_eq!(
            String::from_utf8(gene).unwrap(),
            "summary\ngene\ntaxon\nmus musculus\n"
        );
    }
}
