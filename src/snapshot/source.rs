//! Where snapshots come from.

use super::parser::{scan, ParseError};
use super::record::ClientStat;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Errors that prevent a snapshot from being taken.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Produces a fresh snapshot each time it is called.
///
/// Implementations are invoked once per scrape and may be called from
/// several threads at once, so every call must do its own read.
pub trait SnapshotProvider: Send + Sync {
    /// Takes a snapshot of the currently associated clients.
    fn snapshot(&self) -> Result<Vec<ClientStat>, SnapshotError>;
}

impl<F> SnapshotProvider for F
where
    F: Fn() -> Result<Vec<ClientStat>, SnapshotError> + Send + Sync,
{
    fn snapshot(&self) -> Result<Vec<ClientStat>, SnapshotError> {
        self()
    }
}

/// A snapshot source read from disk or from a command's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    /// A file rewritten periodically by the stats tool.
    File(PathBuf),
    /// A command that prints a snapshot on stdout.
    Command(Vec<String>),
}

impl Default for SnapshotSource {
    fn default() -> Self {
        SnapshotSource::File(PathBuf::from("/tmp/iwstat"))
    }
}

impl SnapshotSource {
    fn read_file(path: &Path) -> Result<Vec<ClientStat>, SnapshotError> {
        let file = File::open(path).map_err(|source| SnapshotError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(scan(file)?)
    }

    fn run_command(argv: &[String]) -> Result<Vec<ClientStat>, SnapshotError> {
        let (program, args) = argv.split_first().ok_or_else(|| SnapshotError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| SnapshotError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SnapshotError::CommandFailed {
                program: program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(scan(output.stdout.as_slice())?)
    }
}

impl SnapshotProvider for SnapshotSource {
    fn snapshot(&self) -> Result<Vec<ClientStat>, SnapshotError> {
        match self {
            SnapshotSource::File(path) => Self::read_file(path),
            SnapshotSource::Command(argv) => Self::run_command(argv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("iwstat-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_closure_provider() {
        let provider = || -> Result<Vec<ClientStat>, SnapshotError> {
            Ok(vec![ClientStat::from_columns("wlan0", "aa", [1; 19])])
        };
        assert_eq!(provider.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_file_source_reads_fresh_each_call() {
        let path = temp_path("fresh");
        let source = SnapshotSource::File(path.clone());

        let mut f = File::create(&path).unwrap();
        writeln!(f, "header").unwrap();
        drop(f);
        assert!(source.snapshot().unwrap().is_empty());

        let mut f = File::create(&path).unwrap();
        writeln!(f, "header").unwrap();
        writeln!(f, "wlan0 aa:bb:cc:dd:ee:ff -42 30 5 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16").unwrap();
        drop(f);
        assert_eq!(source.snapshot().unwrap().len(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let source = SnapshotSource::File(temp_path("does-not-exist"));
        assert!(matches!(source.snapshot(), Err(SnapshotError::Open { .. })));
    }

    #[test]
    fn test_empty_command() {
        let source = SnapshotSource::Command(Vec::new());
        assert!(matches!(source.snapshot(), Err(SnapshotError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_source() {
        let source = SnapshotSource::Command(vec![
            "sh".into(),
            "-c".into(),
            "echo header; echo wlan1 11:22:33:44:55:66 -70 10 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16".into(),
        ]);
        let stats = source.snapshot().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].rssi, -70);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        let source =
            SnapshotSource::Command(vec!["sh".into(), "-c".into(), "echo boom >&2; exit 3".into()]);
        match source.snapshot() {
            Err(SnapshotError::CommandFailed { stderr, .. }) => assert_eq!(stderr, "boom"),
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }
}
