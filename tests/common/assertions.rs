//! Assertions on outcomes and output directories

use api_docs_dl::{DownloadOutcome, Error};
use std::path::Path;

/// Assert `outcome` is fulfilled and wrote `body` to `expected`
pub fn assert_fulfilled(outcome: &DownloadOutcome, expected: &Path, body: &str) {
    match outcome {
        DownloadOutcome::Fulfilled { path, .. } => {
            assert_eq!(path, expected);
            let written = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
            assert_eq!(written, body, "content of {}", path.display());
        }
        DownloadOutcome::Rejected { reason, .. } => {
            panic!("expected {} to be written, got: {reason}", expected.display())
        }
    }
}

/// Assert `outcome` was rejected with an HTTP `status`
pub fn assert_rejected_with_status(outcome: &DownloadOutcome, status: u16) {
    match outcome.reason() {
        Some(Error::HttpStatus(err)) => assert_eq!(err.status, status),
        other => panic!("expected HTTP {status} rejection, got {other:?}"),
    }
}

/// Assert no staging file was left anywhere under `dir`
pub fn assert_no_staging_files(dir: &Path) {
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current).unwrap_or_else(|e| panic!("{e}")) {
            let entry = entry.unwrap_or_else(|e| panic!("{e}"));
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                assert!(
                    path.extension().is_none_or(|ext| ext != "part"),
                    "staging file left behind: {}",
                    path.display()
                );
            }
        }
    }
}
