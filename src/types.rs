//! Core types: links selected for download and their outcomes

use crate::error::Error;
use std::io::Write;
use std::path::PathBuf;
use url::Url;

/// A document selected for download
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceLink {
    /// Name of the group the link was taken from
    pub group: String,
    /// Absolute URL, or a URL relative to the discovery document
    pub href: String,
}

impl ResourceLink {
    /// Create a link for `group`
    pub fn new(group: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            href: href.into(),
        }
    }
}

/// Settled result of downloading one [`ResourceLink`]
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The document was fetched and fully written
    Fulfilled {
        /// Absolute URL that was fetched
        url: Url,
        /// Destination path the document was written to
        path: PathBuf,
    },
    /// The download or write failed
    Rejected {
        /// Absolute URL, if the link could be resolved into one
        url: Option<Url>,
        /// Why it failed
        reason: Error,
    },
}

impl DownloadOutcome {
    /// Whether the download succeeded
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, DownloadOutcome::Fulfilled { .. })
    }

    /// Failure reason, if rejected
    #[must_use]
    pub fn reason(&self) -> Option<&Error> {
        match self {
            DownloadOutcome::Fulfilled { .. } => None,
            DownloadOutcome::Rejected { reason, .. } => Some(reason),
        }
    }
}

/// Outcomes of a batch run, one per selected link, in selection order
#[derive(Debug, Default)]
pub struct BatchResult {
    outcomes: Vec<DownloadOutcome>,
}

impl BatchResult {
    /// Wrap an ordered list of outcomes
    pub fn new(outcomes: Vec<DownloadOutcome>) -> Self {
        Self { outcomes }
    }

    /// Outcomes in link order
    #[must_use]
    pub fn outcomes(&self) -> &[DownloadOutcome] {
        &self.outcomes
    }

    /// Number of outcomes
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no links were selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Whether every download succeeded (vacuously true when empty)
    #[must_use]
    pub fn all_fulfilled(&self) -> bool {
        self.outcomes.iter().all(DownloadOutcome::is_fulfilled)
    }

    /// Number of fulfilled outcomes
    #[must_use]
    pub fn fulfilled_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_fulfilled()).count()
    }

    /// Failure reasons, in link order
    pub fn failures(&self) -> impl Iterator<Item = &Error> {
        self.outcomes.iter().filter_map(DownloadOutcome::reason)
    }

    /// Write each failure reason on its own line and return the process exit code
    ///
    /// Returns 0 when every outcome is fulfilled, 1 otherwise.
    pub fn report<W: Write>(&self, out: &mut W) -> std::io::Result<u8> {
        let mut exit_code = 0;
        for reason in self.failures() {
            exit_code = 1;
            writeln!(out, "{reason}")?;
        }
        Ok(exit_code)
    }

    /// Consume into the ordered outcomes
    #[must_use]
    pub fn into_outcomes(self) -> Vec<DownloadOutcome> {
        self.outcomes
    }
}

impl IntoIterator for BatchResult {
    type Item = DownloadOutcome;
    type IntoIter = std::vec::IntoIter<DownloadOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn fulfilled(name: &str) -> DownloadOutcome {
        DownloadOutcome::Fulfilled {
            url: Url::parse(&format!("https://x/a/{name}")).unwrap(),
            path: PathBuf::from(format!("{name}.json")),
        }
    }

    fn rejected(message: &str) -> DownloadOutcome {
        DownloadOutcome::Rejected {
            url: None,
            reason: Error::PathTraversal {
                link: message.into(),
                reason: "escapes the output directory".into(),
            },
        }
    }

    #[test]
    fn empty_batch_reports_success() {
        let result = BatchResult::default();
        assert!(result.is_empty());
        assert!(result.all_fulfilled());

        let mut out = Vec::new();
        assert_eq!(result.report(&mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn report_prints_only_rejections() {
        let result = BatchResult::new(vec![
            fulfilled("todos"),
            rejected("../etc/passwd"),
            fulfilled("rfis"),
        ]);
        assert_eq!(result.len(), 3);
        assert_eq!(result.fulfilled_count(), 2);
        assert!(!result.all_fulfilled());

        let mut out = Vec::new();
        assert_eq!(result.report(&mut out).unwrap(), 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "unsafe path for ../etc/passwd: escapes the output directory\n"
        );
    }

    #[test]
    fn outcome_accessors() {
        assert!(fulfilled("todos").is_fulfilled());
        assert!(fulfilled("todos").reason().is_none());
        assert!(!rejected("x").is_fulfilled());
        assert!(rejected("x").reason().is_some());
    }
}
