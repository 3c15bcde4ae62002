//! Heuristic recipe list scanner.
//!
//! Looks for elements whose class attribute contains a marker such as `ingredient` or
//! `step` and lifts their rendered text out as line lists, with no per-site setup.

mod host;
mod markers;

pub use host::{HtmlPageHost, PageScriptHost, RemotePageHost};
pub use markers::{extract_lists, first_match_text, inner_text};

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::error::ScanError;

/// Separator used to carry all four lists across the page host boundary in one string
pub const WIRE_DELIMITER: &str = "|~|";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanCategory {
    Ingredients,
    Steps,
    Instructions,
    Directions,
}

impl ScanCategory {
    /// Categories in wire and report order
    pub const ALL: [ScanCategory; 4] = [
        ScanCategory::Ingredients,
        ScanCategory::Steps,
        ScanCategory::Instructions,
        ScanCategory::Directions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScanCategory::Ingredients => "ingredients",
            ScanCategory::Steps => "steps",
            ScanCategory::Instructions => "instructions",
            ScanCategory::Directions => "directions",
        }
    }

    fn index(self) -> usize {
        match self {
            ScanCategory::Ingredients => 0,
            ScanCategory::Steps => 1,
            ScanCategory::Instructions => 2,
            ScanCategory::Directions => 3,
        }
    }
}

/// Extracted text per category; an empty string means nothing matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    lists: [String; 4],
}

impl ScanResult {
    pub fn get(&self, category: ScanCategory) -> &str {
        &self.lists[category.index()]
    }

    pub fn set(&mut self, category: ScanCategory, text: String) {
        self.lists[category.index()] = text;
    }

    /// True when no category produced any text
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(|list| list.is_empty())
    }

    /// Join the four lists with [`WIRE_DELIMITER`]
    pub fn to_wire(&self) -> String {
        self.lists.join(WIRE_DELIMITER)
    }

    /// Split a joined string back into categories; missing trailing parts are empty
    pub fn from_wire(combined: &str) -> Self {
        let parts: Vec<&str> = combined.split(WIRE_DELIMITER).collect();
        if parts.len() > ScanCategory::ALL.len() {
            warn!(
                "Scan result has {} parts; page text probably contains the delimiter",
                parts.len()
            );
        }
        let mut result = ScanResult::default();
        for (category, part) in ScanCategory::ALL.iter().zip(parts) {
            result.set(*category, part.to_string());
        }
        result
    }

    /// Labeled block for one category, found or not
    pub fn block(&self, category: ScanCategory) -> String {
        let text = self.get(category);
        if text.is_empty() {
            format!(
                "The {} list was NOT found on the webpage.\n\n",
                category.name()
            )
        } else {
            format!("Here's the {} list:\n{}\n\n", category.name(), text)
        }
    }

    /// All four blocks, in category order
    pub fn report(&self) -> String {
        ScanCategory::ALL
            .iter()
            .map(|category| self.block(*category))
            .collect()
    }

    /// Block for the first category that produced text
    pub fn first_found(&self) -> Option<String> {
        ScanCategory::ALL
            .iter()
            .find(|category| !self.get(**category).is_empty())
            .map(|category| self.block(*category))
    }
}

/// Runs scans against a page host, one at a time
///
/// While a scan is outstanding further requests fail with
/// [`ScanError::AlreadyScanning`]; callers use [`PageScanner::is_scanning`] to disable
/// their trigger.
#[derive(Debug, Default)]
pub struct PageScanner {
    in_progress: AtomicBool,
}

struct ScanGuard<'a>(&'a AtomicBool);

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PageScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scanning(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Evaluate the scan on `host` and split the result into categories
    ///
    /// A result with every category empty is reported as [`ScanError::NothingFound`].
    pub async fn scan(&self, host: &dyn PageScriptHost) -> Result<ScanResult, ScanError> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ScanError::AlreadyScanning);
        }
        let _guard = ScanGuard(&self.in_progress);

        let result = host.evaluate_lists().await.map_err(|e| {
            warn!("Page scan evaluation failed: {}", e);
            e
        })?;

        if result.is_empty() {
            warn!("Page scan found no recipe lists");
            return Err(ScanError::NothingFound);
        }

        debug!(
            "Page scan found: {}",
            ScanCategory::ALL
                .iter()
                .filter(|c| !result.get(**c).is_empty())
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[test]
    fn test_wire_round_trip() {
        let mut result = ScanResult::default();
        result.set(ScanCategory::Ingredients, "flour\nsugar".to_string());
        result.set(ScanCategory::Directions, "bake".to_string());

        let wire = result.to_wire();
        assert_eq!(wire, "flour\nsugar|~||~||~|bake");
        assert_eq!(ScanResult::from_wire(&wire), result);
    }

    #[test]
    fn test_from_wire_short_input() {
        let result = ScanResult::from_wire("eggs");
        assert_eq!(result.get(ScanCategory::Ingredients), "eggs");
        assert_eq!(result.get(ScanCategory::Directions), "");
    }

    #[test]
    fn test_report_blocks() {
        let mut result = ScanResult::default();
        result.set(ScanCategory::Steps, "mix\nbake".to_string());

        let report = result.report();
        assert_eq!(
            report,
            "The ingredients list was NOT found on the webpage.\n\n\
             Here's the steps list:\nmix\nbake\n\n\
             The instructions list was NOT found on the webpage.\n\n\
             The directions list was NOT found on the webpage.\n\n"
        );
        assert_eq!(
            result.first_found().as_deref(),
            Some("Here's the steps list:\nmix\nbake\n\n")
        );
    }

    #[test]
    fn test_empty_report_has_four_not_found_blocks() {
        let result = ScanResult::default();
        assert!(result.is_empty());
        assert_eq!(result.report().matches("NOT found").count(), 4);
        assert!(result.first_found().is_none());
    }

    struct FixedHost(Result<String, ScanError>);

    #[async_trait]
    impl PageScriptHost for FixedHost {
        async fn evaluate_scan(&self) -> Result<String, ScanError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_scan_empty_is_failure() {
        let scanner = PageScanner::new();
        let host = FixedHost(Ok("|~||~||~|".to_string()));
        assert_eq!(scanner.scan(&host).await, Err(ScanError::NothingFound));
        assert!(!scanner.is_scanning());
    }

    #[tokio::test]
    async fn test_scan_evaluation_error_passes_through() {
        let scanner = PageScanner::new();
        let host = FixedHost(Err(ScanError::Evaluation("boom".to_string())));
        let err = scanner.scan(&host).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "An error occurred while scanning the web page: boom"
        );
    }

    struct BlockingHost {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl PageScriptHost for BlockingHost {
        async fn evaluate_scan(&self) -> Result<String, ScanError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok("flour".to_string())
        }
    }

    #[tokio::test]
    async fn test_concurrent_scan_rejected() {
        let scanner = Arc::new(PageScanner::new());
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let host = BlockingHost {
            entered: entered.clone(),
            release: release.clone(),
        };

        let first = {
            let scanner = scanner.clone();
            tokio::spawn(async move { scanner.scan(&host).await })
        };
        entered.notified().await;
        assert!(scanner.is_scanning());

        let second = scanner.scan(&FixedHost(Ok("x".to_string()))).await;
        assert_eq!(second, Err(ScanError::AlreadyScanning));

        release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.get(ScanCategory::Ingredients), "flour");
        assert!(!scanner.is_scanning());
    }
}
