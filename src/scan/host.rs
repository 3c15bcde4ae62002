use async_trait::async_trait;
use log::debug;
use scraper::Html;

use super::markers::extract_lists;
use super::ScanResult;
use crate::error::ScanError;
use crate::fetchers::RequestFetcher;

/// Something that can render a page and run the list scan inside it
///
/// Implementations return the four category lists joined by
/// [`WIRE_DELIMITER`](super::WIRE_DELIMITER), or an evaluation error.
#[async_trait]
pub trait PageScriptHost: Send + Sync {
    async fn evaluate_scan(&self) -> Result<String, ScanError>;

    /// The lists split into categories
    ///
    /// Hosts that scan in-process override this so page text containing the delimiter
    /// never goes through the wire string.
    async fn evaluate_lists(&self) -> Result<ScanResult, ScanError> {
        let combined = self.evaluate_scan().await?;
        Ok(ScanResult::from_wire(&combined))
    }
}

/// Host over HTML that is already in memory
pub struct HtmlPageHost {
    html: String,
}

impl HtmlPageHost {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    fn scan_now(&self) -> ScanResult {
        let document = Html::parse_document(&self.html);
        extract_lists(&document)
    }
}

#[async_trait]
impl PageScriptHost for HtmlPageHost {
    async fn evaluate_scan(&self) -> Result<String, ScanError> {
        Ok(self.scan_now().to_wire())
    }

    async fn evaluate_lists(&self) -> Result<ScanResult, ScanError> {
        Ok(self.scan_now())
    }
}

/// Host that downloads the page first
pub struct RemotePageHost {
    url: String,
    fetcher: RequestFetcher,
}

impl RemotePageHost {
    pub fn new(url: impl Into<String>, fetcher: RequestFetcher) -> Self {
        Self {
            url: url.into(),
            fetcher,
        }
    }
}

impl RemotePageHost {
    async fn download(&self) -> Result<HtmlPageHost, ScanError> {
        let html = self
            .fetcher
            .fetch(&self.url)
            .await
            .map_err(|e| ScanError::Evaluation(e.to_string()))?;
        debug!("Scanning {}", self.url);
        Ok(HtmlPageHost::new(html))
    }
}

#[async_trait]
impl PageScriptHost for RemotePageHost {
    async fn evaluate_scan(&self) -> Result<String, ScanError> {
        Ok(self.download().await?.scan_now().to_wire())
    }

    async fn evaluate_lists(&self) -> Result<ScanResult, ScanError> {
        Ok(self.download().await?.scan_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ScanCategory;

    #[tokio::test]
    async fn test_delimiter_in_page_text_stays_in_its_category() {
        let host = HtmlPageHost::new(
            r#"<ul class="ingredients"><li>salt |~| pepper</li></ul>
               <ol class="steps"><li>season</li></ol>"#,
        );
        let result = host.evaluate_lists().await.unwrap();
        assert_eq!(result.get(ScanCategory::Ingredients), "salt |~| pepper");
        assert_eq!(result.get(ScanCategory::Steps), "season");
        assert_eq!(result.get(ScanCategory::Directions), "");
    }
}
