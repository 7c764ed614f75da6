//! Liturgia Readings - Where the day's readings come from
//!
//! [`ReadingsGateway`] is the seam between the pipeline and the readings
//! source. [`HttpReadingsGateway`] downloads the page published by the
//! Italian bishops' conference; [`FileReadingsGateway`] parses a saved copy.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use liturgia_core::{LiturgiaError, ReadingSet, Result};
use tracing::info;

mod parser;

pub use parser::parse_readings;

/// Readings page, `{date}` is replaced by `YYYYMMDD`
pub const DEFAULT_READINGS_URL: &str =
    "https://www.chiesacattolica.it/liturgia-del-giorno/?data-liturgia={date}";

/// Request timeout for the readings page
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A source of readings
pub trait ReadingsGateway: Send + Sync {
    fn fetch(&self, date: NaiveDate) -> Result<ReadingSet>;
}

/// Downloads and parses the readings page for a date
pub struct HttpReadingsGateway {
    client: reqwest::blocking::Client,
    url_template: String,
}

impl HttpReadingsGateway {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url_template = url_template.into();
        if !url_template.contains("{date}") {
            return Err(LiturgiaError::Config(format!(
                "readings URL '{}' has no {{date}} placeholder",
                url_template
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LiturgiaError::Retrieval(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client, url_template })
    }

    pub fn url_for(&self, date: NaiveDate) -> String {
        self.url_template
            .replace("{date}", &date.format("%Y%m%d").to_string())
    }
}

impl ReadingsGateway for HttpReadingsGateway {
    fn fetch(&self, date: NaiveDate) -> Result<ReadingSet> {
        let url = self.url_for(date);
        info!("Fetching readings from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| LiturgiaError::Retrieval(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LiturgiaError::Retrieval(format!("HTTP {} from {}", status, url)));
        }

        let body = response
            .text()
            .map_err(|e| LiturgiaError::Retrieval(format!("cannot read response body: {}", e)))?;
        parse_readings(&body, date)
    }
}

/// Parses a readings page saved to disk
pub struct FileReadingsGateway {
    path: PathBuf,
}

impl FileReadingsGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReadingsGateway for FileReadingsGateway {
    fn fetch(&self, date: NaiveDate) -> Result<ReadingSet> {
        info!("Reading readings page from {}", self.path.display());
        let html = std::fs::read_to_string(&self.path).map_err(|e| {
            LiturgiaError::Retrieval(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        parse_readings(&html, date)
    }
}
