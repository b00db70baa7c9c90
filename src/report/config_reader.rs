use crate::report::*;

use serde::{Deserialize, Serialize};

/// The spreadsheet of the KKN villages, published as CSV.
pub const DEFAULT_SHEET_BASE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vT4PI3gOy7YrVetI4fSvAW6yWmEDB9vwHDkY1oC_-oTXlspYFJVWG62n3FyAtRtMX5W_wWDWhD5Yr6c/pub?output=csv";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SheetSource {
    pub name: String,
    /// gsheet (default), csv or xlsx
    pub provider: Option<String>,
    /// The tab of the published spreadsheet (gsheet only).
    pub gid: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl SheetSource {
    pub fn gsheet(name: &str, gid: &str) -> SheetSource {
        SheetSource {
            name: name.to_string(),
            provider: None,
            gid: Some(gid.to_string()),
            file_path: None,
            excel_worksheet_name: None,
        }
    }

    pub fn provider(&self) -> &str {
        self.provider.as_deref().unwrap_or("gsheet")
    }

    /// The key identifying this source for its provider.
    pub fn key(&self) -> &str {
        match self.provider() {
            "gsheet" => self.gid.as_deref().unwrap_or_default(),
            _ => self.file_path.as_deref().unwrap_or_default(),
        }
    }

    pub fn descriptor(&self) -> SourceDescriptor {
        SourceDescriptor::new(&self.name, self.key())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "sheetBaseUrl")]
    pub sheet_base_url: Option<String>,
    pub sources: Vec<SheetSource>,
    /// allOrNothing (default) or partialTolerant
    pub aggregation: Option<String>,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_seconds: Option<u64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            sheet_base_url: Some(DEFAULT_SHEET_BASE_URL.to_string()),
            sources: vec![
                SheetSource::gsheet("Kampangar", "0"),
                SheetSource::gsheet("Kuntang", "1348203775"),
                SheetSource::gsheet("Pulo Dua", "363769630"),
            ],
            aggregation: None,
            timeout_seconds: None,
        }
    }
}

impl ReportConfig {
    pub fn aggregation_policy(&self) -> ReportResult<AggregationPolicy> {
        match self.aggregation.as_deref() {
            None | Some("allOrNothing") => Ok(AggregationPolicy::AllOrNothing),
            Some("partialTolerant") => Ok(AggregationPolicy::PartialTolerant),
            Some(x) => whatever!("unknown aggregation policy: {}", x),
        }
    }

    pub fn sheet_base_url(&self) -> &str {
        self.sheet_base_url
            .as_deref()
            .unwrap_or(DEFAULT_SHEET_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn descriptors(&self) -> Vec<SourceDescriptor> {
        self.sources.iter().map(|s| s.descriptor()).collect()
    }
}

pub fn read_config(path: &str) -> ReportResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    if config.sources.is_empty() {
        whatever!("no sources declared in {}", path);
    }
    Ok(config)
}
