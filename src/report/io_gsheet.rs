// Retrieval of the tabs of a spreadsheet published on the web.

use reqwest::blocking::Client;
use url::Url;

use crate::report::*;

pub fn build_client(timeout: Duration) -> ReportResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context(HttpClientSnafu {})
}

/// The CSV address of one tab: the `gid` is added to the query of the published URL.
pub fn sheet_url(base_url: &str, gid: Option<&str>) -> ReportResult<String> {
    let mut url = Url::parse(base_url).context(InvalidUrlSnafu { url: base_url })?;
    if let Some(g) = gid.filter(|g| !g.is_empty()) {
        url.query_pairs_mut().append_pair("gid", g);
    }
    Ok(url.to_string())
}

pub fn fetch_text(client: &Client, base_url: &str, src: &SheetSource) -> ReportResult<String> {
    let url = sheet_url(base_url, src.gid.as_deref())?;
    info!("Fetching {:?} from {}", src.name, url);
    let resp = client
        .get(url.as_str())
        .send()
        .context(FetchingSnafu { name: &src.name })?;
    let status = resp.status();
    ensure!(
        status.is_success(),
        FetchStatusSnafu {
            name: &src.name,
            status
        }
    );
    let text = resp.text().context(FetchingSnafu { name: &src.name })?;
    debug!("fetch_text: {:?}: {} bytes", src.name, text.len());
    Ok(text)
}
