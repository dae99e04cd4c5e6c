//! Sheets-bridge HTTP client
//!
//! Production implementation of the tabular store interface, talking to a
//! sheets-bridge service that fronts the actual spreadsheet backend. The
//! bridge exposes a small JSON API:
//!
//! ```text
//! GET  {base}/spreadsheets/{id}                      404 if unknown
//! GET  {base}/spreadsheets/{id}/sheets/{name}        404 if unknown
//! GET  .../sheets/{name}/headers                     {"headers": [...]}
//! GET  .../sheets/{name}/last-row                    {"last_row": N}
//! POST .../sheets/{name}/format                      {"row", "width", "format"}
//! PUT  .../sheets/{name}/rows/{N}                    {"values": [...]}
//! ```
//!
//! Requests carry an optional bearer token. There are no retries here: a
//! failed call surfaces as a store error and the submission fails.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{CellValue, RowRange, Sheet, SheetStore, SpreadsheetHandle};

const USER_AGENT: &str = concat!("formsink/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the sheets bridge
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the bridge service
    pub bridge_url: String,
    /// Optional bearer token sent with every request
    pub api_token: Option<String>,
}

/// Tabular store backed by the sheets-bridge HTTP service
pub struct RestSheetStore {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl RestSheetStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.bridge_url)
            .map_err(|e| Error::Config(format!("Invalid bridge URL '{}': {}", config.bridge_url, e)))?;

        Ok(Self {
            http,
            base_url,
            api_token: config.api_token,
        })
    }
}

/// Append path segments to a base URL, percent-encoding each segment
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("Bridge URL '{}' cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn authorize(request: RequestBuilder, token: &Option<String>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

#[async_trait]
impl SheetStore for RestSheetStore {
    async fn open(&self, id: &str) -> Result<Box<dyn SpreadsheetHandle>> {
        let doc_url = endpoint(&self.base_url, &["spreadsheets", id])?;

        let response = authorize(self.http.request(Method::GET, doc_url.clone()), &self.api_token)
            .send()
            .await
            .map_err(|e| Error::Store(format!("Bridge unreachable: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::Store(format!("Spreadsheet {} not found", id))),
            status if status.is_success() => Ok(Box::new(RestSpreadsheet {
                http: self.http.clone(),
                doc_url,
                api_token: self.api_token.clone(),
            })),
            status => Err(Error::Store(format!(
                "Bridge returned {} opening spreadsheet {}",
                status, id
            ))),
        }
    }
}

struct RestSpreadsheet {
    http: reqwest::Client,
    doc_url: Url,
    api_token: Option<String>,
}

#[async_trait]
impl SpreadsheetHandle for RestSpreadsheet {
    async fn sheet(&self, name: &str) -> Result<Option<Box<dyn Sheet>>> {
        let sheet_url = endpoint(&self.doc_url, &["sheets", name])?;

        let response = authorize(self.http.request(Method::GET, sheet_url.clone()), &self.api_token)
            .send()
            .await
            .map_err(|e| Error::Store(format!("Bridge unreachable: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(Box::new(RestSheet {
                http: self.http.clone(),
                sheet_url,
                api_token: self.api_token.clone(),
            }))),
            status => Err(Error::Store(format!(
                "Bridge returned {} resolving sheet {}",
                status, name
            ))),
        }
    }
}

struct RestSheet {
    http: reqwest::Client,
    sheet_url: Url,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HeadersResponse {
    headers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LastRowResponse {
    last_row: u32,
}

#[derive(Debug, Serialize)]
struct FormatRequest {
    row: u32,
    width: u32,
    format: &'static str,
}

#[derive(Debug, Serialize)]
struct WriteRowRequest<'a> {
    values: &'a [CellValue],
}

impl RestSheet {
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, segment: &str) -> Result<T> {
        let url = endpoint(&self.sheet_url, &[segment])?;
        let response = authorize(self.http.request(Method::GET, url), &self.api_token)
            .send()
            .await
            .map_err(|e| Error::Store(format!("Bridge unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Store(format!(
                "Bridge returned {} reading {}",
                response.status(),
                segment
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Store(format!("Malformed bridge response for {}: {}", segment, e)))
    }

    async fn send_json<B: Serialize>(&self, method: Method, url: Url, body: &B) -> Result<()> {
        let response = authorize(self.http.request(method, url.clone()), &self.api_token)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::StoreWrite(format!("Bridge unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::StoreWrite(format!(
                "Bridge returned {} writing to {}",
                response.status(),
                url.path()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Sheet for RestSheet {
    async fn header_row(&self) -> Result<Vec<String>> {
        let response: HeadersResponse = self.get_json("headers").await?;
        Ok(response.headers)
    }

    async fn last_row_index(&self) -> Result<u32> {
        let response: LastRowResponse = self.get_json("last-row").await?;
        Ok(response.last_row)
    }

    async fn set_plain_text_format(&self, range: RowRange) -> Result<()> {
        let url = endpoint(&self.sheet_url, &["format"])?;
        self.send_json(
            Method::POST,
            url,
            &FormatRequest {
                row: range.row,
                width: range.width,
                format: "plain_text",
            },
        )
        .await
    }

    async fn write_row(&self, row: u32, values: &[CellValue]) -> Result<()> {
        let url = endpoint(&self.sheet_url, &["rows", &row.to_string()])?;
        self.send_json(Method::PUT, url, &WriteRowRequest { values })
            .await
    }
}
