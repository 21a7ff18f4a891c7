//! Google Sheets v4 REST client for the order and log sheets.

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::google_auth::TokenProvider;
use super::{Consumption, LedgerError, LogEntry};
use crate::config::SheetsConfig;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const LOG_SHEET_TITLE: &str = "Log";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub index: i64,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct SheetsLedger {
    spreadsheet_id: String,
    client: Client,
    tokens: TokenProvider,
    // Held across read-then-delete so two requests never remove the same row.
    consume_lock: Mutex<()>,
}

impl SheetsLedger {
    pub fn new(config: &SheetsConfig) -> Result<Self, LedgerError> {
        let client = Client::new();
        Ok(Self {
            spreadsheet_id: config.sheet_id.clone(),
            tokens: TokenProvider::new(&config.service_account_email, &config.private_key, client.clone())?,
            client,
            consume_lock: Mutex::new(()),
        })
    }

    pub async fn consume_order(&self, order_number: &str) -> Result<Consumption, LedgerError> {
        let _guard = self.consume_lock.lock().await;

        let sheets = self.sheet_properties().await?;
        let order_sheet = order_sheet(&sheets)
            .ok_or_else(|| LedgerError::Malformed("spreadsheet has no sheets".to_string()))?;

        let id = self.spreadsheet_id.as_str();
        let column: ValueRange = self
            .get_json(&[id, "values", &a1_range(&order_sheet.title, "A:A")], &[])
            .await?;
        let rows = matching_rows(&column.values, order_number);
        let Some(&first) = rows.first() else {
            return Ok(Consumption::NotFound);
        };

        let request = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": order_sheet.sheet_id,
                        "dimension": "ROWS",
                        "startIndex": first,
                        "endIndex": first + 1,
                    }
                }
            }]
        });
        self.send_json(
            Method::POST,
            &[&format!("{}:batchUpdate", id)],
            &[],
            Some(&request),
        )
        .await?;

        let remaining = (rows.len() - 1) as u32;
        info!("Consumed order row {} ({} left)", first + 1, remaining);
        Ok(Consumption::Consumed { remaining })
    }

    pub async fn append_log(&self, entry: &LogEntry) -> Result<(), LedgerError> {
        let sheets = self.sheet_properties().await?;
        let log_sheet = log_sheet(&sheets).ok_or(LedgerError::LogSheetMissing)?;

        let id = self.spreadsheet_id.as_str();
        let header_range: ValueRange = self
            .get_json(&[id, "values", &a1_range(&log_sheet.title, "1:1")], &[])
            .await?;
        let header: Vec<String> = header_range
            .values
            .first()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();
        if header.is_empty() {
            warn!("Log sheet '{}' has no header row, using default column order", log_sheet.title);
        }

        let body = json!({ "values": [build_log_row(&header, entry)] });
        self.send_json(
            Method::POST,
            &[id, "values", &format!("{}:append", a1_range(&log_sheet.title, "A1"))],
            &[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")],
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn sheet_properties(&self) -> Result<Vec<SheetProperties>, LedgerError> {
        let metadata: SpreadsheetMetadata = self
            .get_json(&[self.spreadsheet_id.as_str()], &[("fields", "sheets.properties(sheetId,title,index)")])
            .await?;
        let mut sheets: Vec<SheetProperties> = metadata.sheets.into_iter().map(|s| s.properties).collect();
        sheets.sort_by_key(|s| s.index);
        Ok(sheets)
    }

    /// `segments` are percent-encoded one by one, so sheet titles may hold any character.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, LedgerError> {
        let mut url = Url::parse(SHEETS_API_BASE).map_err(|e| LedgerError::Malformed(e.to_string()))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| LedgerError::Malformed("base URL cannot hold a path".to_string()))?;
            path.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, LedgerError> {
        let token = self.tokens.access_token().await?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<T, LedgerError> {
        let response = self.send_json(Method::GET, segments, query, None).await?;
        serde_json::from_value(response).map_err(|e| LedgerError::Malformed(e.to_string()))
    }

    async fn send_json(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, LedgerError> {
        let url = self.url(segments, query)?;
        let mut request = self.request(method, url).await?;
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LedgerError::Api { status, message });
        }
        Ok(response.json::<Value>().await?)
    }
}

/// Orders live on the first sheet.
pub fn order_sheet(sheets: &[SheetProperties]) -> Option<&SheetProperties> {
    sheets.first()
}

/// The sheet titled `Log`, otherwise the second sheet.
pub fn log_sheet(sheets: &[SheetProperties]) -> Option<&SheetProperties> {
    sheets
        .iter()
        .find(|s| s.title == LOG_SHEET_TITLE)
        .or_else(|| sheets.get(1))
}

/// `'Sheet name'!A:A` with embedded quotes doubled.
pub fn a1_range(sheet_title: &str, cells: &str) -> String {
    format!("'{}'!{}", sheet_title.replace('\'', "''"), cells)
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Zero-based sheet row indices whose first cell equals `order_number`.
/// Row 0 is the header and never matches.
pub fn matching_rows(column: &[Vec<Value>], order_number: &str) -> Vec<usize> {
    column
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| row.first().map(cell_text).as_deref() == Some(order_number))
        .map(|(index, _)| index)
        .collect()
}

/// Cells for one log row, ordered like the sheet's header.
pub fn build_log_row(header: &[String], entry: &LogEntry) -> Vec<String> {
    if header.is_empty() {
        LogEntry::COLUMNS.iter().map(|c| entry.field(c).to_string()).collect()
    } else {
        header.iter().map(|c| entry.field(c).to_string()).collect()
    }
}
