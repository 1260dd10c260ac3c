/*
 * Google Sheets gateway.
 *
 * Blocking reqwest client against the Sheets v4 REST API. The pipeline only
 * needs two operations from it: find-or-create the invoice worksheet, and
 * apply one batch of instructions as a single `batchUpdate` request.
 */

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use strum_macros::Display;
use tracing::{debug, info};

use crate::auth::Credentials;
use crate::batch::RenderBatch;
use crate::error::GatewayError;
use crate::layout::{GRID_COLS, GRID_ROWS};

pub const API_BASE: &str = "https://sheets.googleapis.com";
const DOCS_BASE: &str = "https://docs.google.com/spreadsheets/d";

#[derive(Display, Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    /// Existing worksheet, cleared of values, formats and merges
    Found,
    /// New worksheet sized to the invoice grid
    Created,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    pub sheet_id: i64,
    pub title: String,
    pub lookup: Lookup,
    pub url: String,
}

pub trait Gateway {
    fn ensure_worksheet(&mut self, title: &str) -> Result<Worksheet, GatewayError>;

    fn apply_batch(
        &mut self,
        worksheet: &Worksheet,
        batch: &RenderBatch,
    ) -> Result<(), GatewayError>;
}

#[derive(Deserialize, Debug)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize, Debug)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

/// Sheets API client (blocking).
pub struct SheetsClient {
    http: reqwest::blocking::Client,
    api_base: String,
    spreadsheet_id: String,
    token: String,
}

impl SheetsClient {
    /// Authenticate with the credentials file contents.
    pub fn connect(creds: &Credentials) -> Result<Self, GatewayError> {
        let token = creds.access_token(&Self::http()?)?;
        Self::with_base_url(
            creds.spreadsheet_id.clone(),
            token,
            API_BASE.to_string(),
        )
    }

    pub fn with_base_url(
        spreadsheet_id: String,
        token: String,
        api_base: String,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            http: Self::http()?,
            api_base,
            spreadsheet_id,
            token,
        })
    }

    fn http() -> Result<reqwest::blocking::Client, GatewayError> {
        Ok(reqwest::blocking::Client::builder()
            .user_agent(format!("invosheet/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?)
    }

    pub fn worksheet_url(&self, sheet_id: i64) -> String {
        format!("{}/{}/edit#gid={}", DOCS_BASE, self.spreadsheet_id, sheet_id)
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}", self.api_base, self.spreadsheet_id)
    }

    fn find_sheet(&self, title: &str) -> Result<Option<i64>, GatewayError> {
        let response = self
            .http
            .get(self.spreadsheet_url())
            .query(&[("fields", "sheets.properties(sheetId,title)")])
            .bearer_auth(&self.token)
            .send()?;
        let meta: SpreadsheetMeta = check(response)?
            .json()
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        Ok(meta
            .sheets
            .into_iter()
            .map(|s| s.properties)
            .find(|p| p.title == title)
            .map(|p| p.sheet_id))
    }

    fn batch_update(&self, body: &Value) -> Result<Value, GatewayError> {
        let response = self
            .http
            .post(format!("{}:batchUpdate", self.spreadsheet_url()))
            .bearer_auth(&self.token)
            .json(body)
            .send()?;
        check(response)?
            .json()
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }

    fn clear(&self, sheet_id: i64) -> Result<(), GatewayError> {
        let whole_sheet = json!({ "sheetId": sheet_id });
        self.batch_update(&json!({
            "requests": [
                { "unmergeCells": { "range": whole_sheet } },
                {
                    "updateCells": {
                        "range": whole_sheet,
                        "fields": "userEnteredValue,userEnteredFormat",
                    }
                },
            ]
        }))?;
        Ok(())
    }

    fn add_sheet(&self, title: &str) -> Result<i64, GatewayError> {
        let reply = self.batch_update(&json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": {
                            "rowCount": GRID_ROWS,
                            "columnCount": GRID_COLS,
                        },
                    }
                }
            }]
        }))?;
        reply["replies"][0]["addSheet"]["properties"]["sheetId"]
            .as_i64()
            .ok_or_else(|| GatewayError::Parse("Missing sheetId in addSheet reply".into()))
    }
}

impl Gateway for SheetsClient {
    fn ensure_worksheet(&mut self, title: &str) -> Result<Worksheet, GatewayError> {
        let (sheet_id, lookup) = match self.find_sheet(title)? {
            Some(sheet_id) => {
                self.clear(sheet_id)?;
                (sheet_id, Lookup::Found)
            }
            None => (self.add_sheet(title)?, Lookup::Created),
        };
        info!(title, sheet_id, %lookup, "worksheet ready");

        Ok(Worksheet {
            sheet_id,
            title: title.to_string(),
            lookup,
            url: self.worksheet_url(sheet_id),
        })
    }

    fn apply_batch(
        &mut self,
        worksheet: &Worksheet,
        batch: &RenderBatch,
    ) -> Result<(), GatewayError> {
        debug!(batch = batch.name, requests = batch.len(), "sending batch");
        self.batch_update(&batch.to_body(worksheet.sheet_id))?;
        Ok(())
    }
}

fn check(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(GatewayError::from_response(status.as_u16(), body))
}
