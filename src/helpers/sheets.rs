use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::info;

use crate::error::AttendanceResult;
use crate::helpers::google::{endpoint, send, send_bytes, send_json};
use crate::models::sheets::{
    BatchUpdateRequest, CopySheetRequest, Request, SheetProperties, Spreadsheet,
    UpdateSheetPropertiesRequest, ValueRange,
};
use crate::ports::{SpreadsheetInfo, TabularDocumentStore};

const SPREADSHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const EXPORT_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Google Sheets v4 backed [`TabularDocumentStore`].
#[derive(Clone)]
pub struct GoogleSheets {
    client: Client,
}

impl GoogleSheets {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn get_spreadsheet_request(client: &Client, spreadsheet_id: &str) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(SPREADSHEETS_URL, &[spreadsheet_id])?;
    Ok(client
        .get(url)
        .query(&[("fields", "properties.title,sheets.properties")]))
}

fn copy_sheet_request(
    client: &Client,
    spreadsheet_id: &str,
    page_id: i64,
) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(
        SPREADSHEETS_URL,
        &[spreadsheet_id, "sheets", &format!("{page_id}:copyTo")],
    )?;
    let body = CopySheetRequest {
        destination_spreadsheet_id: spreadsheet_id.to_string(),
    };
    Ok(client.post(url).body(serde_json::to_string(&body)?))
}

fn rename_sheet_request(
    client: &Client,
    spreadsheet_id: &str,
    page_id: i64,
    title: &str,
    index: u32,
) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(SPREADSHEETS_URL, &[&format!("{spreadsheet_id}:batchUpdate")])?;
    let body = BatchUpdateRequest {
        requests: vec![Request {
            update_sheet_properties: UpdateSheetPropertiesRequest {
                properties: SheetProperties {
                    sheet_id: page_id,
                    title: Some(title.to_string()),
                    index: Some(index),
                },
                fields: "title,index".to_string(),
            },
        }],
    };
    Ok(client.post(url).body(serde_json::to_string(&body)?))
}

fn write_range_request(
    client: &Client,
    spreadsheet_id: &str,
    range: &str,
    rows: Vec<Vec<String>>,
) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(SPREADSHEETS_URL, &[spreadsheet_id, "values", range])?;
    let body = ValueRange {
        range: range.to_string(),
        major_dimension: "ROWS".to_string(),
        values: rows,
    };
    Ok(client
        .put(url)
        .query(&[("valueInputOption", "USER_ENTERED")])
        .body(serde_json::to_string(&body)?))
}

fn export_sheet_request(
    client: &Client,
    spreadsheet_id: &str,
    page_id: i64,
) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(EXPORT_URL, &[spreadsheet_id, "export"])?;
    Ok(client
        .get(url)
        .query(&[("format", "pdf".to_string()), ("gid", page_id.to_string())]))
}

#[async_trait]
impl TabularDocumentStore for GoogleSheets {
    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> AttendanceResult<SpreadsheetInfo> {
        let request = get_spreadsheet_request(&self.client, spreadsheet_id)?;

        let spreadsheet: Spreadsheet = send_json(request, "get spreadsheet").await?;
        info!(
            "Spreadsheet {} has {} sheets",
            spreadsheet.properties.title,
            spreadsheet.sheets.len()
        );
        Ok(spreadsheet.into())
    }

    async fn duplicate_page(&self, spreadsheet_id: &str, page_id: i64) -> AttendanceResult<i64> {
        let request = copy_sheet_request(&self.client, spreadsheet_id, page_id)?;

        let copied: SheetProperties = send_json(request, "copy sheet").await?;
        Ok(copied.sheet_id)
    }

    async fn rename_and_reorder_page(
        &self,
        spreadsheet_id: &str,
        page_id: i64,
        title: &str,
        index: u32,
    ) -> AttendanceResult<()> {
        let request = rename_sheet_request(&self.client, spreadsheet_id, page_id, title, index)?;

        send(request, "update sheet position").await?;
        Ok(())
    }

    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> AttendanceResult<()> {
        let request = write_range_request(&self.client, spreadsheet_id, range, rows)?;

        send(request, &format!("write range {range}")).await?;
        Ok(())
    }

    async fn export_page_as_pdf(
        &self,
        spreadsheet_id: &str,
        page_id: i64,
    ) -> AttendanceResult<Vec<u8>> {
        let request = export_sheet_request(&self.client, spreadsheet_id, page_id)?;

        send_bytes(request, "export spreadsheet").await
    }
}
