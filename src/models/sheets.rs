use serde::{Deserialize, Serialize};

use crate::ports::{SheetPage, SpreadsheetInfo};

// Sheets v4 spreadsheets.get, trimmed by `fields=properties.title,sheets.properties`
#[derive(Serialize, Deserialize, Debug)]
pub struct Spreadsheet {
    pub properties: SpreadsheetProperties,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SpreadsheetProperties {
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl From<Spreadsheet> for SpreadsheetInfo {
    fn from(spreadsheet: Spreadsheet) -> Self {
        SpreadsheetInfo {
            title: spreadsheet.properties.title,
            pages: spreadsheet
                .sheets
                .into_iter()
                .map(|s| SheetPage {
                    id: s.properties.sheet_id,
                    title: s.properties.title.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CopySheetRequest {
    pub destination_spreadsheet_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub update_sheet_properties: UpdateSheetPropertiesRequest,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateSheetPropertiesRequest {
    pub properties: SheetProperties,
    pub fields: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ValueRange {
    pub range: String,
    #[serde(rename = "majorDimension")]
    pub major_dimension: String,
    pub values: Vec<Vec<String>>,
}
