use std::ops::Range;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum_macros::Display;

use crate::layout::{GRID_COLS, GRID_ROWS};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const LIGHT_GREY: Color = Color::rgb(0.9, 0.9, 0.9);

    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Display, Debug, PartialEq, Clone, Copy)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalAlign {
    Left,
    Right,
}

#[derive(Display, Debug, PartialEq, Clone, Copy)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalAlign {
    Top,
    Middle,
}

#[derive(Display, Debug, PartialEq, Clone, Copy)]
#[strum(serialize_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
}

#[derive(Debug, PartialEq, Clone)]
pub struct TextStyle {
    pub bold: bool,
    pub size: u32,
    pub family: String,
    pub color: Option<Color>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct CellFormat {
    pub text: Option<TextStyle>,
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
    pub wrap: bool,
    /// Vertical padding in pixels
    pub padding: Option<u32>,
    /// Number format pattern, e.g. `$#,##0.00`
    pub currency: Option<String>,
}

/// Half-open row and column index ranges, like the Sheets `GridRange`.
#[derive(Debug, PartialEq, Clone)]
pub struct GridRange {
    pub rows: Range<u32>,
    pub cols: Range<u32>,
}

impl GridRange {
    pub fn new(rows: Range<u32>, cols: Range<u32>) -> Self {
        Self { rows, cols }
    }

    pub fn cell(row: u32, col: u32) -> Self {
        Self::new(row..row + 1, col..col + 1)
    }

    pub fn within(&self, rows: u32, cols: u32) -> bool {
        self.rows.start < self.rows.end
            && self.cols.start < self.cols.end
            && self.rows.end <= rows
            && self.cols.end <= cols
    }

    fn to_json(&self, sheet_id: i64) -> Value {
        json!({
            "sheetId": sheet_id,
            "startRowIndex": self.rows.start,
            "endRowIndex": self.rows.end,
            "startColumnIndex": self.cols.start,
            "endColumnIndex": self.cols.end,
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum CellValue {
    Text(String),
    Number(Decimal),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    fn to_json(&self) -> Value {
        match self {
            CellValue::Text(text) => {
                json!({ "userEnteredValue": { "stringValue": text } })
            }
            CellValue::Number(number) => {
                json!({ "userEnteredValue": { "numberValue": number } })
            }
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Instruction {
    HideGridlines,
    WriteValues {
        range: GridRange,
        rows: Vec<Vec<CellValue>>,
    },
    Format {
        range: GridRange,
        format: CellFormat,
    },
    Background {
        range: GridRange,
        color: Color,
    },
    Rule {
        range: GridRange,
        edge: Edge,
    },
    Merge {
        range: GridRange,
    },
    ColumnWidth {
        column: u32,
        pixels: u32,
    },
}

impl Instruction {
    pub fn range(&self) -> Option<&GridRange> {
        match self {
            Instruction::WriteValues { range, .. }
            | Instruction::Format { range, .. }
            | Instruction::Background { range, .. }
            | Instruction::Rule { range, .. }
            | Instruction::Merge { range } => Some(range),
            Instruction::HideGridlines | Instruction::ColumnWidth { .. } => None,
        }
    }

    /// One entry of a `spreadsheets.batchUpdate` request list.
    pub fn to_request(&self, sheet_id: i64) -> Value {
        match self {
            Instruction::HideGridlines => json!({
                "updateSheetProperties": {
                    "properties": {
                        "sheetId": sheet_id,
                        "gridProperties": { "hideGridlines": true },
                    },
                    "fields": "gridProperties.hideGridlines",
                }
            }),
            Instruction::WriteValues { range, rows } => json!({
                "updateCells": {
                    "range": range.to_json(sheet_id),
                    "rows": rows
                        .iter()
                        .map(|row| json!({
                            "values": row.iter().map(CellValue::to_json).collect::<Vec<_>>()
                        }))
                        .collect::<Vec<_>>(),
                    "fields": "userEnteredValue",
                }
            }),
            Instruction::Format { range, format } => repeat_cell(
                range,
                sheet_id,
                json!({ "userEnteredFormat": format_json(format) }),
                "userEnteredFormat",
            ),
            Instruction::Background { range, color } => repeat_cell(
                range,
                sheet_id,
                json!({ "userEnteredFormat": { "backgroundColor": color } }),
                "userEnteredFormat.backgroundColor",
            ),
            Instruction::Rule { range, edge } => {
                let mut borders = serde_json::Map::new();
                borders.insert(
                    edge.to_string(),
                    json!({ "style": "SOLID", "width": 1 }),
                );
                repeat_cell(
                    range,
                    sheet_id,
                    json!({ "userEnteredFormat": { "borders": borders } }),
                    "userEnteredFormat.borders",
                )
            }
            Instruction::Merge { range } => json!({
                "mergeCells": {
                    "range": range.to_json(sheet_id),
                    "mergeType": "MERGE_ALL",
                }
            }),
            Instruction::ColumnWidth { column, pixels } => json!({
                "updateDimensionProperties": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "COLUMNS",
                        "startIndex": column,
                        "endIndex": column + 1,
                    },
                    "properties": { "pixelSize": pixels },
                    "fields": "pixelSize",
                }
            }),
        }
    }
}

fn repeat_cell(range: &GridRange, sheet_id: i64, cell: Value, fields: &str) -> Value {
    json!({
        "repeatCell": {
            "range": range.to_json(sheet_id),
            "cell": cell,
            "fields": fields,
        }
    })
}

fn format_json(format: &CellFormat) -> Value {
    let mut out = serde_json::Map::new();
    if let Some(text) = &format.text {
        let mut style = json!({
            "bold": text.bold,
            "fontSize": text.size,
            "fontFamily": text.family,
        });
        if let Some(color) = text.color {
            style["foregroundColor"] = json!(color);
        }
        out.insert("textFormat".into(), style);
    }
    if let Some(align) = format.horizontal {
        out.insert("horizontalAlignment".into(), json!(align.to_string()));
    }
    if let Some(align) = format.vertical {
        out.insert("verticalAlignment".into(), json!(align.to_string()));
    }
    if format.wrap {
        out.insert("wrapStrategy".into(), json!("WRAP"));
    }
    if let Some(padding) = format.padding {
        out.insert(
            "padding".into(),
            json!({ "top": padding, "bottom": padding, "left": 0, "right": 0 }),
        );
    }
    if let Some(pattern) = &format.currency {
        out.insert(
            "numberFormat".into(),
            json!({ "type": "CURRENCY", "pattern": pattern }),
        );
    }
    Value::Object(out)
}

/// An ordered instruction list sent as one atomic request.
#[derive(Debug, PartialEq, Clone)]
pub struct RenderBatch {
    pub name: &'static str,
    pub instructions: Vec<Instruction>,
}

impl RenderBatch {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            instructions: Vec::new(),
        }
    }

    pub fn push(&mut self, instruction: Instruction) {
        debug_assert!(
            instruction
                .range()
                .map_or(true, |r| r.within(GRID_ROWS, GRID_COLS)),
            "{:?} is outside the invoice grid",
            instruction
        );
        self.instructions.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Body of a `spreadsheets.batchUpdate` call against `sheet_id`.
    pub fn to_body(&self, sheet_id: i64) -> Value {
        json!({
            "requests": self
                .instructions
                .iter()
                .map(|i| i.to_request(sheet_id))
                .collect::<Vec<_>>()
        })
    }
}

/// The two batches of one invoice: cell contents and styling first, then
/// merges and column widths.
#[derive(Debug, PartialEq, Clone)]
pub struct RenderBatches {
    pub values: RenderBatch,
    pub structure: RenderBatch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn grid_range_bounds() {
        assert!(GridRange::new(0..2, 0..6).within(30, 6));
        assert!(!GridRange::new(29..31, 0..1).within(30, 6));
        assert!(!GridRange::new(3..3, 0..1).within(30, 6));
        assert!(!GridRange::new(0..1, 5..7).within(30, 6));
    }

    #[test]
    fn merge_request() {
        let merge = Instruction::Merge {
            range: GridRange::new(0..2, 0..6),
        };
        assert_eq!(
            merge.to_request(7),
            json!({
                "mergeCells": {
                    "range": {
                        "sheetId": 7,
                        "startRowIndex": 0,
                        "endRowIndex": 2,
                        "startColumnIndex": 0,
                        "endColumnIndex": 6,
                    },
                    "mergeType": "MERGE_ALL",
                }
            })
        );
    }

    #[test]
    fn bottom_rule_request() {
        let rule = Instruction::Rule {
            range: GridRange::new(21..22, 1..6),
            edge: Edge::Bottom,
        };
        let request = rule.to_request(0);
        assert_eq!(
            request["repeatCell"]["cell"]["userEnteredFormat"]["borders"],
            json!({ "bottom": { "style": "SOLID", "width": 1 } })
        );
        assert_eq!(request["repeatCell"]["fields"], "userEnteredFormat.borders");
    }

    #[test]
    fn format_request_omits_unset_fields() {
        let format = Instruction::Format {
            range: GridRange::cell(2, 1),
            format: CellFormat {
                text: Some(TextStyle {
                    bold: true,
                    size: 20,
                    family: "Roboto".to_string(),
                    color: Some(Color::rgb(0.5, 0.25, 0.0)),
                }),
                horizontal: Some(HorizontalAlign::Left),
                ..CellFormat::default()
            },
        };
        assert_eq!(
            format.to_request(0)["repeatCell"]["cell"]["userEnteredFormat"],
            json!({
                "textFormat": {
                    "bold": true,
                    "fontSize": 20,
                    "fontFamily": "Roboto",
                    "foregroundColor": { "red": 0.5, "green": 0.25, "blue": 0.0 },
                },
                "horizontalAlignment": "LEFT",
            })
        );
    }

    #[test]
    fn values_request() {
        let write = Instruction::WriteValues {
            range: GridRange::new(0..1, 0..2),
            rows: vec![vec![
                CellValue::Text("Qty".to_string()),
                CellValue::Number(dec!(37.5)),
            ]],
        };
        assert_eq!(
            write.to_request(3)["updateCells"]["rows"],
            json!([{ "values": [
                { "userEnteredValue": { "stringValue": "Qty" } },
                { "userEnteredValue": { "numberValue": 37.5 } },
            ]}])
        );
    }

    #[test]
    fn column_width_request() {
        let width = Instruction::ColumnWidth {
            column: 1,
            pixels: 200,
        };
        let request = width.to_request(0);
        let range = &request["updateDimensionProperties"]["range"];
        assert_eq!(range["startIndex"], 1);
        assert_eq!(range["endIndex"], 2);
        assert_eq!(
            request["updateDimensionProperties"]["properties"]["pixelSize"],
            200
        );
    }

    #[test]
    fn alignment_keywords() {
        assert_eq!(HorizontalAlign::Right.to_string(), "RIGHT");
        assert_eq!(VerticalAlign::Middle.to_string(), "MIDDLE");
        assert_eq!(Edge::Top.to_string(), "top");
    }
}
