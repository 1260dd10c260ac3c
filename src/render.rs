use std::ops::Range;

use rust_decimal::Decimal;

use crate::batch::{
    CellFormat, CellValue, Color, Edge, GridRange, HorizontalAlign, Instruction,
    RenderBatch, RenderBatches, TextStyle, VerticalAlign,
};
use crate::billing::InvoiceRecord;
use crate::config::FormattingConfig;
use crate::error::LayoutError;
use crate::layout::{
    Layout, Region, RegionName, Role, AMOUNT_COL, COLUMN_WIDTHS, DESCRIPTION_COL,
    GRID_COLS, GRID_ROWS, HEADER_ROW, QUANTITY_COL, UNIT_PRICE_COL,
};

const TITLE: &str = "INVOICE";
const HEADER_PADDING: u32 = 10;

/// Build the value/format batch and the merge/width batch for one invoice.
pub fn build_batches(
    invoice: &InvoiceRecord,
    formatting: &FormattingConfig,
    notes: &str,
) -> Result<RenderBatches, LayoutError> {
    let layout = Layout::plan(invoice.items.len())?;
    let total = invoice.grand_total();
    let styles = Styles::new(formatting, &invoice.currency_symbol);

    let mut values = RenderBatch::new("values and formatting");
    values.push(Instruction::HideGridlines);
    values.push(Instruction::WriteValues {
        range: GridRange::new(0..GRID_ROWS, 0..GRID_COLS),
        rows: value_grid(&layout, invoice, notes, total),
    });
    for region in layout.regions() {
        format_region(&mut values, &layout, region, &styles);
    }

    let mut structure = RenderBatch::new("merges and column widths");
    for region in layout.regions().iter().filter(|r| r.merged) {
        structure.push(Instruction::Merge {
            range: region.range.clone(),
        });
    }
    for (column, pixels) in COLUMN_WIDTHS.iter().enumerate() {
        structure.push(Instruction::ColumnWidth {
            column: column as u32,
            pixels: *pixels,
        });
    }

    Ok(RenderBatches { values, structure })
}

fn value_grid(
    layout: &Layout,
    invoice: &InvoiceRecord,
    notes: &str,
    total: Decimal,
) -> Vec<Vec<CellValue>> {
    let mut grid =
        vec![vec![CellValue::empty(); GRID_COLS as usize]; GRID_ROWS as usize];
    let mut set = |row: u32, col: u32, value: CellValue| {
        grid[row as usize][col as usize] = value;
    };
    let text = |s: &str| CellValue::Text(s.to_string());

    for region in layout.regions() {
        let (row, col) = region.anchor();
        match region.name {
            RegionName::Banner | RegionName::Spacer => {}
            RegionName::CompanyName | RegionName::PayToValue => {
                set(row, col, text(&invoice.company_name))
            }
            RegionName::ServiceDescription => {
                set(row, col, text(&invoice.service_description))
            }
            RegionName::InvoiceTitle => set(row, col, text(TITLE)),
            RegionName::InvoiceDate => set(row, col, text(&invoice.date_label())),
            RegionName::BillToLabel => set(row, col, text("Invoice For:")),
            RegionName::PayToLabel => set(row, col, text("Payable To:")),
            RegionName::InvoiceNumberLabel => set(row, col, text("Invoice #:")),
            RegionName::BillToValue => set(row, col, text(&invoice.client_name)),
            RegionName::InvoiceNumberValue => {
                set(row, col, text(&invoice.number.to_string()))
            }
            RegionName::PoLabel => set(row, col, text("PO #:")),
            RegionName::PoValue => set(row, col, text(&invoice.po_number)),
            RegionName::TableHeader => {
                set(row, DESCRIPTION_COL, text("Description"));
                set(row, QUANTITY_COL, text("Qty"));
                set(row, UNIT_PRICE_COL, text("Unit Price"));
                set(row, AMOUNT_COL, text("Amount"));
            }
            RegionName::LineItems => {
                for (index, item) in invoice.items.iter().enumerate() {
                    let row = layout.item_row(index);
                    set(row, DESCRIPTION_COL, text(&item.description));
                    set(row, QUANTITY_COL, CellValue::Number(item.quantity));
                    set(row, UNIT_PRICE_COL, CellValue::Number(item.unit_price));
                    set(row, AMOUNT_COL, CellValue::Number(item.amount()));
                }
            }
            RegionName::Notes => set(row, col, text(notes)),
            RegionName::TotalLabel => set(row, col, text("Total")),
            RegionName::TotalValue => set(row, col, CellValue::Number(total)),
        }
    }
    grid
}

/// Text presets derived from the formatting config.
struct Styles {
    accent: Color,
    family: String,
    company_name_size: u32,
    invoice_title_size: u32,
    total_size: u32,
    regular: u32,
    label: u32,
    currency: String,
}

impl Styles {
    fn new(formatting: &FormattingConfig, symbol: &str) -> Self {
        Self {
            accent: formatting.accent,
            family: formatting.font_family.clone(),
            company_name_size: formatting.company_name_size,
            invoice_title_size: formatting.invoice_title_size,
            total_size: formatting.total_size,
            regular: formatting.regular_text_size,
            label: formatting.label_text_size,
            currency: currency_pattern(symbol),
        }
    }

    fn text(&self, bold: bool, size: u32, color: Option<Color>) -> TextStyle {
        TextStyle {
            bold,
            size,
            family: self.family.clone(),
            color,
        }
    }

    fn aligned(&self, text: TextStyle, align: HorizontalAlign) -> CellFormat {
        CellFormat {
            text: Some(text),
            horizontal: Some(align),
            ..CellFormat::default()
        }
    }

    fn regular(&self, align: HorizontalAlign) -> CellFormat {
        self.aligned(self.text(false, self.regular, None), align)
    }

    fn bold_label(&self) -> CellFormat {
        self.aligned(self.text(true, self.label, None), HorizontalAlign::Left)
    }

    fn accented(&self, size: u32, align: HorizontalAlign) -> CellFormat {
        self.aligned(self.text(true, size, Some(self.accent)), align)
    }

    fn column_header(&self, align: HorizontalAlign) -> CellFormat {
        CellFormat {
            vertical: Some(VerticalAlign::Middle),
            padding: Some(HEADER_PADDING),
            ..self.aligned(self.text(true, self.label, None), align)
        }
    }

    fn currency(&self, mut format: CellFormat) -> CellFormat {
        format.currency = Some(self.currency.clone());
        format
    }
}

/// `$#,##0.00`, quoting symbols the number format would otherwise parse.
fn currency_pattern(symbol: &str) -> String {
    if symbol == "$" {
        "$#,##0.00".to_string()
    } else {
        format!("\"{}\"#,##0.00", symbol.replace('"', ""))
    }
}

fn format_region(
    batch: &mut RenderBatch,
    layout: &Layout,
    region: &Region,
    styles: &Styles,
) {
    let range = region.range.clone();
    let format = match region.role {
        Role::Banner => {
            batch.push(Instruction::Background {
                range,
                color: styles.accent,
            });
            return;
        }
        Role::LineItems => {
            format_line_items(batch, layout, range.cols, styles);
            return;
        }
        Role::ColumnHeader => {
            let row = range.rows;
            batch.push(Instruction::Format {
                range: GridRange::new(row.clone(), DESCRIPTION_COL..QUANTITY_COL),
                format: styles.column_header(HorizontalAlign::Left),
            });
            batch.push(Instruction::Format {
                range: GridRange::new(row, QUANTITY_COL..GRID_COLS),
                format: styles.column_header(HorizontalAlign::Right),
            });
            return;
        }
        Role::CompanyName => {
            styles.accented(styles.company_name_size, HorizontalAlign::Left)
        }
        Role::InvoiceTitle => {
            styles.accented(styles.invoice_title_size, HorizontalAlign::Left)
        }
        Role::Label | Role::TotalLabel => styles.bold_label(),
        Role::Value => styles.regular(HorizontalAlign::Left),
        Role::Notes => CellFormat {
            vertical: Some(VerticalAlign::Top),
            wrap: true,
            ..styles.regular(HorizontalAlign::Left)
        },
        Role::TotalValue => styles.currency(
            styles.accented(styles.total_size, HorizontalAlign::Right),
        ),
    };
    batch.push(Instruction::Format { range, format });
}

fn format_line_items(
    batch: &mut RenderBatch,
    layout: &Layout,
    cols: Range<u32>,
    styles: &Styles,
) {
    for index in 0..layout.item_count() {
        let row = layout.item_row(index);
        batch.push(Instruction::Format {
            range: GridRange::cell(row, DESCRIPTION_COL),
            format: styles.regular(HorizontalAlign::Left),
        });
        batch.push(Instruction::Format {
            range: GridRange::cell(row, QUANTITY_COL),
            format: styles.regular(HorizontalAlign::Right),
        });
        batch.push(Instruction::Format {
            range: GridRange::new(row..row + 1, UNIT_PRICE_COL..AMOUNT_COL + 1),
            format: styles.currency(styles.regular(HorizontalAlign::Right)),
        });
    }

    for (offset, row) in layout.table().enumerate() {
        let color = if offset % 2 == 0 {
            Color::WHITE
        } else {
            Color::LIGHT_GREY
        };
        batch.push(Instruction::Background {
            range: GridRange::new(row..row + 1, cols.clone()),
            color,
        });
    }

    batch.push(Instruction::Rule {
        range: GridRange::new(HEADER_ROW..HEADER_ROW + 1, cols.clone()),
        edge: Edge::Top,
    });
    let last = layout.body().end - 1;
    batch.push(Instruction::Rule {
        range: GridRange::new(last..last + 1, cols),
        edge: Edge::Bottom,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::LineItem;
    use crate::calendar::tests::ymd;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn invoice(items: Vec<LineItem>) -> InvoiceRecord {
        InvoiceRecord {
            company_name: "Pack Size Consulting".to_string(),
            service_description: "Software Development".to_string(),
            client_name: "Innotech".to_string(),
            number: 42,
            po_number: "PO-7".to_string(),
            date: ymd(2024, 3, 14),
            items,
            currency_symbol: "$".to_string(),
            tax_rate: dec!(0.13),
        }
    }

    fn item(description: &str, quantity: Decimal, price: Decimal) -> LineItem {
        LineItem::new(description.to_string(), quantity, price)
    }

    fn grid(batches: &RenderBatches) -> &Vec<Vec<CellValue>> {
        match &batches.values.instructions[1] {
            Instruction::WriteValues { rows, .. } => rows,
            other => panic!("expected values, found {:?}", other),
        }
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn week_example_renders_amount_and_total() {
        let invoice = invoice(vec![item("Week of March 14", dec!(40), dec!(25))]);
        let batches =
            build_batches(&invoice, &FormattingConfig::default(), "Notes:").unwrap();
        let grid = grid(&batches);

        assert_eq!(grid[18][1], text("Week of March 14"));
        assert_eq!(grid[18][3], CellValue::Number(dec!(40)));
        assert_eq!(grid[18][4], CellValue::Number(dec!(25)));
        assert_eq!(grid[18][5], CellValue::Number(dec!(1000)));
        assert_eq!(grid[26][4], CellValue::Number(dec!(1000)));
        assert_eq!(grid[24][4], text("Total"));
        assert_eq!(grid[23][1], text("Notes:"));
    }

    #[test]
    fn fixed_fields() {
        let batches = build_batches(
            &invoice(Vec::new()),
            &FormattingConfig::default(),
            "Notes:",
        )
        .unwrap();
        let grid = grid(&batches);

        assert_eq!(grid.len(), 30);
        assert!(grid.iter().all(|row| row.len() == 6));
        assert_eq!(grid[2][1], text("Pack Size Consulting"));
        assert_eq!(grid[3][1], text("Software Development"));
        assert_eq!(grid[7][1], text("INVOICE"));
        assert_eq!(grid[8][1], text("03/14/2024"));
        assert_eq!(grid[10][1], text("Invoice For:"));
        assert_eq!(grid[10][3], text("Payable To:"));
        assert_eq!(grid[10][5], text("Invoice #:"));
        assert_eq!(grid[11][1], text("Innotech"));
        assert_eq!(grid[11][3], text("Pack Size Consulting"));
        assert_eq!(grid[11][5], text("42"));
        assert_eq!(grid[12][1], text("PO #:"));
        assert_eq!(grid[13][1], text("PO-7"));
        assert_eq!(grid[17][1], text("Description"));
        assert_eq!(grid[17][3], text("Qty"));
        assert_eq!(grid[17][4], text("Unit Price"));
        assert_eq!(grid[17][5], text("Amount"));
        assert_eq!(grid[0][0], CellValue::empty());
    }

    #[test]
    fn long_invoice_moves_total_down() {
        let items = (0..7)
            .map(|i| item(&format!("item {}", i), dec!(1), dec!(10)))
            .collect();
        let batches =
            build_batches(&invoice(items), &FormattingConfig::default(), "Notes:")
                .unwrap();
        let grid = grid(&batches);

        assert_eq!(grid[24][1], text("item 6"));
        assert_eq!(grid[26][1], text("Notes:"));
        assert_eq!(grid[27][4], text("Total"));
        assert_eq!(grid[29][4], CellValue::Number(dec!(70)));
    }

    #[test]
    fn too_many_items_produce_no_batches() {
        let items = (0..8).map(|_| item("x", dec!(1), dec!(1))).collect();
        let result =
            build_batches(&invoice(items), &FormattingConfig::default(), "Notes:");
        assert!(matches!(result, Err(LayoutError::Capacity { items: 8, .. })));
    }

    #[test]
    fn every_instruction_stays_in_grid() {
        for count in [0, 1, 4, 7] {
            let items = (0..count).map(|_| item("x", dec!(2), dec!(3))).collect();
            let batches =
                build_batches(&invoice(items), &FormattingConfig::default(), "")
                    .unwrap();
            for instruction in batches
                .values
                .instructions
                .iter()
                .chain(batches.structure.instructions.iter())
            {
                if let Some(range) = instruction.range() {
                    assert!(range.within(GRID_ROWS, GRID_COLS), "{:?}", instruction);
                }
            }
        }
    }

    #[test]
    fn structure_batch_merges_and_widths() {
        let batches = build_batches(
            &invoice(Vec::new()),
            &FormattingConfig::default(),
            "Notes:",
        )
        .unwrap();
        let merges: Vec<&GridRange> = batches
            .structure
            .instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::Merge { range } => Some(range),
                _ => None,
            })
            .collect();
        let widths: Vec<(u32, u32)> = batches
            .structure
            .instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::ColumnWidth { column, pixels } => Some((*column, *pixels)),
                _ => None,
            })
            .collect();

        assert_eq!(merges.len(), 10);
        assert_eq!(merges[0], &GridRange::new(0..2, 0..6));
        assert_eq!(merges[7], &GridRange::new(23..30, 1..4));
        assert_eq!(merges[9], &GridRange::new(26..27, 4..6));
        assert_eq!(
            widths,
            vec![(0, 30), (1, 200), (2, 50), (3, 60), (4, 80), (5, 100)]
        );
    }

    #[test]
    fn total_uses_accent_and_currency() {
        let formatting = FormattingConfig {
            accent: Color::rgb(0.1, 0.2, 0.3),
            total_size: 24,
            ..FormattingConfig::default()
        };
        let batches = build_batches(&invoice(Vec::new()), &formatting, "").unwrap();
        let total = batches
            .values
            .instructions
            .iter()
            .find_map(|i| match i {
                Instruction::Format { range, format } if range.rows.start == 26 => {
                    Some(format)
                }
                _ => None,
            })
            .unwrap();
        let text = total.text.as_ref().unwrap();
        assert!(text.bold);
        assert_eq!(text.size, 24);
        assert_eq!(text.color, Some(Color::rgb(0.1, 0.2, 0.3)));
        assert_eq!(total.horizontal, Some(HorizontalAlign::Right));
        assert_eq!(total.currency.as_deref(), Some("$#,##0.00"));
    }

    #[test]
    fn shading_alternates_over_table() {
        let batches = build_batches(
            &invoice(vec![item("a", dec!(1), dec!(1))]),
            &FormattingConfig::default(),
            "",
        )
        .unwrap();
        let shades: Vec<(u32, Color)> = batches
            .values
            .instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::Background { range, color } if range.rows.start >= 17 => {
                    Some((range.rows.start, *color))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            shades,
            vec![
                (17, Color::WHITE),
                (18, Color::LIGHT_GREY),
                (19, Color::WHITE),
                (20, Color::LIGHT_GREY),
                (21, Color::WHITE),
            ]
        );
    }

    #[test]
    fn currency_patterns() {
        assert_eq!(currency_pattern("$"), "$#,##0.00");
        assert_eq!(currency_pattern("€"), "\"€\"#,##0.00");
    }

    #[test]
    fn identical_input_identical_requests() {
        let invoice = invoice(vec![item("a", dec!(40), dec!(25))]);
        let first =
            build_batches(&invoice, &FormattingConfig::default(), "Notes:").unwrap();
        let second =
            build_batches(&invoice, &FormattingConfig::default(), "Notes:").unwrap();
        assert_eq!(
            first.values.to_body(5).to_string(),
            second.values.to_body(5).to_string()
        );
        assert_eq!(
            first.structure.to_body(5).to_string(),
            second.structure.to_body(5).to_string()
        );
    }

    proptest! {
        #[test]
        fn total_cell_matches_rendered_amounts(
            raw in prop::collection::vec((1u32..500, 0u32..50_000), 0..=7)
        ) {
            let items = raw
                .iter()
                .map(|(q, p)| item("x", Decimal::from(*q), Decimal::new(i64::from(*p), 2)))
                .collect::<Vec<_>>();
            let count = items.len();
            let batches =
                build_batches(&invoice(items), &FormattingConfig::default(), "")
                    .unwrap();
            let grid = grid(&batches);

            let rendered: Decimal = (0..count)
                .map(|i| match &grid[18 + i][5] {
                    CellValue::Number(amount) => *amount,
                    other => panic!("amount cell holds {:?}", other),
                })
                .sum();
            let total_row = 18 + count.max(4) + 4;
            prop_assert_eq!(&grid[total_row][4], &CellValue::Number(rendered));
        }
    }
}
