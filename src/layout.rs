/*
 * Named regions of the invoice grid.
 *
 * Everything above the line item table sits at fixed rows. The table body
 * grows with the number of line items and the notes and total regions are
 * placed relative to its last row, so a longer invoice pushes them down
 * instead of writing over them.
 */

use std::ops::Range;

use strum_macros::Display;

use crate::batch::GridRange;
use crate::error::LayoutError;

pub const GRID_ROWS: u32 = 30;
pub const GRID_COLS: u32 = 6;

pub const HEADER_ROW: u32 = 17;
/// Rows shaded under the header even when there are fewer items.
pub const MIN_BODY_ROWS: u32 = 4;
/// Notes need room for the total label (+1) and the total value (+3).
pub const MIN_NOTES_ROWS: u32 = 4;

pub const DESCRIPTION_COL: u32 = 1;
pub const QUANTITY_COL: u32 = 3;
pub const UNIT_PRICE_COL: u32 = 4;
pub const AMOUNT_COL: u32 = 5;

pub const COLUMN_WIDTHS: [u32; GRID_COLS as usize] = [30, 200, 50, 60, 80, 100];

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionName {
    Banner,
    CompanyName,
    ServiceDescription,
    Spacer,
    InvoiceTitle,
    InvoiceDate,
    BillToLabel,
    PayToLabel,
    InvoiceNumberLabel,
    BillToValue,
    PayToValue,
    InvoiceNumberValue,
    PoLabel,
    PoValue,
    TableHeader,
    LineItems,
    Notes,
    TotalLabel,
    TotalValue,
}

/// Styling preset applied to a region.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Banner,
    CompanyName,
    InvoiceTitle,
    Label,
    Value,
    ColumnHeader,
    LineItems,
    Notes,
    TotalLabel,
    TotalValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: RegionName,
    pub role: Role,
    pub range: GridRange,
    pub merged: bool,
}

impl Region {
    fn new(
        name: RegionName,
        role: Role,
        rows: Range<u32>,
        cols: Range<u32>,
        merged: bool,
    ) -> Self {
        Self {
            name,
            role,
            range: GridRange::new(rows, cols),
            merged,
        }
    }

    /// Top-left cell, the one holding the value of a merged region.
    pub fn anchor(&self) -> (u32, u32) {
        (self.range.rows.start, self.range.cols.start)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    item_count: usize,
    body: Range<u32>,
    regions: Vec<Region>,
}

impl Layout {
    pub fn max_items() -> usize {
        (GRID_ROWS - MIN_NOTES_ROWS - 1 - (HEADER_ROW + 1)) as usize
    }

    pub fn plan(item_count: usize) -> Result<Self, LayoutError> {
        let max = Self::max_items();
        if item_count > max {
            return Err(LayoutError::Capacity {
                items: item_count,
                max,
            });
        }

        let first_item = HEADER_ROW + 1;
        let body = first_item..first_item + (item_count as u32).max(MIN_BODY_ROWS);
        let notes = body.end + 1;

        use RegionName as N;
        let regions = vec![
            Region::new(N::Banner, Role::Banner, 0..2, 0..GRID_COLS, true),
            Region::new(N::CompanyName, Role::CompanyName, 2..3, 1..GRID_COLS, true),
            Region::new(N::ServiceDescription, Role::Value, 3..4, 1..GRID_COLS, true),
            Region::new(N::Spacer, Role::Value, 4..5, 1..GRID_COLS, true),
            Region::new(N::Spacer, Role::Value, 5..6, 1..GRID_COLS, true),
            Region::new(N::InvoiceTitle, Role::InvoiceTitle, 7..8, 1..GRID_COLS, true),
            Region::new(N::InvoiceDate, Role::Value, 8..9, 1..GRID_COLS, true),
            Region::new(N::BillToLabel, Role::Label, 10..11, 1..2, false),
            Region::new(N::PayToLabel, Role::Label, 10..11, 3..4, false),
            Region::new(N::InvoiceNumberLabel, Role::Label, 10..11, 5..6, false),
            Region::new(N::BillToValue, Role::Value, 11..12, 1..2, false),
            Region::new(N::PayToValue, Role::Value, 11..12, 3..4, false),
            Region::new(N::InvoiceNumberValue, Role::Value, 11..12, 5..6, false),
            Region::new(N::PoLabel, Role::Label, 12..13, 1..2, false),
            Region::new(N::PoValue, Role::Value, 13..14, 1..2, false),
            Region::new(
                N::TableHeader,
                Role::ColumnHeader,
                HEADER_ROW..HEADER_ROW + 1,
                1..GRID_COLS,
                false,
            ),
            Region::new(N::LineItems, Role::LineItems, body.clone(), 1..GRID_COLS, false),
            Region::new(N::Notes, Role::Notes, notes..GRID_ROWS, 1..4, true),
            Region::new(N::TotalLabel, Role::TotalLabel, notes + 1..notes + 2, 4..GRID_COLS, true),
            Region::new(N::TotalValue, Role::TotalValue, notes + 3..notes + 4, 4..GRID_COLS, true),
        ];

        Ok(Self {
            item_count,
            body,
            regions,
        })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Row of the `index`th line item.
    pub fn item_row(&self, index: usize) -> u32 {
        self.body.start + index as u32
    }

    /// Rows reserved for line items, at least `MIN_BODY_ROWS` of them.
    pub fn body(&self) -> Range<u32> {
        self.body.clone()
    }

    /// Header row plus body rows.
    pub fn table(&self) -> Range<u32> {
        HEADER_ROW..self.body.end
    }
}
