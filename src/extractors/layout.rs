// src/extractors/layout.rs
//! Row offsets and strategy steps for each report tab. A page layout change
//! should only ever need edits in this file.

use crate::extractors::strategy::{
    AlternatingLabels, ColumnSchema, EmptyRowPolicy, ExtractionStrategy, HeaderedTable, KeyedTable, PairedEmphasis,
    TitleSplit,
};
use crate::wake::models::Tab;

/// A field read straight from the `<b>` cells of one row. Several indices
/// are joined with a space.
#[derive(Debug, Clone, Copy)]
pub struct DirectField {
    pub field: &'static str,
    pub row: usize,
    pub emphasis: &'static [usize],
}

/// Which nodes a strategy step runs over. Row numbers index every `<tr>` of
/// the page in document order, nested rows included.
#[derive(Debug, Clone, Copy)]
pub enum Nodes {
    /// Rows `start..end`.
    Rows { start: usize, end: usize },
    /// Direct cells of rows `start..end`, flattened.
    CellsOfRows { start: usize, end: usize },
    /// Rows nested inside a row.
    NestedRows(usize),
    /// Tables nested inside a row's first cell.
    NestedTables(usize),
    /// A row and the rows following it in the same table.
    TableFrom(usize),
}

pub struct Step {
    pub nodes: Nodes,
    pub strategy: &'static dyn ExtractionStrategy,
    pub title_split: Option<TitleSplit>,
}

pub struct TabLayout {
    pub tab: Tab,
    /// Row that must exist for the page to be worth reading at all.
    pub anchor_row: usize,
    pub fields: &'static [DirectField],
    pub steps: &'static [Step],
    /// List tabs hand back the list stored under this key instead of a record.
    pub list_key: Option<&'static str>,
}

pub const ADDITION_SCHEMA: &ColumnSchema = &[Some("Story"), None, Some("Type"), Some("Code"), Some("Area"), Some("Inc")];

pub static ACCOUNT: TabLayout = TabLayout {
    tab: Tab::Account,
    anchor_row: 3,
    fields: &[
        DirectField { field: "Real Estate ID", row: 3, emphasis: &[0] },
        DirectField { field: "PIN #", row: 3, emphasis: &[1] },
        DirectField { field: "Location Address", row: 7, emphasis: &[0] },
        DirectField { field: "Property Description", row: 7, emphasis: &[1] },
        DirectField { field: "Owner's Mailing Address", row: 9, emphasis: &[2, 3] },
        DirectField { field: "Property Location Address", row: 9, emphasis: &[5, 6] },
        DirectField { field: "Property Owner", row: 11, emphasis: &[0] },
    ],
    steps: &[Step { nodes: Nodes::NestedRows(22), strategy: &PairedEmphasis, title_split: None }],
    list_key: None,
};

pub static BUILDING: TabLayout = TabLayout {
    tab: Tab::Building,
    anchor_row: 2,
    fields: &[DirectField { field: "Building Description", row: 2, emphasis: &[0] }],
    steps: &[
        Step { nodes: Nodes::CellsOfRows { start: 4, end: 10 }, strategy: &AlternatingLabels, title_split: None },
        Step {
            nodes: Nodes::NestedTables(15),
            strategy: &KeyedTable { field: "Additions", schema: ADDITION_SCHEMA },
            title_split: None,
        },
    ],
    list_key: None,
};

pub static LAND: TabLayout = TabLayout {
    tab: Tab::Land,
    anchor_row: 2,
    fields: &[
        DirectField { field: "Land Class", row: 2, emphasis: &[0] },
        DirectField { field: "Total Land Value", row: 11, emphasis: &[0] },
    ],
    steps: &[Step { nodes: Nodes::Rows { start: 4, end: 10 }, strategy: &PairedEmphasis, title_split: None }],
    list_key: None,
};

// Book and page share one title cell over two data columns.
pub static DEEDS: TabLayout = TabLayout {
    tab: Tab::Deeds,
    anchor_row: 2,
    fields: &[],
    steps: &[Step {
        nodes: Nodes::TableFrom(2),
        strategy: &HeaderedTable { field: "Deeds", empty_rows: EmptyRowPolicy::Drop },
        title_split: Some(TitleSplit { column: 0 }),
    }],
    list_key: Some("Deeds"),
};

pub static NOTES: TabLayout = TabLayout {
    tab: Tab::Notes,
    anchor_row: 2,
    fields: &[],
    steps: &[Step {
        nodes: Nodes::TableFrom(2),
        strategy: &HeaderedTable { field: "Notes", empty_rows: EmptyRowPolicy::Drop },
        title_split: None,
    }],
    list_key: Some("Notes"),
};

pub static SALES: TabLayout = TabLayout {
    tab: Tab::Sales,
    anchor_row: 3,
    fields: &[],
    steps: &[Step {
        nodes: Nodes::TableFrom(3),
        strategy: &HeaderedTable { field: "Sales", empty_rows: EmptyRowPolicy::Keep },
        title_split: None,
    }],
    list_key: Some("Sales"),
};

pub fn layout_for(tab: Tab) -> &'static TabLayout {
    match tab {
        Tab::Account => &ACCOUNT,
        Tab::Building => &BUILDING,
        Tab::Land => &LAND,
        Tab::Deeds => &DEEDS,
        Tab::Notes => &NOTES,
        Tab::Sales => &SALES,
    }
}
