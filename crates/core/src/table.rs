// ABOUTME: Table extraction: turns rendered QuickFacts tables into ordered ParameterBlocks.
// ABOUTME: Each headed tbody becomes one block; only rows with exactly two data cells become fields.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::record::{FieldEntry, ParameterBlock};
use crate::text::{normalize, rendered_text};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static TBODY: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody").unwrap());
static TH: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

/// Extract the parameter blocks of one table, in body order.
///
/// A body without any `th` is skipped. The first header names the block;
/// each row with exactly two `td` cells adds `{first: normalize(second)}`.
/// Nothing here is an error: odd markup just yields fewer blocks or fields.
pub fn extract_table(table: ElementRef<'_>) -> Vec<ParameterBlock> {
    let mut blocks = Vec::new();

    for body in table.select(&TBODY) {
        let parameter = match body.select(&TH).next() {
            Some(th) => rendered_text(th),
            None => continue,
        };

        let mut block = ParameterBlock::new(parameter);
        for row in body.select(&TR) {
            let cells: Vec<ElementRef<'_>> = row.select(&TD).collect();
            if let [label, value] = cells.as_slice() {
                let value = rendered_text(*value);
                block
                    .fields
                    .push(FieldEntry::new(rendered_text(*label), normalize(&value)));
            }
        }
        blocks.push(block);
    }

    blocks
}

/// All tables of a document, in document order.
pub fn tables(doc: &Html) -> Vec<ElementRef<'_>> {
    doc.select(&TABLE).collect()
}

/// Extract every table except the first and concatenate their blocks.
///
/// The first table on a QuickFacts page is layout chrome, not data. Table
/// boundaries are not kept in the result.
pub fn extract_data_tables(doc: &Html) -> Vec<ParameterBlock> {
    tables(doc)
        .into_iter()
        .skip(1)
        .flat_map(extract_table)
        .collect()
}
