// src/table.rs
//! Article tables as plain string grids.
//!
//! The first column is treated as row labels and the first row, when flagged,
//! as column headers; neither takes part in [`Table::value_counts`].

use std::{collections::HashMap, path::Path, path::PathBuf, sync::LazyLock};

use scraper::{ElementRef, Selector};

use crate::config::options::TableOptions;
use crate::core::html::element_text;
use crate::core::sanitize::normalize_ws;
use crate::csv::Delim;
use crate::error::{Error, Result};
use crate::file::write_rows;
use crate::page::Page;

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("static selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").expect("static selector"));

const MAX_COLSPAN: usize = 64;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Distinct cell values and how often they occur, most frequent first.
    pub fn value_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in &self.rows {
            for cell in row.iter().skip(1) {
                *counts.entry(cell.as_str()).or_insert(0) += 1;
            }
        }
        let mut out: Vec<(String, usize)> = counts.into_iter().map(|(v, n)| (s!(v), n)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    pub fn write_csv(&self, path: &Path) -> Result<PathBuf> {
        write_rows(path, self.headers.as_deref(), &self.rows, Delim::for_path(path))
    }
}

/// The `opts.number`-th table (1-based) of the article content.
pub fn extract_table(page: &Page, opts: &TableOptions) -> Result<Table> {
    opts.validate()?;
    if !page.has_content() {
        return Err(Error::Extract(format!("could not find content on page '{}'", page.title())));
    }

    let tables = page.document().tables();
    let Some(table) = tables.get(opts.number - 1) else {
        return Err(Error::Extract(format!(
            "table number {} does not exist on page '{}' ({} found)",
            opts.number,
            page.title(),
            tables.len()
        )));
    };

    let mut rows = read_rows(*table);
    let headers = if opts.first_row_is_header && !rows.is_empty() {
        Some(rows.remove(0))
    } else {
        None
    };
    Ok(Table { headers, rows })
}

/// Rows that belong to `table` itself, not to tables nested in its cells.
fn read_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for tr in table.select(&ROW) {
        if nearest_table(tr).map(|t| t.id()) != Some(table.id()) {
            continue;
        }
        let mut cells = Vec::new();
        for cell in tr.select(&CELL) {
            if cell.parent().map(|p| p.id()) != Some(tr.id()) {
                continue;
            }
            let text = normalize_ws(&element_text(cell));
            let span = cell
                .value()
                .attr("colspan")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(1)
                .clamp(1, MAX_COLSPAN);
            cells.extend(std::iter::repeat_n(text, span));
        }
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
    rows
}

fn nearest_table(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}
