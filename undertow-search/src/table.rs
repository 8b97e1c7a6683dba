//! Column-mapped extraction for sites that list results in a plain table.

use scraper::ElementRef;
use undertow_core::{NOT_PROVIDED, RawResult};
use url::Url;

use crate::html;

/// Where each field lives in a listing table row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableLayout {
    /// Selector of the result table; the first match is used
    pub table: &'static str,
    /// Selector of result rows inside the table
    pub rows: &'static str,
    /// Skip the first matched row
    pub header_row: bool,
    /// Rows with fewer cells are ignored
    pub min_cells: usize,
    /// Cell holding the title link
    pub name: usize,
    /// Selector of the title link inside the name cell
    pub name_link: &'static str,
    pub size: Option<usize>,
    pub date: Option<usize>,
    pub seeds: Option<usize>,
    pub leeches: Option<usize>,
    /// Cell that may carry an inline magnet link
    pub magnet: Option<usize>,
}

impl TableLayout {
    pub(crate) const fn new(table: &'static str, min_cells: usize, name: usize) -> Self {
        Self {
            table,
            rows: "tr",
            header_row: true,
            min_cells,
            name,
            name_link: "a[href]",
            size: None,
            date: None,
            seeds: None,
            leeches: None,
            magnet: None,
        }
    }

    /// Extracts one result per well-formed row, stamped with `site`.
    pub(crate) fn extract(&self, site: &str, base: &Url, body: &[u8]) -> Vec<RawResult> {
        let document = html::document(body);
        let Some(table) = html::first(document.root_element(), self.table) else {
            tracing::debug!(site, table = self.table, "result table not found");
            return Vec::new();
        };

        html::all(table, self.rows)
            .into_iter()
            .skip(usize::from(self.header_row))
            .filter_map(|row| self.extract_row(site, base, row))
            .collect()
    }

    fn extract_row(&self, site: &str, base: &Url, row: ElementRef<'_>) -> Option<RawResult> {
        let cells = html::all(row, "td");
        if cells.len() < self.min_cells {
            return None;
        }

        let link = html::first(*cells.get(self.name)?, self.name_link)?;
        let column = |index: Option<usize>| {
            index
                .and_then(|i| cells.get(i))
                .map_or_else(|| NOT_PROVIDED.to_string(), |cell| html::text_of(*cell))
        };
        let magnet = self
            .magnet
            .and_then(|i| cells.get(i))
            .and_then(|cell| html::inline_magnet(*cell));

        Some(
            RawResult::new(site, html::text_of(link))
                .with_size(column(self.size))
                .with_peers(column(self.seeds), column(self.leeches))
                .with_date(column(self.date))
                .with_magnet(magnet)
                .with_detail_url(html::absolute_href(base, link)),
        )
    }
}
