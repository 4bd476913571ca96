//! Tabular series widget.

use crate::api::Series;
use crate::urlstate::update_query;

/// Table over a metric's series. Column headers are links that write the
/// sort column and direction back into the URL; the sort present in the URL
/// is applied before any interaction.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    path: String,
    sort: Option<(String, String)>,
}

impl SeriesTable {
    /// Create a table for the view at `path` (including query string).
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            sort: None,
        }
    }

    /// Apply a sort column and direction.
    pub fn set_sort(&mut self, col: &str, dir: &str) {
        self.sort = Some((col.to_string(), dir.to_string()));
    }

    /// The currently applied sort, if any.
    pub fn sort(&self) -> Option<(&str, &str)> {
        self.sort
            .as_ref()
            .map(|(col, dir)| (col.as_str(), dir.as_str()))
    }

    /// Link target for sorting by `col`: the current path with `order_col`
    /// and `order_dir` added or replaced. Clicking the active ascending
    /// column flips to descending.
    pub fn sort_href(&self, col: &str) -> String {
        let dir = match &self.sort {
            Some((active, dir)) if active == col && dir == "asc" => "desc",
            _ => "asc",
        };
        update_query(&self.path, &[("order_col", col), ("order_dir", dir)])
    }

    /// Render the table for the given series collection.
    pub fn render(&self, series: &[Series]) -> String {
        let mut rows: Vec<&Series> = series.iter().collect();
        if let Some(("series_id", dir)) = self.sort() {
            rows.sort_by(|a, b| a.series_id.cmp(&b.series_id));
            if dir == "desc" {
                rows.reverse();
            }
        }

        let body: String = rows
            .iter()
            .map(|s| {
                format!(
                    "<tr><td class=\"series_id\">{}</td><td>{}</td><td>{}</td></tr>",
                    html_escape::encode_text(&s.series_id),
                    s.values.len(),
                    s.values
                        .last()
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "-".to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "<table class=\"series_table\">\n\
             <thead><tr><th><a href=\"{}\">Series ID</a></th>\
             <th>Points</th><th>Latest</th></tr></thead>\n\
             <tbody>\n{}\n</tbody>\n</table>",
            html_escape::encode_double_quoted_attribute(&self.sort_href("series_id")),
            body
        )
    }
}
