//! Chart widget for a single metric series.

use crate::api::Series;
use serde::Serialize;

/// Offset applied to the placeholder comparison series.
pub const COMPARISON_OFFSET: f64 = 1000.0;

/// Title of the placeholder comparison series.
pub const COMPARISON_TITLE: &str = "Compare To: Yesterday";

/// One plotted series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub series_id: String,
    pub title: String,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<serde_json::Value>,
}

/// Chart-level summary line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    pub series_id: String,
}

/// Full configuration handed to the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub time: Vec<i64>,
    pub summary: ChartSummary,
    pub series: Vec<ChartSeries>,
}

impl ChartConfig {
    /// Build the chart config for one fetched series: the series itself plus
    /// a placeholder comparison series with every value shifted by a
    /// constant offset.
    ///
    /// TODO: replace the placeholder with a real comparison series once the
    /// API can serve one.
    pub fn for_series(series: &Series) -> Self {
        Self {
            time: series.time.clone(),
            summary: ChartSummary {
                series_id: series.series_id.clone(),
            },
            series: vec![
                ChartSeries {
                    series_id: series.series_id.clone(),
                    title: "Current Value".to_string(),
                    values: series.values.clone(),
                    summaries: series.summaries.clone(),
                },
                ChartSeries {
                    series_id: series.series_id.clone(),
                    title: COMPARISON_TITLE.to_string(),
                    values: series.values.iter().map(|v| v - COMPARISON_OFFSET).collect(),
                    summaries: None,
                },
            ],
        }
    }
}

/// Chart widget: renders a mount node with the config embedded as a JSON
/// data island.
#[derive(Debug, Clone)]
pub struct SeriesChart {
    config: ChartConfig,
}

impl SeriesChart {
    pub fn new(series: &Series) -> Self {
        Self {
            config: ChartConfig::for_series(series),
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn render(&self) -> String {
        let config_json = serde_json::to_string(&self.config)
            .unwrap_or_else(|_| "{}".to_string())
            // '<' only occurs inside JSON strings; keep it out of the markup
            .replace('<', "\\u003c");

        format!(
            "<div class=\"series_chart\">\
             <script type=\"application/json\" class=\"chart_config\">{}</script>\
             </div>",
            config_json
        )
    }
}
