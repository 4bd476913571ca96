//! Metric series list view.
//!
//! Renders the page header, filter input, time-range picker, series table
//! and overview chart for one metric.

use super::{control_action, render_error, ViewContext, ViewHandle, ViewOutput};
use crate::urlstate::ViewState;
use crate::widgets::{SeriesChart, SeriesTable, TimeRangePicker};

const PAGE_TEMPLATE: &str = include_str!("../web/templates/series_list.html");

const FETCH_ERROR_PREFIX: &str = "an error occurred while loading the metric series list:";

pub struct SeriesListView {
    ctx: ViewContext,
    handle: ViewHandle,
}

impl SeriesListView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            handle: ViewHandle::default(),
        }
    }

    pub fn handle(&self) -> ViewHandle {
        self.handle.clone()
    }

    pub fn destroy(&self) {
        self.handle.cancel();
    }

    /// Parse state, render the static chrome, fetch the series list and
    /// render the data widgets.
    pub async fn initialize(&mut self) -> ViewOutput {
        let state = ViewState::from_path(&self.ctx.path, &self.ctx.metric);

        let mut table = SeriesTable::new(&self.ctx.path);
        if let (Some(col), Some(dir)) = (&state.order_col, &state.order_dir) {
            table.set_sort(col, dir);
        }

        let picker = TimeRangePicker::new(&state, &self.ctx.prefs);
        let filter_value = state.filter.as_deref().unwrap_or("");

        let result = self.ctx.api.fetch_series(&state.metric).await;

        // the view may have been destroyed while the fetch was in flight
        if self.handle.is_cancelled() {
            return ViewOutput::Cancelled;
        }

        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                return ViewOutput::Page(render_error(FETCH_ERROR_PREFIX, err.detail()));
            }
        };

        let chart_html = payload
            .series
            .first()
            .map(|s| SeriesChart::new(s).render())
            .unwrap_or_default();

        let page = PAGE_TEMPLATE
            .replace("{{metric_name}}", &html_escape::encode_text(&state.metric))
            .replace(
                "{{filter_value}}",
                &html_escape::encode_safe(filter_value),
            )
            .replace("{{filter_action}}", &control_action(&self.ctx.path, "filter"))
            .replace(
                "{{timerange_picker}}",
                &picker.render(&control_action(&self.ctx.path, "timerange")),
            )
            .replace("{{chart}}", &chart_html)
            .replace("{{table}}", &table.render(&payload.series));

        ViewOutput::Page(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::prefs::CookiePreferences;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::time::Duration;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn view(base: &str, path: &str, cookie: Option<&str>) -> SeriesListView {
        SeriesListView::new(ViewContext {
            path: path.to_string(),
            metric: "cpu".to_string(),
            api: ApiClient::new(base),
            prefs: CookiePreferences::from_header(cookie),
        })
    }

    fn payload_router() -> Router {
        Router::new().route(
            "/fetch",
            get(|| async { r#"{"series":[{"series_id":"s1","values":[1,2,3]}]}"# }),
        )
    }

    #[tokio::test]
    async fn test_renders_table_and_chart_on_success() {
        let base = serve(payload_router()).await;
        let output = view(&base, "/metrics/cpu/series", None).initialize().await;

        let ViewOutput::Page(page) = output else {
            panic!("expected a rendered page");
        };
        assert!(page.contains("cpu"));
        assert!(page.contains("series_table"));
        assert!(page.contains("s1"));
        // chart receives the fetched values plus the shifted comparison series
        assert!(page.contains("\"values\":[1.0,2.0,3.0]"));
        assert!(page.contains("\"values\":[-999.0,-998.0,-997.0]"));
    }

    #[tokio::test]
    async fn test_non_200_renders_error_and_no_widgets() {
        let router = Router::new().route(
            "/fetch",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "backend exploded") }),
        );
        let base = serve(router).await;
        let output = view(&base, "/metrics/cpu/series", None).initialize().await;

        let ViewOutput::Page(page) = output else {
            panic!("expected a rendered page");
        };
        assert!(page.contains(FETCH_ERROR_PREFIX));
        assert!(page.contains("backend exploded"));
        assert!(!page.contains("series_table"));
        assert!(!page.contains("series_chart"));
    }

    #[tokio::test]
    async fn test_filter_value_is_escaped() {
        let base = serve(payload_router()).await;
        let output = view(&base, "/metrics/cpu/series?filter=<script>", None)
            .initialize()
            .await;

        let ViewOutput::Page(page) = output else {
            panic!("expected a rendered page");
        };
        assert!(page.contains("value=\"&lt;script&gt;\""));
        assert!(!page.contains("value=\"<script>\""));
    }

    #[tokio::test]
    async fn test_sort_state_applied_from_url() {
        let base = serve(payload_router()).await;
        let output = view(
            &base,
            "/metrics/cpu/series?order_col=series_id&order_dir=asc",
            None,
        )
        .initialize()
        .await;

        let ViewOutput::Page(page) = output else {
            panic!("expected a rendered page");
        };
        // the active ascending sort link flips to descending
        assert!(page.contains("order_dir=desc"));
    }

    #[tokio::test]
    async fn test_timezone_preference_prefills_picker() {
        let base = serve(payload_router()).await;
        let output = view(&base, "/metrics/cpu/series", Some("timezone=Europe/Berlin"))
            .initialize()
            .await;

        let ViewOutput::Page(page) = output else {
            panic!("expected a rendered page");
        };
        assert!(page.contains("value=\"Europe/Berlin\""));
    }

    #[tokio::test]
    async fn test_destroy_before_initialize_suppresses_render() {
        // nothing listens on this port; even the failed fetch must not render
        let mut view = view("http://127.0.0.1:1", "/metrics/cpu/series", None);
        view.destroy();
        assert_eq!(view.initialize().await, ViewOutput::Cancelled);
    }

    #[tokio::test]
    async fn test_destroy_during_fetch_cancels_render() {
        let router = Router::new().route(
            "/fetch",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                r#"{"series":[]}"#
            }),
        );
        let base = serve(router).await;

        let mut view = view(&base, "/metrics/cpu/series", None);
        let handle = view.handle();
        let task = tokio::spawn(async move { view.initialize().await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();

        assert_eq!(task.await.unwrap(), ViewOutput::Cancelled);
    }
}
