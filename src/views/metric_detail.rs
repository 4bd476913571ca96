//! Metric detail view.
//!
//! Renders the page header with the table/timeseries view toggle, the
//! time-range and embed controls, and mounts one sub-view in the viewport
//! depending on the `view` state key.

use super::{
    control_action, render_error, SubView, ViewContext, ViewHandle, ViewOutput, Viewport,
};
use crate::urlstate::{build_query_string, ViewState};
use crate::widgets::{SeriesTable, TimeRangePicker};

const PAGE_TEMPLATE: &str = include_str!("../web/templates/metric_detail.html");

const FETCH_ERROR_PREFIX: &str = "an error occurred while loading the metric list:";

pub struct MetricDetailView {
    ctx: ViewContext,
    handle: ViewHandle,
    viewport: Viewport,
}

impl MetricDetailView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            handle: ViewHandle::default(),
            viewport: Viewport::new(),
        }
    }

    pub fn handle(&self) -> ViewHandle {
        self.handle.clone()
    }

    pub fn destroy(&self) {
        self.handle.cancel();
    }

    /// Parse state, render the chrome, fetch the series and mount the
    /// sub-view selected by the `view` state key.
    pub async fn initialize(&mut self) -> ViewOutput {
        let state = ViewState::from_path(&self.ctx.path, &self.ctx.metric);
        let picker = TimeRangePicker::new(&state, &self.ctx.prefs);

        let result = self.ctx.api.list_series(&state.metric).await;

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

        self.viewport.set_view(select_view(&state, &self.ctx.path));
        let content = self.viewport.render(&payload);

        let base = base_path(&self.ctx.path);
        let page = PAGE_TEMPLATE
            .replace("{{metric_name}}", &html_escape::encode_text(&state.metric))
            .replace(
                "{{view_mode}}",
                &html_escape::encode_safe(state.view.as_deref().unwrap_or("")),
            )
            .replace(
                "{{table_view_href}}",
                &html_escape::encode_double_quoted_attribute(&view_mode_href(
                    &state, base, "table",
                )),
            )
            .replace(
                "{{timeseries_view_href}}",
                &html_escape::encode_double_quoted_attribute(&view_mode_href(
                    &state,
                    base,
                    "timeseries",
                )),
            )
            .replace(
                "{{timerange_picker}}",
                &picker.render(&control_action(&self.ctx.path, "timerange")),
            )
            .replace(
                "{{embed_href}}",
                &html_escape::encode_double_quoted_attribute(&format!("{}/embed", base)),
            )
            .replace("{{content}}", &content);

        ViewOutput::Page(page)
    }
}

fn base_path(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

/// Toggle link: the base path with the query string rebuilt from the current
/// state, `view` switched to the given mode.
fn view_mode_href(state: &ViewState, base: &str, mode: &str) -> String {
    let mut state = state.clone();
    state.view = Some(mode.to_string());
    format!("{}?{}", base, build_query_string(&state.param_list()))
}

/// Sub-view selection on the `view` state key. Anything other than `table`
/// or `timeseries`, including no value at all, falls to the not-found view.
fn select_view(state: &ViewState, path: &str) -> SubView {
    match state.view.as_deref() {
        Some("table") => {
            let mut table = SeriesTable::new(path);
            if let (Some(col), Some(dir)) = (&state.order_col, &state.order_dir) {
                table.set_sort(col, dir);
            }
            SubView::Table(table)
        }
        Some("timeseries") => SubView::Timeseries,
        _ => SubView::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::prefs::CookiePreferences;
    use axum::routing::get;
    use axum::Router;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn view(base: &str, path: &str) -> MetricDetailView {
        MetricDetailView::new(ViewContext {
            path: path.to_string(),
            metric: "cpu".to_string(),
            api: ApiClient::new(base),
            prefs: CookiePreferences::from_header(None),
        })
    }

    fn payload_router() -> Router {
        Router::new().route(
            "/list_series",
            get(|| async { r#"{"series":[{"series_id":"s1","values":[1,2,3]}]}"# }),
        )
    }

    async fn page(path: &str) -> String {
        let base = serve(payload_router()).await;
        match view(&base, path).initialize().await {
            ViewOutput::Page(page) => page,
            other => panic!("expected a rendered page, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_table_mode_mounts_table_view() {
        let page = page("/metrics/cpu?view=table").await;
        assert!(page.contains("series_table"));
        assert!(page.contains("data-view=\"table\""));
    }

    #[tokio::test]
    async fn test_timeseries_mode_mounts_chart_view() {
        let page = page("/metrics/cpu?view=timeseries").await;
        assert!(page.contains("series_chart"));
        assert!(!page.contains("series_table"));
    }

    #[tokio::test]
    async fn test_unknown_mode_mounts_not_found() {
        let page = page("/metrics/cpu?view=foo").await;
        assert!(page.contains("not_found"));
    }

    #[tokio::test]
    async fn test_absent_mode_mounts_not_found() {
        let page = page("/metrics/cpu").await;
        assert!(page.contains("not_found"));
    }

    #[tokio::test]
    async fn test_view_toggle_links_rewrite_view_param() {
        let page = page("/metrics/cpu?offset=20&view=table").await;
        assert!(page.contains("href=\"/metrics/cpu?offset=20&amp;view=table\""));
        assert!(page.contains("href=\"/metrics/cpu?offset=20&amp;view=timeseries\""));
    }

    #[tokio::test]
    async fn test_view_toggle_links_retain_sort_state() {
        let page = page("/metrics/cpu?view=table&order_col=series_id&order_dir=asc").await;
        assert!(page.contains("view=timeseries&amp;order_col=series_id&amp;order_dir=asc"));
        assert!(page.contains("view=table&amp;order_col=series_id&amp;order_dir=asc"));
    }

    #[tokio::test]
    async fn test_destroy_before_initialize_suppresses_render() {
        // nothing listens on this port; even the failed fetch must not render
        let mut view = view("http://127.0.0.1:1", "/metrics/cpu?view=table");
        view.destroy();
        assert_eq!(view.initialize().await, ViewOutput::Cancelled);
    }

    #[tokio::test]
    async fn test_fetch_error_renders_error_page() {
        let router = Router::new().route(
            "/list_series",
            get(|| async { (axum::http::StatusCode::BAD_GATEWAY, "no backend") }),
        );
        let base = serve(router).await;

        match view(&base, "/metrics/cpu?view=table").initialize().await {
            ViewOutput::Page(page) => {
                assert!(page.contains(FETCH_ERROR_PREFIX));
                assert!(page.contains("no backend"));
                assert!(!page.contains("series_table"));
            }
            other => panic!("expected a rendered page, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_embed_link_present() {
        let page = page("/metrics/cpu?view=table").await;
        assert!(page.contains("href=\"/metrics/cpu/embed\""));
    }
}
