//! View controllers and dispatch.
//!
//! Views are looked up by route name in an explicit registry built at
//! startup. Each view instance renders once: it derives its state from the
//! request URL, fetches its data, and produces a page fragment. A view
//! destroyed while its fetch is in flight must not render.

mod metric_detail;
mod series_list;

pub use metric_detail::MetricDetailView;
pub use series_list::SeriesListView;

use crate::api::{ApiClient, SeriesPayload};
use crate::prefs::CookiePreferences;
use crate::widgets::{SeriesChart, SeriesTable};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Route name of the series list view.
pub const SERIES_LIST_VIEW: &str = "metric.series.list";

/// Route name of the metric detail view.
pub const METRIC_DETAIL_VIEW: &str = "metric.detail";

const ERROR_TEMPLATE: &str = include_str!("../web/templates/error.html");

const NOT_FOUND_VIEW: &str = "<div class=\"not_found\">\
    <h2>Not Found</h2><p>The requested view does not exist.</p></div>";

/// Everything a view needs to render: the request path (with query string),
/// the metric id from the route, the API client and the preference store.
#[derive(Clone)]
pub struct ViewContext {
    pub path: String,
    pub metric: String,
    pub api: ApiClient,
    pub prefs: CookiePreferences,
}

/// Handle for cancelling a view's in-flight work from outside.
#[derive(Debug, Clone, Default)]
pub struct ViewHandle {
    cancelled: Arc<AtomicBool>,
}

impl ViewHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcome of a view render.
#[derive(Debug, PartialEq)]
pub enum ViewOutput {
    /// Rendered page fragment.
    Page(String),
    /// The view was destroyed while its fetch was in flight.
    Cancelled,
}

/// A constructed view instance, dispatched by route name.
pub enum AnyView {
    SeriesList(SeriesListView),
    MetricDetail(MetricDetailView),
}

impl AnyView {
    /// Run the view's render cycle: parse state, render chrome, fetch,
    /// render data widgets.
    pub async fn initialize(&mut self) -> ViewOutput {
        match self {
            AnyView::SeriesList(view) => view.initialize().await,
            AnyView::MetricDetail(view) => view.initialize().await,
        }
    }

    pub fn handle(&self) -> ViewHandle {
        match self {
            AnyView::SeriesList(view) => view.handle(),
            AnyView::MetricDetail(view) => view.handle(),
        }
    }

    /// Tear the view down; an outstanding fetch will not render.
    pub fn destroy(&self) {
        match self {
            AnyView::SeriesList(view) => view.destroy(),
            AnyView::MetricDetail(view) => view.destroy(),
        }
    }
}

/// Factory constructing a view from its context.
pub type ViewFactory = fn(ViewContext) -> AnyView;

/// Explicit route-name → view-factory mapping, populated at startup and
/// injected into the router.
pub struct ViewRegistry {
    views: HashMap<&'static str, ViewFactory>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, factory: ViewFactory) {
        self.views.insert(name, factory);
    }

    /// Construct the view registered under `name`, if any.
    pub fn create(&self, name: &str, ctx: ViewContext) -> Option<AnyView> {
        self.views.get(name).map(|factory| factory(ctx))
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with all built-in views.
pub fn default_registry() -> ViewRegistry {
    let mut registry = ViewRegistry::new();
    registry.register(SERIES_LIST_VIEW, |ctx| {
        AnyView::SeriesList(SeriesListView::new(ctx))
    });
    registry.register(METRIC_DETAIL_VIEW, |ctx| {
        AnyView::MetricDetail(MetricDetailView::new(ctx))
    });
    registry
}

/// Render the shared error page fragment: a static message prefix plus the
/// raw failure detail.
pub fn render_error(message: &str, detail: &str) -> String {
    ERROR_TEMPLATE
        .replace("{{message}}", &html_escape::encode_text(message))
        .replace("{{detail}}", &html_escape::encode_text(detail))
}

/// Action URL for a view's control-submit endpoint: the control segment is
/// inserted before the query string so the submit handler sees the view's
/// full query state.
pub(crate) fn control_action(path: &str, control: &str) -> String {
    match path.split_once('?') {
        Some((base, query)) => format!("{}/{}?{}", base, control, query),
        None => format!("{}/{}", path, control),
    }
}

/// One sub-view of the detail page.
pub enum SubView {
    Table(SeriesTable),
    Timeseries,
    NotFound,
}

/// Container that mounts exactly one sub-view at a time, replacing the
/// previous one wholesale on each switch.
pub struct Viewport {
    current: Option<SubView>,
}

impl Viewport {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn set_view(&mut self, view: SubView) {
        self.current = Some(view);
    }

    pub fn current(&self) -> Option<&SubView> {
        self.current.as_ref()
    }

    /// Render the mounted sub-view with the fetched payload.
    pub fn render(&self, data: &SeriesPayload) -> String {
        match &self.current {
            Some(SubView::Table(table)) => table.render(&data.series),
            Some(SubView::Timeseries) => data
                .series
                .first()
                .map(|s| SeriesChart::new(s).render())
                .unwrap_or_else(|| "<div class=\"series_chart\"></div>".to_string()),
            Some(SubView::NotFound) | None => NOT_FOUND_VIEW.to_string(),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}
