//! HTTP request handlers.

use super::AppState;
use crate::prefs::{timezone_expiry, CookiePreferences, PreferenceStore, TIMEZONE_KEY};
use crate::urlstate::update_query;
use crate::views::{ViewContext, ViewOutput, METRIC_DETAIL_VIEW, SERIES_LIST_VIEW};

use axum::extract::{OriginalUri, Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

const LAYOUT_TEMPLATE: &str = include_str!("templates/layout.html");
const EMBED_TEMPLATE: &str = include_str!("templates/embed.html");

// ============================================================================
// View dispatch
// ============================================================================

pub async fn handle_series_list(
    State(state): State<AppState>,
    Path(metric): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let title = format!("Metric Series - {}", metric);
    dispatch(state, SERIES_LIST_VIEW, &uri, metric, &headers, &title).await
}

pub async fn handle_metric_detail(
    State(state): State<AppState>,
    Path(metric): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let title = format!("Metric - {}", metric);
    dispatch(state, METRIC_DETAIL_VIEW, &uri, metric, &headers, &title).await
}

async fn dispatch(
    state: AppState,
    name: &str,
    uri: &Uri,
    metric: String,
    headers: &HeaderMap,
    title: &str,
) -> Response {
    let ctx = ViewContext {
        path: request_path(uri),
        metric,
        api: state.api.clone(),
        prefs: cookie_prefs(headers),
    };

    let Some(mut view) = state.registry.create(name, ctx) else {
        return (StatusCode::NOT_FOUND, "view not found").into_response();
    };

    match view.initialize().await {
        ViewOutput::Page(content) => Html(render_layout(title, &content)).into_response(),
        // only reachable when the view was destroyed mid-fetch
        ViewOutput::Cancelled => StatusCode::NO_CONTENT.into_response(),
    }
}

// ============================================================================
// Control submits
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub filter: String,
}

/// Filter submit: write the raw input value into the `filter` parameter of
/// the view path carried in the form action, then navigate there.
pub async fn handle_filter_submit(
    OriginalUri(uri): OriginalUri,
    axum::Form(form): axum::Form<FilterForm>,
) -> Redirect {
    let view_path = strip_control_segment(&request_path(&uri), "filter");
    Redirect::to(&update_query(&view_path, &[("filter", &form.filter)]))
}

#[derive(Debug, Deserialize)]
pub struct TimerangeForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub timezone: String,
}

/// Time-range submit: persist the chosen timezone (five-year expiry) and
/// write the chosen bounds into the view path, then navigate there.
pub async fn handle_timerange_submit(
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    axum::Form(form): axum::Form<TimerangeForm>,
) -> Response {
    let view_path = strip_control_segment(&request_path(&uri), "timerange");
    let target = update_query(&view_path, &[("start", &form.start), ("end", &form.end)]);

    let mut prefs = cookie_prefs(&headers);
    prefs.set(TIMEZONE_KEY, &form.timezone, timezone_expiry());

    let mut response = Redirect::to(&target).into_response();
    for cookie in prefs.set_cookie_headers() {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

// ============================================================================
// Pages
// ============================================================================

pub async fn handle_embed(Path(metric): Path<String>) -> impl IntoResponse {
    let snippet = format!(
        "<iframe src=\"/metrics/{}?view=timeseries\" width=\"800\" height=\"300\"></iframe>",
        metric
    );

    let content = EMBED_TEMPLATE
        .replace("{{metric_name}}", &html_escape::encode_text(&metric))
        .replace("{{snippet}}", &html_escape::encode_text(&snippet));

    Html(render_layout(&format!("Embed - {}", metric), &content))
}

// ============================================================================
// Static assets
// ============================================================================

pub async fn handle_favicon() -> impl IntoResponse {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
        <rect x="15" y="55" width="14" height="30" fill="#3a7a3a"/>
        <rect x="43" y="35" width="14" height="50" fill="#3a7a3a"/>
        <rect x="71" y="20" width="14" height="65" fill="#3a7a3a"/>
    </svg>"##;

    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

// ============================================================================
// Helpers
// ============================================================================

fn render_layout(title: &str, content: &str) -> String {
    LAYOUT_TEMPLATE
        .replace("{{title}}", &html_escape::encode_text(title))
        .replace("{{content}}", content)
}

fn request_path(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

fn cookie_prefs(headers: &HeaderMap) -> CookiePreferences {
    CookiePreferences::from_header(headers.get(header::COOKIE).and_then(|v| v.to_str().ok()))
}

/// Turn a control-submit path back into its view path, keeping the query
/// string: `/metrics/cpu/series/filter?a=1` → `/metrics/cpu/series?a=1`.
fn strip_control_segment(path: &str, control: &str) -> String {
    let (base, query) = match path.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (path, None),
    };

    let suffix = format!("/{}", control);
    let base = base.strip_suffix(suffix.as_str()).unwrap_or(base);

    match query {
        Some(query) => format!("{}?{}", base, query),
        None => base.to_string(),
    }
}
