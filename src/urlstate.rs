//! URL query-string state handling.
//!
//! Every view derives its state from the request URL on each render and
//! writes state changes back as new URLs. The parser extracts only the
//! parameters that are actually present; the writer appends a parameter if
//! absent or replaces it in place if present, leaving all other parameters
//! untouched and in their original order.

/// Flat view state decoded from a URL path plus the route-supplied metric id.
///
/// Absent query parameters stay `None` and mean "no opinion"; nothing is
/// defaulted here. Extraction is purely textual apart from integer parsing
/// for the time bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub metric: String,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub filter: Option<String>,
    pub order_col: Option<String>,
    pub order_dir: Option<String>,
    pub cfg: Option<String>,
    pub offset: Option<String>,
    pub view: Option<String>,
}

impl ViewState {
    /// Parse view state from a path (including query string) and the metric
    /// id taken from the route.
    pub fn from_path(path: &str, metric: &str) -> Self {
        let mut state = Self {
            metric: metric.to_string(),
            ..Self::default()
        };

        if let Some(v) = param_value(path, "start") {
            state.start = v.parse().ok();
        }
        if let Some(v) = param_value(path, "end") {
            state.end = v.parse().ok();
        }
        state.filter = param_value(path, "filter");
        state.order_col = param_value(path, "order_col");
        state.order_dir = param_value(path, "order_dir");
        state.cfg = param_value(path, "cfg");
        state.offset = param_value(path, "offset");
        state.view = param_value(path, "view");

        state
    }

    /// The present parameters as key/value pairs, for rebuilding a query
    /// string wholesale (detail view navigation).
    pub fn param_list(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(v) = &self.cfg {
            params.push(("cfg", v.clone()));
        }
        if let Some(v) = &self.offset {
            params.push(("offset", v.clone()));
        }
        if let Some(v) = &self.view {
            params.push(("view", v.clone()));
        }
        if let Some(v) = self.start {
            params.push(("start", v.to_string()));
        }
        if let Some(v) = self.end {
            params.push(("end", v.to_string()));
        }
        if let Some(v) = &self.filter {
            params.push(("filter", v.clone()));
        }
        if let Some(v) = &self.order_col {
            params.push(("order_col", v.clone()));
        }
        if let Some(v) = &self.order_dir {
            params.push(("order_dir", v.clone()));
        }
        params
    }
}

/// Return the literal value of a query parameter, or `None` if absent.
pub fn param_value(path: &str, key: &str) -> Option<String> {
    let (_, query) = path.split_once('?')?;

    for pair in query.split('&') {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k == key {
            return Some(v.to_string());
        }
    }

    None
}

/// Return a new path with `key=value` appended if the parameter is absent,
/// or replaced in place if present. All other parameters keep their
/// relative order.
pub fn add_or_modify_param(path: &str, key: &str, value: &str) -> String {
    let (base, query) = match path.split_once('?') {
        Some((base, query)) => (base, query),
        None => return format!("{}?{}={}", path, key, value),
    };

    let mut pairs: Vec<String> = Vec::new();
    let mut replaced = false;

    for pair in query.split('&') {
        let k = pair.split_once('=').map(|(k, _)| k).unwrap_or(pair);
        if k == key {
            pairs.push(format!("{}={}", key, value));
            replaced = true;
        } else {
            pairs.push(pair.to_string());
        }
    }

    if !replaced {
        pairs.push(format!("{}={}", key, value));
    }

    format!("{}?{}", base, pairs.join("&"))
}

/// Apply a set of parameter updates to a path, in order.
pub fn update_query(path: &str, updates: &[(&str, &str)]) -> String {
    let mut url = path.to_string();
    for (key, value) in updates {
        url = add_or_modify_param(&url, key, value);
    }
    url
}

/// Build a query string from key/value pairs (no leading `?`).
pub fn build_query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contains_only_present_params() {
        let state = ViewState::from_path("/metrics/cpu/series?start=100&filter=web", "cpu");
        assert_eq!(state.metric, "cpu");
        assert_eq!(state.start, Some(100));
        assert_eq!(state.filter.as_deref(), Some("web"));
        assert_eq!(state.end, None);
        assert_eq!(state.order_col, None);
        assert_eq!(state.order_dir, None);
        assert_eq!(state.view, None);
    }

    #[test]
    fn test_parse_all_recognized_params() {
        let state = ViewState::from_path(
            "/m?start=1&end=2&filter=f&order_col=series_id&order_dir=asc&view=table&cfg=c&offset=5",
            "mem",
        );
        assert_eq!(state.start, Some(1));
        assert_eq!(state.end, Some(2));
        assert_eq!(state.filter.as_deref(), Some("f"));
        assert_eq!(state.order_col.as_deref(), Some("series_id"));
        assert_eq!(state.order_dir.as_deref(), Some("asc"));
        assert_eq!(state.view.as_deref(), Some("table"));
        assert_eq!(state.cfg.as_deref(), Some("c"));
        assert_eq!(state.offset.as_deref(), Some("5"));
    }

    #[test]
    fn test_parse_no_query_string() {
        let state = ViewState::from_path("/metrics/cpu/series", "cpu");
        assert_eq!(state.metric, "cpu");
        assert_eq!(state, ViewState { metric: "cpu".to_string(), ..Default::default() });
    }

    #[test]
    fn test_parse_malformed_integer() {
        // no validation: a bound that fails to parse is simply not an opinion
        let state = ViewState::from_path("/m?start=abc&end=200", "m");
        assert_eq!(state.start, None);
        assert_eq!(state.end, Some(200));
    }

    #[test]
    fn test_param_value_literal() {
        assert_eq!(
            param_value("/m?filter=<script>", "filter").as_deref(),
            Some("<script>")
        );
        assert_eq!(param_value("/m?a=1", "b"), None);
        assert_eq!(param_value("/m", "a"), None);
    }

    #[test]
    fn test_add_param_to_bare_path() {
        assert_eq!(add_or_modify_param("/m", "a", "1"), "/m?a=1");
    }

    #[test]
    fn test_add_param_to_existing_query() {
        assert_eq!(add_or_modify_param("/m?b=2", "a", "1"), "/m?b=2&a=1");
    }

    #[test]
    fn test_modify_param_in_place() {
        assert_eq!(
            add_or_modify_param("/m?a=1&b=2&c=3", "b", "9"),
            "/m?a=1&b=9&c=3"
        );
    }

    #[test]
    fn test_modify_preserves_order() {
        let url = add_or_modify_param("/m?z=26&a=1&m=13", "a", "2");
        assert_eq!(url, "/m?z=26&a=2&m=13");
    }

    #[test]
    fn test_update_query_multiple() {
        let url = update_query("/m?start=1", &[("order_col", "series_id"), ("order_dir", "desc")]);
        assert_eq!(url, "/m?start=1&order_col=series_id&order_dir=desc");
    }

    #[test]
    fn test_build_query_string() {
        let qs = build_query_string(&[("view", "table".to_string()), ("offset", "20".to_string())]);
        assert_eq!(qs, "view=table&offset=20");
    }

    #[test]
    fn test_param_list_round_trip() {
        let state = ViewState::from_path("/m?view=table&offset=20", "m");
        assert_eq!(build_query_string(&state.param_list()), "offset=20&view=table");
    }

    #[test]
    fn test_param_list_carries_sort_state() {
        let state = ViewState::from_path("/m?view=table&order_col=series_id&order_dir=asc", "m");
        assert_eq!(
            build_query_string(&state.param_list()),
            "view=table&order_col=series_id&order_dir=asc"
        );
    }
}
