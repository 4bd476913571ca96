//! Time-range picker control.

use crate::prefs::{PreferenceStore, TIMEZONE_KEY};
use crate::urlstate::ViewState;

/// Form control for picking a start/end time range and a timezone.
///
/// Initialized from the persisted timezone preference and the `start`/`end`
/// view state; submitting posts back to the view's timerange endpoint, which
/// persists the timezone and writes the bounds into the URL.
#[derive(Debug, Clone)]
pub struct TimeRangePicker {
    start: Option<i64>,
    end: Option<i64>,
    timezone: Option<String>,
}

impl TimeRangePicker {
    pub fn new(state: &ViewState, prefs: &dyn PreferenceStore) -> Self {
        // the range is only meaningful when both bounds are present
        let (start, end) = match (state.start, state.end) {
            (Some(start), Some(end)) => (Some(start), Some(end)),
            _ => (None, None),
        };

        Self {
            start,
            end,
            timezone: prefs.get(TIMEZONE_KEY),
        }
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn timerange(&self) -> Option<(i64, i64)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Render the picker form posting to `action`.
    pub fn render(&self, action: &str) -> String {
        let fmt = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();

        format!(
            "<form class=\"timerange_picker\" method=\"post\" action=\"{}\">\n\
             <input type=\"text\" name=\"start\" value=\"{}\" placeholder=\"start\">\n\
             <input type=\"text\" name=\"end\" value=\"{}\" placeholder=\"end\">\n\
             <input type=\"text\" name=\"timezone\" value=\"{}\" placeholder=\"timezone\">\n\
             <button type=\"submit\">Apply</button>\n\
             </form>",
            html_escape::encode_double_quoted_attribute(action),
            fmt(self.start),
            fmt(self.end),
            html_escape::encode_double_quoted_attribute(self.timezone.as_deref().unwrap_or(""))
        )
    }
}
