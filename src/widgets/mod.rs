//! HTML widgets shared by the dashboard views.

mod chart;
mod table;
mod timerange;

pub use chart::*;
pub use table::*;
pub use timerange::*;
