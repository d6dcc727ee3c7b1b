pub mod app;
pub mod context;
pub mod month_pane;

pub use app::App;
pub use context::{Context, Mode, Theme};
pub use month_pane::MonthPane;
