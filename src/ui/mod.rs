pub mod app;
mod calendar_window;
mod command;
pub mod context;
mod detail_window;
mod loading;

pub use app::{App, Section};
pub use calendar_window::{MonthPane, PageHeader};
pub use command::CommandParser;
pub use context::{Context, Mode, Theme};
pub use detail_window::DetailPanel;
pub use loading::LoadingScreen;
