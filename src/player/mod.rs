pub mod app;
pub mod audio;
pub mod preview;
pub mod ui;

pub use app::{run_kit, run_single};
