pub mod browse;

pub use browse::run_browse_screen;
