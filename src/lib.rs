pub mod app;
pub mod booking;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod offers;
pub mod ui;

pub use error::{AppError, Result};
