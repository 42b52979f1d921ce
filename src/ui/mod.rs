pub mod layout;
pub mod screens;
pub mod styles;
pub mod terminal;

pub use screens::run_browse_screen;
pub use terminal::TerminalGuard;
