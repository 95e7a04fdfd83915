//! File I/O for review sessions.

mod load;
mod save;

pub use load::load_session;
pub use save::save_session;
