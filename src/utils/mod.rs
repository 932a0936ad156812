pub mod format;
pub mod geo;
pub mod time;
