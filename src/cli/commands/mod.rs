pub mod classify;
pub mod completions;
pub mod config;
pub mod list;
pub mod summary;
pub mod validate;
