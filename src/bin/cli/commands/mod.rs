pub mod backup;
pub mod config;
pub mod delete;
pub mod entry;
pub mod list;
pub mod new;
pub mod practice;
pub mod say;
pub mod show;
pub mod streak;
