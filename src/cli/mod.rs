pub mod app;
pub mod check;
pub mod commands;
pub mod env;
pub mod extract;
pub mod format;
pub mod output;
pub mod runtime;
pub mod serve;

pub use check::{cmd_check, CheckArgs};
pub use extract::{cmd_extract, ExtractArgs};
pub use format::{cmd_format, FormatArgs};
pub use serve::{cmd_serve, ServeArgs};
