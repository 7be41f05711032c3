//! Chromium-backed helper host.
//!
//! Each helper surface is a browser tab. The chat driver runs as a task next
//! to its tab and scripts it through [`ChromiumDom`]; closing the surface
//! cancels that task.

pub mod config;
pub mod detect;
pub mod dom;
pub mod error;
pub mod host;
mod scripts;

pub use config::ChromiumConfig;
pub use detect::detect_chrome_executable;
pub use dom::ChromiumDom;
pub use error::AdapterError;
pub use host::ChromiumHost;
