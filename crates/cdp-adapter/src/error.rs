use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("no chrome or chromium executable found; set FACTLENS_CHROME or helper.chrome_path")]
    ChromeNotFound,
    #[error("invalid browser config: {0}")]
    Config(String),
    #[error("browser launch failed: {0}")]
    Launch(String),
}
