use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortfolioError {
    #[error("missing element {0}")]
    MissingElement(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("js error: {0}")]
    Js(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl PortfolioError {
    pub fn missing(selector: impl Into<String>) -> Self {
        Self::MissingElement(selector.into())
    }

    /// Wrap anything printable coming back from the host (usually a `JsValue`).
    pub fn js(value: impl std::fmt::Debug) -> Self {
        Self::Js(format!("{value:?}"))
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
