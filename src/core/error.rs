use thiserror::Error;

pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid slippage: {0}")]
    InvalidSlippage(String),

    #[error("Invalid price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: String },

    #[error("Invalid price path: {0}")]
    InvalidPath(String),

    #[error("Quote not found: {0}")]
    QuoteNotFound(String),

    #[error("Quote {0} has expired")]
    QuoteExpired(String),

    #[error("Swap not found: {0}")]
    SwapNotFound(String),

    #[error("Swap {0} has already been executed")]
    SwapAlreadyExecuted(String),

    #[error("Prediction not found: {0}")]
    PredictionNotFound(String),

    #[error("Prediction {id} cannot be settled before {ends_at}")]
    SettlementNotDue { id: String, ends_at: String },

    #[error("Prediction {0} is already settled")]
    AlreadySettled(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExchangeError {
    /// Errors caused by caller input; retrying without changing the input cannot succeed.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ExchangeError::UnknownToken(_)
                | ExchangeError::InvalidAmount(_)
                | ExchangeError::InvalidSlippage(_)
                | ExchangeError::InvalidPrice { .. }
                | ExchangeError::InvalidPath(_)
        )
    }
}

impl From<anyhow::Error> for ExchangeError {
    fn from(err: anyhow::Error) -> Self {
        ExchangeError::Other(err.to_string())
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::SerializationError(err.to_string())
    }
}
