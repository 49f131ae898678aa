/// Failure anywhere in the fetch and format pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP client could not be constructed.
    #[error("failed to open HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Connection failure, non-2xx status or an undecodable body.
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("response has no `exchangeRate` list")]
    MissingRateList,
    #[error("`exchangeRate` has no entry at index {index}")]
    MissingCurrency { index: usize },
    #[error("`exchangeRate[{index}]` has no `{field}` field")]
    MissingField { index: usize, field: &'static str },
}

/// Rejected command line, detected before any request is made.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("Usage: {bin} <DAYS>")]
    Usage { bin: String },
    #[error("Error: Invalid input. Please enter a valid number of days.")]
    InvalidNumber,
    #[error("Error: Number of days should not exceed {max}.")]
    TooManyDays { max: i64 },
    /// `--help` or `--version`, rendered by clap itself.
    #[error(transparent)]
    Clap(clap::Error),
}
