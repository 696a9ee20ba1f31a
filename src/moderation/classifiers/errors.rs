use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("could not build http client: {0}")]
    ClientBuild(String),

    #[error("connect failure: {0}")]
    Connect(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("http error {status}")]
    Http { status: reqwest::StatusCode },

    #[error("response too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response is missing '{0}'")]
    MissingField(&'static str),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl ClassifierError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if let Some(status) = err.status() {
            Self::Http { status }
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if err.is_connect() || err.is_request() {
            Self::Connect(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
