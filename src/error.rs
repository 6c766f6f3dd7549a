pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("http transport: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service responded {status}: {message}")]
    Service { status: u16, message: String },

    #[error("json decode: {0}")]
    Json(#[from] serde_json::Error),

    /// The generative endpoint answered, but not with the requested JSON shape.
    #[error("malformed model response: {0}")]
    MalformedModelResponse(String),

    #[error("unexpected service response: {0}")]
    UnexpectedResponse(String),
}
