use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("DOM error: {0}")]
    Dom(#[from] domkit::DomError),

    #[error("Invalid page config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PageError>;
