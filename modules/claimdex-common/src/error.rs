use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimdexError {
    #[error("Gallery region not found on the host page")]
    GalleryMissing,

    #[error("A scan run is in progress")]
    RunActive,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
