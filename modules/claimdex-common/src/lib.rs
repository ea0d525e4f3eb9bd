pub mod config;
pub mod error;
pub mod host;
pub mod keyword;
pub mod links;
pub mod types;

pub use config::ScanConfig;
pub use error::ClaimdexError;
pub use host::{AdvanceStrategy, GalleryHost};
pub use keyword::KeywordMatcher;
pub use links::absolutize;
pub use types::*;
