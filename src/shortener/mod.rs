pub mod codegen;
pub mod normalize;
pub mod service;

pub use codegen::{attempt, random_code, CODE_ALPHABET};
pub use normalize::normalize_url;
pub use service::{Shortener, ShortenerError, MAX_CODE_ATTEMPTS};
