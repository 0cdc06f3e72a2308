mod link;

pub use link::{ErrorResponse, ShortLink, ShortenRequest, ShortenResponse};
