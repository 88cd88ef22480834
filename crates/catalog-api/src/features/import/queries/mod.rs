pub mod signed_url;

pub use signed_url::{SignedUrlError, SignedUrlQuery, SignedUrlResponse};
