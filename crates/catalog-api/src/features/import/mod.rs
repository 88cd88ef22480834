pub mod queries;
pub mod routes;

pub use queries::{SignedUrlError, SignedUrlQuery, SignedUrlResponse};

pub use routes::import_routes;
