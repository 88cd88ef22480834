//! Feature slices for the catalog API
//!
//! Each feature owns its routes, request/response types, and error mapping.

pub mod import;
