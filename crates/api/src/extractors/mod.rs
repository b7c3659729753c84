//! Custom Axum extractors.

pub mod requester;

pub use requester::{Requester, IDENTITY_HEADER};
