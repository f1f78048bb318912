//! HTTP access used to retrieve the blacklist archive.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpError};
