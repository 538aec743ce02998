//! HTTP access to the published results mirror.
//!
//! This module provides the `ApiClient`, the retry policy it is built with,
//! the `Transport` seam it sends requests through, and the path layout of
//! the remote API.

pub mod client;
pub mod endpoints;
pub mod retry;
pub mod transport;

pub use client::{ApiClient, FetchOutcome};
pub use retry::RetryPolicy;
pub use transport::{HttpResponse, ReqwestTransport, Transport, Validators};
