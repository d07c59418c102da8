//! HTTP plumbing shared by remote configuration sources and resolvers.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The client abstraction ([`HttpClient`]) and its reqwest implementation ([`ReqwestClient`])
//! - Error classification ([`HttpError`], [`IsRetryable`])
//! - Exponential backoff configuration ([`RetryPolicy`])

mod client;
mod error;
mod message;
mod retry;


pub use client::ReqwestClient;
pub use error::{HttpError, IsRetryable};
pub use message::{HttpClient, HttpRequest, HttpResponse};
pub use retry::{Backoff, RetryPolicy};
