//! dynconf: layered, hot-reloading configuration
//!
//! A library that loads `<profile>/<document>` resources from pluggable
//! sources, flattens YAML, JSON and TOML documents into one ordered
//! namespace of dotted keys, resolves secrets and reloads in the background,
//! telling observers exactly which keys were added, changed or removed.
//!
//! # Example
//!
//! ```
//! use dynconf::locator::EmbeddedLocator;
//! use dynconf::provider::ConfigProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let locator = EmbeddedLocator::new("app")
//!     .with_resource("default/application.yaml", "server:\n  port: 8080\n");
//!
//! let provider = ConfigProvider::builder()
//!     .locator(locator)
//!     .build()
//!     .await
//!     .unwrap();
//!
//! assert_eq!(provider.property("server.port").unwrap().value(), "8080");
//! # }
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod http;
pub mod locator;
pub mod provider;
pub mod resolver;
pub mod time;
