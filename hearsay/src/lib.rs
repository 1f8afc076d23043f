//! [![github]](https://github.com/LittleBoxOfSunshine/hearsay)&ensp;[![crates-io]](https://crates.io/crates/hearsay)&ensp;[![docs-rs]](https://docs.rs/hearsay)
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//! [crates-io]: https://img.shields.io/badge/crates.io-fc8d62?style=for-the-badge&labelColor=555555&logo=rust
//! [docs-rs]: https://img.shields.io/badge/docs.rs-66c2a5?style=for-the-badge&labelColor=555555&logo=docs.rs
//!
//! <br>
//!
//! Hearsay serves typed configuration that lives in a remote key-value store. A service's whole
//! configuration is kept under one key (its namespace) as a JSON object. The store pulls that
//! object, keeps it as an immutable snapshot and answers typed lookups from it, while a background
//! task periodically replaces the snapshot with a fresh copy:
//!
//! - Reads never block on the network and never observe a half-applied refresh.
//! - A failed refresh keeps serving the previous snapshot.
//! - Values are parsed on read, with [`ConfigGetterWithDefault`][config::ConfigGetterWithDefault]
//!     variants for callers that can fall back to a default.
//!
//! # Stores
//!
//! - [`RefreshingConfigManager`][refresh::RefreshingConfigManager]: backed by any
//!     [`RemoteStore`][remote::RemoteStore], Redis out of the box.
//! - [`InMemoryConfigManager`][memory::InMemoryConfigManager]: fixed typed values for tests.
//!
//! Both implement [`ConfigManager`][config::ConfigManager], see the [`config`] module for the
//! reading patterns.
//!
//! # Logging
//!
//! Refresh activity is reported through [`tracing`](https://docs.rs/tracing). Failed refreshes
//! are logged at `warn`, successful ones at `debug`. Installing a subscriber is left to the
//! application.

pub mod config;
pub mod duration;
pub mod error;
pub mod memory;
pub mod refresh;
pub mod remote;
pub mod snapshot;
pub mod value;
