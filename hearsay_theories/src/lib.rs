//! [![github]](https://github.com/LittleBoxOfSunshine/hearsay)&ensp;[![crates-io]](https://crates.io/crates/hearsay_theories)&ensp;[![docs-rs]](https://docs.rs/hearsay_theories)
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//! [crates-io]: https://img.shields.io/badge/crates.io-fc8d62?style=for-the-badge&labelColor=555555&logo=rust
//! [docs-rs]: https://img.shields.io/badge/docs.rs-66c2a5?style=for-the-badge&labelColor=555555&logo=docs.rs
//!
//! <br>
//!
//! This is the collection of traits and error types re-exported by [`hearsay`](https://crates.io/crates/hearsay).
//! Code that only reads configuration can depend on these traits alone, and alternate stores or
//! remote backends can be implemented without pulling in the Redis client.

pub mod config;
pub mod error;
pub mod remote;
