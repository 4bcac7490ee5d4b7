//! Storage layer for Carfinder
//!
//! This crate provides the string key-value persistence boundary together
//! with a sled-backed store and an in-memory store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;

pub use kv::{KeyValueStorage, KvConfig, KvError, KvStore, MemoryStorage, Result};
