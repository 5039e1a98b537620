//! Output module
//!
//! Handles persistence of fetched collections.
//!
//! # Overview
//!
//! Each collection is written as one JSON array (`vulnerabilities.json`,
//! `assets.json`) that the report engine reads back.

mod writer;

pub use writer::{write_json_pretty, JsonWriter};
