//! S3-compatible bucket backend for notesync.
//!
//! A client is built per request from the credentials currently persisted in
//! settings; see [`S3Connector`].

pub mod region;
mod s3;

pub use s3::{S3Connector, S3Storage};
