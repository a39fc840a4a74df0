//! HTTP gateway exposing upload, list, download and delete over an
//! S3-compatible object store, plus the client used by the console.

pub mod console;
pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
