//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the object-storage capability and its backends.

pub mod storage;
