//! Core types shared across rowmap facilities
//!
//! This crate provides the canonical field keys and event names used by the
//! logging facility in `rowmap-core` and by the repository layer in
//! `rowmap-store`, so both emit the same structured shape.

pub mod schema;
