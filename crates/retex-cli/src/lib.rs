//! ReTex CLI library.
//!
//! This crate provides the core functionality for the ReTex CLI:
//! planning texture imports from glTF documents and running conversion
//! dispatch over the planned slots.

pub mod commands;
pub mod planner;
pub mod report;
