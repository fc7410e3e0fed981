// src/lib.rs

//! PDF change monitor library
//!
//! Downloads a PDF, extracts its text, diffs it against the previous run,
//! summarizes what changed and emails a report.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
