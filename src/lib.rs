//! Grade aggregation, GPA projection and transcript export for Group Scholar.
//!
//! The `grade-transcripts` binary is a thin CLI over this library:
//!
//! - `aggregate` turns grade records into chart series and grade distributions
//! - `predict` projects the average needed to reach a target GPA
//! - `layout` lays out a paginated transcript, `render` turns it into a PDF or JSON file

pub mod aggregate;
pub mod config;
pub mod ingest;
pub mod layout;
pub mod metrics;
pub mod models;
pub mod numbers;
pub mod predict;
pub mod render;
pub mod report;
pub mod scale;
pub mod session;
