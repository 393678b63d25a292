//! Input/output: CSV trace export.

pub mod export;
