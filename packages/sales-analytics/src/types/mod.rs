//! Data types shared across the pipeline.

pub mod month;
pub mod record;
pub mod summary;
