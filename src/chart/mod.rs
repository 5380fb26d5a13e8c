//! Line chart configuration and the builder that renders it.

pub mod builder;
pub mod config;
pub mod options;
