pub mod alignment;
pub mod bam_source;
pub mod batch;
pub mod boundary;
pub mod cli;
pub mod data_loader;
pub mod error;
pub mod interval;
pub mod junction;
pub mod label_map;
pub mod pipeline;
pub mod region;
pub mod report;

pub use error::{Error, Result};
