#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod disk;
pub mod flash;
pub mod metrics;
pub mod workload;
