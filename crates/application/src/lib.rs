#![forbid(unsafe_code)]

pub mod enrichment;
pub mod error;
pub mod export;
pub mod populate;
pub mod reconcile;
