#![forbid(unsafe_code)]

pub mod export;
pub mod flowfile;
pub mod matrix_store;
pub mod routingfile;
pub mod zonefile;
