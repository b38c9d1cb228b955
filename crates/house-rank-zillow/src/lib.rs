pub mod client;
pub mod enrichment;
pub mod error;
pub mod parse;
pub mod queries;

pub use client::*;
pub use enrichment::*;
