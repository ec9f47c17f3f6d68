//! Benchmarks for the blocks every hit is built from.

mod drive;
mod filter;
mod tone_chain;

pub use drive::bench_drive;
pub use filter::bench_filter;
pub use tone_chain::bench_tone_chain;
