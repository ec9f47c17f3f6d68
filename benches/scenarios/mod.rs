//! Real-world scenario benchmarks.
//!
//! These model what the instrument does while playing: building and
//! rendering hits, catching the scheduler up, and mixing a busy bar.

mod renderer;
mod scheduler;
mod voices;

pub use renderer::bench_renderer;
pub use scheduler::bench_scheduler;
pub use voices::bench_voices;
