//! Real-world scenario benchmarks.
//!
//! Complete note graphs as the planner builds them, the drum kit, and the
//! engine rendering a busy song block by block.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
