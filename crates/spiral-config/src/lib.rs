//! Process-level configuration shared by SpiralTorch command line tools.

pub mod determinism;
pub mod tracing;
