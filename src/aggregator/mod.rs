//! Aggregation of call trees into performance metrics and collapsed stacks.
//!
//! This module transforms reconstructed call forests into:
//! - Per-method statistics and ranked views
//! - Slow-call and hotspot detection
//! - Collapsed stack format (for flamegraph generation)

pub mod metrics;
pub mod stack_builder;

// Re-export main types and functions
pub use metrics::{
    analyze, calculate_time_distribution, method_key, MethodStat, PerformanceReport, SlowCall,
    TimeDistribution,
};
pub use stack_builder::{build_collapsed_stacks, CollapsedStack};
