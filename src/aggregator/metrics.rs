//! Calculate per-method performance statistics from a call forest.
//!
//! Methods are grouped by `Class#method`. The report ranks them by total
//! time, average time and call count, and lists the slowest single calls.
//! These are the primary targets for optimization.

use crate::tree::{CallForest, CallNode, NodeId};
use crate::utils::config::{
    HIGH_VARIANCE_FACTOR, HOTSPOT_FRACTION, SCHEMA_VERSION, TOP_METHODS, TOP_SLOW_CALLS,
    UNKNOWN_CLASS,
};
use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated timing of every call sharing a `Class#method` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodStat {
    /// `Class#method`, with `Unknown` standing in for a missing class
    pub key: String,

    pub defined_class: String,

    pub method_name: String,

    /// Seconds summed over all calls
    pub total_time: f64,

    pub call_count: usize,

    pub average_time: f64,

    pub max_time: f64,

    pub min_time: f64,

    /// Contributing nodes in encounter order
    pub call_ids: Vec<NodeId>,
}

impl MethodStat {
    fn new(key: String, node: &CallNode, duration: f64) -> Self {
        Self {
            key,
            defined_class: node
                .defined_class
                .clone()
                .unwrap_or_else(|| UNKNOWN_CLASS.to_string()),
            method_name: node.method_name.clone(),
            total_time: duration,
            call_count: 1,
            average_time: duration,
            max_time: duration,
            min_time: duration,
            call_ids: vec![node.id],
        }
    }

    fn record(&mut self, id: NodeId, duration: f64) {
        self.total_time += duration;
        self.call_count += 1;
        self.average_time = self.total_time / self.call_count as f64;
        self.max_time = self.max_time.max(duration);
        self.min_time = self.min_time.min(duration);
        self.call_ids.push(id);
    }

    /// Slowest call took more than twice the average
    pub fn has_high_variance(&self) -> bool {
        self.max_time > HIGH_VARIANCE_FACTOR * self.average_time
    }

    /// First recorded call, used to jump to an example in the tree
    pub fn example(&self) -> Option<NodeId> {
        self.call_ids.first().copied()
    }
}

/// A single slow invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowCall {
    pub id: NodeId,

    pub key: String,

    pub depth: u32,

    pub duration: f64,

    /// Duration exceeds the hotspot share of total time
    pub hotspot: bool,
}

/// Complete performance analysis of one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub version: String,

    pub by_total_time: Vec<MethodStat>,

    pub by_average_time: Vec<MethodStat>,

    pub by_call_count: Vec<MethodStat>,

    pub slow_calls: Vec<SlowCall>,

    /// Sum of durations over every node, absent counted as zero
    pub total_time: f64,

    /// Number of nodes in the forest
    pub total_calls: usize,

    /// Every method group before ranking, in encounter order
    pub methods: Vec<MethodStat>,

    pub generated_at: String,
}

impl PerformanceReport {
    /// Duration exceeds the hotspot share of total recorded time
    pub fn is_hotspot(&self, duration: f64) -> bool {
        is_hotspot(duration, self.total_time)
    }

    pub fn method(&self, key: &str) -> Option<&MethodStat> {
        self.methods.iter().find(|m| m.key == key)
    }
}

fn is_hotspot(duration: f64, total_time: f64) -> bool {
    duration > total_time * HOTSPOT_FRACTION
}

/// Grouping key for a node
pub fn method_key(node: &CallNode) -> String {
    format!(
        "{}#{}",
        node.defined_class.as_deref().unwrap_or(UNKNOWN_CLASS),
        node.method_name
    )
}

/// Analyze every node of the forest
///
/// **Public** - main entry point for metrics calculation
///
/// Expansion and search state never apply here: the whole tree is analyzed.
pub fn analyze(forest: &CallForest) -> PerformanceReport {
    let mut methods: Vec<MethodStat> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut timed: Vec<(&CallNode, f64)> = Vec::new();
    let mut total_time = 0.0;
    let mut total_calls = 0usize;

    for node in forest.preorder() {
        total_calls += 1;
        total_time += node.duration_or_zero();

        let duration = match node.duration {
            Some(d) if d > 0.0 => d,
            _ => continue,
        };
        timed.push((node, duration));

        let key = method_key(node);
        match index.get(&key) {
            Some(&slot) => methods[slot].record(node.id, duration),
            None => {
                index.insert(key.clone(), methods.len());
                methods.push(MethodStat::new(key, node, duration));
            }
        }
    }

    debug!(
        "Analyzed {} calls into {} method groups ({} timed)",
        total_calls,
        methods.len(),
        timed.len()
    );

    // Vec::sort_by is stable: ties keep encounter order
    let by_total_time = top_by(&methods, |a, b| b.total_time.total_cmp(&a.total_time));
    let by_average_time = top_by(&methods, |a, b| b.average_time.total_cmp(&a.average_time));
    let by_call_count = top_by(&methods, |a, b| b.call_count.cmp(&a.call_count));

    timed.sort_by(|a, b| b.1.total_cmp(&a.1));
    let slow_calls = timed
        .into_iter()
        .take(TOP_SLOW_CALLS)
        .map(|(node, duration)| SlowCall {
            id: node.id,
            key: method_key(node),
            depth: node.depth,
            duration,
            hotspot: is_hotspot(duration, total_time),
        })
        .collect();

    PerformanceReport {
        version: SCHEMA_VERSION.to_string(),
        by_total_time,
        by_average_time,
        by_call_count,
        slow_calls,
        total_time,
        total_calls,
        methods,
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Stable-sort a copy of the groups and keep the top entries
///
/// **Private** - internal ranking helper
fn top_by<F>(methods: &[MethodStat], compare: F) -> Vec<MethodStat>
where
    F: FnMut(&MethodStat, &MethodStat) -> std::cmp::Ordering,
{
    let mut ranked = methods.to_vec();
    ranked.sort_by(compare);
    ranked.truncate(TOP_METHODS);
    ranked
}

/// Summary statistics over the method groups
#[derive(Debug, Clone, Default)]
pub struct TimeDistribution {
    /// Number of method groups
    pub method_count: usize,

    /// Mean total time per method
    pub mean_time_per_method: f64,

    /// Median total time per method
    pub median_time_per_method: f64,

    /// Share of total time spent in the top 10% of methods
    pub top_10_percent_percentage: f64,
}

impl TimeDistribution {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Methods: {} | Mean: {:.6}s | Median: {:.6}s | Top 10%: {:.1}%",
            self.method_count,
            self.mean_time_per_method,
            self.median_time_per_method,
            self.top_10_percent_percentage
        )
    }
}

/// Calculate how concentrated time is across method groups
pub fn calculate_time_distribution(report: &PerformanceReport) -> TimeDistribution {
    let methods = &report.methods;
    if methods.is_empty() {
        return TimeDistribution::default();
    }

    let count = methods.len();
    let total: f64 = methods.iter().map(|m| m.total_time).sum();

    let mut times: Vec<f64> = methods.iter().map(|m| m.total_time).collect();
    times.sort_by(|a, b| b.total_cmp(a));

    let top_count = (count as f64 * 0.1).ceil() as usize;
    let top_time: f64 = times.iter().take(top_count).sum();

    TimeDistribution {
        method_count: count,
        mean_time_per_method: total / count as f64,
        median_time_per_method: times[count / 2],
        top_10_percent_percentage: if total > 0.0 {
            top_time / total * 100.0
        } else {
            0.0
        },
    }
}
