//! Result reports.

use std::fmt::Write as _;

use serde::Serialize;

/// Outcome of one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Requested number of clusters.
    pub clusters: usize,
    /// Number of input vectors.
    pub objects: usize,
    pub blending: f64,
    /// Number of refinement rounds performed.
    pub iterations: usize,
    /// Cluster index of each input vector, in input order.
    pub assignment: Vec<usize>,
}

impl Report {
    /// Renders the plain-text report: a header with the run parameters,
    /// then one line per cluster listing its members as index ranges.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Number of clusters: {}", self.clusters);
        let _ = writeln!(out, "Number of objects: {}", self.objects);
        let _ = writeln!(out, "Blending: {:.6}", self.blending);
        let _ = writeln!(out, "Number of performed iterations: {}", self.iterations);
        out.push('\n');

        for (i, members) in self.members().iter().enumerate() {
            let _ = writeln!(out, "Cluster {i}: {}", format_ranges(members));
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Object indices of every cluster, ascending.
    fn members(&self) -> Vec<Vec<usize>> {
        let buckets = self
            .clusters
            .max(self.assignment.iter().map(|&c| c + 1).max().unwrap_or(0));
        let mut members = vec![Vec::new(); buckets];
        for (object, &cluster) in self.assignment.iter().enumerate() {
            members[cluster].push(object);
        }
        members
    }
}

/// Formats ascending indices, collapsing consecutive runs:
/// `[0, 1, 2, 5, 7, 8]` -> `"0 - 2, 5, 7 - 8"`.
fn format_ranges(sorted: &[usize]) -> String {
    let mut parts = Vec::new();
    let mut iter = sorted.iter().copied();
    let Some(mut first) = iter.next() else {
        return String::new();
    };
    let mut last = first;
    for x in iter {
        if x == last + 1 {
            last = x;
            continue;
        }
        parts.push(range(first, last));
        first = x;
        last = x;
    }
    parts.push(range(first, last));
    parts.join(", ")
}

fn range(first: usize, last: usize) -> String {
    if first == last {
        first.to_string()
    } else {
        format!("{first} - {last}")
    }
}
