// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pull-based report values and their rendering as a named tree.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::history::ContenderCounters;

/// One retained minute: its bucket key and per-contender counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinuteNode<K> {
    /// Wall-clock minute number this bucket covers.
    pub minute: u64,
    /// Counters per contender, in ascending key order.
    pub contenders: Vec<(K, ContenderCounters)>,
}

/// The rolling-window report: retained minutes plus a `Sum` aggregate over
/// every retained minute and contender.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report<K> {
    /// One node per retained minute that saw at least one write.
    pub minutes: Vec<MinuteNode<K>>,
    /// Aggregate counters across all retained minutes and contenders.
    pub sum: ContenderCounters,
}

/// A generic named tree for external inspection tooling.
///
/// Produced by [`Report::to_tree`]; carries no references back into the
/// inspector, so handing it out cannot mutate retained history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportNode {
    /// Node name.
    pub name: String,
    /// Leaf counters on this node.
    pub properties: Vec<(String, u64)>,
    /// Child nodes.
    pub children: Vec<ReportNode>,
}

impl ReportNode {
    fn named(name: String) -> Self {
        Self {
            name,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Find a property value by name.
    pub fn property(&self, name: &str) -> Option<u64> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

fn counter_properties(counters: &ContenderCounters) -> Vec<(String, u64)> {
    let mut properties = Vec::with_capacity(3);
    properties.push(("num_injected_events".to_string(), counters.injected_events));
    properties.push(("num_won_streams".to_string(), counters.won_streams));
    properties.push(("num_lost_streams".to_string(), counters.lost_streams));
    properties
}

impl<K: Copy + core::fmt::Display> Report<K> {
    /// Render the report as a named tree: one child per retained minute
    /// (each with one child per contender), plus a single `Sum` child.
    pub fn to_tree(&self) -> ReportNode {
        let mut root = ReportNode::named("contests".to_string());
        for minute in &self.minutes {
            let mut node = ReportNode::named(format!("minute_{}", minute.minute));
            for (contender, counters) in &minute.contenders {
                let mut leaf = ReportNode::named(contender.to_string());
                leaf.properties = counter_properties(counters);
                node.children.push(leaf);
            }
            root.children.push(node);
        }
        let mut sum = ReportNode::named("Sum".to_string());
        sum.properties = counter_properties(&self.sum);
        root.children.push(sum);
        root
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualMinute;
    use crate::history::ContestInspector;

    #[test]
    fn tree_has_minute_nodes_and_sum() {
        let clock = ManualMinute::new(42);
        let mut insp: ContestInspector<u32, ManualMinute> = ContestInspector::new(clock.clone());
        insp.on_injected_events(3, 4);
        insp.on_contest_decided(3, true);
        clock.advance(1);
        insp.on_injected_events(9, 6);

        let tree = insp.report().to_tree();
        assert_eq!(tree.name, "contests");

        let minute = tree.child("minute_42").unwrap();
        let contender = minute.child("3").unwrap();
        assert_eq!(contender.property("num_injected_events"), Some(4));
        assert_eq!(contender.property("num_won_streams"), Some(1));
        assert_eq!(contender.property("num_lost_streams"), Some(0));

        let sum = tree.child("Sum").unwrap();
        assert_eq!(sum.property("num_injected_events"), Some(10));
        assert_eq!(sum.property("num_won_streams"), Some(1));
    }

    #[test]
    fn empty_report_renders_sum_only() {
        let insp: ContestInspector<u32, ManualMinute> =
            ContestInspector::new(ManualMinute::new(0));
        let tree = insp.report().to_tree();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "Sum");
        assert_eq!(tree.children[0].property("num_injected_events"), Some(0));
    }
}
