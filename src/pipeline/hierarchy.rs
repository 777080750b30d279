//! Region → Category → Sub-Category sales tree (for treemap-style views).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{AggregateRow, Amount, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub name: String,
    /// Sum of all leaf sales under this node.
    pub total: Amount,
    /// Children ordered by name; empty for sub-category leaves.
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Re-sum the leaves below this node.
    pub fn leaf_total(&self) -> Amount {
        if self.children.is_empty() {
            self.total
        } else {
            self.children.iter().map(HierarchyNode::leaf_total).sum()
        }
    }

    /// Depth-first `(path, total)` pairs, e.g. `("South/Furniture/Chairs", 100)`.
    pub fn paths(&self) -> Vec<(String, Amount)> {
        let mut out = vec![(self.name.clone(), self.total)];
        for child in &self.children {
            for (path, total) in child.paths() {
                out.push((format!("{}/{path}", self.name), total));
            }
        }
        out
    }
}

type Tree<'a> = BTreeMap<&'a str, BTreeMap<&'a str, BTreeMap<&'a str, Amount>>>;

pub fn hierarchy(records: &[Record]) -> Vec<HierarchyNode> {
    let mut tree: Tree<'_> = BTreeMap::new();
    for r in records {
        *tree
            .entry(r.region.as_str())
            .or_default()
            .entry(r.category.as_str())
            .or_default()
            .entry(r.sub_category.as_str())
            .or_default() += r.sales;
    }

    tree.into_iter()
        .map(|(region, categories)| {
            let children: Vec<HierarchyNode> = categories
                .into_iter()
                .map(|(category, subs)| {
                    let leaves: Vec<HierarchyNode> = subs
                        .into_iter()
                        .map(|(sub, total)| node(sub, total, Vec::new()))
                        .collect();
                    node(category, sum_totals(&leaves), leaves)
                })
                .collect();
            node(region, sum_totals(&children), children)
        })
        .collect()
}

/// Leaves re-aggregated by top-level node, shaped like a Region aggregate.
pub fn rollup(roots: &[HierarchyNode]) -> Vec<AggregateRow> {
    roots
        .iter()
        .map(|n| AggregateRow {
            key: n.name.clone(),
            value: n.leaf_total(),
        })
        .collect()
}

fn node(name: &str, total: Amount, children: Vec<HierarchyNode>) -> HierarchyNode {
    HierarchyNode {
        name: name.to_string(),
        total,
        children,
    }
}

fn sum_totals(nodes: &[HierarchyNode]) -> Amount {
    nodes.iter().map(|n| n.total).sum()
}
