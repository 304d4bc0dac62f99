//! Rank assignment for flowchart layout.
//!
//! Nodes are grouped into ranks by BFS from the roots (nodes with no
//! incoming edge). Each edge pushes its target at least one rank below its
//! source. Nodes unreachable from any root (cycles) are appended in
//! declaration order after the reachable ranks.

use std::collections::VecDeque;

use super::parser::Flowchart;

/// Node indices grouped by rank, in render order.
pub fn ranks(flow: &Flowchart) -> Vec<Vec<usize>> {
    let n = flow.nodes.len();
    let mut incoming = vec![0usize; n];
    for edge in &flow.edges {
        if edge.from != edge.to {
            incoming[edge.to] += 1;
        }
    }

    let mut rank = vec![usize::MAX; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| incoming[i] == 0).collect();
    for &root in &queue {
        rank[root] = 0;
    }

    // Longest-path ranking: a node settles at one below its deepest parent.
    while let Some(node) = queue.pop_front() {
        for edge in &flow.edges {
            if edge.from != node || edge.to == node {
                continue;
            }
            // The `candidate <= n` bound keeps cycles from re-ranking forever.
            let candidate = rank[node].saturating_add(1);
            if candidate <= n && (rank[edge.to] == usize::MAX || rank[edge.to] < candidate) {
                rank[edge.to] = candidate;
                queue.push_back(edge.to);
            }
        }
    }

    let max_rank = rank.iter().filter(|&&r| r != usize::MAX).max().copied();
    let mut grouped: Vec<Vec<usize>> = Vec::new();
    if let Some(max_rank) = max_rank {
        grouped.resize(max_rank + 1, Vec::new());
        for (node, &r) in rank.iter().enumerate() {
            if r != usize::MAX {
                grouped[r].push(node);
            }
        }
    }

    // Cycle members never reached rank 0; give them trailing ranks.
    let unreached: Vec<usize> = (0..n).filter(|&i| rank[i] == usize::MAX).collect();
    for node in unreached {
        grouped.push(vec![node]);
    }

    grouped
}
