//! Diagnostic counters for one iterative-deepening depth.

use std::fmt;

/// Node counts gathered while searching one depth. No search decision reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Main-search nodes.
    pub nodes: u64,
    /// Nodes with no legal moves while in check.
    pub mate_nodes: u64,
    /// Stalemates and repetitions.
    pub draw_nodes: u64,
    /// Nodes handed to quiescence.
    pub leaf_nodes: u64,
    /// Nodes whose score landed inside the window.
    pub pv_nodes: u64,
    /// Nodes that failed high.
    pub cut_nodes: u64,
    /// Nodes that failed low.
    pub all_nodes: u64,
    /// Null-window probes that had to be re-searched with the full window.
    pub researches: u64,
    /// Main-search nodes per ply from the root.
    pub nodes_by_ply: Vec<u64>,

    /// Quiescence nodes.
    pub qnodes: u64,
    /// Quiescence nodes cut by stand-pat.
    pub qstand_pat_nodes: u64,
    /// Quiescence nodes cut by a capture.
    pub qcut_nodes: u64,
    /// Quiescence nodes answered from the quiescence table.
    pub qtt_hits: u64,
    /// Quiescence nodes per ply below the leaf. The last slot counts moves
    /// scored statically at the ply cap.
    pub qnodes_by_ply: Vec<u64>,
}

impl SearchStats {
    /// Zeroed counters sized for `depth` plies and `max_qply` quiescence plies.
    pub fn new(depth: u32, max_qply: usize) -> Self {
        Self {
            nodes_by_ply: vec![0; depth as usize + 1],
            qnodes_by_ply: vec![0; max_qply + 1],
            ..Self::default()
        }
    }

    pub(crate) fn record_node(&mut self, ply: usize) {
        self.nodes += 1;
        bump(&mut self.nodes_by_ply, ply);
    }

    pub(crate) fn record_qnode(&mut self, ply: usize) {
        self.qnodes += 1;
        bump(&mut self.qnodes_by_ply, ply);
    }

    pub(crate) fn record_qhorizon(&mut self) {
        if let Some(last) = self.qnodes_by_ply.last_mut() {
            *last += 1;
        }
    }
}

fn bump(counts: &mut Vec<u64>, ply: usize) {
    if counts.len() <= ply {
        counts.resize(ply + 1, 0);
    }
    counts[ply] += 1;
}

fn join(counts: &[u64]) -> String {
    counts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "nodes {} mates {} draws {} leaves {} pvs {} cuts {} alls {} researches {} by ply: {}",
            self.nodes,
            self.mate_nodes,
            self.draw_nodes,
            self.leaf_nodes,
            self.pv_nodes,
            self.cut_nodes,
            self.all_nodes,
            self.researches,
            join(&self.nodes_by_ply),
        )?;
        write!(
            f,
            "qnodes {} qpats {} qcuts {} qtt hits {} by ply: {}",
            self.qnodes,
            self.qstand_pat_nodes,
            self.qcut_nodes,
            self.qtt_hits,
            join(&self.qnodes_by_ply),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sizes_per_ply_vectors() {
        let stats = SearchStats::new(3, 24);
        assert_eq!(stats.nodes_by_ply.len(), 4);
        assert_eq!(stats.qnodes_by_ply.len(), 25);
        assert_eq!(stats.nodes + stats.qnodes, 0);
    }

    #[test]
    fn record_grows_when_needed() {
        let mut stats = SearchStats::new(1, 0);
        stats.record_node(0);
        stats.record_node(3);
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.nodes_by_ply, vec![1, 0, 0, 1]);
    }

    #[test]
    fn horizon_counts_in_last_slot() {
        let mut stats = SearchStats::new(1, 2);
        stats.record_qhorizon();
        assert_eq!(stats.qnodes_by_ply, vec![0, 0, 1]);
        assert_eq!(stats.qnodes, 0);
    }
}
