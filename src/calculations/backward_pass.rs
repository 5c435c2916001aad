use crate::graph::schedule_dag::ScheduleDag;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Late start/finish of every node, in CPM days.
pub struct BackwardPass<'a> {
    dag: &'a ScheduleDag,
}

impl<'a> BackwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag) -> Self {
        Self { dag }
    }

    /// `order` is a topological order of the DAG; `project_finish` is the
    /// latest early finish over terminal nodes.
    pub fn execute(
        &self,
        order: &[NodeIndex],
        project_finish: f64,
    ) -> HashMap<NodeIndex, (f64, f64)> {
        let mut late: HashMap<NodeIndex, (f64, f64)> = HashMap::new();

        for &node_ix in order.iter().rev() {
            // Determine allowed late finish from successors' late starts
            let lf = self
                .dag
                .graph
                .neighbors_directed(node_ix, Direction::Outgoing)
                .filter_map(|succ_ix| late.get(&succ_ix).map(|&(ls, _)| ls))
                .fold(None, |min: Option<f64>, ls| {
                    Some(min.map_or(ls, |m| m.min(ls)))
                })
                .unwrap_or(project_finish);

            let ls = lf - self.dag.duration(node_ix);
            late.insert(node_ix, (ls, lf));
        }
        late
    }
}
