use crate::calculations::CpmError;
use crate::task::Task;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Task network for critical path analysis. Nodes carry the position of the
/// task in the input slice; edges run predecessor to successor.
pub struct ScheduleDag {
    pub graph: DiGraph<usize, ()>,
    pub step_to_index: HashMap<usize, NodeIndex>,
    /// Whole CPM days per node, keyed by task position.
    pub durations: Vec<f64>,
}

impl ScheduleDag {
    pub fn build(tasks: &[Task], hours_per_day: f64) -> Result<Self, CpmError> {
        if !hours_per_day.is_finite() || hours_per_day <= 0.0 {
            return Err(CpmError::InvalidDayLength(hours_per_day));
        }
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let mut step_to_index: HashMap<usize, NodeIndex> = HashMap::new();
        let mut durations = Vec::with_capacity(tasks.len());

        // Add nodes first
        for (position, task) in tasks.iter().enumerate() {
            if !task.duration_hours.is_finite() || task.duration_hours < 0.0 {
                return Err(CpmError::InvalidDuration {
                    task: task.id.clone(),
                    hours: task.duration_hours,
                });
            }
            let node_ix = graph.add_node(position);
            if step_to_index.insert(task.step_index, node_ix).is_some() {
                return Err(CpmError::DuplicateStep(task.step_index));
            }
            durations.push((task.duration_hours / hours_per_day).ceil());
        }

        // Add edges: pred -> task
        for task in tasks {
            let Some(&v) = step_to_index.get(&task.step_index) else {
                continue;
            };
            for predecessor in &task.predecessors {
                if let Some(&u) = step_to_index.get(predecessor) {
                    graph.add_edge(u, v, ());
                }
            }
        }

        Ok(Self {
            graph,
            step_to_index,
            durations,
        })
    }

    pub fn duration(&self, node_ix: NodeIndex) -> f64 {
        self.durations[self.graph[node_ix]]
    }
}
