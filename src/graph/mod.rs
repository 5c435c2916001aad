use crate::diagnostics::ScheduleDiagnostic;
use crate::step::{DependencyType, Step};

pub mod builder;
pub mod schedule_dag;

pub use builder::GraphBuilder;

/// An active step ready for timing.
#[derive(Debug, Clone)]
pub struct StepNode<'a> {
    pub step: &'a Step,
    /// Position in the active step list; doubles as the node id.
    pub index: usize,
    pub duration_hours: f64,
    /// In-range predecessor indices, in authoring order.
    pub predecessors: Vec<usize>,
}

/// Result of the depth-first ordering: steps in dependency order plus
/// the links that closed a cycle and were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologicalOrder {
    pub order: Vec<usize>,
    /// `(step, predecessor)` pairs ignored for ordering and timing.
    pub back_edges: Vec<(usize, usize)>,
}

impl TopologicalOrder {
    pub fn is_back_edge(&self, step: usize, predecessor: usize) -> bool {
        self.back_edges.contains(&(step, predecessor))
    }
}

/// Precedence graph over a job's active steps, arena-indexed by position.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    nodes: Vec<StepNode<'a>>,
    diagnostics: Vec<ScheduleDiagnostic>,
}

impl<'a> DependencyGraph<'a> {
    pub(crate) fn from_parts(
        nodes: Vec<StepNode<'a>>,
        diagnostics: Vec<ScheduleDiagnostic>,
    ) -> Self {
        Self { nodes, diagnostics }
    }

    pub fn nodes(&self) -> &[StepNode<'a>] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&StepNode<'a>> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn diagnostics(&self) -> &[ScheduleDiagnostic] {
        &self.diagnostics
    }

    pub fn link_type(&self, index: usize) -> DependencyType {
        self.nodes
            .get(index)
            .map(|node| node.step.dependency_type)
            .unwrap_or_default()
    }

    /// Depth-first post-order over predecessors, starting from each step in
    /// authoring order. A predecessor reached while still on the DFS stack
    /// closes a cycle: that link is recorded as a back edge and skipped, so
    /// the walk always terminates and every step appears exactly once.
    pub fn topological_order(&self) -> TopologicalOrder {
        let count = self.nodes.len();
        let mut visited = vec![false; count];
        let mut on_stack = vec![false; count];
        let mut result = TopologicalOrder::default();

        for root in 0..count {
            if visited[root] {
                continue;
            }
            // Frame: (node, next predecessor slot to look at).
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            on_stack[root] = true;

            while let Some(frame) = stack.last_mut() {
                let (current, slot) = *frame;
                let predecessors = &self.nodes[current].predecessors;
                if slot < predecessors.len() {
                    frame.1 += 1;
                    let predecessor = predecessors[slot];
                    if on_stack[predecessor] {
                        tracing::warn!(
                            step = current + 1,
                            predecessor = predecessor + 1,
                            "circular dependency detected, ignoring link"
                        );
                        result.back_edges.push((current, predecessor));
                    } else if !visited[predecessor] {
                        on_stack[predecessor] = true;
                        stack.push((predecessor, 0));
                    }
                } else {
                    stack.pop();
                    on_stack[current] = false;
                    visited[current] = true;
                    result.order.push(current);
                }
            }
        }
        result
    }
}

/// Dependency order of the active steps in `steps`; indices are positions
/// in the active step list.
pub fn topological_order(steps: &[Step]) -> Vec<usize> {
    let config = crate::config::EngineConfig::default();
    GraphBuilder::new(steps, &config)
        .build()
        .topological_order()
        .order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn graph_of(steps: &[Step]) -> TopologicalOrder {
        let config = EngineConfig::default();
        GraphBuilder::new(steps, &config).build().topological_order()
    }

    #[test]
    fn predecessors_come_first() {
        let steps = vec![
            Step::new("c", 1.0).after([1, 2]),
            Step::new("a", 1.0),
            Step::new("b", 1.0).after([1]),
        ];
        let order = graph_of(&steps);
        assert_eq!(order.order, vec![1, 2, 0]);
        assert!(order.back_edges.is_empty());
    }

    #[test]
    fn self_link_is_a_back_edge() {
        let steps = vec![Step::new("a", 1.0).after([0])];
        let order = graph_of(&steps);
        assert_eq!(order.order, vec![0]);
        assert_eq!(order.back_edges, vec![(0, 0)]);
    }

    #[test]
    fn two_cycle_drops_one_link() {
        let steps = vec![Step::new("a", 1.0).after([1]), Step::new("b", 1.0).after([0])];
        let order = graph_of(&steps);
        assert_eq!(order.order, vec![1, 0]);
        assert_eq!(order.back_edges, vec![(1, 0)]);
        assert!(order.is_back_edge(1, 0));
    }
}
