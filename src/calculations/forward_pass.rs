use crate::diagnostics::ScheduleDiagnostic;
use crate::graph::{DependencyGraph, TopologicalOrder};
use crate::step::{DependencyType, Step};
use crate::task::{Task, hours, shift};
use chrono::NaiveDateTime;

/// Hour-precision timing of every active step.
pub struct ForwardPass<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
}

#[derive(Debug, Clone)]
pub struct ForwardPassResult {
    /// Timed tasks in dependency order.
    pub tasks: Vec<Task>,
    pub order: TopologicalOrder,
    /// Links and ends that fell outside the representable calendar.
    pub overflows: Vec<ScheduleDiagnostic>,
}

impl ForwardPassResult {
    /// One diagnostic per link dropped to break a cycle, then any
    /// calendar overflows.
    pub fn diagnostics(&self) -> Vec<ScheduleDiagnostic> {
        self.order
            .back_edges
            .iter()
            .map(|&(step, predecessor)| ScheduleDiagnostic::CyclicDependency { step, predecessor })
            .chain(self.overflows.iter().cloned())
            .collect()
    }
}

impl<'g, 'a> ForwardPass<'g, 'a> {
    pub fn new(graph: &'g DependencyGraph<'a>) -> Self {
        Self { graph }
    }

    /// Start of a step is the latest of its link anchors shifted by its
    /// lead/lag, never before `project_start`; end is start plus duration.
    pub fn execute(&self, project_start: NaiveDateTime) -> ForwardPassResult {
        let order = self.graph.topological_order();
        let mut timed: Vec<Option<(NaiveDateTime, NaiveDateTime)>> = vec![None; self.graph.len()];
        let mut tasks = Vec::with_capacity(order.order.len());
        let mut overflows = Vec::new();

        for &index in &order.order {
            let Some(node) = self.graph.node(index) else {
                continue;
            };
            let duration = hours(node.duration_hours);
            let lag = hours(node.step.effective_lead_lag());

            let mut start = project_start;
            let mut constrained_by = Vec::with_capacity(node.predecessors.len());
            for &predecessor in &node.predecessors {
                if order.is_back_edge(index, predecessor) {
                    continue;
                }
                let Some((pred_start, pred_end)) = timed[predecessor] else {
                    continue;
                };
                let base = match node.step.dependency_type {
                    DependencyType::FS => Some(pred_end),
                    DependencyType::SS => Some(pred_start),
                    DependencyType::FF => pred_end.checked_sub_signed(duration),
                    DependencyType::SF => pred_start.checked_sub_signed(duration),
                };
                let Some(anchor) = base.and_then(|base| shift(base, lag)) else {
                    tracing::warn!(
                        step = index + 1,
                        predecessor = predecessor + 1,
                        "link anchor outside calendar range, ignoring link"
                    );
                    overflows.push(ScheduleDiagnostic::LinkOutOfRange {
                        step: index,
                        predecessor,
                    });
                    continue;
                };
                constrained_by.push(predecessor);
                if anchor > start {
                    start = anchor;
                }
            }

            let end = shift(start, duration).unwrap_or_else(|| {
                tracing::warn!(
                    step = index + 1,
                    hours = node.duration_hours,
                    "step end outside calendar range, capping"
                );
                overflows.push(ScheduleDiagnostic::EndOutOfRange {
                    step: index,
                    duration_hours: node.duration_hours,
                });
                NaiveDateTime::MAX
            });
            timed[index] = Some((start, end));
            tasks.push(build_task(node.step, index, start, end, node.duration_hours, constrained_by));
        }

        ForwardPassResult {
            tasks,
            order,
            overflows,
        }
    }
}

fn build_task(
    step: &Step,
    index: usize,
    start: NaiveDateTime,
    end: NaiveDateTime,
    duration_hours: f64,
    predecessors: Vec<usize>,
) -> Task {
    let id = match step.id.as_deref() {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => Task::default_id(index),
    };
    let mut task = Task::new(id, index, start, duration_hours).with_predecessors(predecessors);
    task.name = step.text.clone();
    task.end = end;
    task.completed = step.completed;
    task.priority = step.priority;
    task.is_parallel = step.is_parallel;
    task.dependency_type = step.dependency_type;
    task.lead_lag = step.effective_lead_lag();
    task
}
