pub mod backward_pass;
pub mod critical_path;
pub mod forward_pass;

pub use critical_path::{
    CpmError, CpmTimes, CriticalPathAnalysis, CriticalPathAnalyzer, critical_path,
};
pub use forward_pass::{ForwardPass, ForwardPassResult};

use crate::config::EngineConfig;
use crate::graph::GraphBuilder;
use crate::step::Step;
use crate::task::Task;
use chrono::NaiveDateTime;

/// Times the active steps in `steps` from `project_start`, in dependency
/// order. Re-derived on every call.
pub fn compute_task_timing(steps: &[Step], project_start: NaiveDateTime) -> Vec<Task> {
    let config = EngineConfig::default();
    let graph = GraphBuilder::new(steps, &config).build();
    ForwardPass::new(&graph).execute(project_start).tasks
}
