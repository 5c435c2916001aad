use super::{DependencyGraph, StepNode};
use crate::config::EngineConfig;
use crate::diagnostics::ScheduleDiagnostic;
use crate::step::Step;

/// Builds a [`DependencyGraph`] from a job's step list.
///
/// Empty-text steps are dropped first; every index in the result refers to
/// the filtered list. Links that point outside it are dropped with a
/// diagnostic, duplicates collapse to one.
pub struct GraphBuilder<'a> {
    steps: &'a [Step],
    config: &'a EngineConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(steps: &'a [Step], config: &'a EngineConfig) -> Self {
        Self { steps, config }
    }

    pub fn build(&self) -> DependencyGraph<'a> {
        let active: Vec<&'a Step> = self.steps.iter().filter(|s| s.is_active()).collect();
        let count = active.len();
        let floor = self.config.min_step_duration_hours;
        let mut diagnostics = Vec::new();

        let nodes = active
            .into_iter()
            .enumerate()
            .map(|(index, step)| {
                let duration_hours = step.effective_duration(floor);
                if !step.duration.is_finite() || step.duration < floor {
                    tracing::debug!(
                        step = index + 1,
                        given = step.duration,
                        applied = duration_hours,
                        "step duration clamped"
                    );
                    diagnostics.push(ScheduleDiagnostic::DurationClamped {
                        step: index,
                        given: step.duration,
                        applied: duration_hours,
                    });
                }

                let mut predecessors = Vec::with_capacity(step.dependencies.len());
                for &predecessor in &step.dependencies {
                    if predecessor >= count {
                        tracing::debug!(
                            step = index + 1,
                            predecessor,
                            "dependency on unknown step ignored"
                        );
                        diagnostics.push(ScheduleDiagnostic::DanglingDependency {
                            step: index,
                            predecessor,
                        });
                        continue;
                    }
                    if !predecessors.contains(&predecessor) {
                        predecessors.push(predecessor);
                    }
                }

                StepNode {
                    step,
                    index,
                    duration_hours,
                    predecessors,
                }
            })
            .collect();

        DependencyGraph::from_parts(nodes, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_steps_are_filtered_before_indexing() {
        let steps = vec![
            Step::new("dig", 2.0),
            Step::new("   ", 5.0),
            Step::new("pour", 3.0).after([0]),
        ];
        let config = EngineConfig::default();
        let graph = GraphBuilder::new(&steps, &config).build();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes()[1].step.text, "pour");
        assert_eq!(graph.nodes()[1].predecessors, vec![0]);
    }

    #[test]
    fn out_of_range_links_are_reported() {
        let steps = vec![Step::new("a", 1.0), Step::new("b", 1.0).after([0, 4])];
        let config = EngineConfig::default();
        let graph = GraphBuilder::new(&steps, &config).build();
        assert_eq!(graph.nodes()[1].predecessors, vec![0]);
        assert_eq!(
            graph.diagnostics(),
            &[ScheduleDiagnostic::DanglingDependency {
                step: 1,
                predecessor: 4
            }]
        );
    }

    #[test]
    fn short_durations_are_raised_to_the_floor() {
        let steps = vec![Step::new("a", 0.0), Step::new("b", f64::NAN)];
        let config = EngineConfig::default();
        let graph = GraphBuilder::new(&steps, &config).build();
        assert_eq!(graph.nodes()[0].duration_hours, 0.25);
        assert_eq!(graph.nodes()[1].duration_hours, 0.25);
        assert_eq!(graph.diagnostics().len(), 2);
    }
}
