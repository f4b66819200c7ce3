use crate::model::FormGraph;
use crate::resolver::{FillPath, NavigationStep, PathOutcome};
use itertools::Itertools;

/// Formats walked paths into human-readable explanations.
pub struct PathFormatter;

impl PathFormatter {
    /// One line per answered question, followed by how the walk ended.
    ///
    /// ```text
    /// [1] Budget? -> "Over 10k" => question 'q-3'
    /// [2] Timeline? -> "This quarter" => end page 'hot-lead' (Talk to sales)
    /// Outcome: end page 'hot-lead' (Talk to sales)
    /// ```
    pub fn format_path(path: &FillPath, graph: &FormGraph) -> String {
        let mut lines: Vec<String> = path
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let question = graph.question(&step.question_id);
                let question_label = question
                    .map(|q| Self::label_or_id(&q.label, &q.id))
                    .unwrap_or(step.question_id.as_str());
                let answer_label = question
                    .and_then(|q| q.answer(&step.answer_id))
                    .map(|a| Self::label_or_id(&a.label, &a.id))
                    .unwrap_or(step.answer_id.as_str());
                format!(
                    "[{}] {} -> \"{}\" => {}",
                    i + 1,
                    question_label,
                    answer_label,
                    Self::format_step(&step.next, graph)
                )
            })
            .collect();

        lines.push(match &path.outcome {
            PathOutcome::Finished(step) => format!("Outcome: {}", Self::format_step(step, graph)),
            PathOutcome::AwaitingAnswer(id) => format!("Outcome: waiting on question '{}'", id),
            PathOutcome::StepLimitReached => "Outcome: step limit reached".to_string(),
        });
        lines.join("\n")
    }

    /// Short route summary such as `q-1 > q-3 > submitted`.
    pub fn format_route(path: &FillPath) -> String {
        let tail = match &path.outcome {
            PathOutcome::Finished(NavigationStep::ToEndPage(id)) => id.clone(),
            PathOutcome::Finished(step) => step.to_string(),
            PathOutcome::AwaitingAnswer(id) => format!("{} (waiting)", id),
            PathOutcome::StepLimitReached => "...".to_string(),
        };
        path.steps
            .iter()
            .map(|s| s.question_id.clone())
            .chain(std::iter::once(tail))
            .join(" > ")
    }

    /// Describes a step, naming the end page when it has a name.
    pub fn format_step(step: &NavigationStep, graph: &FormGraph) -> String {
        match step {
            NavigationStep::ToEndPage(id) => match graph.end_page(id) {
                Some(page) if !page.name.is_empty() => format!("{} ({})", step, page.name),
                _ => step.to_string(),
            },
            _ => step.to_string(),
        }
    }

    fn label_or_id<'a>(label: &'a str, id: &'a str) -> &'a str {
        if label.is_empty() { id } else { label }
    }
}
