use crate::model::{FormGraph, LogicAction, Question};
use std::fmt::Write;

/// Formats the routing graph as a human-readable listing for debugging.
pub fn visualize_graph(graph: &FormGraph) -> String {
    let mut output = String::new();
    writeln!(&mut output, "======== FORM GRAPH ========").unwrap();
    writeln!(
        &mut output,
        "Start: {}",
        graph.start_question_id.as_deref().unwrap_or("<none>")
    )
    .unwrap();

    writeln!(&mut output, "\n--- QUESTIONS ---").unwrap();
    for question in &graph.questions {
        writeln!(
            &mut output,
            "{:04}: {} \"{}\"",
            question.order, question.id, question.label
        )
        .unwrap();
        for answer in &question.answers {
            let route = match &answer.logic {
                Some(action) => action.to_string(),
                None => format!("(next) {}", default_next_label(graph, question)),
            };
            writeln!(
                &mut output,
                "      {:02}. {:<20} -> {}",
                answer.order,
                format!("\"{}\"", answer.label),
                route
            )
            .unwrap();
        }
    }

    if !graph.end_pages.is_empty() {
        writeln!(&mut output, "\n--- END PAGES ---").unwrap();
        for page in &graph.end_pages {
            writeln!(&mut output, "{} \"{}\"", page.id, page.name).unwrap();
        }
    }

    writeln!(&mut output, "\n============================").unwrap();
    output
}

/// Renders the routing graph in Graphviz DOT format.
///
/// Default (no-logic) transitions are drawn dashed; every answer with logic
/// gets its own labelled edge.
pub fn to_dot(graph: &FormGraph) -> String {
    let mut output = String::new();
    writeln!(&mut output, "digraph form {{").unwrap();
    writeln!(&mut output, "  rankdir=TB;").unwrap();
    writeln!(&mut output, "  \"__submitted\" [label=\"Submitted\", shape=doublecircle];").unwrap();
    writeln!(&mut output, "  \"__closed\" [label=\"Closed\", shape=octagon];").unwrap();

    if let Some(start) = &graph.start_question_id {
        writeln!(&mut output, "  \"__start\" [shape=point];").unwrap();
        writeln!(&mut output, "  \"__start\" -> \"{}\";", escape(start)).unwrap();
    }
    for page in &graph.end_pages {
        writeln!(
            &mut output,
            "  \"{}\" [label=\"{}\", shape=doubleoctagon];",
            escape(&page.id),
            escape(&page.name)
        )
        .unwrap();
    }

    for question in &graph.questions {
        writeln!(
            &mut output,
            "  \"{}\" [label=\"{}\", shape=box];",
            escape(&question.id),
            escape(if question.label.is_empty() { &question.id } else { &question.label })
        )
        .unwrap();

        let falls_through =
            question.answers.is_empty() || question.answers.iter().any(|a| a.logic.is_none());
        if falls_through {
            let next = default_next(graph, question).map_or("__submitted", |q| q.id.as_str());
            writeln!(
                &mut output,
                "  \"{}\" -> \"{}\" [style=dashed];",
                escape(&question.id),
                escape(next)
            )
            .unwrap();
        }

        for answer in &question.answers {
            let target = match &answer.logic {
                Some(LogicAction::GoToQuestion { target_question_id }) => target_question_id.as_str(),
                Some(LogicAction::SubmitForm { target_end_page_id }) => target_end_page_id.as_str(),
                Some(LogicAction::CloseForm) => "__closed",
                None => continue,
            };
            writeln!(
                &mut output,
                "  \"{}\" -> \"{}\" [label=\"{}\"];",
                escape(&question.id),
                escape(target),
                escape(&answer.label)
            )
            .unwrap();
        }
    }

    writeln!(&mut output, "}}").unwrap();
    output
}

fn default_next<'a>(graph: &'a FormGraph, question: &Question) -> Option<&'a Question> {
    question
        .order
        .checked_add(1)
        .and_then(|order| graph.question_at_order(order))
}

fn default_next_label(graph: &FormGraph, question: &Question) -> String {
    match default_next(graph, question) {
        Some(next) => format!("question '{}'", next.id),
        None => "submitted".to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
