//! Common test utilities for building form graphs and editors.
use bunki::prelude::*;

/// A linear form of `count` questions `q0..`, each with answers `qN-a0` and `qN-a1`.
#[allow(dead_code)]
pub fn linear_form(count: usize) -> FormGraph {
    let questions = (0..count)
        .map(|i| {
            Question::new(format!("q{}", i), format!("Question {}", i)).with_answers(vec![
                Answer::new(format!("q{}-a0", i), "Yes"),
                Answer::new(format!("q{}-a1", i), "No"),
            ])
        })
        .collect();
    FormGraph::from_questions(questions, vec![])
}

/// Q0 -> Q1 -> Q2 in sequence, where Q1's first answer submits to end page `e0`.
#[allow(dead_code)]
pub fn submit_branch_form() -> FormGraph {
    let mut graph = linear_form(3);
    graph.end_pages.push(EndPage::new("e0", "Qualified lead"));
    graph.questions[1].answers[0].logic = Some(LogicAction::submit_to("e0"));
    graph
}

/// An editor with deterministic ids (`q-1`, `a-2`, ...).
#[allow(dead_code)]
pub fn editor_for(graph: FormGraph) -> FormEditor {
    FormEditor::builder(graph)
        .with_id_generator(SequentialIdGenerator::new())
        .build()
}

/// Same as [`editor_for`] but refusing removals that would clear logic.
#[allow(dead_code)]
pub fn rejecting_editor_for(graph: FormGraph) -> FormEditor {
    FormEditor::builder(graph)
        .with_id_generator(SequentialIdGenerator::new())
        .with_dangling_policy(DanglingPolicy::Reject)
        .build()
}

/// A stored form in the graph's own JSON shape.
#[allow(dead_code)]
pub const FORM_JSON: &str = r#"{
    "questions": [
        {
            "id": "budget",
            "order": 0,
            "label": "What is your budget?",
            "answers": [
                { "id": "low", "order": 0, "label": "Under 1k" },
                { "id": "high", "order": 1, "label": "Over 10k",
                  "logic": { "submit_form": { "target_end_page_id": "sales" } } }
            ]
        },
        {
            "id": "role",
            "order": 1,
            "label": "What is your role?",
            "selection": "single",
            "answers": [
                { "id": "student", "order": 0, "label": "Student", "logic": "close_form" },
                { "id": "manager", "order": 1, "label": "Manager" }
            ]
        }
    ],
    "end_pages": [
        { "id": "sales", "name": "Talk to sales", "content": "We will call you." }
    ],
    "start_question_id": "budget"
}"#;
