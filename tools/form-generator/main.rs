use bunki::prelude::*;
use clap::Parser;
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;

/// A CLI tool to generate random branching forms for fixtures and manual testing
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_form.json")]
    output: String,

    /// Number of questions to generate
    #[arg(short, long, default_value_t = 8)]
    questions: usize,

    /// The maximum number of answers per question
    #[arg(long, default_value_t = 4)]
    max_answers: usize,

    /// Number of end pages to generate
    #[arg(long, default_value_t = 2)]
    end_pages: usize,

    /// Probability (0.0 - 1.0) that an answer receives logic
    #[arg(long, default_value_t = 0.35)]
    logic_ratio: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.max_answers == 0 {
        eprintln!("Error: --max-answers must be at least 1");
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&cli.logic_ratio) {
        eprintln!(
            "Error: --logic-ratio ({}) must be between 0.0 and 1.0",
            cli.logic_ratio
        );
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let id_seed = rng.random();

    println!(
        "Generating form ({} questions, up to {} answers each, {} end pages)...",
        cli.questions, cli.max_answers, cli.end_pages
    );

    let mut editor = FormEditor::builder(FormGraph::new())
        .with_id_generator(RandomIdGenerator::seeded(id_seed).with_length(6))
        .build();

    let end_pages = (0..cli.end_pages)
        .map(|i| editor.add_end_page(format!("Outcome {}", i + 1), None))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    println!("-> Generated {} end page(s).", end_pages.len());

    let mut questions = Vec::with_capacity(cli.questions);
    for i in 0..cli.questions {
        let inserted = editor.insert_question(None)?;
        editor.rename_question(&inserted.question_id, format!("Question {}", i + 1))?;
        editor.rename_answer(&inserted.question_id, &inserted.answer_id, "Option 1")?;

        let answer_count = rng.random_range(1..=cli.max_answers);
        for n in 1..answer_count {
            let answer_id = editor.insert_answer(&inserted.question_id, None)?;
            editor.rename_answer(&inserted.question_id, &answer_id, format!("Option {}", n + 1))?;
        }
        questions.push(inserted.question_id);
    }
    println!("-> Generated {} question(s).", questions.len());

    let mut with_logic = 0;
    for question_id in &questions {
        let answer_ids: Vec<AnswerId> = editor
            .graph()
            .question(question_id)
            .map(|q| q.answers.iter().map(|a| a.id.clone()).collect())
            .unwrap_or_default();
        for answer_id in answer_ids {
            if !rng.random_bool(cli.logic_ratio) {
                continue;
            }
            if let Some(action) = random_action(&mut rng, question_id, &questions, &end_pages) {
                editor.set_answer_logic(question_id, &answer_id, Some(action))?;
                with_logic += 1;
            }
        }
    }
    println!("-> Attached logic to {} answer(s).", with_logic);

    let report = validate(editor.graph());
    if !report.is_clean() {
        println!(
            "-> Note: generated form has findings ({} unreachable question(s)).",
            report.unreachable_questions.len()
        );
    }

    let json_output = serde_json::to_string_pretty(editor.graph())?;
    fs::write(&cli.output, json_output)?;

    println!("Successfully generated and saved form to '{}'", cli.output);

    Ok(())
}

/// Picks a logic action whose target exists and is not the answer's own question.
fn random_action(
    rng: &mut StdRng,
    question_id: &str,
    questions: &[QuestionId],
    end_pages: &[EndPageId],
) -> Option<LogicAction> {
    match rng.random_range(0..10) {
        0 => Some(LogicAction::CloseForm),
        1..=3 if !end_pages.is_empty() => {
            let page = &end_pages[rng.random_range(0..end_pages.len())];
            Some(LogicAction::submit_to(page.as_str()))
        }
        _ => {
            let candidates: Vec<&QuestionId> =
                questions.iter().filter(|q| q.as_str() != question_id).collect();
            if candidates.is_empty() {
                return None;
            }
            let target = candidates[rng.random_range(0..candidates.len())];
            Some(LogicAction::go_to(target.as_str()))
        }
    }
}
