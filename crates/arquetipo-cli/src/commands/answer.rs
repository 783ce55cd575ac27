use clap::Subcommand;

use arquetipo_core::BlockAnswer;

#[derive(Subcommand)]
pub enum AnswerAction {
    /// Record the answer for a block (overwrites any previous answer)
    Set {
        /// Block id, 1-based
        #[arg(long)]
        block: u32,
        /// Selected option id (single-choice mode)
        #[arg(long, conflicts_with_all = ["most", "least"])]
        select: Option<String>,
        /// Most-identified option id (forced-rank mode)
        #[arg(long, requires = "least")]
        most: Option<String>,
        /// Least-identified option id (forced-rank mode)
        #[arg(long, requires = "most")]
        least: Option<String>,
    },
    /// Print the stored answer for a block
    Show {
        #[arg(long)]
        block: u32,
    },
    /// Print every stored answer and the completion count
    List,
}

pub fn run(action: AnswerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = super::open_session()?;

    match action {
        AnswerAction::Set {
            block,
            select,
            most,
            least,
        } => {
            let answer = match (select, most, least) {
                (Some(option_id), None, None) => BlockAnswer::Single { option_id },
                (None, Some(most_id), Some(least_id)) => BlockAnswer::Ranked { most_id, least_id },
                _ => {
                    return Err("provide either --select, or --most with --least".into());
                }
            };
            let event = session.submit_answer(block, answer)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        AnswerAction::Show { block } => match session.ledger().answer(block) {
            Some(answer) => println!("{}", serde_json::to_string_pretty(answer)?),
            None => {
                eprintln!("no answer for block {block}");
                std::process::exit(1);
            }
        },
        AnswerAction::List => {
            let answers: Vec<serde_json::Value> = session
                .ledger()
                .iter()
                .map(|(block_id, answer)| {
                    serde_json::json!({
                        "block_id": block_id,
                        "answer": answer,
                        "complete": answer.is_complete(),
                    })
                })
                .collect();
            let summary = serde_json::json!({
                "answers": answers,
                "completed": session.ledger().completed_count(),
                "total": session.catalog().len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
