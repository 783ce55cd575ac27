use clap::Subcommand;

use arquetipo_core::storage::Database;

#[derive(Subcommand)]
pub enum ResultsAction {
    /// Record the final consent checked before computing results
    Consent {
        /// Whether consent is granted
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        granted: bool,
    },
    /// Compute the results (requires every block answered and, when
    /// configured, the final consent) and jump to the results step
    Compute,
    /// Print the stored result record
    Show,
    /// List past completed assessments
    History {
        /// Maximum rows to print
        #[arg(long, default_value = "20")]
        limit: u32,
    },
}

pub fn run(action: ResultsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ResultsAction::Consent { granted } => {
            let mut session = super::open_session()?;
            let event = session.set_final_consent(granted)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        ResultsAction::Compute => {
            let mut session = super::open_session()?;
            session.jump_to(session.total_steps())?;

            let record = session
                .last_result()
                .ok_or("results missing after computation")?;
            if let Some(respondent) = session.respondent() {
                let db = Database::open()?;
                db.record_submission(
                    &respondent.name,
                    &respondent.email,
                    record.predominant,
                    record.computed_at,
                )?;
            }
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        ResultsAction::Show => {
            let session = super::open_session()?;
            match session.last_result() {
                Some(record) => println!("{}", serde_json::to_string_pretty(record)?),
                None => {
                    eprintln!("no results computed yet");
                    std::process::exit(1);
                }
            }
        }
        ResultsAction::History { limit } => {
            let db = Database::open()?;
            let rows = db.submissions(limit)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
