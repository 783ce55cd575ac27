use clap::Subcommand;

use arquetipo_core::respondent::format_whatsapp;
use arquetipo_core::Respondent;

#[derive(Subcommand)]
pub enum RespondentAction {
    /// Save the respondent's identity and consent
    Set {
        /// Full name (first and last)
        #[arg(long)]
        name: String,
        /// WhatsApp number with area code
        #[arg(long)]
        whatsapp: String,
        /// E-mail address
        #[arg(long)]
        email: String,
        /// Consent to data usage
        #[arg(long)]
        consent: bool,
    },
    /// Print the stored respondent and any validation issues
    Show,
}

pub fn run(action: RespondentAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = super::open_session()?;

    match action {
        RespondentAction::Set {
            name,
            whatsapp,
            email,
            consent,
        } => {
            let respondent = Respondent {
                name,
                whatsapp,
                email,
                consent_given: consent,
            };
            let issues = respondent.validate();
            let event = session.set_respondent(respondent)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
            for issue in issues {
                eprintln!("warning: {}: {}", issue.field, issue.message);
            }
        }
        RespondentAction::Show => match session.respondent() {
            Some(respondent) => {
                let mut json = serde_json::to_value(respondent)?;
                json["whatsapp_formatted"] =
                    serde_json::Value::String(format_whatsapp(&respondent.whatsapp));
                json["valid"] = serde_json::Value::Bool(respondent.is_valid());
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            None => {
                eprintln!("no respondent data stored");
                std::process::exit(1);
            }
        },
    }
    Ok(())
}
