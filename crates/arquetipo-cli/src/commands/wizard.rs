use clap::Subcommand;

#[derive(Subcommand)]
pub enum WizardAction {
    /// Print the current wizard state as JSON
    Status,
    /// Advance to the next step (gated on the current step's rules)
    Next,
    /// Go back one step
    Back,
    /// Jump directly to a step (deep link / testing)
    Goto {
        /// Target step, 1-based
        step: u32,
    },
    /// Return to the first step and clear all session data
    Reset,
}

pub fn run(action: WizardAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = super::open_session()?;

    let event = match action {
        WizardAction::Status => session.snapshot(),
        WizardAction::Next => session.try_advance()?,
        WizardAction::Back => session.retreat()?,
        WizardAction::Goto { step } => session.jump_to(step)?,
        WizardAction::Reset => session.reset_all()?,
    };

    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
