use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "arquetipo-cli", version, about = "Arquetipo assessment CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wizard step control
    Wizard {
        #[command(subcommand)]
        action: commands::wizard::WizardAction,
    },
    /// Respondent data capture
    Respondent {
        #[command(subcommand)]
        action: commands::respondent::RespondentAction,
    },
    /// Answer submission and inspection
    Answer {
        #[command(subcommand)]
        action: commands::answer::AnswerAction,
    },
    /// Results computation and history
    Results {
        #[command(subcommand)]
        action: commands::results::ResultsAction,
    },
    /// Question catalog inspection
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Wizard { action } => commands::wizard::run(action),
        Commands::Respondent { action } => commands::respondent::run(action),
        Commands::Answer { action } => commands::answer::run(action),
        Commands::Results { action } => commands::results::run(action),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "arquetipo-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
