use clap::Subcommand;

use arquetipo_core::QuestionCatalog;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List block ids and option counts
    List,
    /// Print a full block with its options
    Show {
        #[arg(long)]
        block: u32,
    },
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = QuestionCatalog::default();

    match action {
        CatalogAction::List => {
            let blocks: Vec<serde_json::Value> = catalog
                .blocks()
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "id": b.id,
                        "options": b.options.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        CatalogAction::Show { block } => match catalog.block(block) {
            Some(found) => println!("{}", serde_json::to_string_pretty(found)?),
            None => {
                eprintln!("unknown block: {block}");
                std::process::exit(1);
            }
        },
    }
    Ok(())
}
