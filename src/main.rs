use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cookshare::commands::{ConfigCommand, ListCommand, RecipeCommand};
use cookshare::config::Config;
use cookshare::db::{init_db, RecipeRepository, ShoppingListRepository};
use cookshare::service::ShoppingListService;

#[derive(Parser)]
#[command(name = "cookshare")]
#[command(version)]
#[command(about = "Share recipes and keep a merged shopping list", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes
    Recipe(RecipeCommand),

    /// Manage your shopping list
    List(ListCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Recipe(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let repo = RecipeRepository::new(pool);
            cmd.run(&repo, &config).await?;
        }
        Some(Commands::List(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let service = ShoppingListService::new(
                RecipeRepository::new(pool.clone()),
                ShoppingListRepository::new(pool),
            );
            cmd.run(&service, &config).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
