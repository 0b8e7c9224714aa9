mod config_cmd;
mod list;
mod recipe;

use clap::ValueEnum;

pub use config_cmd::ConfigCommand;
pub use list::ListCommand;
pub use recipe::RecipeCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
