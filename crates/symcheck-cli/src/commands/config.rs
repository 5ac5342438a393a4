use clap::{Args, Subcommand};
use eyre::Result;

use symcheck_cli::config::{self, SymcheckConfig};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Gemini API key to store
        #[arg(long)]
        api_key: Option<String>,

        /// Base URL of the inference service used for predictions
        #[arg(long)]
        inference_url: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the current configuration with secrets redacted
    Show,
    /// Show the configuration file path
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init {
            api_key,
            inference_url,
            force,
        } => init_config(api_key, inference_url, force),
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => show_path(),
    }
}

fn init_config(api_key: Option<String>, inference_url: Option<String>, force: bool) -> Result<()> {
    if config::has_config() && !force {
        eyre::bail!(
            "config already exists at {}; pass --force to overwrite",
            config::config_path()?.display()
        );
    }

    let mut config = SymcheckConfig::gemini(api_key.unwrap_or_default());
    config.inference = inference_url.map(symcheck_oracle::inference::InferenceConfig::new);

    let path = config::save_config(&config)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn show_config() -> Result<()> {
    let mut config = config::load_config()?;
    config::apply_env_overrides(&mut config);
    let info = config::config_info(&config);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn show_path() -> Result<()> {
    println!("{}", config::config_path()?.display());
    Ok(())
}
