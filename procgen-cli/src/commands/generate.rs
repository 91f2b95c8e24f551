use std::{error::Error, path::PathBuf};

use clap::Args;
use procgen_core::{GenerationFailed, Pipeline, Settings};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

fn init_logging(debug: bool) -> Result<(), Box<dyn Error>> {
    let level = match debug {
        true => Level::DEBUG,
        false => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[derive(Args, Debug, Clone)]
#[command(about = "Generate a stored procedure and API function from a natural language prompt")]
#[must_use]
pub struct Generate {
    #[arg(short, long, help = "Natural language description of what to generate")]
    prompt: String,
    #[arg(long, help = "Contract document to constrain generation [default: agent.md]")]
    contract: Option<PathBuf>,
    #[arg(short, long, help = "Directory for generated files [default: generated]")]
    output: Option<PathBuf>,
    #[arg(long, help = "Show debug information")]
    debug: bool,
}

impl Generate {
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        init_logging(self.debug)?;
        if self.prompt.trim().is_empty() {
            return Err("--prompt must not be empty".into());
        }

        let mut settings = Settings::from_env().map_err(GenerationFailed::from)?;
        if let Some(contract) = self.contract {
            settings.contract = contract;
        }
        if let Some(output) = self.output {
            settings.output_dir = output;
        }

        let outcome = Pipeline::from_settings(&settings).run(&self.prompt).await?;
        info!(
            "Generation complete! Check the {} directory.",
            settings.output_dir.display()
        );
        for path in &outcome.written {
            println!("{}", path.display());
        }
        Ok(())
    }
}
