use clap::Args;
use eyre::Result;

use symcheck_cli::config::{self, ENV_INFERENCE_URL};
use symcheck_cli::console;
use symcheck_cli::oracles::{inference_service, parse_symptoms};

#[derive(Args, Debug)]
pub struct QuestionsArgs {
    /// Comma-separated symptoms, e.g. fever,cough
    #[arg(long)]
    pub symptoms: String,
}

/// Print the inference service's questionnaire for a set of symptoms.
pub async fn run(args: QuestionsArgs) -> Result<()> {
    let config = config::load_effective_config()?;

    let symptoms = parse_symptoms(&args.symptoms);
    if symptoms.is_empty() {
        return Err(eyre::eyre!("no symptoms given"));
    }

    let service = inference_service(&config, symptoms)?.ok_or_else(|| {
        eyre::eyre!(
            "no inference service configured. Run `symcheck config init --inference-url <URL>` or set {ENV_INFERENCE_URL}"
        )
    })?;

    let questions = service.follow_up_questions(service.symptoms()).await?;
    console::print_questionnaire(&mut std::io::stdout(), &questions)
}
