use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Result, WrapErr};
use symcheck_core::models::session::SessionState;
use symcheck_export::{DocxRenderer, ReportDocument, TextRenderer, render_completed};
use symcheck_session::{AssessmentSession, SessionConfig, StatusChange};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use symcheck_cli::config::{self, ExportSettings, ReportFormat};
use symcheck_cli::console::{self, Outcome};
use symcheck_cli::oracles::{Oracles, build_oracles, parse_symptoms};

#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Number of questions before the prediction (overrides the config file)
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Write the report to this file or directory once the assessment completes
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Report format (overrides the config file)
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Comma-separated symptoms sent to the inference service, e.g. fever,cough
    #[arg(long)]
    pub symptoms: Option<String>,
}

pub async fn run(args: AssessArgs) -> Result<()> {
    let config = config::load_effective_config()?;

    let session_config = SessionConfig::with_max_turns(
        args.max_turns.unwrap_or(config.session.max_turns),
    );
    let symptoms = args.symptoms.as_deref().map(parse_symptoms).unwrap_or_default();
    let Oracles {
        questions,
        prediction,
        inference,
    } = build_oracles(&config, symptoms).await?;
    let mut session = AssessmentSession::new(questions, prediction, session_config)?;

    let progress = tokio::spawn(show_progress(session.subscribe()));

    let outcome = {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        console::run(&mut session, stdin.lock(), &mut stdout).await?
    };
    drop(session);
    let _ = progress.await;

    match outcome {
        Outcome::Complete(state) => {
            if let (Some(service), Some(prediction)) = (&inference, &state.prediction) {
                match service.report(state.transcript.turns(), prediction).await {
                    Ok(url) => println!("\nService report: {url}"),
                    Err(e) => warn!("inference service report failed: {e}"),
                }
            }
            if let Some(target) = &args.export {
                let format = args.format.unwrap_or(config.export.format);
                let path = export_report(&state, &config.export, format, target)?;
                println!("\nReport saved to {}", path.display());
            }
        }
        Outcome::Quit(state) => {
            info!(
                session_id = %state.session_id,
                status = %state.status,
                turns = state.transcript.len(),
                "assessment abandoned"
            );
        }
    }

    Ok(())
}

/// Tell the user the program is waiting on a remote call.
async fn show_progress(mut events: broadcast::Receiver<StatusChange>) {
    loop {
        match events.recv().await {
            Ok(change) if change.to.is_busy() => eprintln!("Thinking..."),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "progress listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Render and write the report. DOCX failures fall back to plain text.
fn export_report(
    state: &SessionState,
    settings: &ExportSettings,
    format: ReportFormat,
    target: &Path,
) -> Result<PathBuf> {
    let template = match &settings.template {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read template {}", path.display()))?,
        ),
        None => None,
    };

    let text_renderer = || {
        let renderer = TextRenderer::new();
        match &template {
            Some(t) => renderer.with_template(t.clone()),
            None => renderer,
        }
    };

    let document = match format {
        ReportFormat::Text => render_completed(&text_renderer(), state)?,
        ReportFormat::Docx => {
            let mut renderer = DocxRenderer::new(settings.styles.clone());
            if let Some(t) = &template {
                renderer = renderer.with_template(t.clone());
            }
            match render_completed(&renderer, state) {
                Ok(document) => document,
                Err(e) => {
                    warn!("DOCX generation failed, writing plain text instead: {e}");
                    render_completed(&text_renderer(), state)?
                }
            }
        }
    };

    write_document(&document, target)
}

fn write_document(document: &ReportDocument, target: &Path) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(&document.filename)
    } else {
        target.to_path_buf()
    };

    std::fs::write(&path, &document.bytes)
        .wrap_err_with(|| format!("failed to write report to {}", path.display()))?;
    info!(path = %path.display(), mime_type = %document.mime_type, "report written");
    Ok(path)
}
