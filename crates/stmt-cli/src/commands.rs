use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use stmt_cli::render::{gate_line, print_review, print_submission};
use stmt_cli::review::{
    ReviewReport, apply_decisions, open_batch, open_session, store_session, submission,
};
use stmt_cli::settings::{
    OutputFormat, Settings, render_settings, save_settings, settings_path,
};
use stmt_map::{MappingState, ReviewConfig};
use stmt_persistence::ReviewSession;

use crate::cli::{ConfigArgs, FormatArg, ResumeArgs, ReviewArgs, SubmitArgs};

/// Outcome of a command that ends with a gate check.
pub struct GateOutcome {
    pub can_submit: bool,
}

pub fn run_review(args: &ReviewArgs, settings: &Settings) -> Result<GateOutcome> {
    let mut config: ReviewConfig = settings.review;
    if let Some(threshold) = args.auto_approve_threshold {
        config = config.with_auto_approve_threshold(threshold);
    }

    let mut state = open_batch(&args.batch, &args.fields, &config)?;
    apply_decisions(&mut state, args.decisions.as_deref())?;

    if let Some(path) = &args.save_session {
        let mut session = ReviewSession::new(state.clone());
        if let Some(description) = &args.description {
            session = session.with_description(description);
        }
        store_session(&mut session, path)?;
        info!("Session saved to {}", path.display());
    }

    report(&state, &config, output_format(args.format, settings))
}

pub fn run_resume(args: &ResumeArgs, settings: &Settings) -> Result<GateOutcome> {
    let mut session = open_session(&args.session)?;
    if let Some(description) = &session.description {
        info!(description = %description, "Resuming review session");
    }
    apply_decisions(&mut session.state, args.decisions.as_deref())?;

    if !args.no_save {
        store_session(&mut session, &args.session)?;
    }

    report(
        &session.state,
        &settings.review,
        output_format(args.format, settings),
    )
}

pub fn run_submit(args: &SubmitArgs) -> Result<()> {
    let session = open_session(&args.session)?;
    let payload = submission(&session.state)?;
    // Payload goes to JSON unless a table is asked for explicitly.
    match args.format {
        Some(FormatArg::Table) => print_submission(&payload),
        Some(FormatArg::Json) | None => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }
    Ok(())
}

pub fn run_config(
    args: &ConfigArgs,
    explicit: Option<&Path>,
    settings: &Settings,
) -> Result<()> {
    print!("{}", render_settings(settings)?);
    if args.write {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => settings_path().context("no platform config directory")?,
        };
        save_settings(settings, &path)?;
        info!("Settings written to {}", path.display());
    }
    Ok(())
}

fn report(
    state: &MappingState,
    config: &ReviewConfig,
    format: OutputFormat,
) -> Result<GateOutcome> {
    let gate = state.gate();
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ReviewReport::from_state(state))?
            );
        }
        OutputFormat::Table => print_review(state, &config.confidence_thresholds),
    }
    if !gate.can_submit {
        info!("{}", gate_line(&gate));
    }
    Ok(GateOutcome {
        can_submit: gate.can_submit,
    })
}

fn output_format(arg: Option<FormatArg>, settings: &Settings) -> OutputFormat {
    match arg {
        Some(FormatArg::Table) => OutputFormat::Table,
        Some(FormatArg::Json) => OutputFormat::Json,
        None => settings.output,
    }
}
