//! Implementation of the `craftvista new` command.
//!
//! Translates CLI arguments into workflow calls and renders the review.
//! The state machine itself lives in `craftvista-core`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use craftvista_core::{
    application::{Credential, ListingWorkflow, SessionManager},
    domain::{
        ContentField, DraftId, DraftInput, FieldValue, GeneratedContent, ListingId, Provenance,
        ReviewedContent, VoiceNoteRef,
    },
    error::CraftError,
};

use crate::{
    cli::{EditArgs, NewArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    wiring,
};

/// Execute the `craftvista new` command.
///
/// 1. Sign in (skipped without a credential; generation then fails
///    as unauthenticated)
/// 2. Request generation
/// 3. Request a story if `--story`
/// 4. Apply `--title/--body/--cultural-context/--price` edits
/// 5. Show the review
/// 6. Early-exit if `--dry-run`
/// 7. Confirm unless `--yes` or `--quiet`
/// 8. Publish
#[instrument(skip_all, fields(category = %args.category))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_cli_context(|| "failed to start the async runtime")?;

    runtime.block_on(author(args, global.quiet, &config, &output))
}

async fn author(
    args: NewArgs,
    quiet: bool,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let session = Arc::new(SessionManager::new(wiring::identity(config)?));
    let workflow = ListingWorkflow::new(
        session.clone(),
        wiring::generator(config)?,
        wiring::store(config),
        config.to_workflow_config(),
    );

    match args.credential.as_deref() {
        Some(credential) => {
            let spinner = output.spinner("Signing in");
            let signed_in = session.sign_in(&Credential::new(credential)).await;
            spinner.finish_and_clear();
            let principal = signed_in?;
            output.success(&format!("Signed in as {}", principal.display_name))?;
        }
        None => {
            output.warning("No credential given (use --credential or CRAFTVISTA_CREDENTIAL)")?;
        }
    }

    let mut input = DraftInput::new(args.category, args.description).with_materials(args.materials);
    if let Some(note) = args.voice_note {
        input = input.with_voice_note(VoiceNoteRef::new(note));
    }

    let spinner = output.spinner(&format!(
        "Writing your {} listing",
        args.category.display_name()
    ));
    let generated = workflow.request_generation(input).await;
    spinner.finish_and_clear();
    generated?;
    info!(draft = %workflow.draft_id(), "Listing copy generated");

    if args.story {
        let spinner = output.spinner("Writing the story behind it");
        let story = workflow.request_story().await;
        spinner.finish_and_clear();
        story?;
    }

    apply_edits(&workflow, &args.edits)?;

    let draft = workflow.snapshot()?;
    let content = draft.content().cloned().ok_or_else(|| CraftError::Internal {
        message: "reviewed draft has no content".into(),
    })?;
    // JSON output is a single document printed once the command is done.
    let json = output.format() == OutputFormat::Json;
    if !json {
        show_review(&content, output)?;
    }

    if args.dry_run {
        if json {
            output.json(&ReviewView::new(workflow.draft_id(), &content, None))?;
        }
        output.info("Dry run: nothing was published")?;
        return Ok(());
    }

    if !quiet && !args.yes && !json && !confirm()? {
        workflow.abandon()?;
        return Err(CliError::Cancelled);
    }

    let spinner = output.spinner("Publishing");
    let published = workflow.publish().await;
    spinner.finish_and_clear();
    let listing_id = published?;

    if json {
        output.json(&ReviewView::new(workflow.draft_id(), &content, Some(&listing_id)))?;
    } else {
        output.success(&format!("Published listing {listing_id}"))?;
    }
    Ok(())
}

/// The edits requested on the command line, in display order.
fn requested_edits(edits: &EditArgs) -> Vec<(ContentField, FieldValue)> {
    let mut out = Vec::new();
    if let Some(title) = &edits.title {
        out.push((ContentField::Title, FieldValue::from(title.as_str())));
    }
    if let Some(body) = &edits.body {
        out.push((ContentField::Description, FieldValue::from(body.as_str())));
    }
    if let Some(context) = &edits.cultural_context {
        out.push((ContentField::CulturalContext, FieldValue::from(context.as_str())));
    }
    if let Some(price) = edits.price {
        out.push((ContentField::SuggestedPrice, FieldValue::Price(price)));
    }
    out
}

fn apply_edits(workflow: &ListingWorkflow, edits: &EditArgs) -> CliResult<()> {
    for (field, value) in requested_edits(edits) {
        workflow.edit_generated(field, value)?;
    }
    Ok(())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewView<'a> {
    draft_id: DraftId,
    #[serde(skip_serializing_if = "Option::is_none")]
    listing_id: Option<&'a ListingId>,
    content: &'a GeneratedContent,
    ai_generated: BTreeMap<ContentField, bool>,
}

impl<'a> ReviewView<'a> {
    fn new(draft_id: DraftId, content: &'a ReviewedContent, listing_id: Option<&'a ListingId>) -> Self {
        Self {
            draft_id,
            listing_id,
            content: content.current(),
            ai_generated: content.ai_generated_flags(),
        }
    }
}

fn label(field: ContentField) -> &'static str {
    match field {
        ContentField::Title => "Title",
        ContentField::Description => "Description",
        ContentField::CulturalContext => "Cultural context",
        ContentField::SuggestedPrice => "Price (INR)",
        ContentField::Story => "Story",
    }
}

fn show_review(content: &ReviewedContent, out: &OutputManager) -> CliResult<()> {
    out.print("")?;
    out.header("Review")?;
    for field in ContentField::ALL {
        if field == ContentField::Story && !content.has_story() {
            continue;
        }
        let tag = match content.provenance(field) {
            Provenance::AiGenerated => "AI",
            Provenance::SellerEdited => "edited",
        };
        out.field(label(field), &content.get(field).to_string(), tag)?;
    }
    let keywords = &content.current().keywords;
    if !keywords.is_empty() {
        out.print(&format!("  {:<17} {}", "Keywords", keywords.join(", ")))?;
    }
    out.print("")?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Publish this listing?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Publish this listing? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
