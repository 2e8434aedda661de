mod api;
mod config;
mod services;

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use designer::consts::{SUPPORTED_OBS_DATA_TYPES, SUPPORTED_OBS_GROUP_DATA_TYPES};
use designer::editor::Action;
use designer::registry::ControlRegistry;
use designer::selection::ConceptSearch;
use designer::translations::TranslationTable;
use serde::Serialize;
use tracing::{debug, info};

use api::openmrs::OpenMrsClient;
use api::{ApiError, FormApi};
use config::BuilderConfig;
use services::SessionError;
use services::concepts::ConceptPicker;
use services::form_detail::FormDetailSession;
use services::forms::FormListSession;
use services::notify::Notifier;
use services::translations::TranslationSession;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown control type `{0}`")]
    UnknownControlType(String),
    #[error("concept `{0}` could not be bound to the new control")]
    ConceptNotBound(String),
    #[error("form `{0}` is not published; nothing to edit")]
    NotPublished(String),
}

#[derive(Parser, Debug)]
#[command(name = "form-builder", about = "OpenMRS/Bahmni observation form builder")]
struct Cli {
    /// OpenMRS server root.
    #[arg(long, env = "OPENMRS_BASE_URL")]
    base_url: Option<String>,

    /// Reference locale for translations.
    #[arg(long, env = "OPENMRS_DEFAULT_LOCALE")]
    default_locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List forms.
    Forms,
    /// Show a form, its header actions, and its controls.
    Show { form_uuid: String },
    /// Append a control and save the form.
    Add {
        form_uuid: String,
        /// Control type, e.g. `obsControl` or `label`.
        control_type: String,
        /// Fully specified name of the concept to bind.
        #[arg(long)]
        concept: Option<String>,
    },
    /// Rename a form and save it.
    Rename { form_uuid: String, name: String },
    /// Open a published form for editing and save it as a new version.
    Edit { form_uuid: String },
    /// Publish the saved form.
    Publish { form_uuid: String },
    /// Search concepts that can be bound to an observation control.
    Concepts {
        query: String,
        /// Search concepts for an observation group instead.
        #[arg(long)]
        group: bool,
    },
    /// Show the translation grid of a form.
    Translations {
        form_uuid: String,
        /// Comparison locale shown next to the default.
        #[arg(long)]
        locale: Option<String>,
    },
}

struct Context {
    api: Arc<dyn FormApi>,
    registry: Arc<ControlRegistry>,
    config: BuilderConfig,
}

impl Context {
    fn notifier(&self) -> Notifier {
        Notifier::new(Duration::from_millis(self.config.toast_timeout_ms))
    }

    fn form_session(&self, form_uuid: &str) -> FormDetailSession {
        FormDetailSession::new(Arc::clone(&self.api), Arc::clone(&self.registry), form_uuid, self.notifier())
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenv {
        debug!(error = %e, "no .env loaded");
    }

    let cli = Cli::parse();
    let mut config = BuilderConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(locale) = &cli.default_locale {
        config = config.with_default_locale(locale);
    }
    info!(base_url = %config.base_url, locale = %config.default_locale, "form builder starting");

    let ctx = Context {
        api: Arc::new(OpenMrsClient::new(&config)?),
        registry: Arc::new(ControlRegistry::with_defaults()),
        config,
    };

    match cli.command {
        Command::Forms => run_forms(&ctx).await,
        Command::Show { form_uuid } => run_show(&ctx, &form_uuid).await,
        Command::Add { form_uuid, control_type, concept } => {
            run_add(&ctx, &form_uuid, &control_type, concept.as_deref()).await
        }
        Command::Rename { form_uuid, name } => run_rename(&ctx, &form_uuid, &name).await,
        Command::Edit { form_uuid } => run_edit(&ctx, &form_uuid).await,
        Command::Publish { form_uuid } => run_publish(&ctx, &form_uuid).await,
        Command::Concepts { query, group } => run_concepts(&ctx, &query, group).await,
        Command::Translations { form_uuid, locale } => run_translations(&ctx, &form_uuid, locale.as_deref()).await,
    }
}

async fn run_forms(ctx: &Context) -> Result<(), CliError> {
    let mut session = FormListSession::new(Arc::clone(&ctx.api), ctx.notifier());
    for form in session.load().await? {
        let state = if form.published { "published" } else { "draft" };
        println!("{}\t{}\tv{}\t{state}", form.uuid, form.name, form.version);
    }
    Ok(())
}

async fn run_show(ctx: &Context, form_uuid: &str) -> Result<(), CliError> {
    let mut session = ctx.form_session(form_uuid);
    let form = session.load().await?;
    eprintln!("{} v{} ({})", form.name, form.version, form.uuid);
    eprintln!("{:?}", session.actions());
    print_json(&session.editor().serialize())
}

async fn run_add(ctx: &Context, form_uuid: &str, control_type: &str, concept: Option<&str>) -> Result<(), CliError> {
    let mut session = ctx.form_session(form_uuid);
    session.load().await?;

    let Action::ControlPlaced(placed) = session.editor_mut().place(control_type) else {
        return Err(CliError::UnknownControlType(control_type.to_owned()));
    };
    session.editor_mut().select(&placed.id);
    if let Some(name) = concept {
        if session.pick_concept(name).await? == Action::None {
            return Err(CliError::ConceptNotBound(name.to_owned()));
        }
    }
    session.editor_mut().background_click();

    let form = session.save().await?;
    eprintln!("saved control {} to {} (v{})", placed.id, form.name, form.version);
    Ok(())
}

async fn run_rename(ctx: &Context, form_uuid: &str, name: &str) -> Result<(), CliError> {
    let mut session = ctx.form_session(form_uuid);
    session.load().await?;
    session.rename(name);
    let form = session.save().await?;
    eprintln!("renamed {} to {}", form.uuid, form.name);
    Ok(())
}

async fn run_edit(ctx: &Context, form_uuid: &str) -> Result<(), CliError> {
    let mut session = ctx.form_session(form_uuid);
    session.load().await?;
    if !session.enter_edit_mode() {
        return Err(CliError::NotPublished(form_uuid.to_owned()));
    }
    let form = session.save().await?;
    eprintln!("new draft {} of {}", form.uuid, form.name);
    Ok(())
}

async fn run_publish(ctx: &Context, form_uuid: &str) -> Result<(), CliError> {
    let mut session = ctx.form_session(form_uuid);
    session.load().await?;
    let form = session.publish().await?;
    eprintln!("published {} v{}", form.name, form.version);
    Ok(())
}

async fn run_concepts(ctx: &Context, query: &str, group: bool) -> Result<(), CliError> {
    let data_types = if group { SUPPORTED_OBS_GROUP_DATA_TYPES } else { SUPPORTED_OBS_DATA_TYPES };
    debug!(data_types, query, "concept search");
    let picker = ConceptPicker::new(Arc::clone(&ctx.api));
    for concept in picker.search(&ConceptSearch::Enabled { data_types }, query).await? {
        println!("{}\t{}\t{}", concept.uuid, concept.display_name(), concept.datatype_name());
    }
    Ok(())
}

async fn run_translations(ctx: &Context, form_uuid: &str, locale: Option<&str>) -> Result<(), CliError> {
    let mut session =
        TranslationSession::new(Arc::clone(&ctx.api), form_uuid, ctx.config.default_locale.clone(), ctx.notifier());
    let mut table = session.open().await?;
    let codes: Vec<&str> = session.locales().iter().map(|l| l.code.as_str()).collect();
    eprintln!("locales: {}", codes.join(", "));
    if let Some(locale) = locale {
        table = session.switch_locale(locale).await?;
    }
    print_table(&table);
    Ok(())
}

fn print_table(table: &TranslationTable) {
    println!("{}", table.headers.join("\t"));
    for row in table.grid_rows() {
        let values: Vec<&str> = row.values.iter().map(|v| v.as_deref().unwrap_or("")).collect();
        println!("{}\t{}", row.translation_key, values.join("\t"));
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
