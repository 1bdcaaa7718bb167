//! `user-list` entry-point: lists, filters and adds users against the
//! configured REST collection.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use client::config::ClientSettings;
use client::domain::{
    AddUserForm, FetchStatus, ResourceKind, SubmitOutcome, UserDraft, UserListRuntime,
    UserListScreen, UserListView,
};
use client::outbound::jsonplaceholder::JsonPlaceholderHttpSource;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `user-list` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "user-list",
    about = "Fetch, filter and add users against a JSONPlaceholder-style API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Fetch one collection and print it, optionally filtered by username.
    List {
        /// Collection to fetch. Defaults to `USER_LIST_RESOURCE` or `users`.
        #[arg(long, value_name = "kind")]
        resource: Option<ResourceKind>,
        /// Case-insensitive username filter applied after the debounce window.
        #[arg(long, value_name = "text")]
        query: Option<String>,
        /// Print records as JSON instead of one line per record.
        #[arg(long)]
        json: bool,
    },
    /// Submit a new user.
    Add {
        /// Username; at least three characters.
        #[arg(long, value_name = "name")]
        username: String,
        /// Email address.
        #[arg(long, value_name = "address")]
        email: String,
    },
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> io::Result<()> {
    let settings = ClientSettings::load_from_iter([OsString::from("user-list")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let base_url = settings
        .base_url()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    let source = JsonPlaceholderHttpSource::new(base_url.clone(), settings.request_timeout())
        .map_err(|error| io::Error::other(format!("build HTTP client: {error}")))?;
    info!(base_url = %base_url, "user directory configured");

    match cli.command {
        Command::List {
            resource,
            query,
            json,
        } => list(&settings, Arc::new(source), resource, query, json).await,
        Command::Add { username, email } => add(Arc::new(source), username, email).await,
    }
}

async fn list(
    settings: &ClientSettings,
    source: Arc<JsonPlaceholderHttpSource>,
    resource: Option<ResourceKind>,
    query: Option<String>,
    json: bool,
) -> io::Result<()> {
    let config = settings
        .user_list_config()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    let handle = UserListScreen::spawn(source, config, UserListRuntime::default());
    let screen_error = |error: client::domain::DomainError| io::Error::other(error.to_string());

    if let Some(kind) = resource {
        handle.select_resource(kind).map_err(screen_error)?;
    }
    handle.fetch().map_err(screen_error)?;
    let mut view = handle
        .wait_for(|view| view.status.is_settled())
        .await
        .map_err(screen_error)?;

    if let Some(text) = query {
        handle.set_query(text.as_str()).map_err(screen_error)?;
        view = handle
            .wait_for(|view| view.query == text)
            .await
            .map_err(screen_error)?;
    }
    handle.shutdown().await.map_err(screen_error)?;

    if let FetchStatus::Error(message) = &view.status {
        return Err(io::Error::other(format!("fetch failed: {message}")));
    }
    render(&view, json)
}

fn render(view: &UserListView, json: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    match (view.resource, json) {
        (ResourceKind::Users, true) => {
            serde_json::to_writer_pretty(&mut out, &*view.filtered_users).map_err(io::Error::other)?;
            writeln!(out)
        }
        (ResourceKind::Posts, true) => {
            serde_json::to_writer_pretty(&mut out, &*view.posts).map_err(io::Error::other)?;
            writeln!(out)
        }
        (ResourceKind::Users, false) => {
            for user in view.filtered_users.iter() {
                writeln!(out, "{}\t{}\t{}", user.id(), user.username(), user.email())?;
            }
            Ok(())
        }
        (ResourceKind::Posts, false) => {
            for post in view.posts.iter() {
                writeln!(out, "{}\t{}\t{}", post.id(), post.user_id(), post.title())?;
            }
            Ok(())
        }
    }
}

async fn add(source: Arc<JsonPlaceholderHttpSource>, username: String, email: String) -> io::Result<()> {
    let mut form = AddUserForm::new(source);
    form.set_draft(UserDraft { username, email });
    let outcome = form.submit().await;
    let message = form.message().unwrap_or_default().to_owned();

    match outcome {
        SubmitOutcome::Created(_) => writeln!(io::stdout().lock(), "{message}"),
        SubmitOutcome::Invalid(errors) => {
            let reasons = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(io::Error::new(io::ErrorKind::InvalidInput, reasons))
        }
        SubmitOutcome::Failed(error) => Err(io::Error::other(format!("{message} {error}"))),
    }
}
