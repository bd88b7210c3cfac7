use campusfeed_app::{
    Confirm, PostFeed, SessionContext,
    feed::error::FeedError,
    view::render_feed,
};
use campusfeed_client::{ApiClient, ClientError, MediaFile};
use campusfeed_common::model::Id;
use clap::Parser;
use cli::{Cli, Command};
use serde::Deserialize;
use std::{
    io::{BufRead, Write},
    sync::Arc,
};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

mod cli;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error building API client: {0}")]
    Client(#[from] ClientError),
    #[error("Error reading media file: {0}")]
    MediaFile(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    api_base_url: Url,
    session_cookie: Option<String>,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campusfeed_app=debug,campusfeed_client=debug,reqwest=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

async fn run(feed: &PostFeed, command: Command) -> Result<(), InitError> {
    // Action failures end up in the feed's inline error and are printed with it.
    let outcome: Result<(), FeedError> = match command {
        Command::List | Command::Whoami => Ok(()),
        Command::Post { file, caption } => {
            let file = match file {
                Some(path) => Some(MediaFile::open(path).await.map_err(InitError::MediaFile)?),
                None => None,
            };
            match feed.set_draft_caption(caption) {
                Ok(()) => {
                    feed.select_file(file);
                    feed.publish().await.map(drop)
                }
                Err(err) => Err(err),
            }
        }
        Command::Like { id } => feed.toggle_like(Id::new(id)).await.map(drop),
        Command::View { id } => feed.engage_media(Id::new(id)).await.map(drop),
        Command::Edit { id, caption } => {
            let id = Id::new(id);
            match feed
                .start_edit(id)
                .and_then(|()| feed.set_edit_caption(caption))
            {
                Ok(()) => feed.save_edit().await.map(drop),
                Err(err) => Err(err),
            }
        }
        Command::Delete { id, yes } => {
            let result = if yes {
                feed.delete(Id::new(id), &|_: &str| true).await
            } else {
                feed.delete(Id::new(id), &StdinConfirm).await
            };
            result.map(drop)
        }
    };

    if let Err(err) = outcome {
        debug!(error = %err, "Command failed");
        if !err.is_surfaced() {
            eprintln!("{}", err.user_message());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;
    let cli = Cli::parse();

    let client = Arc::new(ApiClient::with_session_cookie(
        env.api_base_url,
        env.session_cookie.as_deref(),
    )?);
    let session = SessionContext::fetch(&client).await;

    if let Command::Whoami = cli.command {
        match session.user() {
            Some(user) => println!(
                "{} <{}> ({:?})",
                user.name.as_deref().unwrap_or("-"),
                user.email,
                user.role
            ),
            None => println!("Not signed in"),
        }
        return Ok(());
    }

    let feed = PostFeed::new(client);
    // A failed load is shown inline like any other error.
    let _ = feed.load().await;
    if feed.snapshot().error.is_none() {
        run(&feed, cli.command).await?;
    }

    print!("{}", render_feed(&feed.snapshot(), &session));
    Ok(())
}
