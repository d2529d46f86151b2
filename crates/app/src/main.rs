//! Tally - Main Entry Point
//!
//! Loads the configuration, wires an entity store to the REST API, runs one
//! operation and prints the resulting store state as JSON.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tally_application::EntityStore;
use tally_domain::{Bill, BillPosition, Entity, EntityId, EntityState, ProjectSettings};
use tally_infrastructure::{
    ClientConfig, ReqwestHttpClient, RestStore, SystemClock, from_json, to_json_stable,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, EntityCommand};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }
    tracing::debug!(base_url = %config.base_url, "configuration loaded");

    let client = Arc::new(ReqwestHttpClient::new(&config)?);
    let clock = Arc::new(SystemClock::new());

    let failed = match &cli.entity {
        EntityCommand::BillPositions { command } => {
            execute::<BillPosition>(&config, client, clock, command).await?
        }
        EntityCommand::Bills { command } => {
            execute::<Bill>(&config, client, clock, command).await?
        }
        EntityCommand::ProjectSettings { command } => {
            execute::<ProjectSettings>(&config, client, clock, command).await?
        }
    };

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Runs `command` against a fresh store for `T` and prints the final state.
/// Returns true when the store ended with an error.
async fn execute<T: Entity>(
    config: &ClientConfig,
    client: Arc<ReqwestHttpClient>,
    clock: Arc<SystemClock>,
    command: &Command,
) -> anyhow::Result<bool> {
    let store: RestStore<T> =
        EntityStore::new(client, clock).with_ordering(config.response_ordering);

    let outcome = match command {
        Command::List(page) => store.list(page.page_request(config.page_size)).await.map(drop),
        Command::Search { query, page } => store
            .search(page.search_request(query, config.page_size))
            .await
            .map(drop),
        Command::Get { id } => store.get_one(parse_id(id)?).await.map(drop),
        Command::Create { json } => store.create(parse_entity(json)?).await.map(drop),
        Command::Update { json } => store.update(parse_entity(json)?).await.map(drop),
        Command::Patch { json } => store.partial_update(parse_entity(json)?).await.map(drop),
        Command::Delete { id } => store.delete(parse_id(id)?).await,
    };
    // The failure is also recorded in the store state printed below.
    if let Err(error) = outcome {
        tracing::debug!(action = %T::SLICE, %error, "operation failed");
    }

    let state: EntityState<T> = store.snapshot();
    print!("{}", to_json_stable(&state)?);
    Ok(state.error_message.is_some())
}

fn parse_id(raw: &str) -> anyhow::Result<EntityId> {
    raw.parse()
        .with_context(|| format!("invalid id {raw:?}"))
}

fn parse_entity<T: Entity>(raw: &str) -> anyhow::Result<T> {
    from_json(raw).with_context(|| format!("invalid {} record", T::SLICE))
}
