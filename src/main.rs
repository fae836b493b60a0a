use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use reqwest::Client;
use sqlx::PgPool;

use planning_manager::{
    app_state::AppState,
    domain::{Email, Group},
    get_postgres_pool,
    services::{
        data_stores::{PostgresPlanningStore, PostgresUserStore},
        notification_channel,
        postmark_email_client::PostmarkEmailClient,
        GroupRegistry, TenantStores,
    },
    utils::{
        constants::{
            prod, APP_ADDRESS, DATABASE_URL, NOTIFICATION_QUEUE_CAPACITY,
            POSTMARK_AUTH_TOKEN, POSTMARK_EMAIL_SENDER_ADDRESS,
        },
        tracing::init_tracing,
    },
    Application,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let pg_pool = configure_postgresql().await?;
    let registry = Arc::new(configure_groups(&pg_pool).await?);

    let email_client = Arc::new(configure_postmark_email_client()?);
    let (notifier, worker) =
        notification_channel(*NOTIFICATION_QUEUE_CAPACITY, email_client);
    tokio::spawn(worker.run());

    let app_state = AppState::new(registry, notifier);

    let app = Application::build(app_state, &APP_ADDRESS)
        .await
        .map_err(|e| eyre!("Failed to build app: {e}"))?;

    app.run().await?;
    Ok(())
}

async fn configure_postgresql() -> Result<PgPool> {
    let pg_pool = get_postgres_pool(&DATABASE_URL).await?;

    sqlx::migrate!().run(&pg_pool).await?;

    Ok(pg_pool)
}

/// One pair of stores per row of the `groups` table.
async fn configure_groups(pg_pool: &PgPool) -> Result<GroupRegistry> {
    let names = sqlx::query_scalar::<_, String>("SELECT name FROM groups")
        .fetch_all(pg_pool)
        .await?;

    let registry = GroupRegistry::default();
    for name in names {
        let group = Group::parse(&name)?;
        registry
            .register(TenantStores::new(
                group.clone(),
                Arc::new(PostgresPlanningStore::new(pg_pool.clone(), group.clone())),
                Arc::new(PostgresUserStore::new(pg_pool.clone(), group)),
            ))
            .await?;
    }

    if registry.groups().await.is_empty() {
        tracing::warn!("No groups configured, every request will be rejected");
    }

    Ok(registry)
}

fn configure_postmark_email_client() -> Result<PostmarkEmailClient> {
    let http_client = Client::builder()
        .timeout(prod::email_client::TIMEOUT)
        .build()?;

    Ok(PostmarkEmailClient::new(
        prod::email_client::BASE_URL.to_owned(),
        Email::parse(POSTMARK_EMAIL_SENDER_ADDRESS.clone())?,
        POSTMARK_AUTH_TOKEN.clone(),
        http_client,
    ))
}
