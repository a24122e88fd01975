use std::sync::Arc;

use anyhow::{Context, Result};
use skycast_api::{AppState, ReportDispatcher, Scheduler};
use skycast_core::Config;
use skycast_mail::SmtpNotifier;
use skycast_store::{SqliteUserStore, UserRepository};
use skycast_weather::WeatherProvider;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    skycast_core::init()?;

    let config = Config::load_validated()?;

    let store = SqliteUserStore::open(&config.database.path).with_context(|| {
        format!(
            "Failed to open user database at {}",
            config.database.path.display()
        )
    })?;
    let users = UserRepository::new(store);
    tracing::info!("Connected to user database at {}", config.database.path.display());

    let weather =
        WeatherProvider::from_config(&config.weather).context("Failed to build weather client")?;
    let notifier =
        SmtpNotifier::from_config(&config.smtp).context("Failed to build SMTP transport")?;
    let reports = Arc::new(ReportDispatcher::new(
        Arc::new(weather),
        Arc::new(notifier),
        config.schedule.subject.clone(),
    ));

    let shutdown = CancellationToken::new();

    let scheduler = if config.schedule.enabled {
        Some(
            Scheduler::new(users.clone(), reports.clone(), config.schedule.interval())
                .spawn(shutdown.clone()),
        )
    } else {
        tracing::info!("Scheduled reports disabled");
        None
    };

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested");
            }
            shutdown.cancel();
        }
    });

    let served = skycast_api::serve(listener, AppState::new(users, reports), shutdown.clone()).await;
    shutdown.cancel();

    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            tracing::error!("Scheduler task failed: {}", e);
        }
    }

    served
}
