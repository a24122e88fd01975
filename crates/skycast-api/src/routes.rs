use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use skycast_store::UserRecord;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLocationRequest {
    #[serde(rename = "newLocation", default)]
    pub new_location: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateLocationResponse {
    pub message: &'static str,
    pub user: UserRecord,
}

/// User record plus whether the report email went out.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub user: UserRecord,
    pub delivered: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/storeUserDetails", post(store_user_details))
        .route("/users/:user_id/weather", get(user_weather))
        .route("/updateUserLocation/:id", put(update_user_location))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `shutdown` is cancelled. In-flight requests are drained.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Server is running on {}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn store_user_details(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let user = state.users.create_user(&req.email, &req.location).await?;
    tracing::info!("Stored user {}", user.id);

    Ok(Json(RegisterResponse {
        message: "User details stored successfully",
        id: user.id,
    }))
}

async fn user_weather(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ReportResponse>, ApiError> {
    let user = state.users.get_user(&user_id).await?;
    let outcome = state.reports.dispatch(&user).await;

    Ok(Json(ReportResponse {
        user,
        delivered: outcome.delivered(),
    }))
}

async fn update_user_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateLocationRequest>,
) -> Result<Json<UpdateLocationResponse>, ApiError> {
    let user = state.users.update_location(&id, &req.new_location).await?;
    tracing::info!("Updated location of user {}", user.id);

    Ok(Json(UpdateLocationResponse {
        message: "User location updated successfully",
        user,
    }))
}
