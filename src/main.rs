mod config;
mod error;
mod gate;
mod pagination;
mod permissions;
mod proxy;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod test_helpers;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::GatewayConfig::from_env();
    let port = config.port;
    let production = config.production;
    if config.mock_login_fallback {
        tracing::warn!("mock login fallback enabled; unreachable backend logins get a canned session");
    }

    let state = match state::AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "upstream client init failed");
            return ExitCode::FAILURE;
        }
    };

    let upstream = state.upstream.base_url().to_owned();
    let app = routes::app(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%port, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%port, %upstream, production, "cms-admin-gateway listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
