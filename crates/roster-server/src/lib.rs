pub mod error;
pub mod routes;
pub mod state;

use std::future::Future;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, put};
use axum::Router;
use roster_config::ServerConfig;
use roster_store::Store;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use error::{ApiError, ServerError};
pub use state::AppState;

use routes::{create_student, delete_student, health, list_students, update_student};

pub type Result<T> = std::result::Result<T, ServerError>;

/// Student routes, mounted under `/students` and under `/api/students`.
/// Unknown paths and unsupported methods on known paths both answer 404.
pub fn router(state: AppState) -> Router {
    let router = Router::new().route("/", get(health));
    let router = mount_students(router, "/students");
    let router = mount_students(router, "/api/students");
    router
        .fallback(error::route_not_found)
        .method_not_allowed_fallback(error::route_not_found)
        .with_state(state)
}

fn mount_students(router: Router<AppState>, prefix: &str) -> Router<AppState> {
    router
        .route(prefix, get(list_students).post(create_student))
        .route(
            &format!("{prefix}/{{id}}"),
            put(update_student).delete(delete_student),
        )
}

/// Router with the CORS and request tracing layers applied.
pub fn app(state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let cors = cors_layer(allowed_origins)?;
    Ok(router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ServerError::InvalidOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60)))
}

/// Binds the configured address and serves until SIGINT or SIGTERM.
pub async fn run(store: Store, config: &ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    serve_on(listener, store, &config.allowed_origins, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(
    listener: TcpListener,
    store: Store,
    allowed_origins: &[String],
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = app(AppState::new(store), allowed_origins)?;
    let address = listener.local_addr()?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
