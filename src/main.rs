use actix_web::{HttpServer, web};
use citeplasm_api::{
    AuthConfig, ObjectMapper, RedisStore, ServerConfig, SignatureVerifier, StoreConfig,
    build_router, create_app, fixtures,
};
use std::{fmt::Display, io, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize structured logging. `RUST_LOG` controls the filter (default
/// `info`) and `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Log a startup failure and turn it into the process exit error
fn startup_error(stage: &str, e: impl Display) -> io::Error {
    error!(stage = %stage, error = %e, "Startup failed");
    io::Error::other(format!("{stage}: {e}"))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let server_config = ServerConfig::from_env();
    let store_config = StoreConfig::from_env().map_err(|e| startup_error("config", e))?;
    let store_url = store_config.url().map_err(|e| startup_error("config", e))?;

    let store = RedisStore::connect(store_url.as_str())
        .await
        .map_err(|e| startup_error("store", e))?;
    let mapper = ObjectMapper::new(Arc::new(store));

    if server_config.seed_fixtures {
        fixtures::flush_store(&mapper)
            .await
            .map_err(|e| startup_error("fixtures", e))?;
        fixtures::load_fixtures(&mapper)
            .await
            .map_err(|e| startup_error("fixtures", e))?;
    }

    let verifier = SignatureVerifier::from_config(&AuthConfig::from_env());
    let router = web::Data::new(
        build_router(mapper, verifier)
            .map_err(|e| startup_error("routes", e))?
            .with_body_limit(server_config.max_body_bytes),
    );

    info!(
        bind_addr = %server_config.bind_addr,
        routes = router.len(),
        commit = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        build_time = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        "Started Citeplasm API"
    );

    HttpServer::new(move || create_app(router.clone()))
        .bind(&server_config.bind_addr)?
        .run()
        .await
}
