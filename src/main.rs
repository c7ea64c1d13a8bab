use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use matchday::config::Config;
use matchday::ledger::Ledger;
use matchday::routes::{self, AppState};
use matchday::store::{JsonFileStore, Store};
use std::io;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header(),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = Config::from_env().map_err(io::Error::other)?;
    init_tracing(config.log_json);

    let store = JsonFileStore::new(&config.db_path);
    // Creates the file on first start.
    store.load().map_err(io::Error::other)?;
    info!(path = %store.path().display(), "using document store");

    let state = web::Data::new(AppState {
        ledger: Ledger::new(Arc::new(store)),
        payment_url: config.payment_url.clone(),
    });
    let cors_origin = config.cors_origin.clone();

    info!(bind = %config.bind, "listening");
    HttpServer::new(move || {
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(config.bind)?
    .run()
    .await
}
