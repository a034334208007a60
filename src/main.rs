use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use actix_web_prom::PrometheusMetricsBuilder;
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

use nutri_backend::config::Config;
use nutri_backend::store::PgStore;
use nutri_backend::utils::jwt::TokenService;
use nutri_backend::utils::password::PasswordHasher;
use nutri_backend::{routes, seed, AppState};

fn startup_error(msg: String) -> io::Error {
    error!("{}", msg);
    io::Error::new(io::ErrorKind::Other, msg)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| startup_error(e.to_string()))?;

    let tokens = TokenService::new(&config.jwt_secret);
    let passwords = PasswordHasher::new(config.bcrypt_cost)
        .map_err(|e| startup_error(format!("Failed to initialise password hasher: {}", e)))?;

    let state = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .acquire_timeout(Duration::from_secs(5))
                .connect(database_url)
                .await
                .map_err(|e| startup_error(format!("Failed to connect to the database: {}", e)))?;
            let store = PgStore::new(pool);
            store
                .migrate()
                .await
                .map_err(|e| startup_error(format!("Failed to run migrations: {}", e)))?;
            info!("Connected to PostgreSQL");
            AppState::postgres(store, passwords, tokens)
        }
        None => {
            warn!("DATABASE_URL not set, records are kept in memory and lost on restart");
            AppState::in_memory(passwords, tokens)
        }
    };

    if let Some(admin_seed) = &config.admin_seed {
        seed::ensure_admin(&state, admin_seed)
            .await
            .map_err(|e| startup_error(format!("Failed to seed admin: {}", e)))?;
    }

    let mut labels = HashMap::new();
    labels.insert("app".to_string(), "nutri_backend".to_string());
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .const_labels(labels)
        .build()
        .map_err(|e| startup_error(format!("Failed to create Prometheus metrics: {}", e)))?;

    info!("Starting server at {}", config.bind_address);

    let state = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
