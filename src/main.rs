mod api;
mod banner;
mod config;
mod errors;
mod extract;
mod generator;
mod models;
mod runner;
mod workspace;

use actix_web::{middleware, web, App, HttpServer};
use actix_cors::Cors;
use api::{configure_routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    // .env is optional; fall back to the ambient environment
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  No .env file loaded: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = config::AppConfig::from_env()
        .expect("Failed to load app configuration from environment");

    // Workspace root must exist before the first request comes in
    std::fs::create_dir_all(&app_config.temp_root)?;

    let bind = (app_config.host.clone(), app_config.port);
    let state = AppState::new(app_config);

    println!("🚀 Starting server...");
    println!("📡 Accepting runs at http://{}:{}/run", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
