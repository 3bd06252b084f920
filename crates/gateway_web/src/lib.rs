pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod status;

pub use error::ApiError;
pub use routes::configure;
pub use state::AppState;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use tracing::info;

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub addr: String,
}

pub async fn run_backend(state: AppState, cfg: BackendConfig) -> std::io::Result<()> {
    let state = web::Data::new(state);

    info!(
        "starting gateway on {} with {} connector type(s)",
        cfg.addr,
        state.registry.list().len()
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(cfg.addr)?
    .run()
    .await
}
