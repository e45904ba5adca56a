//! HTTP server assembly: state, middleware and route mounting.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use tracing::info;

use rbac_api::Trace;
use rbac_api::inbound::http::configure_api;
use rbac_api::inbound::http::health::{HealthState, live, ready};
use state_builders::build_http_state;

/// Mount the versioned API, the probes and, when enabled, the docs.
fn mount(cfg: &mut web::ServiceConfig, swagger_ui: bool) {
    cfg.service(web::scope("/api/v1").configure(configure_api))
        .service(ready)
        .service(live);
    if swagger_ui {
        mount_docs(cfg);
    }
}

#[cfg(debug_assertions)]
fn mount_docs(cfg: &mut web::ServiceConfig) {
    use rbac_api::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    cfg.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

#[cfg(not(debug_assertions))]
fn mount_docs(_cfg: &mut web::ServiceConfig) {}

/// Bind the listener and start serving.
///
/// The returned [`Server`] must be awaited to drive it. `health_state` is
/// marked ready once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when the service graph cannot be built or
/// the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        bind_addr,
        swagger_ui,
        ..
    } = config;

    let probes = health_state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Trace)
            .app_data(probes.clone())
            .app_data(http_state.clone())
            .configure(|cfg| mount(cfg, swagger_ui))
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, swagger_ui, "listening");
    health_state.mark_ready();
    Ok(server)
}
