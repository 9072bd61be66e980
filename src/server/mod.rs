mod handlers;
mod uploads;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, HeaderValue, StatusCode},
    routing::{get, get_service},
    Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::api::API;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{items, localities, points};

pub use crate::api::DynAPI;
pub use uploads::Uploads;

pub fn router(api: DynAPI, uploads: Uploads) -> Router {
    let files = get_service(ServeDir::new(uploads.dir())).handle_error(|err: io::Error| async move {
        tracing::error!(error = %err, "failed to serve upload");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    });

    Router::new()
        .route("/items", get(items::list))
        .route("/points", get(points::list).post(points::create))
        .route("/points/:id", get(points::find))
        .route("/localities/ufs", get(localities::list_ufs))
        .route("/localities/ufs/:uf/cities", get(localities::list_cities))
        .nest("/uploads", files)
        .layer(Extension(api))
        .layer(Extension(Arc::new(uploads)))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve<T: API + Sync + Send + 'static>(
    api: T,
    uploads: Uploads,
    addr: SocketAddr,
) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;

    let app = router(api, uploads);

    let server = axum::Server::try_bind(&addr).map_err(|err| {
        tracing::error!(error = %err, %addr, "could not bind");
        unexpected_error()
    })?;

    tracing::info!("listening on {}", addr);

    server.serve(app.into_make_service()).await.map_err(|err| {
        tracing::error!(error = %err, "server stopped");
        unexpected_error()
    })
}
