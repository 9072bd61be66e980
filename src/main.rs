use ecoleta::config::Config;
use ecoleta::db::PgPool;
use ecoleta::engine::Engine;
use ecoleta::error::Error;
use ecoleta::server::{serve, Uploads};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let PgPool(pool) = PgPool::from_config(&config).await?;

    let engine = Engine::new(pool, &config).await?;
    engine.seed_items().await?;

    let uploads = Uploads::new(&config.uploads_dir, config.max_image_bytes);
    uploads.ensure_dir().await?;

    serve(engine, uploads, config.bind_address).await
}
