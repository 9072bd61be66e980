mod helpers;
mod item_api;
mod locality_api;
mod point_api;

use sqlx::{Executor, Pool, Postgres, Row};

use crate::{api::API, config::Config, entities::CATALOG, error::Error};

type Database = Postgres;

pub struct Engine {
    pool: Pool<Database>,
    http: reqwest::Client,
    uploads_url: String,
    ibge_api_base: String,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>, config: &Config) -> Result<Self, Error> {
        let mut tx = pool.begin().await?;

        // instances starting together must not race on the DDL
        tx.execute("SELECT pg_advisory_xact_lock(7335012)").await?;

        // catalog service
        tx.execute(
            "CREATE TABLE IF NOT EXISTS items (id SERIAL PRIMARY KEY, title VARCHAR NOT NULL, image VARCHAR NOT NULL)",
        )
        .await?;

        // point service
        tx.execute("CREATE TABLE IF NOT EXISTS points (id SERIAL PRIMARY KEY, image VARCHAR NOT NULL, name VARCHAR NOT NULL, email VARCHAR NOT NULL, whatsapp VARCHAR NOT NULL, latitude DOUBLE PRECISION NOT NULL, longitude DOUBLE PRECISION NOT NULL, city VARCHAR NOT NULL, uf VARCHAR(2) NOT NULL)")
            .await?;
        tx.execute("CREATE TABLE IF NOT EXISTS point_items (id SERIAL PRIMARY KEY, point_id INT4 NOT NULL, item_id INT4 NOT NULL, CONSTRAINT fk_point_item_point FOREIGN KEY(point_id) REFERENCES points(id), CONSTRAINT fk_point_item_item FOREIGN KEY(item_id) REFERENCES items(id))")
            .await?;
        tx.execute("CREATE INDEX IF NOT EXISTS point_items_point_id_idx ON point_items (point_id)")
            .await?;

        tx.commit().await?;

        Ok(Self {
            pool,
            http: reqwest::Client::new(),
            uploads_url: config.uploads_url(),
            ibge_api_base: config.ibge_api_base.clone(),
        })
    }

    /// Inserts the item catalog when the table is empty. Returns the number
    /// of rows written.
    #[tracing::instrument(skip(self))]
    pub async fn seed_items(&self) -> Result<usize, Error> {
        let mut tx = self.pool.begin().await?;

        // concurrent starts must not seed twice
        tx.execute("LOCK TABLE items IN SHARE ROW EXCLUSIVE MODE")
            .await?;

        let count: i64 = tx
            .fetch_one(sqlx::query("SELECT COUNT(*) AS count FROM items"))
            .await?
            .try_get("count")?;

        if count > 0 {
            return Ok(0);
        }

        for (title, image) in CATALOG {
            tx.execute(
                sqlx::query("INSERT INTO items (title, image) VALUES ($1, $2)")
                    .bind(title)
                    .bind(image),
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(count = CATALOG.len(), "seeded item catalog");

        Ok(CATALOG.len())
    }
}

impl API for Engine {}
