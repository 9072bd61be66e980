use super::helpers::{
    ensure_items_exist, fetch_point, fetch_point_items, link_items, POINT_COLUMNS,
};
use super::{Database, Engine};

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{Executor, QueryBuilder, Row};

use crate::{
    api::PointAPI,
    entities::{NewPoint, Point, PointDetail, PointFilter, PointRecord},
    error::Error,
};

/// `SELECT` for the point listing. Only the filters present add clauses,
/// and with `items` a point is listed once however many of them it accepts.
fn points_query(filter: PointFilter) -> QueryBuilder<'static, Database> {
    let mut query = QueryBuilder::new(format!("SELECT DISTINCT {} FROM points", POINT_COLUMNS));

    if let Some(items) = filter.items {
        query
            .push(" JOIN point_items ON point_items.point_id = points.id AND point_items.item_id = ANY(")
            .push_bind(items)
            .push(")");
    }

    query.push(" WHERE TRUE");

    if let Some(city) = filter.city {
        query.push(" AND points.city = ").push_bind(city);
    }

    if let Some(uf) = filter.uf {
        query.push(" AND points.uf = ").push_bind(uf);
    }

    query.push(" ORDER BY points.id");

    query
}

#[async_trait]
impl PointAPI for Engine {
    #[tracing::instrument(
        skip(self, filter),
        fields(city = ?filter.city, uf = ?filter.uf, items = ?filter.items)
    )]
    async fn list_points(&self, filter: PointFilter) -> Result<Vec<Point>, Error> {
        let mut query = points_query(filter);

        let points = query
            .build_query_as::<PointRecord>()
            .fetch(&self.pool)
            .map_ok(|record| record.into_point(&self.uploads_url))
            .try_collect()
            .await?;

        Ok(points)
    }

    #[tracing::instrument(skip(self))]
    async fn find_point(&self, id: i32) -> Result<PointDetail, Error> {
        let point = fetch_point(&self.pool, id).await?;
        let items = fetch_point_items(&self.pool, id).await?;

        Ok(PointDetail {
            point: point.into_point(&self.uploads_url),
            items,
        })
    }

    #[tracing::instrument(skip(self, point), fields(city = %point.city, uf = %point.uf))]
    async fn create_point(&self, point: NewPoint, image: String) -> Result<Point, Error> {
        let mut tx = self.pool.begin().await?;

        ensure_items_exist(&mut tx, &point.items).await?;

        let id: i32 = tx
            .fetch_one(
                sqlx::query("INSERT INTO points (image, name, email, whatsapp, latitude, longitude, city, uf) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id")
                    .bind(&image)
                    .bind(&point.name)
                    .bind(&point.email)
                    .bind(&point.whatsapp)
                    .bind(point.latitude)
                    .bind(point.longitude)
                    .bind(&point.city)
                    .bind(&point.uf),
            )
            .await?
            .try_get("id")?;

        link_items(&mut tx, id, &point.items).await?;

        tx.commit().await?;

        tracing::info!(point_id = id, items = point.items.len(), "point created");

        Ok(point.into_point(id, image, &self.uploads_url))
    }
}
