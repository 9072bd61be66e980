use super::Database;

use sqlx::{Executor, Transaction};

use crate::{
    entities::{PointItem, PointRecord},
    error::{not_found_error, validation_error, Error, FieldError},
};

pub const POINT_COLUMNS: &str = "points.id, points.image, points.name, points.email, points.whatsapp, points.latitude, points.longitude, points.city, points.uf";

#[tracing::instrument(skip(executor))]
pub async fn fetch_point<'c, E>(executor: E, id: i32) -> Result<PointRecord, Error>
where
    E: Executor<'c, Database = Database>,
{
    let point = sqlx::query_as::<_, PointRecord>(&format!(
        "SELECT {} FROM points WHERE points.id = $1",
        POINT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| not_found_error())?;

    Ok(point)
}

#[tracing::instrument(skip(executor))]
pub async fn fetch_point_items<'c, E>(executor: E, point_id: i32) -> Result<Vec<PointItem>, Error>
where
    E: Executor<'c, Database = Database>,
{
    let items = sqlx::query_as::<_, PointItem>(
        "SELECT items.id, items.title FROM items JOIN point_items ON items.id = point_items.item_id WHERE point_items.point_id = $1 ORDER BY items.id",
    )
    .bind(point_id)
    .fetch_all(executor)
    .await?;

    Ok(items)
}

/// Fails with a validation error on `items` naming every id that is not in
/// the catalog.
#[tracing::instrument(skip(tx))]
pub async fn ensure_items_exist(
    tx: &mut Transaction<'_, Database>,
    ids: &[i32],
) -> Result<(), Error> {
    let known: Vec<i32> = sqlx::query_scalar::<_, i32>("SELECT id FROM items WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&mut *tx)
        .await?;

    let missing: Vec<String> = ids
        .iter()
        .filter(|id| !known.contains(*id))
        .map(|id| id.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(validation_error(vec![FieldError::new(
        "items",
        format!("unknown item ids: {}", missing.join(",")),
    )]))
}

#[tracing::instrument(skip(tx))]
pub async fn link_items(
    tx: &mut Transaction<'_, Database>,
    point_id: i32,
    ids: &[i32],
) -> Result<(), Error> {
    tx.execute(
        sqlx::query(
            "INSERT INTO point_items (point_id, item_id) SELECT $1, item_id FROM UNNEST($2::int4[]) AS item_id",
        )
        .bind(point_id)
        .bind(ids),
    )
    .await?;

    Ok(())
}
