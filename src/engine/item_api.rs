use super::Engine;

use async_trait::async_trait;
use futures::TryStreamExt;

use crate::{
    api::ItemAPI,
    entities::{Item, ItemRecord},
    error::Error,
};

#[async_trait]
impl ItemAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_items(&self) -> Result<Vec<Item>, Error> {
        let items = sqlx::query_as::<_, ItemRecord>("SELECT id, title, image FROM items ORDER BY id")
            .fetch(&self.pool)
            .map_ok(|record| record.into_item(&self.uploads_url))
            .try_collect()
            .await?;

        Ok(items)
    }
}
