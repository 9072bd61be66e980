use axum::extract::{Extension, Json};

use crate::entities::Item;
use crate::error::Error;
use crate::server::DynAPI;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Item>>, Error> {
    let items = api.list_items().await?;

    Ok(items.into())
}
