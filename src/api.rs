use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{City, Item, NewPoint, Point, PointDetail, PointFilter, Uf};
use crate::error::Error;

#[async_trait]
pub trait ItemAPI {
    async fn list_items(&self) -> Result<Vec<Item>, Error>;
}

#[async_trait]
pub trait PointAPI {
    async fn list_points(&self, filter: PointFilter) -> Result<Vec<Point>, Error>;
    async fn find_point(&self, id: i32) -> Result<PointDetail, Error>;
    /// `image` is the stored file name of the already-saved upload.
    async fn create_point(&self, point: NewPoint, image: String) -> Result<Point, Error>;
}

#[async_trait]
pub trait LocalityAPI {
    async fn list_ufs(&self) -> Result<Vec<Uf>, Error>;
    async fn list_cities(&self, uf: Uf) -> Result<Vec<City>, Error>;
}

pub trait API: ItemAPI + PointAPI + LocalityAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
