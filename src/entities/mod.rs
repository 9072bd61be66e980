mod item;
mod locality;
mod point;

pub use item::{Item, ItemRecord, CATALOG};
pub use locality::{City, Uf};
pub use point::{
    ImageUpload, NewPoint, Point, PointDetail, PointFilter, PointForm, PointItem, PointRecord,
};
