use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;
use crate::validation::{parse_id_list, Violations};

/// A collection point as exposed by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    pub image: String,
    pub image_url: String,
}

/// Row of the `points` table.
#[derive(Clone, Debug, FromRow)]
pub struct PointRecord {
    pub id: i32,
    pub image: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
}

impl PointRecord {
    pub fn into_point(self, uploads_url: &str) -> Point {
        Point {
            id: self.id,
            image_url: format!("{}/{}", uploads_url, self.image),
            image: self.image,
            name: self.name,
            email: self.email,
            whatsapp: self.whatsapp,
            latitude: self.latitude,
            longitude: self.longitude,
            city: self.city,
            uf: self.uf,
        }
    }
}

/// Item accepted by a point, as listed in the point detail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PointItem {
    pub id: i32,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointDetail {
    pub point: Point,
    pub items: Vec<PointItem>,
}

/// A validated point, ready to be inserted.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPoint {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    pub items: Vec<i32>,
}

impl NewPoint {
    pub fn into_point(self, id: i32, image: String, uploads_url: &str) -> Point {
        PointRecord {
            id,
            image,
            name: self.name,
            email: self.email,
            whatsapp: self.whatsapp,
            latitude: self.latitude,
            longitude: self.longitude,
            city: self.city,
            uf: self.uf,
        }
        .into_point(uploads_url)
    }
}

/// Accepted image content types and the extension they are stored under.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Extension matching the declared content type, or `None` when the type
    /// is not an accepted image format. The client's file name plays no part.
    pub fn extension(&self) -> Option<&'static str> {
        let mime = self.content_type.as_deref()?;
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        IMAGE_TYPES
            .iter()
            .find(|(content_type, _)| *content_type == essence)
            .map(|(_, extension)| *extension)
    }
}

/// Raw fields of the create-point form, before validation.
#[derive(Debug, Default)]
pub struct PointForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub city: Option<String>,
    pub uf: Option<String>,
    pub items: Option<String>,
    pub image: Option<ImageUpload>,
    pub unknown: Vec<String>,
}

impl PointForm {
    /// Records a text field. Later values for the same name win.
    pub fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "whatsapp" => &mut self.whatsapp,
            "latitude" => &mut self.latitude,
            "longitude" => &mut self.longitude,
            "city" => &mut self.city,
            "uf" => &mut self.uf,
            "items" => &mut self.items,
            _ => {
                if !self.unknown.iter().any(|name| name == field) {
                    self.unknown.push(field.to_string());
                }
                return;
            }
        };

        *slot = Some(value);
    }

    pub fn validate(self, max_image_bytes: usize) -> Result<(NewPoint, ImageUpload), Error> {
        let mut violations = Violations::new();

        let name = violations.required_text("name", self.name.as_deref());
        let email = violations.email("email", self.email.as_deref());
        let whatsapp = violations.required_text("whatsapp", self.whatsapp.as_deref());
        let latitude = violations.coordinate("latitude", self.latitude.as_deref(), 90.0);
        let longitude = violations.coordinate("longitude", self.longitude.as_deref(), 180.0);
        let city = violations.required_text("city", self.city.as_deref());
        let uf = violations.uf("uf", self.uf.as_deref());
        let items = violations.id_list("items", self.items.as_deref());

        let image = match self.image {
            None => {
                violations.add("image", "is required");
                None
            }
            Some(image) if image.bytes.is_empty() => {
                violations.add("image", "must not be empty");
                None
            }
            Some(image) if image.extension().is_none() => {
                violations.add("image", "must be a PNG, JPEG, GIF or WebP image");
                None
            }
            Some(image) if image.bytes.len() > max_image_bytes => {
                violations.add(
                    "image",
                    format!("must be at most {} bytes", max_image_bytes),
                );
                None
            }
            Some(image) => Some(image),
        };

        for field in &self.unknown {
            violations.add(field, "is not allowed");
        }

        match (name, email, whatsapp, latitude, longitude, city, uf, items, image) {
            (
                Some(name),
                Some(email),
                Some(whatsapp),
                Some(latitude),
                Some(longitude),
                Some(city),
                Some(uf),
                Some(items),
                Some(image),
            ) if violations.is_empty() => Ok((
                NewPoint {
                    name,
                    email,
                    whatsapp,
                    latitude,
                    longitude,
                    city,
                    uf,
                    items,
                },
                image,
            )),
            _ => Err(violations.into_error()),
        }
    }
}

/// Optional narrowing of the point listing. A point matches `items` when it
/// accepts at least one of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointFilter {
    pub city: Option<String>,
    pub uf: Option<String>,
    pub items: Option<Vec<i32>>,
}

impl PointFilter {
    /// Blank parameters count as absent.
    pub fn from_query(
        city: Option<&str>,
        uf: Option<&str>,
        items: Option<&str>,
    ) -> Result<Self, Error> {
        let mut violations = Violations::new();

        let city = non_blank(city).map(str::to_string);
        let uf = non_blank(uf).map(str::to_ascii_uppercase);
        let items = match non_blank(items) {
            Some(raw) => match parse_id_list(raw) {
                Some(ids) => Some(ids),
                None => {
                    violations.add("items", "must be a comma-separated list of item ids");
                    None
                }
            },
            None => None,
        };

        violations.finish(|| PointFilter { city, uf, items })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
