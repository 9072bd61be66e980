#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ecoleta::api::{DynAPI, ItemAPI, LocalityAPI, PointAPI, API};
use ecoleta::entities::{
    City, Item, ItemRecord, NewPoint, Point, PointDetail, PointFilter, PointItem, Uf, CATALOG,
};
use ecoleta::error::{not_found_error, validation_error, Error, FieldError};
use ecoleta::server::{router, Uploads};

pub const UPLOADS_URL: &str = "http://localhost:3333/uploads";
pub const BOUNDARY: &str = "----ecoleta-test-boundary";

/// In-memory stand-in for the Postgres engine.
pub struct FakeApi {
    items: Vec<Item>,
    pub points: Mutex<Vec<(Point, Vec<i32>)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        let items = CATALOG
            .iter()
            .enumerate()
            .map(|(index, (title, image))| {
                ItemRecord {
                    id: index as i32 + 1,
                    title: title.to_string(),
                    image: image.to_string(),
                }
                .into_item(UPLOADS_URL)
            })
            .collect();

        Self {
            items,
            points: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ItemAPI for FakeApi {
    async fn list_items(&self) -> Result<Vec<Item>, Error> {
        Ok(self.items.clone())
    }
}

#[async_trait]
impl PointAPI for FakeApi {
    async fn list_points(&self, filter: PointFilter) -> Result<Vec<Point>, Error> {
        let points = self.points.lock().unwrap();

        Ok(points
            .iter()
            .filter(|(point, _)| filter.city.as_ref().map_or(true, |city| &point.city == city))
            .filter(|(point, _)| filter.uf.as_ref().map_or(true, |uf| &point.uf == uf))
            .filter(|(_, items)| {
                filter
                    .items
                    .as_ref()
                    .map_or(true, |wanted| items.iter().any(|id| wanted.contains(id)))
            })
            .map(|(point, _)| point.clone())
            .collect())
    }

    async fn find_point(&self, id: i32) -> Result<PointDetail, Error> {
        let points = self.points.lock().unwrap();
        let (point, ids) = points
            .iter()
            .find(|(point, _)| point.id == id)
            .ok_or_else(not_found_error)?;

        let items = self
            .items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .map(|item| PointItem {
                id: item.id,
                title: item.title.clone(),
            })
            .collect();

        Ok(PointDetail {
            point: point.clone(),
            items,
        })
    }

    async fn create_point(&self, point: NewPoint, image: String) -> Result<Point, Error> {
        let unknown: Vec<String> = point
            .items
            .iter()
            .filter(|id| !self.items.iter().any(|item| item.id == **id))
            .map(|id| id.to_string())
            .collect();

        if !unknown.is_empty() {
            return Err(validation_error(vec![FieldError::new(
                "items",
                format!("unknown item ids: {}", unknown.join(",")),
            )]));
        }

        let mut points = self.points.lock().unwrap();
        let ids = point.items.clone();
        let created = point.into_point(points.len() as i32 + 1, image, UPLOADS_URL);

        points.push((created.clone(), ids));

        Ok(created)
    }
}

#[async_trait]
impl LocalityAPI for FakeApi {
    async fn list_ufs(&self) -> Result<Vec<Uf>, Error> {
        Ok(vec![Uf("PE".into()), Uf("SP".into())])
    }

    async fn list_cities(&self, uf: Uf) -> Result<Vec<City>, Error> {
        match uf.0.as_str() {
            "PE" => Ok(vec![City("Recife".into()), City("Olinda".into())]),
            _ => Ok(vec![]),
        }
    }
}

impl API for FakeApi {}

pub struct TestApp {
    pub router: Router,
    pub api: Arc<FakeApi>,
    pub uploads: TempDir,
}

pub fn app() -> TestApp {
    let api = Arc::new(FakeApi::new());
    let uploads = tempfile::tempdir().unwrap();

    let dyn_api: DynAPI = api.clone();
    let router = router(dyn_api, Uploads::new(uploads.path(), 1024));

    TestApp {
        router,
        api,
        uploads,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<axum::body::BoxBody> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<axum::body::BoxBody> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&self, body: Vec<u8>) -> Response<axum::body::BoxBody> {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/points")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub fn stored_uploads(&self) -> Vec<String> {
        std::fs::read_dir(self.uploads.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

pub async fn json_body(response: Response<axum::body::BoxBody>) -> Value {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Builds a `multipart/form-data` body delimited by [`BOUNDARY`].
#[derive(Default)]
pub struct Form {
    body: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }
}

/// A complete, valid create-point form.
pub fn valid_point() -> Form {
    Form::new()
        .text("name", "Mercado Verde")
        .text("email", "contato@mercadoverde.com.br")
        .text("whatsapp", "81999990000")
        .text("latitude", "-8.0476")
        .text("longitude", "-34.877")
        .text("city", "Recife")
        .text("uf", "PE")
        .text("items", "1,2")
        .file("image", "fachada.png", "image/png", &[0x89, 0x50, 0x4e, 0x47])
}
