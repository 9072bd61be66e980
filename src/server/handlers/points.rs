use std::sync::Arc;

use axum::extract::multipart::Field;
use axum::extract::{Extension, Json, Multipart, Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use serde::Deserialize;

use crate::entities::{ImageUpload, Point, PointDetail, PointFilter, PointForm};
use crate::error::{not_found_error, payload_too_large_error, Error};
use crate::server::{DynAPI, Uploads};
use crate::validation::MAX_TEXT_LEN;

/// Enough bytes for `MAX_TEXT_LEN` characters of any UTF-8 width.
const MAX_TEXT_FIELD_BYTES: usize = MAX_TEXT_LEN * 4;
const MAX_FORM_FIELDS: usize = 32;
/// Allowance for the text fields and multipart framing on top of the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    city: Option<String>,
    uf: Option<String>,
    items: Option<String>,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Point>>, Error> {
    let filter = PointFilter::from_query(
        params.city.as_deref(),
        params.uf.as_deref(),
        params.items.as_deref(),
    )?;

    let points = api.list_points(filter).await?;

    Ok(points.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<PointDetail>, Error> {
    let id: i32 = id.parse().map_err(|_| not_found_error())?;
    let point = api.find_point(id).await?;

    Ok(point.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Extension(uploads): Extension<Arc<Uploads>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Point>), Error> {
    let limit = uploads.max_image_bytes() + FORM_OVERHEAD_BYTES;
    if declared_length(&headers).map_or(false, |length| length > limit) {
        return Err(payload_too_large_error());
    }

    let form = read_form(multipart, uploads.max_image_bytes()).await?;
    let (new_point, image) = form.validate(uploads.max_image_bytes())?;

    let stored = uploads.store(&image).await?;

    match api.create_point(new_point, stored.clone()).await {
        Ok(point) => Ok((StatusCode::CREATED, point.into())),
        Err(err) => {
            uploads.discard(&stored).await;
            Err(err)
        }
    }
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Collects the multipart fields. Each field is read at most one chunk past
/// its limit, enough for validation to reject it; the rest of an oversized
/// field is skipped without being buffered.
async fn read_form(mut multipart: Multipart, max_image_bytes: usize) -> Result<PointForm, Error> {
    let mut form = PointForm::default();
    let mut fields = 0;

    while let Some(mut field) = multipart.next_field().await? {
        fields += 1;
        if fields > MAX_FORM_FIELDS {
            return Err(payload_too_large_error());
        }

        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        if name != "image" {
            let value = read_capped(&mut field, MAX_TEXT_FIELD_BYTES).await?;
            form.set(&name, String::from_utf8_lossy(&value).into_owned());
            continue;
        }

        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field.content_type().map(|mime| mime.to_string());
        let bytes = read_capped(&mut field, max_image_bytes).await?;

        form.image = Some(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(form)
}

async fn read_capped(field: &mut Field<'_>, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes: Vec<u8> = Vec::new();

    while let Some(chunk) = field.chunk().await? {
        bytes.extend_from_slice(&chunk);

        if bytes.len() > limit {
            break;
        }
    }

    Ok(bytes)
}
