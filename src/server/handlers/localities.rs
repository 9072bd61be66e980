use axum::extract::{Extension, Json, Path};

use crate::entities::{City, Uf};
use crate::error::{validation_error, Error, FieldError};
use crate::server::DynAPI;
use crate::validation::is_uf;

pub async fn list_ufs(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Uf>>, Error> {
    let ufs = api.list_ufs().await?;

    Ok(ufs.into())
}

pub async fn list_cities(
    Extension(api): Extension<DynAPI>,
    Path(uf): Path<String>,
) -> Result<Json<Vec<City>>, Error> {
    if !is_uf(&uf) {
        return Err(validation_error(vec![FieldError::new(
            "uf",
            "must be a two-letter state code",
        )]));
    }

    let cities = api.list_cities(Uf(uf.to_ascii_uppercase())).await?;

    Ok(cities.into())
}
