use serde::Deserialize;

use crate::{
    entities::{City, Uf},
    error::{invalid_input_error, upstream_error, Error},
};

#[derive(Clone, Debug, Deserialize)]
struct State {
    sigla: String,
}

#[derive(Clone, Debug, Deserialize)]
struct Municipality {
    nome: String,
}

/// Federative units, sorted by code.
#[tracing::instrument(skip(client))]
pub async fn list_ufs(client: &reqwest::Client, api_base: &str) -> Result<Vec<Uf>, Error> {
    let url = format!("{}/localidades/estados", api_base);

    let data: Vec<State> = fetch(client, url).await?;

    let mut ufs: Vec<Uf> = data.into_iter().map(|state| Uf(state.sigla)).collect();
    ufs.sort();

    Ok(ufs)
}

/// City names of one federative unit, in the order the API returns them.
#[tracing::instrument(skip(client))]
pub async fn list_cities(
    client: &reqwest::Client,
    api_base: &str,
    uf: &Uf,
) -> Result<Vec<City>, Error> {
    let url = format!("{}/localidades/estados/{}/municipios", api_base, uf.0);

    let data: Vec<Municipality> = fetch(client, url).await?;

    Ok(data.into_iter().map(|city| City(city.nome)).collect())
}

async fn fetch<T>(client: &reqwest::Client, url: String) -> Result<T, Error>
where
    T: for<'de> Deserialize<'de>,
{
    let res = client.get(url).send().await?;

    let status_code = res.status().as_u16();

    if (400..500).contains(&status_code) {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        tracing::warn!(status_code, "locality api answered with an error");
        return Err(upstream_error());
    }

    res.json().await.map_err(|err| {
        tracing::warn!(error = %err, "locality api sent an unexpected body");
        upstream_error()
    })
}
