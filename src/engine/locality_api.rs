use super::Engine;

use async_trait::async_trait;

use crate::{
    api::LocalityAPI,
    entities::{City, Uf},
    error::Error,
    external::ibge,
};

#[async_trait]
impl LocalityAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_ufs(&self) -> Result<Vec<Uf>, Error> {
        ibge::list_ufs(&self.http, &self.ibge_api_base).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_cities(&self, uf: Uf) -> Result<Vec<City>, Error> {
        ibge::list_cities(&self.http, &self.ibge_api_base, &uf).await
    }
}
