use reqwest::Method;

use crate::domain::catalog::{CatalogItem, CatalogKind, Tooth, ToothSurface, Treatment};
use crate::domain::types::{CatalogItemId, CatalogName};
use crate::models::catalog::{CatalogRow, ToothRow, catalog_endpoint, catalog_payload};
use crate::repository::errors::RepositoryResult;
use crate::repository::rest::convert_all;
use crate::repository::{CatalogReader, CatalogWriter, RestRepository};

impl CatalogReader for RestRepository {
    async fn list_treatments(&self) -> RepositoryResult<Vec<Treatment>> {
        let rows: Vec<CatalogRow> = self.get_list("historias_clinicas/tratamientos/", &[]).await?;
        convert_all(rows)
    }

    async fn list_teeth(&self) -> RepositoryResult<Vec<Tooth>> {
        let rows: Vec<ToothRow> = self.get_list("historias_clinicas/piezas/", &[]).await?;
        convert_all(rows)
    }

    async fn list_surfaces(&self) -> RepositoryResult<Vec<ToothSurface>> {
        let rows: Vec<CatalogRow> = self.get_list("historias_clinicas/caras/", &[]).await?;
        convert_all(rows)
    }

    async fn list_genders(&self) -> RepositoryResult<Vec<CatalogItem>> {
        let rows: Vec<CatalogRow> = self.get_list("pacientes/generos/", &[]).await?;
        convert_all(rows)
    }

    async fn list_catalog(&self, kind: CatalogKind) -> RepositoryResult<Vec<CatalogItem>> {
        let (path, _) = catalog_endpoint(kind);
        let rows: Vec<CatalogRow> = self.get_list(path, &[]).await?;
        let mut items: Vec<CatalogItem> = convert_all(rows)?;
        items.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(items)
    }
}

impl CatalogWriter for RestRepository {
    async fn create_catalog_item(&self, kind: CatalogKind, name: &CatalogName) -> RepositoryResult<()> {
        let (path, _) = catalog_endpoint(kind);
        self.send_discard(Method::POST, path, &catalog_payload(kind, name))
            .await
    }

    async fn rename_catalog_item(
        &self,
        kind: CatalogKind,
        id: CatalogItemId,
        name: &CatalogName,
    ) -> RepositoryResult<()> {
        let (path, _) = catalog_endpoint(kind);
        self.send_discard(
            Method::PATCH,
            &format!("{path}{id}/"),
            &catalog_payload(kind, name),
        )
        .await
    }

    async fn delete_catalog_item(&self, kind: CatalogKind, id: CatalogItemId) -> RepositoryResult<()> {
        let (path, _) = catalog_endpoint(kind);
        self.delete(&format!("{path}{id}/")).await
    }
}
