//! Administration of the editable catalogs.

use crate::domain::capabilities::Capability;
use crate::domain::catalog::{CatalogItem, CatalogKind};
use crate::domain::types::{CatalogItemId, CatalogName, fold_name};
use crate::dto::catalogs::{CatalogPageData, CatalogTab};
use crate::forms::catalogs::CatalogItemForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CatalogReader, CatalogWriter};
use crate::services::{ServiceError, ServiceResult, ensure_capability};

async fn items<R>(kind: CatalogKind, repo: &R) -> ServiceResult<Vec<CatalogItem>>
where
    R: CatalogReader + ?Sized,
{
    let items = repo.list_catalog(kind).await.map_err(|err| {
        log::error!("Failed to list catalog {}: {err}", kind.slug());
        err
    })?;
    Ok(items)
}

/// Validates the posted name and rejects a duplicate within the catalog.
fn unique_name(
    form: CatalogItemForm,
    existing: &[CatalogItem],
    editing: Option<CatalogItemId>,
) -> ServiceResult<CatalogName> {
    let name = CatalogName::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;
    let folded = fold_name(name.as_str());
    if existing
        .iter()
        .any(|item| Some(item.id) != editing && fold_name(item.name.as_str()) == folded)
    {
        return Err(ServiceError::Form(
            "Ya existe un elemento con ese nombre.".to_string(),
        ));
    }
    Ok(name)
}

pub async fn load_catalog<R>(
    kind: CatalogKind,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CatalogPageData>
where
    R: CatalogReader + ?Sized,
{
    ensure_capability(user, Capability::ManageCatalogs)?;

    let tabs = CatalogKind::ALL
        .into_iter()
        .map(|other| CatalogTab {
            slug: other.slug(),
            title: other.title(),
            active: other == kind,
        })
        .collect();

    Ok(CatalogPageData {
        kind,
        slug: kind.slug(),
        title: kind.title(),
        items: items(kind, repo).await?,
        tabs,
    })
}

pub async fn create_catalog_item<R>(
    kind: CatalogKind,
    form: CatalogItemForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CatalogReader + CatalogWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageCatalogs)?;

    let name = unique_name(form, &items(kind, repo).await?, None)?;
    repo.create_catalog_item(kind, &name).await.map_err(|err| {
        log::error!("Failed to create {} item: {err}", kind.slug());
        err
    })?;
    Ok(())
}

pub async fn rename_catalog_item<R>(
    kind: CatalogKind,
    id: CatalogItemId,
    form: CatalogItemForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CatalogReader + CatalogWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageCatalogs)?;

    let name = unique_name(form, &items(kind, repo).await?, Some(id))?;
    repo.rename_catalog_item(kind, id, &name)
        .await
        .map_err(|err| {
            log::error!("Failed to rename {} item {id}: {err}", kind.slug());
            err
        })?;
    Ok(())
}

pub async fn delete_catalog_item<R>(
    kind: CatalogKind,
    id: CatalogItemId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CatalogWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageCatalogs)?;

    repo.delete_catalog_item(kind, id).await.map_err(|err| {
        log::error!("Failed to delete {} item {id}: {err}", kind.slug());
        err
    })?;
    Ok(())
}
