use serde::Serialize;

use crate::domain::catalog::{CatalogItem, CatalogKind};

#[derive(Debug, Serialize)]
pub struct CatalogTab {
    pub slug: &'static str,
    pub title: &'static str,
    pub active: bool,
}

/// One editable catalog plus the tabs leading to the others.
#[derive(Debug, Serialize)]
pub struct CatalogPageData {
    pub kind: CatalogKind,
    pub slug: &'static str,
    pub title: &'static str,
    pub items: Vec<CatalogItem>,
    pub tabs: Vec<CatalogTab>,
}
