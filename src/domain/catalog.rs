//! Backend catalogs and their typed interpretation.
//!
//! The backend identifies treatments and tooth surfaces by numeric ids that
//! differ between installations. The catalogs below resolve those ids into
//! [`TreatmentKind`] / [`SurfaceKind`] once, by name, so the rest of the
//! domain never compares against magic numbers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CatalogItemId, CatalogName, SurfaceId, ToothId, ToothNumber, TreatmentId, fold_name,
};

/// Treatment type as listed by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub id: TreatmentId,
    pub name: CatalogName,
}

/// Dental piece as listed by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooth {
    pub id: ToothId,
    pub code: ToothNumber,
}

/// Tooth surface (cara dental) as listed by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToothSurface {
    pub id: SurfaceId,
    pub name: CatalogName,
}

/// Generic `{ id, name }` catalog entry (genders, insurers, antecedents, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub name: CatalogName,
}

/// Editable catalogs exposed on the catalog administration pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogKind {
    Treatments,
    Antecedents,
    FunctionalAnalyses,
    HealthInsurers,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 4] = [
        CatalogKind::Treatments,
        CatalogKind::Antecedents,
        CatalogKind::FunctionalAnalyses,
        CatalogKind::HealthInsurers,
    ];

    /// URL slug used by the catalog routes.
    pub fn slug(self) -> &'static str {
        match self {
            CatalogKind::Treatments => "treatments",
            CatalogKind::Antecedents => "antecedents",
            CatalogKind::FunctionalAnalyses => "functional-analyses",
            CatalogKind::HealthInsurers => "health-insurers",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    /// Human readable title shown in the UI.
    pub fn title(self) -> &'static str {
        match self {
            CatalogKind::Treatments => "Tratamientos",
            CatalogKind::Antecedents => "Antecedentes",
            CatalogKind::FunctionalAnalyses => "Análisis funcional",
            CatalogKind::HealthInsurers => "Obras sociales",
        }
    }
}

/// Treatment semantics the application cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreatmentKind {
    Caries,
    Extraction,
    Crown,
    RootCanal,
    Filtration,
    Fracture,
    Orthodontics,
    Cleaning,
    Consultation,
}

impl TreatmentKind {
    const ALL: [TreatmentKind; 9] = [
        TreatmentKind::Caries,
        TreatmentKind::Extraction,
        TreatmentKind::Crown,
        TreatmentKind::RootCanal,
        TreatmentKind::Filtration,
        TreatmentKind::Fracture,
        TreatmentKind::Orthodontics,
        TreatmentKind::Cleaning,
        TreatmentKind::Consultation,
    ];

    fn aliases(self) -> &'static [&'static str] {
        match self {
            TreatmentKind::Caries => &["caries", "carie"],
            TreatmentKind::Extraction => &["extraccion"],
            TreatmentKind::Crown => &["corona"],
            TreatmentKind::RootCanal => &["conducto", "tratamiento de conducto", "endodoncia"],
            TreatmentKind::Filtration => &["filtracion", "filtrado"],
            TreatmentKind::Fracture => &["fractura"],
            TreatmentKind::Orthodontics => &["ortodoncia"],
            TreatmentKind::Cleaning => &["limpieza"],
            TreatmentKind::Consultation => &["consulta"],
        }
    }

    /// Resolves a catalog name, ignoring case and accents.
    pub fn from_name(name: &str) -> Option<Self> {
        let folded = fold_name(name);
        Self::ALL
            .into_iter()
            .find(|kind| kind.aliases().contains(&folded.as_str()))
    }

    /// Treatments allowed to appear several times in one record.
    pub fn allows_multiple_details(self) -> bool {
        matches!(self, TreatmentKind::Orthodontics | TreatmentKind::Cleaning)
    }

    /// Consultations are not tied to a tooth or surface.
    pub fn requires_tooth(self) -> bool {
        self != TreatmentKind::Consultation
    }
}

/// Anatomical tooth surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    Vestibular,
    Lingual,
    Mesial,
    Distal,
    Occlusal,
}

impl SurfaceKind {
    const ALL: [SurfaceKind; 5] = [
        SurfaceKind::Vestibular,
        SurfaceKind::Lingual,
        SurfaceKind::Mesial,
        SurfaceKind::Distal,
        SurfaceKind::Occlusal,
    ];

    fn aliases(self) -> &'static [&'static str] {
        match self {
            SurfaceKind::Vestibular => &["vestibular", "bucal"],
            SurfaceKind::Lingual => &["lingual", "palatino", "palatina"],
            SurfaceKind::Mesial => &["mesial"],
            SurfaceKind::Distal => &["distal"],
            SurfaceKind::Occlusal => &["oclusal", "incisal"],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let folded = fold_name(name);
        Self::ALL
            .into_iter()
            .find(|kind| kind.aliases().contains(&folded.as_str()))
    }
}

/// Treatment catalog with kinds resolved once at load time.
#[derive(Clone, Debug, Default)]
pub struct TreatmentCatalog {
    treatments: Vec<Treatment>,
    kinds: HashMap<TreatmentId, TreatmentKind>,
}

impl TreatmentCatalog {
    pub fn new(treatments: Vec<Treatment>) -> Self {
        let kinds = treatments
            .iter()
            .filter_map(|t| TreatmentKind::from_name(t.name.as_str()).map(|kind| (t.id, kind)))
            .collect();
        Self { treatments, kinds }
    }

    pub fn treatments(&self) -> &[Treatment] {
        &self.treatments
    }

    pub fn get(&self, id: TreatmentId) -> Option<&Treatment> {
        self.treatments.iter().find(|t| t.id == id)
    }

    /// Kind of a treatment id, `None` for catalog entries without special meaning.
    pub fn kind_of(&self, id: TreatmentId) -> Option<TreatmentKind> {
        self.kinds.get(&id).copied()
    }

    /// First catalog id resolved to `kind`.
    pub fn id_of(&self, kind: TreatmentKind) -> Option<TreatmentId> {
        self.treatments
            .iter()
            .find(|t| self.kinds.get(&t.id) == Some(&kind))
            .map(|t| t.id)
    }

    pub fn contains(&self, id: TreatmentId) -> bool {
        self.get(id).is_some()
    }
}

/// Surface catalog with kinds resolved once at load time.
#[derive(Clone, Debug, Default)]
pub struct SurfaceCatalog {
    surfaces: Vec<ToothSurface>,
    kinds: HashMap<SurfaceId, SurfaceKind>,
}

impl SurfaceCatalog {
    pub fn new(surfaces: Vec<ToothSurface>) -> Self {
        let kinds = surfaces
            .iter()
            .filter_map(|s| SurfaceKind::from_name(s.name.as_str()).map(|kind| (s.id, kind)))
            .collect();
        Self { surfaces, kinds }
    }

    pub fn surfaces(&self) -> &[ToothSurface] {
        &self.surfaces
    }

    pub fn kind_of(&self, id: SurfaceId) -> Option<SurfaceKind> {
        self.kinds.get(&id).copied()
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.surfaces.iter().any(|s| s.id == id)
    }
}

/// Everything needed to interpret treatment details.
#[derive(Clone, Debug, Default)]
pub struct ClinicalCatalog {
    pub treatments: TreatmentCatalog,
    pub surfaces: SurfaceCatalog,
    pub teeth: Vec<Tooth>,
}

impl ClinicalCatalog {
    pub fn new(treatments: Vec<Treatment>, surfaces: Vec<ToothSurface>, teeth: Vec<Tooth>) -> Self {
        Self {
            treatments: TreatmentCatalog::new(treatments),
            surfaces: SurfaceCatalog::new(surfaces),
            teeth,
        }
    }

    /// FDI code of a catalog tooth id.
    pub fn tooth_number(&self, id: ToothId) -> Option<ToothNumber> {
        self.teeth.iter().find(|t| t.id == id).map(|t| t.code)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn treatment_kinds_resolve_by_name() {
        let catalog = catalog();
        let kind = |id| catalog.treatments.kind_of(treatment_id(id));
        assert_eq!(kind(CARIES), Some(TreatmentKind::Caries));
        assert_eq!(kind(EXTRACTION), Some(TreatmentKind::Extraction));
        assert_eq!(kind(FILTRATION), Some(TreatmentKind::Filtration));
        assert_eq!(kind(WHITENING), None);
        assert_eq!(
            catalog.treatments.id_of(TreatmentKind::Orthodontics),
            Some(treatment_id(ORTHODONTICS))
        );
    }

    #[test]
    fn surface_kinds_resolve_by_name() {
        let catalog = catalog();
        assert_eq!(
            catalog.surfaces.kind_of(surface_id(VESTIBULAR)),
            Some(SurfaceKind::Vestibular)
        );
        assert_eq!(catalog.surfaces.kind_of(surface_id(CERVICAL)), None);
        assert!(catalog.surfaces.contains(surface_id(CERVICAL)));
    }

    #[test]
    fn catalog_kind_slugs_round_trip() {
        for kind in CatalogKind::ALL {
            assert_eq!(CatalogKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(CatalogKind::from_slug("nope"), None);
    }
}
