//! Locking policy for the treatment details of a clinical record.
//!
//! Only orthodontics and cleaning may span several teeth in one record. Any
//! other treatment is limited to a single detail, and a consultation needs no
//! tooth or surface at all.

use serde::Serialize;
use thiserror::Error;

use crate::domain::catalog::{ClinicalCatalog, Treatment, TreatmentKind};
use crate::domain::clinical_record::TreatmentDetail;
use crate::domain::types::{SurfaceId, ToothId, TreatmentId};

/// Which treatments may still be added to a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DetailLock {
    /// Empty record, anything goes.
    None,
    Orthodontics,
    Cleaning,
    /// A single-detail treatment is present.
    Closed,
}

/// Rejections shown to the user as warnings. The draft is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanWarning {
    #[error("Debe seleccionar un Tratamiento.")]
    MissingTreatment,
    #[error("Tratamiento desconocido.")]
    UnknownTreatment,
    #[error("Debe seleccionar la Pieza dental.")]
    MissingTooth,
    #[error("Debe seleccionar la Cara dental.")]
    MissingSurface,
    #[error("Pieza o cara dental desconocida.")]
    UnknownPosition,
    #[error("Solo se puede agregar un detalle para tratamientos que no sean Ortodoncia o Limpieza.")]
    Closed,
    #[error("Este registro solo admite detalles de {0}.")]
    LockedTo(&'static str),
    #[error("No se puede repetir diente y cara.")]
    Duplicate,
    #[error("Debe agregar al menos un detalle de tratamiento.")]
    Empty,
}

/// Detail as selected in the form, before validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetailCandidate {
    pub treatment_id: Option<TreatmentId>,
    pub tooth_id: Option<ToothId>,
    pub surface_id: Option<SurfaceId>,
}

/// Working list of treatment details for one record.
#[derive(Clone, Debug)]
pub struct TreatmentPlan<'a> {
    catalog: &'a ClinicalCatalog,
    details: Vec<TreatmentDetail>,
}

impl<'a> TreatmentPlan<'a> {
    /// Wraps details that were already accepted, such as those loaded from the backend.
    pub fn new(catalog: &'a ClinicalCatalog, details: Vec<TreatmentDetail>) -> Self {
        Self { catalog, details }
    }

    /// Replays submitted details through [`TreatmentPlan::add`], so a crafted
    /// form is held to the same rules as the interactive editor.
    pub fn from_candidates(
        catalog: &'a ClinicalCatalog,
        candidates: &[DetailCandidate],
    ) -> Result<Self, PlanWarning> {
        let mut plan = Self::new(catalog, Vec::new());
        for candidate in candidates {
            plan.add(*candidate)?;
        }
        Ok(plan)
    }

    pub fn details(&self) -> &[TreatmentDetail] {
        &self.details
    }

    pub fn lock(&self) -> DetailLock {
        let has = |kind| {
            self.details
                .iter()
                .any(|d| self.catalog.treatments.kind_of(d.treatment_id) == Some(kind))
        };

        if has(TreatmentKind::Orthodontics) {
            DetailLock::Orthodontics
        } else if has(TreatmentKind::Cleaning) {
            DetailLock::Cleaning
        } else if self.details.is_empty() {
            DetailLock::None
        } else {
            DetailLock::Closed
        }
    }

    /// Treatments the type selector may offer.
    pub fn selectable_treatments(&self) -> Vec<&'a Treatment> {
        let lock = self.lock();
        self.catalog
            .treatments
            .treatments()
            .iter()
            .filter(|t| self.permits(lock, t.id).is_ok())
            .collect()
    }

    fn permits(&self, lock: DetailLock, treatment_id: TreatmentId) -> Result<(), PlanWarning> {
        let kind = self.catalog.treatments.kind_of(treatment_id);
        match lock {
            DetailLock::None => Ok(()),
            DetailLock::Closed => Err(PlanWarning::Closed),
            DetailLock::Orthodontics if kind == Some(TreatmentKind::Orthodontics) => Ok(()),
            DetailLock::Orthodontics => Err(PlanWarning::LockedTo("Ortodoncia")),
            DetailLock::Cleaning if kind == Some(TreatmentKind::Cleaning) => Ok(()),
            DetailLock::Cleaning => Err(PlanWarning::LockedTo("Limpieza")),
        }
    }

    /// Validates and appends a detail.
    ///
    /// Checks run in order: treatment chosen, tooth and surface present
    /// (unless consultation), lock allows it, not a duplicate.
    pub fn add(&mut self, candidate: DetailCandidate) -> Result<(), PlanWarning> {
        let treatment_id = candidate.treatment_id.ok_or(PlanWarning::MissingTreatment)?;
        let treatment = self
            .catalog
            .treatments
            .get(treatment_id)
            .ok_or(PlanWarning::UnknownTreatment)?;

        let is_consultation =
            self.catalog.treatments.kind_of(treatment_id) == Some(TreatmentKind::Consultation);
        if !is_consultation {
            if candidate.tooth_id.is_none() {
                return Err(PlanWarning::MissingTooth);
            }
            if candidate.surface_id.is_none() {
                return Err(PlanWarning::MissingSurface);
            }
        }

        let tooth = match candidate.tooth_id {
            Some(id) => Some(
                self.catalog
                    .tooth_number(id)
                    .ok_or(PlanWarning::UnknownPosition)?,
            ),
            None => None,
        };
        let surface = match candidate.surface_id {
            Some(id) => Some(
                self.catalog
                    .surfaces
                    .surfaces()
                    .iter()
                    .find(|s| s.id == id)
                    .ok_or(PlanWarning::UnknownPosition)?,
            ),
            None => None,
        };

        self.permits(self.lock(), treatment_id)?;

        let key = (treatment_id, candidate.tooth_id, candidate.surface_id);
        if self.details.iter().any(|d| d.key() == key) {
            return Err(PlanWarning::Duplicate);
        }

        self.details.push(TreatmentDetail {
            treatment_id,
            tooth_id: candidate.tooth_id,
            tooth,
            surface_id: candidate.surface_id,
            treatment_name: Some(treatment.name.to_string()),
            surface_name: surface.map(|s| s.name.to_string()),
        });
        Ok(())
    }

    /// Removes the detail at `index`; the lock follows the remaining details.
    pub fn remove(&mut self, index: usize) -> Option<TreatmentDetail> {
        (index < self.details.len()).then(|| self.details.remove(index))
    }

    /// Final list for saving; a record needs at least one detail.
    pub fn into_details(self) -> Result<Vec<TreatmentDetail>, PlanWarning> {
        if self.details.is_empty() {
            return Err(PlanWarning::Empty);
        }
        Ok(self.details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::fixtures::*;

    fn tooth_id(catalog: &ClinicalCatalog, code: u8) -> ToothId {
        catalog
            .teeth
            .iter()
            .find(|t| t.code.get() == code)
            .map(|t| t.id)
            .unwrap()
    }

    fn candidate(
        catalog: &ClinicalCatalog,
        treatment: i32,
        tooth: Option<u8>,
        surface: Option<i32>,
    ) -> DetailCandidate {
        DetailCandidate {
            treatment_id: Some(treatment_id(treatment)),
            tooth_id: tooth.map(|code| tooth_id(catalog, code)),
            surface_id: surface.map(surface_id),
        }
    }

    #[test]
    fn empty_plan_offers_every_treatment() {
        let catalog = catalog();
        let plan = TreatmentPlan::new(&catalog, vec![]);

        assert_eq!(plan.lock(), DetailLock::None);
        assert_eq!(
            plan.selectable_treatments().len(),
            catalog.treatments.treatments().len()
        );
    }

    #[test]
    fn orthodontics_locks_selector() {
        let catalog = catalog();
        let mut plan = TreatmentPlan::new(&catalog, vec![]);
        plan.add(candidate(&catalog, ORTHODONTICS, Some(11), Some(VESTIBULAR)))
            .unwrap();

        assert_eq!(plan.lock(), DetailLock::Orthodontics);
        let selectable: Vec<_> = plan.selectable_treatments().iter().map(|t| t.id).collect();
        assert_eq!(selectable, vec![treatment_id(ORTHODONTICS)]);

        plan.add(candidate(&catalog, ORTHODONTICS, Some(21), Some(VESTIBULAR)))
            .unwrap();
        assert_eq!(
            plan.add(candidate(&catalog, CARIES, Some(31), Some(MESIAL))),
            Err(PlanWarning::LockedTo("Ortodoncia"))
        );
        assert_eq!(plan.details().len(), 2);
    }

    #[test]
    fn cleaning_locks_selector() {
        let catalog = catalog();
        let mut plan = TreatmentPlan::new(&catalog, vec![]);
        plan.add(candidate(&catalog, CLEANING, Some(11), Some(OCCLUSAL)))
            .unwrap();

        assert_eq!(plan.lock(), DetailLock::Cleaning);
        assert_eq!(
            plan.add(candidate(&catalog, ORTHODONTICS, Some(12), Some(OCCLUSAL))),
            Err(PlanWarning::LockedTo("Limpieza"))
        );
    }

    #[test]
    fn single_detail_treatment_closes_plan() {
        let catalog = catalog();
        let mut plan = TreatmentPlan::new(&catalog, vec![]);
        plan.add(candidate(&catalog, CARIES, Some(11), Some(MESIAL)))
            .unwrap();

        assert_eq!(plan.lock(), DetailLock::Closed);
        assert!(plan.selectable_treatments().is_empty());
        assert_eq!(
            plan.add(candidate(&catalog, CARIES, Some(12), Some(MESIAL))),
            Err(PlanWarning::Closed)
        );
        assert_eq!(plan.details().len(), 1);
    }

    #[test]
    fn duplicate_triple_is_rejected() {
        let catalog = catalog();
        let mut plan = TreatmentPlan::new(&catalog, vec![]);
        let detail = candidate(&catalog, ORTHODONTICS, Some(11), Some(VESTIBULAR));
        plan.add(detail).unwrap();

        assert_eq!(plan.add(detail), Err(PlanWarning::Duplicate));
        assert_eq!(plan.details().len(), 1);
    }

    #[test]
    fn consultation_needs_no_tooth() {
        let catalog = catalog();
        let mut plan = TreatmentPlan::new(&catalog, vec![]);

        plan.add(candidate(&catalog, CONSULTATION, None, None)).unwrap();

        assert_eq!(plan.details()[0].tooth, None);
        assert_eq!(plan.details()[0].treatment_name.as_deref(), Some("Consulta"));
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        let catalog = catalog();
        let mut plan = TreatmentPlan::new(&catalog, vec![]);

        assert_eq!(
            plan.add(DetailCandidate::default()),
            Err(PlanWarning::MissingTreatment)
        );
        assert_eq!(
            plan.add(candidate(&catalog, CARIES, None, Some(MESIAL))),
            Err(PlanWarning::MissingTooth)
        );
        assert_eq!(
            plan.add(candidate(&catalog, CARIES, Some(11), None)),
            Err(PlanWarning::MissingSurface)
        );
        assert!(plan.details().is_empty());
    }

    #[test]
    fn removing_last_special_detail_reopens_plan() {
        let catalog = catalog();
        let mut plan = TreatmentPlan::new(&catalog, vec![]);
        plan.add(candidate(&catalog, ORTHODONTICS, Some(11), Some(VESTIBULAR)))
            .unwrap();

        assert!(plan.remove(0).is_some());
        assert!(plan.remove(0).is_none());
        assert_eq!(plan.lock(), DetailLock::None);
    }

    #[test]
    fn submitted_details_are_revalidated() {
        let catalog = catalog();
        let crafted = [
            candidate(&catalog, CARIES, Some(11), Some(MESIAL)),
            candidate(&catalog, CROWN, Some(12), Some(MESIAL)),
        ];

        let result = TreatmentPlan::from_candidates(&catalog, &crafted);

        assert_eq!(result.err(), Some(PlanWarning::Closed));
    }

    #[test]
    fn saving_requires_a_detail() {
        let catalog = catalog();
        let plan = TreatmentPlan::new(&catalog, vec![]);

        assert_eq!(plan.into_details(), Err(PlanWarning::Empty));
    }
}
