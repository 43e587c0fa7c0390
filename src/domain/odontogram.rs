//! Per-tooth visual state derived from a patient's clinical history.
//!
//! The state is never stored. It is recomputed from the full record list every
//! time a chart is shown: records are replayed in ascending start date (ties
//! broken by record id) and every treatment detail writes a [`Mark`] onto its
//! tooth, so later records overwrite earlier ones.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::domain::catalog::{ClinicalCatalog, SurfaceKind, TreatmentKind};
use crate::domain::clinical_record::{ClinicalRecord, TreatmentDetail};
use crate::domain::types::{ClinicalRecordId, Quadrant, SurfaceId, ToothNumber, TreatmentId};

/// Visual marker of a tooth zone or condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Mark {
    #[default]
    None = 0,
    /// Planned in a record that is still open.
    Pending = 1,
    /// Performed in a finalized record.
    Done = 2,
}

impl Mark {
    pub fn for_record(record: &ClinicalRecord) -> Self {
        if record.finalized {
            Mark::Done
        } else {
            Mark::Pending
        }
    }
}

impl From<Mark> for u8 {
    fn from(value: Mark) -> Self {
        value as u8
    }
}

/// Drawing zone of a tooth in the chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl Zone {
    /// Maps an anatomical surface to a chart zone.
    ///
    /// Mesial and distal swap sides between the left and right halves of the
    /// mouth, and vestibular/lingual swap between the upper and lower arches.
    pub fn for_surface(quadrant: Quadrant, surface: SurfaceKind) -> Zone {
        use Quadrant::*;
        use SurfaceKind::*;

        match (surface, quadrant) {
            (Occlusal, _) => Zone::Center,
            (Vestibular, UpperRight | UpperLeft) => Zone::Top,
            (Vestibular, LowerLeft | LowerRight) => Zone::Bottom,
            (Lingual, UpperRight | UpperLeft) => Zone::Bottom,
            (Lingual, LowerLeft | LowerRight) => Zone::Top,
            (Mesial, UpperRight | LowerRight) => Zone::Left,
            (Mesial, UpperLeft | LowerLeft) => Zone::Right,
            (Distal, UpperRight | LowerRight) => Zone::Right,
            (Distal, UpperLeft | LowerLeft) => Zone::Left,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Cavities {
    pub center: Mark,
    pub top: Mark,
    pub bottom: Mark,
    pub left: Mark,
    pub right: Mark,
}

impl Cavities {
    pub fn get(&self, zone: Zone) -> Mark {
        match zone {
            Zone::Center => self.center,
            Zone::Top => self.top,
            Zone::Bottom => self.bottom,
            Zone::Left => self.left,
            Zone::Right => self.right,
        }
    }

    fn set(&mut self, zone: Zone, mark: Mark) {
        let slot = match zone {
            Zone::Center => &mut self.center,
            Zone::Top => &mut self.top,
            Zone::Bottom => &mut self.bottom,
            Zone::Left => &mut self.left,
            Zone::Right => &mut self.right,
        };
        *slot = mark;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToothVisualState {
    pub cavities: Cavities,
    pub extracted: Mark,
    pub crowned: Mark,
    pub root_canal: Mark,
    pub filtered: Mark,
    pub fractured: Mark,
}

impl ToothVisualState {
    fn condition_mut(&mut self, kind: TreatmentKind) -> Option<&mut Mark> {
        match kind {
            TreatmentKind::Extraction => Some(&mut self.extracted),
            TreatmentKind::Crown => Some(&mut self.crowned),
            TreatmentKind::RootCanal => Some(&mut self.root_canal),
            TreatmentKind::Filtration => Some(&mut self.filtered),
            TreatmentKind::Fracture => Some(&mut self.fractured),
            _ => None,
        }
    }
}

/// Tooth code to visual state. Teeth without history are absent.
pub type OdontogramState = BTreeMap<ToothNumber, ToothVisualState>;

/// Strict-mode failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OdontogramError {
    #[error("record {record}: treatment {treatment} is not a known treatment kind")]
    UnknownTreatment {
        record: ClinicalRecordId,
        treatment: TreatmentId,
    },
    #[error("record {record}: surface {surface:?} of tooth {tooth} has no chart zone")]
    UnmappedSurface {
        record: ClinicalRecordId,
        tooth: ToothNumber,
        surface: Option<SurfaceId>,
    },
}

/// Folds clinical records into an [`OdontogramState`].
///
/// In lenient mode unknown treatments and unmapped surfaces are skipped and
/// logged at debug level; strict mode stops at the first one.
#[derive(Clone, Copy, Debug)]
pub struct OdontogramCalculator<'a> {
    catalog: &'a ClinicalCatalog,
    strict: bool,
}

impl<'a> OdontogramCalculator<'a> {
    pub fn new(catalog: &'a ClinicalCatalog, strict: bool) -> Self {
        Self { catalog, strict }
    }

    pub fn compute(&self, records: &[ClinicalRecord]) -> Result<OdontogramState, OdontogramError> {
        let mut ordered: Vec<&ClinicalRecord> = records.iter().collect();
        ordered.sort_by_key(|record| (record.start_date, record.id));

        let mut state = OdontogramState::new();
        for record in ordered {
            let mark = Mark::for_record(record);
            for detail in &record.details {
                self.apply(&mut state, record, detail, mark)?;
            }
        }
        Ok(state)
    }

    fn apply(
        &self,
        state: &mut OdontogramState,
        record: &ClinicalRecord,
        detail: &TreatmentDetail,
        mark: Mark,
    ) -> Result<(), OdontogramError> {
        let Some(tooth) = self.tooth_of(detail) else {
            return Ok(());
        };

        let Some(kind) = self.catalog.treatments.kind_of(detail.treatment_id) else {
            return self.skip(OdontogramError::UnknownTreatment {
                record: record.id,
                treatment: detail.treatment_id,
            });
        };

        match kind {
            TreatmentKind::Caries => {
                let zone = detail
                    .surface_id
                    .and_then(|id| self.catalog.surfaces.kind_of(id))
                    .map(|surface| Zone::for_surface(tooth.quadrant(), surface));
                let Some(zone) = zone else {
                    return self.skip(OdontogramError::UnmappedSurface {
                        record: record.id,
                        tooth,
                        surface: detail.surface_id,
                    });
                };
                state.entry(tooth).or_default().cavities.set(zone, mark);
            }
            TreatmentKind::Orthodontics | TreatmentKind::Cleaning | TreatmentKind::Consultation => {}
            condition => {
                if let Some(field) = state.entry(tooth).or_default().condition_mut(condition) {
                    *field = mark;
                }
            }
        }
        Ok(())
    }

    fn tooth_of(&self, detail: &TreatmentDetail) -> Option<ToothNumber> {
        detail
            .tooth
            .or_else(|| detail.tooth_id.and_then(|id| self.catalog.tooth_number(id)))
    }

    fn skip(&self, err: OdontogramError) -> Result<(), OdontogramError> {
        if self.strict {
            Err(err)
        } else {
            log::debug!("Skipping odontogram detail: {err}");
            Ok(())
        }
    }
}

/// Chart rows in drawing order: upper permanent, lower permanent, upper
/// deciduous, lower deciduous. Each pair is the left and right half.
pub const CHART_ROWS: [[u8; 2]; 8] = [
    [18, 11],
    [21, 28],
    [48, 41],
    [31, 38],
    [55, 51],
    [61, 65],
    [85, 81],
    [71, 75],
];

/// Tooth codes of a chart row, walking from the first to the last code.
pub fn chart_row(from: u8, to: u8) -> Vec<ToothNumber> {
    let codes: Vec<u8> = if from <= to {
        (from..=to).collect()
    } else {
        (to..=from).rev().collect()
    };
    codes
        .into_iter()
        .filter_map(|code| ToothNumber::new(code).ok())
        .collect()
}

/// Rows of the chart with each tooth paired to its state.
pub fn chart_layout(state: &OdontogramState) -> Vec<Vec<(ToothNumber, ToothVisualState)>> {
    CHART_ROWS
        .iter()
        .map(|[from, to]| {
            chart_row(*from, *to)
                .into_iter()
                .map(|tooth| (tooth, state.get(&tooth).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}
