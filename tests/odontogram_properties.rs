use std::collections::BTreeSet;

use chrono::NaiveDate;
use proptest::prelude::*;

use dental_admin::domain::catalog::{ClinicalCatalog, Tooth, ToothSurface, Treatment};
use dental_admin::domain::clinical_record::{ClinicalRecord, TreatmentDetail};
use dental_admin::domain::odontogram::{Mark, OdontogramCalculator, ToothVisualState};
use dental_admin::domain::types::{
    CatalogName, ClinicalRecordId, PatientId, SurfaceId, ToothId, ToothNumber, TreatmentId,
};

const TREATMENTS: [&str; 8] = [
    "Caries",
    "Conducto",
    "Extracción",
    "Corona",
    "Filtración",
    "Fractura",
    "Limpieza",
    "Consulta",
];
const SURFACES: [&str; 5] = ["Mesial", "Distal", "Vestibular", "Lingual", "Oclusal"];

fn catalog() -> ClinicalCatalog {
    let treatments = TREATMENTS
        .iter()
        .enumerate()
        .map(|(idx, name)| Treatment {
            id: TreatmentId::new(idx as i32 + 1).unwrap(),
            name: CatalogName::new(*name).unwrap(),
        })
        .collect();
    let surfaces = SURFACES
        .iter()
        .enumerate()
        .map(|(idx, name)| ToothSurface {
            id: SurfaceId::new(idx as i32 + 1).unwrap(),
            name: CatalogName::new(*name).unwrap(),
        })
        .collect();
    let teeth = ToothNumber::all()
        .enumerate()
        .map(|(idx, code)| Tooth {
            id: ToothId::new(idx as i32 + 1).unwrap(),
            code,
        })
        .collect();
    ClinicalCatalog::new(treatments, surfaces, teeth)
}

fn teeth() -> Vec<ToothNumber> {
    ToothNumber::all().collect()
}

fn detail_strategy() -> impl Strategy<Value = TreatmentDetail> {
    let tooth_count = teeth().len();
    (
        1..=TREATMENTS.len() as i32,
        0..tooth_count,
        proptest::option::of(1..=SURFACES.len() as i32),
    )
        .prop_map(|(treatment, tooth, surface)| TreatmentDetail {
            treatment_id: TreatmentId::new(treatment).unwrap(),
            tooth_id: None,
            tooth: Some(teeth()[tooth]),
            surface_id: surface.map(|id| SurfaceId::new(id).unwrap()),
            treatment_name: None,
            surface_name: None,
        })
}

fn records_strategy() -> impl Strategy<Value = Vec<ClinicalRecord>> {
    proptest::collection::vec(
        (
            1u32..=28,
            any::<bool>(),
            proptest::collection::vec(detail_strategy(), 1..4),
        ),
        0..8,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, (day, finalized, details))| ClinicalRecord {
                id: ClinicalRecordId::new(idx as i32 + 1).unwrap(),
                patient_id: PatientId::new(1).unwrap(),
                patient_name: None,
                dentist_id: None,
                dentist_name: None,
                description: String::new(),
                finalized,
                start_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                end_date: None,
                details,
                follow_ups: vec![],
            })
            .collect()
    })
}

fn marks(state: &ToothVisualState) -> [Mark; 10] {
    let c = &state.cavities;
    [
        c.center,
        c.top,
        c.bottom,
        c.left,
        c.right,
        state.extracted,
        state.crowned,
        state.root_canal,
        state.filtered,
        state.fractured,
    ]
}

proptest! {
    #[test]
    fn input_order_does_not_matter(
        (records, shuffled) in records_strategy()
            .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
    ) {
        let catalog = catalog();
        let calculator = OdontogramCalculator::new(&catalog, false);

        prop_assert_eq!(
            calculator.compute(&records).unwrap(),
            calculator.compute(&shuffled).unwrap()
        );
    }

    #[test]
    fn only_treated_teeth_are_charted(records in records_strategy()) {
        let catalog = catalog();
        let state = OdontogramCalculator::new(&catalog, false).compute(&records).unwrap();

        let treated: BTreeSet<ToothNumber> = records
            .iter()
            .flat_map(|record| record.details.iter().filter_map(|detail| detail.tooth))
            .collect();
        prop_assert!(state.keys().all(|tooth| treated.contains(tooth)));
    }

    #[test]
    fn open_records_never_mark_done(records in records_strategy()) {
        let open: Vec<ClinicalRecord> = records
            .into_iter()
            .map(|record| ClinicalRecord { finalized: false, ..record })
            .collect();
        let catalog = catalog();
        let state = OdontogramCalculator::new(&catalog, false).compute(&open).unwrap();

        prop_assert!(state.values().flat_map(marks).all(|mark| mark != Mark::Done));
    }

    #[test]
    fn recomputing_is_stable(records in records_strategy()) {
        let catalog = catalog();
        let calculator = OdontogramCalculator::new(&catalog, false);

        prop_assert_eq!(calculator.compute(&records).unwrap(), calculator.compute(&records).unwrap());
    }
}
