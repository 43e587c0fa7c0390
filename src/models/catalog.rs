use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::appointment::{AppointmentStatus, ScheduleSlot};
use crate::domain::catalog::{CatalogItem, CatalogKind, Tooth, ToothSurface, Treatment};
use crate::domain::payment::PaymentType;
use crate::domain::types::{
    AppointmentStatusId, CatalogItemId, CatalogName, PaymentTypeId, ScheduleSlotId, SurfaceId,
    ToothId, ToothNumber, TreatmentId, TypeConstraintError,
};

/// `{ id, nombre_* }` row shared by every named catalog of the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    pub id: i32,
    #[serde(
        rename = "nombre",
        alias = "nombre_trat",
        alias = "nombre_cara",
        alias = "nombre_esp",
        alias = "nombre_puesto",
        alias = "nombre_ge",
        alias = "nombre_ant",
        alias = "nombre_analisis",
        alias = "nombre_os",
        alias = "nombre_tipo_pago",
        alias = "nombre_est_tur"
    )]
    pub name: String,
}

/// Tooth code arrives as a number or as a string depending on the serializer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ToothCode {
    Number(u8),
    Text(String),
}

impl TryFrom<ToothCode> for ToothNumber {
    type Error = TypeConstraintError;

    fn try_from(code: ToothCode) -> Result<Self, Self::Error> {
        let value = match code {
            ToothCode::Number(value) => value,
            ToothCode::Text(text) => text
                .trim()
                .parse::<u8>()
                .map_err(|_| TypeConstraintError::InvalidValue(text))?,
        };
        ToothNumber::new(value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToothRow {
    pub id: i32,
    pub codigo_pd: ToothCode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSlotRow {
    pub id: i32,
    pub hora: NaiveTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSlotPayload {
    pub hora: String,
}

impl From<NaiveTime> for ScheduleSlotPayload {
    fn from(time: NaiveTime) -> Self {
        Self {
            hora: time.format("%H:%M:%S").to_string(),
        }
    }
}

/// Endpoint and name field of an editable catalog.
pub fn catalog_endpoint(kind: CatalogKind) -> (&'static str, &'static str) {
    match kind {
        CatalogKind::Treatments => ("historias_clinicas/tratamientos/", "nombre_trat"),
        CatalogKind::Antecedents => ("pacientes/antecedentes/", "nombre_ant"),
        CatalogKind::FunctionalAnalyses => ("pacientes/analisis-funcional/", "nombre_analisis"),
        CatalogKind::HealthInsurers => ("pacientes/obras-sociales/", "nombre_os"),
    }
}

/// Body posted when creating or renaming a catalog item.
pub fn catalog_payload(kind: CatalogKind, name: &CatalogName) -> Value {
    let (_, field) = catalog_endpoint(kind);
    let mut body = Map::new();
    body.insert(field.to_string(), Value::String(name.to_string()));
    Value::Object(body)
}

impl TryFrom<CatalogRow> for CatalogItem {
    type Error = TypeConstraintError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CatalogItemId::new(row.id)?,
            name: CatalogName::new(row.name)?,
        })
    }
}

impl TryFrom<CatalogRow> for Treatment {
    type Error = TypeConstraintError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TreatmentId::new(row.id)?,
            name: CatalogName::new(row.name)?,
        })
    }
}

impl TryFrom<CatalogRow> for ToothSurface {
    type Error = TypeConstraintError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SurfaceId::new(row.id)?,
            name: CatalogName::new(row.name)?,
        })
    }
}

impl TryFrom<CatalogRow> for PaymentType {
    type Error = TypeConstraintError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentTypeId::new(row.id)?,
            name: CatalogName::new(row.name)?,
        })
    }
}

impl TryFrom<CatalogRow> for AppointmentStatus {
    type Error = TypeConstraintError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AppointmentStatusId::new(row.id)?,
            name: CatalogName::new(row.name)?,
        })
    }
}

impl TryFrom<ToothRow> for Tooth {
    type Error = TypeConstraintError;

    fn try_from(row: ToothRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ToothId::new(row.id)?,
            code: row.codigo_pd.try_into()?,
        })
    }
}

impl TryFrom<ScheduleSlotRow> for ScheduleSlot {
    type Error = TypeConstraintError;

    fn try_from(row: ScheduleSlotRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ScheduleSlotId::new(row.id)?,
            time: row.hora,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_rows_accept_every_backend_name_field() {
        let treatment: CatalogRow =
            serde_json::from_str(r#"{"id": 3, "nombre_trat": "Ortodoncia"}"#).unwrap();
        let treatment = Treatment::try_from(treatment).unwrap();
        assert_eq!(treatment.name.as_str(), "Ortodoncia");

        let status: CatalogRow =
            serde_json::from_str(r#"{"id": 1, "nombre_est_tur": "Pendiente"}"#).unwrap();
        assert!(AppointmentStatus::try_from(status).is_ok());

        let blank: CatalogRow = serde_json::from_str(r#"{"id": 1, "nombre_ge": " "}"#).unwrap();
        assert_eq!(
            CatalogItem::try_from(blank),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn tooth_codes_are_numbers_or_strings() {
        let numeric: ToothRow = serde_json::from_str(r#"{"id": 1, "codigo_pd": 18}"#).unwrap();
        assert_eq!(Tooth::try_from(numeric).unwrap().code.get(), 18);

        let text: ToothRow = serde_json::from_str(r#"{"id": 2, "codigo_pd": "55"}"#).unwrap();
        assert_eq!(Tooth::try_from(text).unwrap().code.get(), 55);

        let invalid: ToothRow = serde_json::from_str(r#"{"id": 3, "codigo_pd": "19"}"#).unwrap();
        assert_eq!(
            Tooth::try_from(invalid),
            Err(TypeConstraintError::InvalidToothNumber(19))
        );
    }

    #[test]
    fn slots_parse_backend_time() {
        let row: ScheduleSlotRow = serde_json::from_str(r#"{"id": 4, "hora": "09:30:00"}"#).unwrap();
        let slot = ScheduleSlot::try_from(row).unwrap();
        assert_eq!(slot.label(), "09:30");

        let payload = ScheduleSlotPayload::from(slot.time);
        assert_eq!(payload.hora, "09:30:00");
    }

    #[test]
    fn catalog_payload_uses_kind_field() {
        let name = CatalogName::new("OSDE").unwrap();
        let body = catalog_payload(CatalogKind::HealthInsurers, &name);
        assert_eq!(body["nombre_os"], "OSDE");
        assert_eq!(catalog_endpoint(CatalogKind::Treatments).0, "historias_clinicas/tratamientos/");
    }
}
