//! Payments of a clinical record and the plan shown in the payments modal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CatalogName, ClinicalRecordId, PaymentId, PaymentTypeId, StaffId, fold_name,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentType {
    pub id: PaymentTypeId,
    pub name: CatalogName,
}

impl PaymentType {
    /// Whether this type settles a treatment in one go ("Pago único").
    pub fn is_single_payment(&self) -> bool {
        let name = fold_name(self.name.as_str());
        name == "pago unico" || name == "unico" || name.contains("pago unico")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub record_id: ClinicalRecordId,
    pub payment_type_id: PaymentTypeId,
    pub paid: bool,
    pub paid_on: Option<NaiveDate>,
    pub registered_by: Option<StaffId>,
    pub registered_by_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPayment {
    pub record_id: ClinicalRecordId,
    pub payment_type_id: PaymentTypeId,
    pub paid: bool,
    pub registered_by: StaffId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatePayment {
    pub paid: bool,
    pub registered_by: StaffId,
}

/// One row of the payment plan: an offered type merged with its payment.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PaymentPlanRow {
    pub payment_type: PaymentType,
    pub payment_id: Option<PaymentId>,
    pub paid: bool,
    pub paid_on: Option<NaiveDate>,
    pub registered_by_name: Option<String>,
}

/// Builds the plan of a record.
///
/// Orthodontic records are paid in installments, so they get every type
/// except single payment; any other record only gets single payment.
pub fn payment_plan(
    types: &[PaymentType],
    payments: &[Payment],
    record_id: ClinicalRecordId,
    orthodontic: bool,
) -> Vec<PaymentPlanRow> {
    types
        .iter()
        .filter(|t| t.is_single_payment() != orthodontic)
        .map(|t| {
            let existing = payments
                .iter()
                .find(|p| p.record_id == record_id && p.payment_type_id == t.id);
            PaymentPlanRow {
                payment_type: t.clone(),
                payment_id: existing.map(|p| p.id),
                paid: existing.is_some_and(|p| p.paid),
                paid_on: existing.and_then(|p| p.paid_on),
                registered_by_name: existing.and_then(|p| p.registered_by_name.clone()),
            }
        })
        .collect()
}

/// What toggling a plan row must send to the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentToggle {
    Update(PaymentId, UpdatePayment),
    Create(NewPayment),
    NoOp,
}

/// Decides the backend call that sets a plan row to `paid`.
pub fn toggle_payment(
    existing: Option<PaymentId>,
    record_id: ClinicalRecordId,
    payment_type_id: PaymentTypeId,
    paid: bool,
    user: StaffId,
) -> PaymentToggle {
    match existing {
        Some(id) => PaymentToggle::Update(
            id,
            UpdatePayment {
                paid,
                registered_by: user,
            },
        ),
        None if paid => PaymentToggle::Create(NewPayment {
            record_id,
            payment_type_id,
            paid: true,
            registered_by: user,
        }),
        None => PaymentToggle::NoOp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment_type(id: i32, name: &str) -> PaymentType {
        PaymentType {
            id: PaymentTypeId::new(id).unwrap(),
            name: CatalogName::new(name).unwrap(),
        }
    }

    fn types() -> Vec<PaymentType> {
        vec![
            payment_type(1, "Pago Único"),
            payment_type(2, "Cuota 1"),
            payment_type(3, "Cuota 2"),
        ]
    }

    fn record() -> ClinicalRecordId {
        ClinicalRecordId::new(40).unwrap()
    }

    #[test]
    fn single_payment_names_are_detected() {
        assert!(payment_type(1, "PAGO UNICO").is_single_payment());
        assert!(payment_type(1, "Único").is_single_payment());
        assert!(payment_type(1, "Pago único contado").is_single_payment());
        assert!(!payment_type(1, "Cuota 1").is_single_payment());
    }

    #[test]
    fn orthodontic_records_get_installments() {
        let plan = payment_plan(&types(), &[], record(), true);
        let names: Vec<_> = plan.iter().map(|r| r.payment_type.name.as_str()).collect();
        assert_eq!(names, vec!["Cuota 1", "Cuota 2"]);

        let plan = payment_plan(&types(), &[], record(), false);
        let names: Vec<_> = plan.iter().map(|r| r.payment_type.name.as_str()).collect();
        assert_eq!(names, vec!["Pago Único"]);
    }

    #[test]
    fn plan_merges_existing_payments_of_the_record() {
        let paid_on = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let payments = vec![
            Payment {
                id: PaymentId::new(7).unwrap(),
                record_id: record(),
                payment_type_id: PaymentTypeId::new(2).unwrap(),
                paid: true,
                paid_on: Some(paid_on),
                registered_by: Some(StaffId::new(1).unwrap()),
                registered_by_name: Some("Ana".to_string()),
            },
            Payment {
                id: PaymentId::new(8).unwrap(),
                record_id: ClinicalRecordId::new(41).unwrap(),
                payment_type_id: PaymentTypeId::new(3).unwrap(),
                paid: true,
                paid_on: None,
                registered_by: None,
                registered_by_name: None,
            },
        ];

        let plan = payment_plan(&types(), &payments, record(), true);

        assert_eq!(plan[0].payment_id, Some(PaymentId::new(7).unwrap()));
        assert!(plan[0].paid);
        assert_eq!(plan[0].paid_on, Some(paid_on));
        assert_eq!(plan[1].payment_id, None);
        assert!(!plan[1].paid);
    }

    #[test]
    fn toggle_decisions() {
        let user = StaffId::new(9).unwrap();
        let type_id = PaymentTypeId::new(2).unwrap();
        let payment = PaymentId::new(7).unwrap();

        assert_eq!(
            toggle_payment(Some(payment), record(), type_id, false, user),
            PaymentToggle::Update(
                payment,
                UpdatePayment {
                    paid: false,
                    registered_by: user
                }
            )
        );
        assert_eq!(
            toggle_payment(None, record(), type_id, true, user),
            PaymentToggle::Create(NewPayment {
                record_id: record(),
                payment_type_id: type_id,
                paid: true,
                registered_by: user,
            })
        );
        assert_eq!(
            toggle_payment(None, record(), type_id, false, user),
            PaymentToggle::NoOp
        );
    }
}
