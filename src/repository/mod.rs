//! Reader/Writer traits per backend resource.
//!
//! Services are generic over these traits; [`RestRepository`] implements them
//! against the clinic REST API and `mock::MockRepository` in tests.
#![allow(async_fn_in_trait)]

use chrono::NaiveTime;

use crate::domain::appointment::{Appointment, AppointmentStatus, NewAppointment, ScheduleSlot};
use crate::domain::audit::{AppointmentAuditEntry, AuditQuery, PaymentAuditEntry};
use crate::domain::catalog::{CatalogItem, CatalogKind, Tooth, ToothSurface, Treatment};
use crate::domain::clinical_record::{
    ClinicalRecord, NewClinicalRecord, NewFollowUp, UpdateFollowUp,
};
use crate::domain::patient::{NewPatient, Patient};
use crate::domain::payment::{NewPayment, Payment, PaymentType, UpdatePayment};
use crate::domain::staff::{
    Credentials, NewStaffMember, PasswordChange, PasswordReset, ProfileUpdate, StaffMember,
};
use crate::domain::types::{
    AppointmentId, CatalogItemId, CatalogName, ClinicalRecordId, Email, FollowUpId, PatientId,
    PaymentId, ScheduleSlotId, StaffId,
};
use crate::models::auth::TokenPair;
use crate::repository::errors::RepositoryResult;

pub mod appointment;
pub mod audit;
pub mod auth;
pub mod catalog;
pub mod clinical_record;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod patient;
pub mod payment;
pub mod rest;
pub mod staff;

pub use rest::RestRepository;

pub trait AuthApi {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<TokenPair>;
    /// Staff record of the owner of `access`.
    async fn fetch_current_user(&self, access: &str) -> RepositoryResult<StaffMember>;
    async fn request_password_reset(&self, email: &Email) -> RepositoryResult<()>;
    async fn confirm_password_reset(&self, reset: &PasswordReset) -> RepositoryResult<()>;
}

pub trait PatientReader {
    async fn list_patients(&self) -> RepositoryResult<Vec<Patient>>;
    async fn get_patient(&self, id: PatientId) -> RepositoryResult<Option<Patient>>;
}

pub trait PatientWriter {
    async fn create_patient(&self, patient: &NewPatient) -> RepositoryResult<Patient>;
    async fn update_patient(&self, id: PatientId, patient: &NewPatient)
    -> RepositoryResult<Patient>;
    async fn set_patient_active(&self, id: PatientId, active: bool) -> RepositoryResult<()>;
}

pub trait StaffReader {
    async fn list_staff(&self) -> RepositoryResult<Vec<StaffMember>>;
    async fn get_staff(&self, id: StaffId) -> RepositoryResult<Option<StaffMember>>;
    async fn list_positions(&self) -> RepositoryResult<Vec<CatalogItem>>;
    async fn list_specialties(&self) -> RepositoryResult<Vec<CatalogItem>>;
}

pub trait StaffWriter {
    async fn create_staff(&self, member: &NewStaffMember) -> RepositoryResult<StaffMember>;
    async fn update_staff(
        &self,
        id: StaffId,
        member: &NewStaffMember,
    ) -> RepositoryResult<StaffMember>;
    async fn set_staff_active(&self, id: StaffId, active: bool) -> RepositoryResult<()>;
    async fn delete_staff(&self, id: StaffId) -> RepositoryResult<()>;
    async fn update_profile(
        &self,
        id: StaffId,
        update: &ProfileUpdate,
    ) -> RepositoryResult<StaffMember>;
    async fn change_password(&self, id: StaffId, change: &PasswordChange) -> RepositoryResult<()>;
}

pub trait ClinicalRecordReader {
    /// Records of one patient, or of every patient when `patient` is `None`.
    async fn list_records(&self, patient: Option<PatientId>)
    -> RepositoryResult<Vec<ClinicalRecord>>;
    async fn get_record(&self, id: ClinicalRecordId) -> RepositoryResult<Option<ClinicalRecord>>;
}

pub trait ClinicalRecordWriter {
    async fn create_record(&self, record: &NewClinicalRecord) -> RepositoryResult<ClinicalRecord>;
    async fn update_record(
        &self,
        id: ClinicalRecordId,
        record: &NewClinicalRecord,
    ) -> RepositoryResult<ClinicalRecord>;
    async fn delete_record(&self, id: ClinicalRecordId) -> RepositoryResult<()>;
    async fn create_follow_up(&self, follow_up: &NewFollowUp) -> RepositoryResult<()>;
    async fn update_follow_up(
        &self,
        record_id: ClinicalRecordId,
        id: FollowUpId,
        follow_up: &UpdateFollowUp,
    ) -> RepositoryResult<()>;
}

pub trait CatalogReader {
    async fn list_treatments(&self) -> RepositoryResult<Vec<Treatment>>;
    async fn list_teeth(&self) -> RepositoryResult<Vec<Tooth>>;
    async fn list_surfaces(&self) -> RepositoryResult<Vec<ToothSurface>>;
    async fn list_genders(&self) -> RepositoryResult<Vec<CatalogItem>>;
    async fn list_catalog(&self, kind: CatalogKind) -> RepositoryResult<Vec<CatalogItem>>;
}

pub trait CatalogWriter {
    async fn create_catalog_item(&self, kind: CatalogKind, name: &CatalogName)
    -> RepositoryResult<()>;
    async fn rename_catalog_item(
        &self,
        kind: CatalogKind,
        id: CatalogItemId,
        name: &CatalogName,
    ) -> RepositoryResult<()>;
    async fn delete_catalog_item(&self, kind: CatalogKind, id: CatalogItemId)
    -> RepositoryResult<()>;
}

pub trait AppointmentReader {
    async fn list_appointments(&self) -> RepositoryResult<Vec<Appointment>>;
    async fn get_appointment(&self, id: AppointmentId) -> RepositoryResult<Option<Appointment>>;
    async fn list_slots(&self) -> RepositoryResult<Vec<ScheduleSlot>>;
    async fn list_statuses(&self) -> RepositoryResult<Vec<AppointmentStatus>>;
}

pub trait AppointmentWriter {
    async fn create_appointment(&self, appointment: &NewAppointment)
    -> RepositoryResult<Appointment>;
    async fn update_appointment(
        &self,
        id: AppointmentId,
        appointment: &NewAppointment,
    ) -> RepositoryResult<Appointment>;
    async fn delete_appointment(&self, id: AppointmentId) -> RepositoryResult<()>;
    async fn create_slot(&self, time: NaiveTime) -> RepositoryResult<ScheduleSlot>;
    async fn update_slot(&self, id: ScheduleSlotId, time: NaiveTime)
    -> RepositoryResult<ScheduleSlot>;
    async fn delete_slot(&self, id: ScheduleSlotId) -> RepositoryResult<()>;
}

pub trait PaymentReader {
    /// Payments of one record, or all payments when `record` is `None`.
    async fn list_payments(&self, record: Option<ClinicalRecordId>)
    -> RepositoryResult<Vec<Payment>>;
    async fn list_payment_types(&self) -> RepositoryResult<Vec<PaymentType>>;
}

pub trait PaymentWriter {
    async fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment>;
    async fn update_payment(
        &self,
        id: PaymentId,
        update: &UpdatePayment,
    ) -> RepositoryResult<Payment>;
}

pub trait AuditReader {
    /// One server-side page plus the total entry count.
    async fn list_payment_audit(
        &self,
        query: &AuditQuery,
    ) -> RepositoryResult<(usize, Vec<PaymentAuditEntry>)>;
    async fn list_appointment_audit(
        &self,
        query: &AuditQuery,
    ) -> RepositoryResult<(usize, Vec<AppointmentAuditEntry>)>;
}
