//! Domain entities and pure business rules of the clinic admin.

pub mod appointment;
pub mod audit;
pub mod capabilities;
pub mod catalog;
pub mod clinical_record;
pub mod odontogram;
pub mod patient;
pub mod payment;
pub mod staff;
pub mod stats;
pub mod treatment_plan;
pub mod types;
