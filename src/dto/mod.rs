//! Page data handed from services to templates.

pub mod appointments;
pub mod audit;
pub mod catalogs;
pub mod dashboard;
pub mod patients;
pub mod payments;
pub mod profile;
pub mod records;
pub mod staff;
