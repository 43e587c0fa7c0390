//! Backend wire representations, configuration and the clinic session.

pub mod appointment;
pub mod audit;
pub mod auth;
pub mod catalog;
pub mod clinical_record;
pub mod config;
pub mod fields;
pub mod page;
pub mod patient;
pub mod payment;
pub mod staff;
