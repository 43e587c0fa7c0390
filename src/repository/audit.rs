use crate::domain::audit::{AppointmentAuditEntry, AuditQuery, PaymentAuditEntry};
use crate::models::audit::{
    AppointmentAuditEntry as WireAppointmentAuditEntry, PaymentAuditEntry as WirePaymentAuditEntry,
};
use crate::models::page::Page;
use crate::repository::errors::RepositoryResult;
use crate::repository::rest::convert_all;
use crate::repository::{AuditReader, RestRepository};

impl AuditReader for RestRepository {
    async fn list_payment_audit(
        &self,
        query: &AuditQuery,
    ) -> RepositoryResult<(usize, Vec<PaymentAuditEntry>)> {
        let page: Page<WirePaymentAuditEntry> =
            self.get_page("pagos/auditoria/", &query.to_pairs()).await?;
        Ok((page.count, convert_all(page.results)?))
    }

    async fn list_appointment_audit(
        &self,
        query: &AuditQuery,
    ) -> RepositoryResult<(usize, Vec<AppointmentAuditEntry>)> {
        // Appointment audit has no record filter.
        let pairs: Vec<(&str, String)> = query
            .to_pairs()
            .into_iter()
            .filter(|(key, _)| *key != "hist_clin_id")
            .collect();
        let page: Page<WireAppointmentAuditEntry> = self.get_page("turnos/auditoria/", &pairs).await?;
        Ok((page.count, convert_all(page.results)?))
    }
}
