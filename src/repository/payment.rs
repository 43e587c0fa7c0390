use reqwest::Method;

use crate::domain::payment::{NewPayment, Payment, PaymentType, UpdatePayment};
use crate::domain::types::{ClinicalRecordId, PaymentId};
use crate::models::catalog::CatalogRow;
use crate::models::payment::{
    NewPayment as WireNewPayment, Payment as WirePayment, UpdatePayment as WireUpdatePayment,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::rest::convert_all;
use crate::repository::{PaymentReader, PaymentWriter, RestRepository};

impl PaymentReader for RestRepository {
    async fn list_payments(&self, record: Option<ClinicalRecordId>) -> RepositoryResult<Vec<Payment>> {
        let query: Vec<(&str, String)> = record
            .map(|id| vec![("hist_clin", id.to_string())])
            .unwrap_or_default();
        let rows: Vec<WirePayment> = self.get_list("pagos/", &query).await?;
        let payments: Vec<Payment> = convert_all(rows)?;
        Ok(payments
            .into_iter()
            .filter(|payment| record.is_none_or(|id| payment.record_id == id))
            .collect())
    }

    async fn list_payment_types(&self) -> RepositoryResult<Vec<PaymentType>> {
        let rows: Vec<CatalogRow> = self.get_list("pagos/tipos-pagos/", &[]).await?;
        convert_all(rows)
    }
}

impl PaymentWriter for RestRepository {
    async fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment> {
        let row: WirePayment = self
            .send(Method::POST, "pagos/", &WireNewPayment::from(payment))
            .await?;
        Ok(Payment::try_from(row)?)
    }

    async fn update_payment(&self, id: PaymentId, update: &UpdatePayment) -> RepositoryResult<Payment> {
        let row: WirePayment = self
            .send(
                Method::PATCH,
                &format!("pagos/{id}/"),
                &WireUpdatePayment::from(update),
            )
            .await?;
        Ok(Payment::try_from(row)?)
    }
}
