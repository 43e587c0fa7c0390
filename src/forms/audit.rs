use serde::Deserialize;

use crate::domain::audit::AuditQuery;
use crate::domain::types::ClinicalRecordId;
use crate::forms::{FormError, non_blank, parse_optional_date, parse_optional_id};

/// Audit log filters, named after the backend parameters.
#[derive(Debug, Default, Deserialize)]
pub struct AuditQueryForm {
    pub page: Option<usize>,
    pub accion: Option<String>,
    pub fecha_desde: Option<String>,
    pub fecha_hasta: Option<String>,
    pub hist_clin_id: Option<String>,
}

impl TryFrom<&AuditQueryForm> for AuditQuery {
    type Error = FormError;

    fn try_from(form: &AuditQueryForm) -> Result<Self, Self::Error> {
        let mut query = AuditQuery::new(form.page.unwrap_or(1));
        query.action = form.accion.as_deref().and_then(non_blank);
        query.from = parse_optional_date(form.fecha_desde.as_deref())?;
        query.to = parse_optional_date(form.fecha_hasta.as_deref())?;
        query.record_id = parse_optional_id(form.hist_clin_id.as_deref())?
            .map(ClinicalRecordId::new)
            .transpose()?;
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::parse;

    #[test]
    fn blank_filters_are_dropped() {
        let form: AuditQueryForm =
            parse(b"page=2&accion=&fecha_desde=2024-01-01&fecha_hasta=").unwrap();
        let query = AuditQuery::try_from(&form).unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.action, None);
        assert!(query.from.is_some());
        assert_eq!(query.to, None);
    }
}
