use serde::Deserialize;

use crate::domain::types::CatalogName;
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
pub struct CatalogItemForm {
    pub name: String,
}

impl TryFrom<CatalogItemForm> for CatalogName {
    type Error = FormError;

    fn try_from(form: CatalogItemForm) -> Result<Self, Self::Error> {
        Ok(CatalogName::new(ammonia::clean(&form.name))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sanitized_and_required() {
        let name = CatalogName::try_from(CatalogItemForm {
            name: " Diabetes<script>x</script> ".to_string(),
        })
        .unwrap();
        assert_eq!(name.as_str(), "Diabetes");

        assert!(matches!(
            CatalogName::try_from(CatalogItemForm {
                name: "  ".to_string()
            }),
            Err(FormError::MissingField)
        ));
    }
}
