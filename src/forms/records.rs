use serde::Deserialize;

use crate::domain::treatment_plan::DetailCandidate;
use crate::domain::types::{ClinicalNote, SurfaceId, ToothId, TreatmentId};
use crate::forms::{FormError, checkbox, non_blank, parse_optional_id};

/// What the record editor asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftAction {
    Add,
    Remove(usize),
    Save,
}

/// Clinical record editor.
///
/// The accepted details travel as hidden `detail_*` lists, one entry per
/// row; the `new_*` selects hold the detail being added. Consultations post
/// empty tooth and surface values.
#[derive(Debug, Default, Deserialize)]
pub struct RecordForm {
    #[serde(default)]
    pub description: String,
    pub finalized: Option<String>,
    #[serde(default)]
    pub detail_treatment: Vec<String>,
    #[serde(default)]
    pub detail_tooth: Vec<String>,
    #[serde(default)]
    pub detail_surface: Vec<String>,
    pub new_treatment: Option<String>,
    pub new_tooth: Option<String>,
    pub new_surface: Option<String>,
    pub action: Option<String>,
}

fn candidate(
    treatment: Option<&str>,
    tooth: Option<&str>,
    surface: Option<&str>,
) -> Result<DetailCandidate, FormError> {
    Ok(DetailCandidate {
        treatment_id: parse_optional_id(treatment)?
            .map(TreatmentId::new)
            .transpose()?,
        tooth_id: parse_optional_id(tooth)?.map(ToothId::new).transpose()?,
        surface_id: parse_optional_id(surface)?
            .map(SurfaceId::new)
            .transpose()?,
    })
}

impl RecordForm {
    pub fn action(&self) -> DraftAction {
        match self.action.as_deref().map(str::trim) {
            Some("add") => DraftAction::Add,
            Some(other) => other
                .strip_prefix("remove:")
                .and_then(|index| index.parse().ok())
                .map_or(DraftAction::Save, DraftAction::Remove),
            None => DraftAction::Save,
        }
    }

    pub fn is_finalized(&self) -> bool {
        checkbox(self.finalized.as_deref())
    }

    pub fn note(&self) -> Result<Option<ClinicalNote>, FormError> {
        non_blank(&self.description)
            .map(ClinicalNote::new)
            .transpose()
            .map_err(FormError::from)
    }

    /// Details already in the draft, in form order.
    pub fn candidates(&self) -> Result<Vec<DetailCandidate>, FormError> {
        if self.detail_tooth.len() != self.detail_treatment.len()
            || self.detail_surface.len() != self.detail_treatment.len()
        {
            return Err(FormError::Decode("detail lists differ in length".to_string()));
        }
        self.detail_treatment
            .iter()
            .zip(&self.detail_tooth)
            .zip(&self.detail_surface)
            .map(|((treatment, tooth), surface)| {
                candidate(Some(treatment.as_str()), Some(tooth.as_str()), Some(surface.as_str()))
            })
            .collect()
    }

    /// Detail selected in the "add" row.
    pub fn new_candidate(&self) -> Result<DetailCandidate, FormError> {
        candidate(
            self.new_treatment.as_deref(),
            self.new_tooth.as_deref(),
            self.new_surface.as_deref(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct FollowUpForm {
    pub description: String,
}

impl TryFrom<FollowUpForm> for ClinicalNote {
    type Error = FormError;

    fn try_from(form: FollowUpForm) -> Result<Self, Self::Error> {
        Ok(ClinicalNote::new(form.description)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::parse;

    #[test]
    fn detail_rows_keep_empty_positions() {
        let form: RecordForm = parse(
            b"description=Control&detail_treatment=4&detail_tooth=&detail_surface=\
              &detail_treatment=1&detail_tooth=11&detail_surface=2&action=remove:1",
        )
        .unwrap();

        let candidates = form.candidates().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].tooth_id, None);
        assert_eq!(candidates[1].tooth_id.map(ToothId::get), Some(11));
        assert_eq!(form.action(), DraftAction::Remove(1));
        assert!(!form.is_finalized());
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let form = RecordForm {
            detail_treatment: vec!["1".to_string()],
            ..RecordForm::default()
        };
        assert!(matches!(form.candidates(), Err(FormError::Decode(_))));
    }

    #[test]
    fn unknown_action_saves() {
        let form = RecordForm {
            action: Some("remove:x".to_string()),
            ..RecordForm::default()
        };
        assert_eq!(form.action(), DraftAction::Save);
        let form = RecordForm {
            action: Some("add".to_string()),
            ..RecordForm::default()
        };
        assert_eq!(form.action(), DraftAction::Add);
    }
}
