//! Request DTOs for the registry API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::pedigree::{
    deserialize_present, PedigreeDetails, PedigreeDetailsPatch, PedigreeQuery, SortField,
    SortOrder,
};

/// Maximum length of a pedigree business identifier
pub const MAX_PEDIGREE_ID_LENGTH: usize = 100;

/// Request body for POST /pedigrees
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePedigreeRequest {
    pub pedigree_id: String,
    #[serde(flatten)]
    pub details: PedigreeDetails,
    #[serde(default)]
    pub father_pedigree_id: Option<u64>,
    #[serde(default)]
    pub mother_pedigree_id: Option<u64>,
}

impl CreatePedigreeRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(error_msg) = validate_pedigree_id(&self.pedigree_id) {
            return Some(error_msg);
        }
        let has_name = self
            .details
            .cat_name
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty());
        if !has_name {
            return Some("catName is required".to_string());
        }
        None
    }
}

/// Request body for PATCH /pedigrees/:id
///
/// Keys left out keep their stored value; keys sent as `null` clear it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePedigreeRequest {
    #[serde(default)]
    pub pedigree_id: Option<String>,
    #[serde(flatten)]
    pub details: PedigreeDetailsPatch,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub father_pedigree_id: Option<Option<u64>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub mother_pedigree_id: Option<Option<u64>>,
}

impl UpdatePedigreeRequest {
    pub fn validate(&self) -> Option<String> {
        self.pedigree_id.as_deref().and_then(validate_pedigree_id)
    }
}

fn validate_pedigree_id(pedigree_id: &str) -> Option<String> {
    let trimmed = pedigree_id.trim();
    if trimmed.is_empty() {
        return Some("pedigreeId cannot be empty".to_string());
    }
    if trimmed.len() > MAX_PEDIGREE_ID_LENGTH {
        return Some(format!(
            "pedigreeId exceeds maximum length of {} characters",
            MAX_PEDIGREE_ID_LENGTH
        ));
    }
    None
}

/// Query string for GET /pedigrees
///
/// Numbers arrive as raw strings so that an empty value means "not set" and
/// a malformed one is reported as a JSON error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPedigreesParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub gender_code: Option<String>,
    pub eye_color: Option<String>,
    pub cat_name2: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListPedigreesParams {
    /// Converts to a repository query, rejecting unknown sort keys.
    pub fn into_query(self) -> Result<PedigreeQuery> {
        let sort_by = match self.sort_by.as_deref() {
            None | Some("") => SortField::default(),
            Some(value) => SortField::parse(value)
                .ok_or_else(|| AppError::InvalidRequest(format!("Unknown sortBy: {}", value)))?,
        };
        let sort_order = match self.sort_order.as_deref() {
            None | Some("") => SortOrder::default(),
            Some(value) => SortOrder::parse(value).ok_or_else(|| {
                AppError::InvalidRequest(format!("Unknown sortOrder: {}", value))
            })?,
        };

        Ok(PedigreeQuery {
            page: parse_param("page", &self.page)?.unwrap_or(1),
            limit: parse_param("limit", &self.limit)?.unwrap_or(0),
            search: self.search,
            gender_code: parse_param("genderCode", &self.gender_code)?,
            eye_color: self.eye_color,
            cat_name2: self.cat_name2,
            sort_by,
            sort_order,
        })
    }
}

/// Query string for GET /pedigrees/:id/family-tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FamilyTreeParams {
    pub generations: Option<String>,
}

impl FamilyTreeParams {
    pub fn generations(&self) -> Result<Option<u32>> {
        parse_param("generations", &self.generations)
    }
}

/// Parses an optional query value; empty or blank counts as absent.
fn parse_param<T: FromStr>(name: &str, raw: &Option<String>) -> Result<Option<T>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            AppError::InvalidRequest(format!("Invalid {}: {}", name, value))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserialize() {
        let json = r#"{"pedigreeId": "JCU0000001", "catName": "Sora", "breedCode": 12, "fatherJCU": "JCU0000000"}"#;
        let req: CreatePedigreeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.pedigree_id, "JCU0000001");
        assert_eq!(req.details.cat_name.as_deref(), Some("Sora"));
        assert_eq!(req.details.breed_code, Some(12));
        assert_eq!(req.details.father_jcu.as_deref(), Some("JCU0000000"));
        assert!(req.father_pedigree_id.is_none());
    }

    #[test]
    fn test_validate_empty_pedigree_id() {
        let req: CreatePedigreeRequest =
            serde_json::from_str(r#"{"pedigreeId": "  ", "catName": "Sora"}"#).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_missing_cat_name() {
        let req: CreatePedigreeRequest =
            serde_json::from_str(r#"{"pedigreeId": "JCU0000001"}"#).unwrap();
        assert_eq!(req.validate().as_deref(), Some("catName is required"));
    }

    #[test]
    fn test_validate_valid_request() {
        let req: CreatePedigreeRequest =
            serde_json::from_str(r#"{"pedigreeId": "JCU0000001", "catName": "Sora"}"#).unwrap();
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_update_request_partial() {
        let req: UpdatePedigreeRequest =
            serde_json::from_str(r#"{"ownerName": "Tanaka"}"#).unwrap();
        assert!(req.pedigree_id.is_none());
        assert_eq!(req.details.owner_name, Some(Some("Tanaka".to_string())));
        assert!(req.details.cat_name.is_none());
        assert!(req.father_pedigree_id.is_none());
        assert!(req.validate().is_none());

        let req: UpdatePedigreeRequest = serde_json::from_str(r#"{"pedigreeId": ""}"#).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_update_request_null_clears() {
        let req: UpdatePedigreeRequest = serde_json::from_str(
            r#"{"ownerName": null, "fatherPedigreeId": null, "motherPedigreeId": 3}"#,
        )
        .unwrap();
        assert_eq!(req.details.owner_name, Some(None));
        assert_eq!(req.father_pedigree_id, Some(None));
        assert_eq!(req.mother_pedigree_id, Some(Some(3)));
    }

    #[test]
    fn test_list_params_empty_values_are_unset() {
        let params = ListPedigreesParams {
            page: Some(String::new()),
            gender_code: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.page, 1);
        assert!(query.gender_code.is_none());
    }

    #[test]
    fn test_list_params_malformed_number() {
        let params = ListPedigreesParams {
            gender_code: Some("male".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.into_query(), Err(AppError::InvalidRequest(_))));

        let params = FamilyTreeParams {
            generations: Some("two".to_string()),
        };
        assert!(matches!(params.generations(), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_list_params_into_query() {
        let params = ListPedigreesParams {
            page: Some("2".to_string()),
            gender_code: Some("1".to_string()),
            sort_by: Some("pedigreeId".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.gender_code, Some(1));
        assert_eq!(query.sort_by, SortField::PedigreeId);
        assert_eq!(query.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_list_params_unknown_sort() {
        let params = ListPedigreesParams {
            sort_by: Some("password".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.into_query(), Err(AppError::InvalidRequest(_))));
    }
}
