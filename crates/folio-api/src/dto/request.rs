//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use folio_entity::portfolio::{AccessMode, ContentUpdate, LinkAudienceType, LinkPermission};
use folio_service::sharing::SharingConfigRequest;

/// PATCH /api/portfolios/{id}/sharing/permission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePermissionRequest {
    /// `view` or `view_edit`.
    pub link_permission: LinkPermission,
}

/// PATCH /api/portfolios/{id}/sharing/audience
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAudienceRequest {
    /// `any_with_link` or `emails_only`.
    pub link_audience_type: LinkAudienceType,
}

/// PUT /api/portfolios/{id}/sharing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSharingConfigRequest {
    /// `owner_only` or `link`.
    pub access_mode: AccessMode,
    /// Required for `link`.
    pub link_permission: Option<LinkPermission>,
    /// Required for `link`.
    pub link_audience_type: Option<LinkAudienceType>,
}

impl From<UpdateSharingConfigRequest> for SharingConfigRequest {
    fn from(req: UpdateSharingConfigRequest) -> Self {
        Self {
            access_mode: req.access_mode,
            link_permission: req.link_permission,
            link_audience_type: req.link_audience_type,
        }
    }
}

/// POST /api/portfolios/{id}/sharing/emails
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddAuthorizedEmailRequest {
    /// Address to allow; normalized server-side.
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,
}

/// PUT /api/shared/{token}
///
/// Sharing fields are rejected as unknown.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateSharedRequest {
    /// New title.
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// Replacement editor content.
    pub content: Option<serde_json::Value>,
}

impl From<UpdateSharedRequest> for ContentUpdate {
    fn from(req: UpdateSharedRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_update_rejects_sharing_fields() {
        let body = r#"{"title":"New","access_mode":"link"}"#;
        assert!(serde_json::from_str::<UpdateSharedRequest>(body).is_err());
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        let body = r#"{"link_permission":"admin"}"#;
        assert!(serde_json::from_str::<UpdatePermissionRequest>(body).is_err());
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let req = UpdateSharedRequest {
            title: Some(String::new()),
            content: None,
        };
        assert!(req.validate().is_err());
    }
}
