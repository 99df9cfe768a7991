#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::{DepartmentId, EquipmentId, TemplateId, UserId};

/// Identity and ownership of one template under review.
///
/// The request owns exactly one submission history; the derived status of
/// the template is the status of the current submission and is never
/// stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRequest {
    pub template_id: TemplateId,
    pub template_name: String,
    pub description: Option<String>,
    pub department_id: DepartmentId,
    pub equipment_id: EquipmentId,
    pub supervisor_id: UserId,
}

impl TemplateRequest {
    pub fn new(
        template_id: TemplateId,
        template_name: impl Into<String>,
        description: Option<String>,
        department_id: DepartmentId,
        equipment_id: EquipmentId,
        supervisor_id: UserId,
    ) -> Result<Self> {
        let template_name = template_name.into();
        let trimmed = template_name.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidTemplateName(template_name));
        }
        let description = description.and_then(|text| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });
        Ok(Self {
            template_id,
            template_name: trimmed.to_string(),
            description,
            department_id,
            equipment_id,
            supervisor_id,
        })
    }
}
