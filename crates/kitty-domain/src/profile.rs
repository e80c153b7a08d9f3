//! Resolved identity handed to the ledger core.

use serde::{Deserialize, Serialize};

use crate::common::GroupId;

/// Display name plus group membership. Credentials never reach this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub group_id: GroupId,
}

impl UserProfile {
    pub fn signed_in(&self) -> bool {
        self.display_name.is_some()
    }

    /// Name recorded as `person` on new entries.
    pub fn person(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn sign_in(&mut self, name: impl Into<String>) {
        let name = name.into();
        let trimmed = name.trim();
        self.display_name = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn sign_out(&mut self) {
        self.display_name = None;
    }
}
