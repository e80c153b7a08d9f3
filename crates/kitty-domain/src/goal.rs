//! Shared savings goals.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A savings target shared by the whole group. Progress is derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedGoal {
    pub id: Uuid,
    pub group_id: GroupId,
    pub name: String,
    pub target: f64,
}

impl SharedGoal {
    pub fn new(group_id: GroupId, name: impl Into<String>, target: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            name: name.into(),
            target,
        }
    }
}

impl Identifiable for SharedGoal {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for SharedGoal {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for SharedGoal {
    fn display_label(&self) -> String {
        format!("{} (target {:.2})", self.name, self.target)
    }
}

/// Partial update for a goal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target: Option<f64>,
}

impl SharedGoal {
    pub fn apply(&mut self, patch: &GoalPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(target) = patch.target {
            self.target = target;
        }
    }
}
