use serde::{Deserialize, Serialize};

use super::Entity;

/// A member's role within a community. The community id is a plain reference
/// and is never checked against the community collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub community_id: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPatch {
    pub community_id: Option<String>,
    pub role: Option<String>,
}

impl Entity for Membership {
    type Patch = MembershipPatch;

    const NAME: &'static str = "membership";
    const PATH: &'static str = "membership";
    const COLLECTION: &'static str = "memberships";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply_patch(&mut self, patch: MembershipPatch) {
        if let Some(community_id) = patch.community_id {
            self.community_id = community_id;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}
