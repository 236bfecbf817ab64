use serde::{Deserialize, Serialize};

use super::{Entity, Location, Membership};

/// Aggregate record. `location` and `members` are copies taken when the
/// community is written; later changes to the referenced records are not
/// reflected here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Community {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub members: Vec<Membership>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommunityPatch {
    pub name: Option<String>,
    pub location: Option<Location>,
    pub members: Option<Vec<Membership>>,
}

impl Entity for Community {
    type Patch = CommunityPatch;

    const NAME: &'static str = "community";
    const PATH: &'static str = "community";
    const COLLECTION: &'static str = "communities";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply_patch(&mut self, patch: CommunityPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(members) = patch.members {
            self.members = members;
        }
    }
}
