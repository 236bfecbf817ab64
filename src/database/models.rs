pub mod community;
pub mod location;
pub mod membership;

pub use community::{Community, CommunityPatch};
pub use location::{Location, LocationPatch};
pub use membership::{Membership, MembershipPatch};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record type served by the generic CRUD handlers.
///
/// `Patch` is the partial-update shape accepted by `PUT /{path}/{id}`: every
/// field is optional and only the fields present in the request body are
/// written onto the stored record.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Patch: DeserializeOwned + Send + 'static;

    /// Singular name used in log lines and error messages.
    const NAME: &'static str;
    /// URL segment the resource is mounted under.
    const PATH: &'static str;
    /// Table backing the collection in the document store.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn apply_patch(&mut self, patch: Self::Patch);
}
