//! Request queue domain: request model, note and control merging, and the
//! awardable role catalog. Free of any Discord client dependency.

pub mod annotation;
pub mod components;
pub mod errors;
pub mod request;
pub mod roles;
pub mod types;

pub use annotation::NoteMerge;
pub use request::{FieldKind, RelayNote, Request, RequestField, WinnerRequestDraft};
pub use roles::{build_candidates, RoleCandidate};
pub use types::*;
