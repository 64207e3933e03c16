//! Hand-authored reference sequences.
//!
//! Each configured route carries one canonical, annotated stop order per
//! direction. The repository is built once (from the built-in tables or a
//! JSON file), validated at load time, and read-only afterwards.

mod annotation;
mod builtin;
mod error;
mod repository;
mod route;
mod sequence;

pub use annotation::{AnnotationKind, InvalidAnnotation};
pub use builtin::{COMMUNITY_COMPLEX, ReferenceRepositoryBuilder, west_kootenay};
pub use error::{ConfigError, NotConfigured, SequenceError};
pub use repository::{
    DirectionRecord, LoadedReferences, MergeRuleRecord, ReferenceConfig, ReferenceRepository,
    RouteRecord, StopRecord,
};
pub use route::{DirectionSpec, RouteReference};
pub use sequence::{ReferencePosition, ReferenceSequence, StopRef};
