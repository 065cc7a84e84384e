//! # vast-model — VAST 2.0 Object Model
//!
//! The sixteen entity types of a VAST 2.0 ad template, each declared as a
//! thin [`vast_core::Entity`] impl: a field-key enum, a `const`
//! [`vast_core::FieldRules`] descriptor, typed assembly, and optional
//! semantic validators. All checking is done by the `vast-core` engine.
//!
//! ## Object Graph
//!
//! ```text
//! Vast
//! └── Ad ── Wrapper | Inline
//!           └── [Creative] ── LinearCreative | NonLinearCreative | CompanionCreative
//!               ├── LinearCreative ── [MediaFile] [TrackingEvent] VideoClicks? AdParameters?
//!               ├── NonLinearCreative ── [NonLinearAd] [TrackingEvent]
//!               │   └── NonLinearAd ── StaticResource? UriWithId? AdParameters?
//!               └── CompanionCreative ── [CompanionAd]
//!                   └── CompanionAd ── StaticResource? AdParameters? [TrackingEvent]
//! ```
//!
//! ## Crate Policy
//!
//! - Entities have private fields, accessor methods, and no `Deserialize`
//!   impl. `Entity::from_raw` is the only constructor.
//! - Entities serialize with `serde` for reporting; enumerations serialize
//!   as their wire tokens.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod ad;
pub mod companion;
pub mod creative;
pub mod enums;
pub mod linear;
pub mod media;
pub mod nonlinear;
pub mod resource;
mod serial;
pub mod vast;

// Re-export primary types for ergonomic imports.
pub use ad::{Ad, AdKind, Inline, Wrapper};
pub use companion::{CompanionAd, CompanionCreative};
pub use creative::{Creative, CreativeKind};
pub use enums::{ApiFramework, Delivery, MimeType, TrackingEventType};
pub use linear::LinearCreative;
pub use media::{AdParameters, MediaFile, TrackingEvent, VideoClicks};
pub use nonlinear::{NonLinearAd, NonLinearCreative};
pub use resource::{StaticResource, UriWithId};
pub use vast::{Vast, VAST_VERSION};
pub use vast_core::{Entity, RawMap, ValidationError};
