//! Rule-application engine for the scrub record-cleaning system.
//!
//! A [`Profile`] bundles a validated field-rule map, a hook registry, and
//! a reference-store handle. Per record, [`Profile::clean`] runs the
//! lookup pipeline, the derive pipeline, and the `afterAll` hook,
//! mutating the record and appending to the change history as it goes.
//!
//! The pipelines are also exposed directly ([`apply_lookups`],
//! [`apply_derives`]) for callers that drive the stages themselves.

pub mod derive;
pub mod error;
pub mod hooks;
pub mod lookup;
pub mod profile;
pub mod services;

pub use derive::apply_derives;
pub use error::EngineError;
pub use hooks::{HookConfig, HookError, HookFn, HookRegistry, HookResult};
pub use lookup::apply_lookups;
pub use profile::Profile;
