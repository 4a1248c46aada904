//! Per-file detectors: complexity, domain-pattern tags and frameworks.

pub mod complexity;
mod frameworks;
mod patterns;
mod registry;

pub use frameworks::FrameworkCatalog;
pub use patterns::build_registry;
pub use registry::{PatternRegistry, PatternTag, RuleScope, TagCategory, MAX_TAGS};
