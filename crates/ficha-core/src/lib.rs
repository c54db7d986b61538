//! Core types for Ficha: characters, attributes, skills, and reference catalogs.
//!
//! This crate defines the data model the rules engine consumes. It holds no
//! rules of its own: a [`Character`] is raw player selections, and a
//! [`Catalog`] is the immutable reference data those selections point into.

/// Reference data: skill lists, lineages, peculiarities, trejeitos, and
/// attribute modifiers.
pub mod catalog;
/// Characters, attributes, skill maps, and specializations.
pub mod character;
/// Error types used throughout the crate.
pub mod error;
/// Case- and diacritic-insensitive name normalization.
pub mod normalize;

/// Re-export catalog types.
pub use catalog::{
    AttributeModifier, Catalog, LineageDefinition, LineageEffect, SkillDelta, SkillLists,
    TraitDefinition,
};
/// Re-export character types.
pub use character::{
    Archetype, Attribute, Attributes, Character, CharacterId, SkillCategory, SkillSheet,
    SpecializationCategory, Specializations,
};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export the normalization helper.
pub use normalize::{names_match, normalize_name};
