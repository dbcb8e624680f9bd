//! Type-tag registry used to rebuild polymorphic feature nodes from
//! description records.
//!
//! Built-in kinds register through `#[derive(RegisterFeature)]`, which
//! submits a [`FeatureRegistration`] to an `inventory` collection. Nothing is
//! registered as a side effect of loading: [`Registry::with_builtins`] reads
//! the collection when asked, and the process-wide registry is fixed once
//! [`install`]ed or first used.

mod description;

use std::collections::HashMap;
use std::sync::OnceLock;

use log::{debug, warn};

pub use description::DescriptionReader;

use crate::core::{Feature, FeatureMap};
use crate::error::{FeatureError, Result};

/// Builds a node from its description tokens, resolving input ids in the map.
pub type DeserializeFn = fn(&[String], &FeatureMap) -> Result<Feature>;

type Factory = Box<dyn Fn(&[String], &FeatureMap) -> Result<Feature> + Send + Sync>;

/// Tag a feature kind is registered under.
pub trait TypeTag {
    const TYPE_TAG: &'static str;
}

/// Reconstruction of a feature kind from a description record.
pub trait FromDescription {
    fn from_description(description: &[String], features: &FeatureMap) -> Result<Feature>;
}

/// Inventory entry submitted by `#[derive(RegisterFeature)]`.
pub struct FeatureRegistration {
    pub type_tag: &'static str,
    pub deserialize: DeserializeFn,
}

inventory::collect!(FeatureRegistration);

/// Mapping from type tag to construction function.
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry holding every kind submitted through the inventory,
    /// registered in tag order.
    pub fn with_builtins() -> Self {
        let mut entries: Vec<&FeatureRegistration> =
            inventory::iter::<FeatureRegistration>.into_iter().collect();
        entries.sort_by_key(|entry| entry.type_tag);

        let mut registry = Self::new();
        for entry in entries {
            // Derived tags are checked at compile time.
            if let Err(err) = registry.register(entry.type_tag, entry.deserialize) {
                warn!("skipping built-in feature type: {}", err);
            }
        }
        registry
    }

    /// Maps `type_tag` to `factory`. The last registration for a tag wins;
    /// returns `true` if an earlier one was replaced.
    ///
    /// Lookups trim the tag read from a record, so a tag that is empty,
    /// padded or contains whitespace could never match and is rejected.
    pub fn register<F>(&mut self, type_tag: impl Into<String>, factory: F) -> Result<bool>
    where
        F: Fn(&[String], &FeatureMap) -> Result<Feature> + Send + Sync + 'static,
    {
        let type_tag = type_tag.into();
        if type_tag.is_empty() || type_tag.chars().any(char::is_whitespace) {
            return Err(FeatureError::range(format!(
                "invalid feature type tag {type_tag:?}: must be a single non-empty token"
            )));
        }
        debug!("registering feature type '{}'", type_tag);
        Ok(self
            .factories
            .insert(type_tag, Box::new(factory))
            .is_some())
    }

    /// Registers a kind under its derived tag.
    pub fn register_kind<K: TypeTag + FromDescription + 'static>(&mut self) -> Result<bool> {
        self.register(K::TYPE_TAG, K::from_description)
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.factories.contains_key(type_tag)
    }

    /// Every registered tag, sorted.
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }

    /// Rebuilds one node from `description`.
    ///
    /// Inputs are resolved against `features`, which must already hold every
    /// id the record references. The caller inserts the result into the map.
    pub fn from_description(&self, description: &[String], features: &FeatureMap) -> Result<Feature> {
        if description.len() < 2 {
            return Err(FeatureError::range(format!(
                "description needs at least an id and a type, got {} token(s)",
                description.len()
            )));
        }
        let type_tag = description[1].trim();
        let factory = self
            .factories
            .get(type_tag)
            .ok_or_else(|| FeatureError::Configuration {
                type_tag: type_tag.to_string(),
            })?;
        factory(description, features)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Installs the process-wide registry. Must run before the first call to
/// [`global`]; fails if a registry is already in place.
pub fn install(registry: Registry) -> Result<()> {
    let types = registry.registered_types();
    GLOBAL
        .set(registry)
        .map_err(|_| FeatureError::AlreadyInstalled)?;
    debug!("installed feature registry with types {:?}", types);
    Ok(())
}

/// The process-wide registry; installs the built-ins if nothing was installed.
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(Registry::with_builtins)
}

/// [`Registry::from_description`] against the process-wide registry.
pub fn from_description(description: &[String], features: &FeatureMap) -> Result<Feature> {
    global().from_description(description, features)
}
