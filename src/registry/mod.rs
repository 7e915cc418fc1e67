//! Resolution of raw object type labels to canonical taxonomy entries.
//!
//! The registry owns an in-process cache keyed on the exact raw label. The
//! cache lives as long as the registry; call [`ObjectTypeRegistry::reset`]
//! between independent runs so taxonomy changes made elsewhere are seen.

mod slug;

pub use slug::slugify;

use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::store::{Fetched, Store, fetch_or_create};
use crate::types::{NewObjectType, ObjectType};

pub struct ObjectTypeRegistry<'s> {
    store: &'s dyn Store,
    cache: HashMap<String, ObjectType>,
}

impl<'s> ObjectTypeRegistry<'s> {
    pub fn new(store: &'s dyn Store) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    /// Resolves a raw label to its canonical object type, creating the type
    /// on first sight.
    pub fn resolve(&mut self, raw_label: &str) -> Result<ObjectType> {
        if raw_label.trim().is_empty() {
            return Err(Error::InvalidInput(
                "object type label cannot be empty".to_string(),
            ));
        }

        if let Some(cached) = self.cache.get(raw_label) {
            return Ok(cached.clone());
        }

        let object_type = self.lookup_or_create(raw_label).inspect_err(|e| {
            error!(label = raw_label, error = %e, "Failed to resolve object type");
        })?;

        self.cache
            .insert(raw_label.to_string(), object_type.clone());
        Ok(object_type)
    }

    fn lookup_or_create(&mut self, raw_label: &str) -> Result<ObjectType> {
        let store = self.store;

        let fetched = fetch_or_create(
            "object type",
            raw_label,
            || {
                let canonical = store.find_object_types_by_raw_value(raw_label)?;
                if !canonical.is_empty() {
                    return Ok(canonical);
                }
                // Fall back to surface forms recorded against other entries.
                store
                    .find_raw_value_owners(raw_label)?
                    .into_iter()
                    .filter_map(|id| store.get_object_type(id).transpose())
                    .collect()
            },
            || {
                store.create_object_type(&NewObjectType {
                    raw_value: Some(raw_label.to_string()),
                    slug: Some(slugify(raw_label)),
                    ..Default::default()
                })
            },
        )?;

        if let Fetched::Created(created) = &fetched {
            info!(label = raw_label, id = created.id, "Created object type");
        }

        let mut object_type = fetched.into_inner();
        self.record_raw_value(&mut object_type, raw_label)?;
        Ok(object_type)
    }

    /// Ensures `raw_label` is recorded against `object_type`.
    ///
    /// Fills in the canonical raw value and slug when they are missing and
    /// adds a synonym row unless one already exists for this exact string.
    /// Safe to call repeatedly with the same inputs.
    pub fn record_raw_value(&mut self, object_type: &mut ObjectType, raw_label: &str) -> Result<()> {
        let mut changed = false;

        if object_type.raw_value.is_none() {
            object_type.raw_value = Some(raw_label.to_string());
            changed = true;
        }

        if object_type.slug.as_deref().is_none_or(str::is_empty) {
            let source = object_type.raw_value.as_deref().unwrap_or(raw_label);
            object_type.slug = Some(slugify(source));
            changed = true;
        }

        if changed {
            self.store.update_object_type(object_type)?;
        }

        if self
            .store
            .count_object_type_raw_values(object_type.id, raw_label)?
            == 0
        {
            self.store
                .create_object_type_raw_value(object_type.id, raw_label)?;
            debug!(label = raw_label, id = object_type.id, "Recorded raw value");
        }

        Ok(())
    }

    /// Records `raw_label` as a synonym of the entry whose canonical raw value
    /// is `canonical_raw_value`, so later lookups of the label resolve there.
    pub fn alias(&mut self, raw_label: &str, canonical_raw_value: &str) -> Result<ObjectType> {
        if raw_label.trim().is_empty() || canonical_raw_value.trim().is_empty() {
            return Err(Error::InvalidInput(
                "alias and canonical value cannot be empty".to_string(),
            ));
        }

        let mut canonical = fetch_or_create(
            "object type",
            canonical_raw_value,
            || self.store.find_object_types_by_raw_value(canonical_raw_value),
            || Err(Error::NotFound),
        )?
        .into_inner();

        let other_canonical = self
            .store
            .find_object_types_by_raw_value(raw_label)?
            .into_iter()
            .any(|t| t.id != canonical.id);
        let other_owner = self
            .store
            .find_raw_value_owners(raw_label)?
            .into_iter()
            .any(|id| id != canonical.id);

        if other_canonical || other_owner {
            return Err(Error::IntegrityConflict(format!(
                "'{raw_label}' already belongs to another object type"
            )));
        }

        self.record_raw_value(&mut canonical, raw_label)?;
        self.cache.insert(raw_label.to_string(), canonical.clone());
        Ok(canonical)
    }

    /// Links `type_id` under `parent_id` (or detaches it with `None`).
    pub fn set_parent(&mut self, type_id: i64, parent_id: Option<i64>) -> Result<ObjectType> {
        if parent_id == Some(type_id) {
            return Err(Error::InvalidInput(format!(
                "object type {type_id} cannot be its own parent"
            )));
        }

        let mut object_type = self.store.get_object_type(type_id)?.ok_or(Error::NotFound)?;
        if let Some(parent_id) = parent_id {
            self.store.get_object_type(parent_id)?.ok_or(Error::NotFound)?;
        }

        object_type.parent_type_id = parent_id;
        self.store.update_object_type(&object_type)?;

        for cached in self.cache.values_mut().filter(|t| t.id == type_id) {
            cached.parent_type_id = parent_id;
        }

        Ok(object_type)
    }

    /// Every canonical raw value, sorted.
    pub fn all_raw_values(&self) -> Result<Vec<String>> {
        let mut values: Vec<String> = self
            .store
            .list_object_types()?
            .into_iter()
            .filter_map(|t| t.raw_value)
            .collect();
        values.sort();
        Ok(values)
    }

    /// Drops every cached resolution.
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
