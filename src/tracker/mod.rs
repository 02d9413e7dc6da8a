//! Feature tracking: the session-scoped orchestrator.
//!
//! A [`FeatureTracker`] mediates all access to features. It lazily loads
//! feature files through [`FileStorage`], keeps a single live [`Feature`]
//! instance per storage path for the duration of the session, tracks which
//! features have diverged from disk, and writes exactly those back on
//! [`FeatureTracker::save`].
//!
//! Status/priority bookkeeping is delegated to [`bucket::Bucket`]: every
//! feature belongs to the bucket of its status, and priorities within a
//! bucket are always the dense run `1..=N`.
//!
//! # Persisted layout
//!
//! Three sibling files per feature under the configured data directory:
//! `<name>.feature` (TOML record with `status` and `priority`),
//! `<name>.description` (free text), and `<name>.properties` (TOML table).
//! Missing description/properties files read as empty.

pub mod bucket;

use crate::config::{CONFIG_DIR, ConfigOverrides, TrackerConfig};
use crate::error::UserError;
use crate::storage::FileStorage;
use anyhow::Result;
use bucket::Bucket;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix of per-feature record files.
pub const FEATURE_SUFFIX: &str = ".feature";

/// Suffix of per-feature description files.
pub const DESCRIPTION_SUFFIX: &str = ".description";

/// Suffix of per-feature property-table files.
pub const PROPERTIES_SUFFIX: &str = ".properties";

/// One tracked work item.
///
/// Features are handed out by reference from the owning tracker's cache and
/// expose read accessors only; all mutation goes through tracker methods so
/// that every change lands in the dirty set.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Unique name, derived 1:1 from the record path.
    name: String,
    /// Lifecycle status; also the bucket grouping key.
    status: String,
    /// Rank within the status bucket, dense from 1.
    priority: usize,
    /// Free-text description.
    description: String,
    /// Structured metadata.
    properties: toml::Table,
}

impl Feature {
    /// The feature's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The feature's current status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The feature's priority within its status bucket.
    #[must_use]
    pub fn priority(&self) -> usize {
        self.priority
    }

    /// The feature's free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The feature's property table.
    #[must_use]
    pub fn properties(&self) -> &toml::Table {
        &self.properties
    }
}

/// The persisted portion of a feature record file.
#[derive(Debug, Serialize, Deserialize)]
struct FeatureRecord {
    /// Status string at the time of the last save.
    status: String,
    /// Priority at the time of the last save.
    priority: usize,
}

/// Session-scoped tracker owning the load cache, dirty set, and configuration.
#[derive(Debug)]
pub struct FeatureTracker {
    /// Storage rooted at the tracker directory.
    storage: FileStorage,
    /// Loaded configuration; persisted eagerly by `init` and `configure`.
    config: TrackerConfig,
    /// The single live instance per feature record path.
    cache: HashMap<PathBuf, Feature>,
    /// Record paths of features whose in-memory state diverges from disk.
    dirty: HashSet<PathBuf>,
}

impl FeatureTracker {
    /// Initialises a new tracker under `storage`'s root, merging `overrides`
    /// into the default configuration and persisting it immediately.
    ///
    /// # Errors
    /// Fails with [`UserError::AlreadyInitialised`] if the marker directory
    /// already exists, or with an I/O error if the directories or the
    /// configuration document cannot be created.
    pub fn init(storage: FileStorage, overrides: &ConfigOverrides) -> Result<Self> {
        if storage.exists(CONFIG_DIR) {
            return Err(UserError::AlreadyInitialised(CONFIG_DIR.to_string()).into());
        }
        let mut config = TrackerConfig::default();
        config.apply(overrides);

        storage.create_dir_all(CONFIG_DIR)?;
        storage.create_dir_all(&config.datadir)?;
        config.save(&storage)?;
        info!(root = %storage.basedir().display(), "initialised tracker");

        Ok(Self {
            storage,
            config,
            cache: HashMap::new(),
            dirty: HashSet::new(),
        })
    }

    /// Reconstructs a tracker from its persisted configuration, with an
    /// empty cache.
    ///
    /// # Errors
    /// Fails with [`UserError::NotInitialised`] if the marker directory does
    /// not exist, or with an I/O error if the configuration cannot be read.
    pub fn load(storage: FileStorage) -> Result<Self> {
        if !storage.exists(CONFIG_DIR) {
            return Err(UserError::NotInitialised(CONFIG_DIR.to_string()).into());
        }
        let config = TrackerConfig::load(&storage)?;
        Ok(Self {
            storage,
            config,
            cache: HashMap::new(),
            dirty: HashSet::new(),
        })
    }

    /// Merges `overrides` into the configuration and persists it immediately,
    /// independent of [`FeatureTracker::save`].
    ///
    /// # Errors
    /// Returns an error if the configuration document cannot be written.
    pub fn configure(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        self.config.apply(overrides);
        self.config.save(&self.storage)
    }

    /// The current configuration.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The storage this tracker operates on.
    #[must_use]
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// True iff a feature with `name` exists in storage.
    #[must_use]
    pub fn feature_exists(&self, name: &str) -> bool {
        self.storage.exists(self.record_path(name))
    }

    /// Creates a new feature, appended at the lowest-priority end of its
    /// status bucket, and persists it immediately. With no explicit `status`
    /// the configured initial status is used. The just-created feature
    /// starts clean (not dirty).
    ///
    /// # Errors
    /// Fails with [`UserError::FeatureAlreadyExists`] if the name is taken;
    /// nothing is written in that case.
    pub fn create(
        &mut self,
        name: &str,
        status: Option<&str>,
        description: &str,
    ) -> Result<&Feature> {
        let status = status.unwrap_or(&self.config.initial_status).to_string();
        let path = self.record_path(name);
        if self.storage.exists(&path) {
            return Err(UserError::FeatureAlreadyExists(name.to_string()).into());
        }

        let priority = self.features_with_status(&status)?.len() + 1;
        let feature = Feature {
            name: name.to_string(),
            status,
            priority,
            description: description.to_string(),
            properties: toml::Table::new(),
        };
        self.write_feature(&feature)?;
        debug!(name, priority, "created feature");
        Ok(self.cache.entry(path).or_insert(feature))
    }

    /// Returns the feature with the given name, loading it from storage on
    /// first access. Repeated lookups within one session return the same
    /// cached instance.
    ///
    /// # Errors
    /// Fails with [`UserError::NoFeatureNamed`] if no such feature exists.
    pub fn feature_named(&mut self, name: &str) -> Result<&Feature> {
        self.cached_or_load(name).map(|feature| &*feature)
    }

    /// All features sharing `status`, as a priority-ordered [`Bucket`].
    ///
    /// # Errors
    /// Returns an error if any feature file cannot be read.
    pub fn features_with_status(&mut self, status: &str) -> Result<Bucket> {
        let names = self.load_all()?;
        let mut members: Vec<(usize, String)> = Vec::new();
        for name in names {
            let feature = &self.cache[&self.record_path(&name)];
            if feature.status == status {
                members.push((feature.priority, name));
            }
        }
        members.sort();
        Ok(Bucket::new(members.into_iter().map(|(_, name)| name).collect()))
    }

    /// All features, sorted by status and then by priority within each
    /// status.
    ///
    /// # Errors
    /// Returns an error if any feature file cannot be read.
    pub fn all_features(&mut self) -> Result<Vec<&Feature>> {
        self.load_all()?;
        let mut features: Vec<&Feature> = self.cache.values().collect();
        features.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then_with(|| a.priority.cmp(&b.priority))
        });
        Ok(features)
    }

    /// Moves `name` into the `new_status` bucket, appended at that bucket's
    /// end, and renumbers the survivors of the old bucket. Changing to the
    /// feature's current status is a no-op.
    ///
    /// # Errors
    /// Fails with [`UserError::NoFeatureNamed`] if no such feature exists.
    pub fn change_status(&mut self, name: &str, new_status: &str) -> Result<()> {
        let old_status = self.feature_named(name)?.status.clone();
        if old_status == new_status {
            return Ok(());
        }

        let mut old_bucket = self.features_with_status(&old_status)?;
        old_bucket.remove(name);
        self.apply_bucket(&old_bucket);

        // Built before the status flips, so it cannot contain the feature.
        let mut new_bucket = self.features_with_status(new_status)?;
        new_bucket.append(name);

        let path = self.record_path(name);
        if let Some(feature) = self.cache.get_mut(&path) {
            feature.status = new_status.to_string();
            self.dirty.insert(path);
        }
        self.apply_bucket(&new_bucket);
        info!(name, from = old_status, to = new_status, "changed status");
        Ok(())
    }

    /// Moves `name` to the requested priority within its status bucket,
    /// clamped into `[1, N]`.
    ///
    /// # Errors
    /// Fails with [`UserError::NoFeatureNamed`] if no such feature exists.
    pub fn change_priority(&mut self, name: &str, requested: i64) -> Result<()> {
        let status = self.feature_named(name)?.status.clone();
        let mut bucket = self.features_with_status(&status)?;
        bucket.change_priority(name, requested);
        self.apply_bucket(&bucket);
        Ok(())
    }

    /// Replaces the description of `name`.
    ///
    /// # Errors
    /// Fails with [`UserError::NoFeatureNamed`] if no such feature exists.
    pub fn set_description(&mut self, name: &str, description: &str) -> Result<()> {
        let path = self.record_path(name);
        self.cached_or_load(name)?.description = description.to_string();
        self.dirty.insert(path);
        Ok(())
    }

    /// Replaces the whole property table of `name`.
    ///
    /// # Errors
    /// Fails with [`UserError::NoFeatureNamed`] if no such feature exists.
    pub fn set_properties(&mut self, name: &str, properties: toml::Table) -> Result<()> {
        let path = self.record_path(name);
        self.cached_or_load(name)?.properties = properties;
        self.dirty.insert(path);
        Ok(())
    }

    /// Sets a single property of `name`.
    ///
    /// # Errors
    /// Fails with [`UserError::NoFeatureNamed`] if no such feature exists.
    pub fn set_property(&mut self, name: &str, key: &str, value: toml::Value) -> Result<()> {
        let path = self.record_path(name);
        self.cached_or_load(name)?
            .properties
            .insert(key.to_string(), value);
        self.dirty.insert(path);
        Ok(())
    }

    /// Deletes `name` from storage and the session, renumbering the rest of
    /// its bucket.
    ///
    /// # Errors
    /// Fails with [`UserError::NoFeatureNamed`] if no such feature exists, or
    /// with an I/O error if its files cannot be removed.
    pub fn purge(&mut self, name: &str) -> Result<()> {
        let status = self.feature_named(name)?.status.clone();
        let mut bucket = self.features_with_status(&status)?;
        bucket.remove(name);
        self.apply_bucket(&bucket);

        let path = self.record_path(name);
        self.cache.remove(&path);
        self.dirty.remove(&path);
        self.storage.remove(&path)?;
        self.storage.remove(self.description_rel_path(name))?;
        self.storage.remove(self.properties_rel_path(name))?;
        info!(name, "purged feature");
        Ok(())
    }

    /// Writes every dirty feature back to storage, one at a time, then
    /// discards the dirty set and the entire cache. There is no multi-file
    /// atomicity; a crash mid-save leaves earlier features updated and later
    /// ones not.
    ///
    /// # Errors
    /// Returns an error on the first feature that cannot be written.
    pub fn save(&mut self) -> Result<()> {
        let dirty: Vec<PathBuf> = self.dirty.iter().cloned().collect();
        for path in &dirty {
            if let Some(feature) = self.cache.get(path) {
                self.write_feature(feature)?;
            }
        }
        debug!(count = dirty.len(), "saved dirty features");
        self.dirty.clear();
        self.cache.clear();
        Ok(())
    }

    /// Absolute path of the description file for `name`, for handing to an
    /// external editor.
    #[must_use]
    pub fn description_file(&self, name: &str) -> PathBuf {
        self.storage.abspath(self.description_rel_path(name))
    }

    /// Absolute path of the properties file for `name`.
    #[must_use]
    pub fn properties_file(&self, name: &str) -> PathBuf {
        self.storage.abspath(self.properties_rel_path(name))
    }

    /// Cache key and storage path of the record file for `name`.
    fn record_path(&self, name: &str) -> PathBuf {
        self.config.datadir.join(format!("{name}{FEATURE_SUFFIX}"))
    }

    /// Storage path of the description file for `name`.
    fn description_rel_path(&self, name: &str) -> PathBuf {
        self.config
            .datadir
            .join(format!("{name}{DESCRIPTION_SUFFIX}"))
    }

    /// Storage path of the properties file for `name`.
    fn properties_rel_path(&self, name: &str) -> PathBuf {
        self.config
            .datadir
            .join(format!("{name}{PROPERTIES_SUFFIX}"))
    }

    /// Returns the cached instance for `name`, loading it from storage first
    /// if this session has not seen it yet.
    fn cached_or_load(&mut self, name: &str) -> Result<&mut Feature> {
        let path = self.record_path(name);
        if !self.cache.contains_key(&path) {
            if !self.storage.exists(&path) {
                return Err(UserError::NoFeatureNamed(name.to_string()).into());
            }
            let feature = self.read_feature(name)?;
            self.cache.insert(path.clone(), feature);
        }
        Ok(self
            .cache
            .get_mut(&path)
            .expect("feature cached immediately above"))
    }

    /// Loads every feature under the data directory into the cache and
    /// returns their names.
    fn load_all(&mut self) -> Result<Vec<String>> {
        let pattern = self
            .config
            .datadir
            .join(format!("*{FEATURE_SUFFIX}"))
            .to_string_lossy()
            .into_owned();
        let mut names = Vec::new();
        for path in self.storage.list(&pattern)? {
            if let Some(name) = feature_name_of(&path) {
                self.cached_or_load(&name)?;
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Reads the three files of `name` from storage. Absent description or
    /// properties files read as empty.
    fn read_feature(&self, name: &str) -> Result<Feature> {
        let record: FeatureRecord = self.storage.load_record(self.record_path(name))?;

        let description_path = self.description_rel_path(name);
        let description = if self.storage.exists(&description_path) {
            self.storage.read_text(&description_path)?
        } else {
            String::new()
        };

        let properties_path = self.properties_rel_path(name);
        let properties = if self.storage.exists(&properties_path) {
            self.storage.load_record(&properties_path)?
        } else {
            toml::Table::new()
        };

        Ok(Feature {
            name: name.to_string(),
            status: record.status,
            priority: record.priority,
            description,
            properties,
        })
    }

    /// Writes all three files of `feature` to storage.
    fn write_feature(&self, feature: &Feature) -> Result<()> {
        self.storage.save_record(
            self.record_path(&feature.name),
            &FeatureRecord {
                status: feature.status.clone(),
                priority: feature.priority,
            },
        )?;
        self.storage
            .write_text(self.description_rel_path(&feature.name), &feature.description)?;
        self.storage
            .save_record(self.properties_rel_path(&feature.name), &feature.properties)
    }

    /// Writes the rank of every bucket member back onto the cached features,
    /// dirtying exactly the ones whose priority changed.
    fn apply_bucket(&mut self, bucket: &Bucket) {
        for (index, name) in bucket.iter().enumerate() {
            let path = self.record_path(name);
            if let Some(feature) = self.cache.get_mut(&path)
                && feature.priority != index + 1
            {
                feature.priority = index + 1;
                self.dirty.insert(path);
            }
        }
    }
}

/// Maps a feature record path back to the feature name, rejecting files
/// without the record suffix.
fn feature_name_of(path: &Path) -> Option<String> {
    path.file_name()?
        .to_str()?
        .strip_suffix(FEATURE_SUFFIX)
        .map(ToString::to_string)
}
