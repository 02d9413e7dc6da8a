//! Tracker-level behavior: lifecycle, bucket invariants, persistence.

use anyhow::Result;
use deft::config::ConfigOverrides;
use deft::error::UserError;
use deft::storage::FileStorage;
use deft::tracker::FeatureTracker;
use tempfile::TempDir;

fn init_tracker() -> Result<(TempDir, FeatureTracker)> {
    let temp_dir = TempDir::new()?;
    let storage = FileStorage::new(temp_dir.path());
    let tracker = FeatureTracker::init(storage, &ConfigOverrides::default())?;
    Ok((temp_dir, tracker))
}

fn reload(temp_dir: &TempDir) -> Result<FeatureTracker> {
    FeatureTracker::load(FileStorage::new(temp_dir.path()))
}

/// Asserts that the bucket for `status` holds exactly `expected` in priority
/// order, and that the features themselves agree with their bucket rank.
fn assert_bucket(
    tracker: &mut FeatureTracker,
    status: &str,
    expected: &[&str],
) -> Result<()> {
    let bucket = tracker.features_with_status(status)?;
    let actual: Vec<String> = bucket.iter().map(ToString::to_string).collect();
    assert_eq!(actual, expected);
    for (index, name) in expected.iter().enumerate() {
        let feature = tracker.feature_named(name)?;
        assert_eq!(feature.status(), status);
        assert_eq!(feature.priority(), index + 1, "priority of {name}");
    }
    Ok(())
}

mod lifecycle {
    use super::*;

    #[test]
    fn init_refuses_to_run_twice() -> Result<()> {
        let (temp_dir, _tracker) = init_tracker()?;

        let err =
            FeatureTracker::init(FileStorage::new(temp_dir.path()), &ConfigOverrides::default())
                .unwrap_err();
        assert!(err.downcast_ref::<UserError>().is_some());
        assert!(err.to_string().contains("already initialised"));
        Ok(())
    }

    #[test]
    fn load_requires_an_initialised_tracker() -> Result<()> {
        let temp_dir = TempDir::new()?;

        let err = FeatureTracker::load(FileStorage::new(temp_dir.path())).unwrap_err();
        assert!(err.downcast_ref::<UserError>().is_some());
        assert!(err.to_string().contains("not initialised"));
        Ok(())
    }

    #[test]
    fn init_applies_and_persists_overrides() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let overrides = ConfigOverrides {
            datadir: Some("features".into()),
            initial_status: Some("inbox".to_string()),
        };
        FeatureTracker::init(FileStorage::new(temp_dir.path()), &overrides)?;

        let mut tracker = reload(&temp_dir)?;
        assert_eq!(tracker.config().initial_status, "inbox");
        assert_eq!(tracker.config().datadir, std::path::PathBuf::from("features"));

        // A feature created without an explicit status picks up the override.
        tracker.create("x", None, "")?;
        assert_eq!(tracker.feature_named("x")?.status(), "inbox");
        assert!(temp_dir.path().join("features/x.feature").exists());
        Ok(())
    }

    #[test]
    fn configure_persists_immediately_without_save() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        tracker.configure(&ConfigOverrides {
            datadir: None,
            initial_status: Some("backlog".to_string()),
        })?;
        // No save() call; a fresh session still sees the change.
        let tracker = reload(&temp_dir)?;
        assert_eq!(tracker.config().initial_status, "backlog");
        Ok(())
    }
}

mod buckets {
    use super::*;

    #[test]
    fn created_features_are_appended_with_dense_priorities() -> Result<()> {
        let (_temp, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.create("b", Some("new"), "")?;
        tracker.create("c", Some("new"), "")?;

        assert_bucket(&mut tracker, "new", &["a", "b", "c"])
    }

    #[test]
    fn buckets_of_different_statuses_are_independent() -> Result<()> {
        let (_temp, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.create("b", Some("done"), "")?;
        tracker.create("c", Some("new"), "")?;

        assert_bucket(&mut tracker, "new", &["a", "c"])?;
        assert_bucket(&mut tracker, "done", &["b"])
    }

    #[test]
    fn the_worked_example_scenario() -> Result<()> {
        let (_temp, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.create("b", Some("new"), "")?;
        tracker.create("c", Some("new"), "")?;

        tracker.change_priority("b", 1)?;
        assert_bucket(&mut tracker, "new", &["b", "a", "c"])?;

        tracker.purge("a")?;
        assert_bucket(&mut tracker, "new", &["b", "c"])?;

        tracker.change_status("c", "done")?;
        assert_bucket(&mut tracker, "new", &["b"])?;
        assert_bucket(&mut tracker, "done", &["c"])
    }

    #[test]
    fn out_of_range_priorities_are_clamped() -> Result<()> {
        let (_temp, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.create("b", Some("new"), "")?;
        tracker.create("c", Some("new"), "")?;

        tracker.change_priority("c", -10)?;
        assert_bucket(&mut tracker, "new", &["c", "a", "b"])?;

        tracker.change_priority("c", 100)?;
        assert_bucket(&mut tracker, "new", &["a", "b", "c"])
    }

    #[test]
    fn changing_priority_to_its_current_value_changes_nothing() -> Result<()> {
        let (_temp, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.create("b", Some("new"), "")?;

        tracker.change_priority("b", 2)?;
        assert_bucket(&mut tracker, "new", &["a", "b"])
    }

    #[test]
    fn changing_status_to_its_current_value_is_a_no_op() -> Result<()> {
        let (_temp, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.create("b", Some("new"), "")?;

        tracker.change_status("a", "new")?;
        assert_bucket(&mut tracker, "new", &["a", "b"])
    }

    #[test]
    fn a_moved_feature_joins_the_end_of_its_destination_bucket() -> Result<()> {
        let (_temp, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.create("b", Some("new"), "")?;
        tracker.create("x", Some("done"), "")?;

        tracker.change_status("a", "done")?;
        assert_bucket(&mut tracker, "new", &["b"])?;
        assert_bucket(&mut tracker, "done", &["x", "a"])
    }

    #[test]
    fn all_features_sorts_by_status_then_priority() -> Result<()> {
        let (_temp, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.create("b", Some("done"), "")?;
        tracker.create("c", Some("new"), "")?;

        let listed: Vec<(String, usize, String)> = tracker
            .all_features()?
            .iter()
            .map(|f| (f.status().to_string(), f.priority(), f.name().to_string()))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("done".to_string(), 1, "b".to_string()),
                ("new".to_string(), 1, "a".to_string()),
                ("new".to_string(), 2, "c".to_string()),
            ]
        );
        Ok(())
    }
}

mod persistence {
    use super::*;

    #[test]
    fn created_features_survive_a_reload_round_trip() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        tracker.create("x", Some("new"), "a thing to do")?;
        let priority = tracker.feature_named("x")?.priority();
        tracker.save()?;

        let mut tracker = reload(&temp_dir)?;
        let feature = tracker.feature_named("x")?;
        assert_eq!(feature.status(), "new");
        assert_eq!(feature.priority(), priority);
        assert_eq!(feature.description(), "a thing to do");
        Ok(())
    }

    #[test]
    fn renumbering_is_persisted_by_save() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.create("b", Some("new"), "")?;
        tracker.create("c", Some("new"), "")?;
        tracker.change_priority("b", 1)?;
        tracker.save()?;

        let mut tracker = reload(&temp_dir)?;
        assert_bucket(&mut tracker, "new", &["b", "a", "c"])
    }

    #[test]
    fn unsaved_changes_are_not_persisted() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.save()?;

        tracker.change_status("a", "done")?;
        drop(tracker); // no save

        let mut tracker = reload(&temp_dir)?;
        assert_eq!(tracker.feature_named("a")?.status(), "new");
        Ok(())
    }

    #[test]
    fn save_clears_the_cache_so_reads_hit_storage_again() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        tracker.create("a", Some("new"), "")?;
        tracker.save()?;

        // Simulate an out-of-band edit between operations of one session.
        let storage = FileStorage::new(temp_dir.path());
        storage.write_text(".deft/data/a.feature", "status = \"done\"\npriority = 1\n")?;

        assert_eq!(tracker.feature_named("a")?.status(), "done");
        Ok(())
    }

    #[test]
    fn duplicate_create_fails_and_leaves_storage_untouched() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        tracker.create("x", Some("new"), "original")?;
        tracker.save()?;

        let storage = FileStorage::new(temp_dir.path());
        let record_before = storage.read_text(".deft/data/x.feature")?;
        let description_before = storage.read_text(".deft/data/x.description")?;

        let err = tracker.create("x", Some("other"), "clobber").unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(storage.read_text(".deft/data/x.feature")?, record_before);
        assert_eq!(
            storage.read_text(".deft/data/x.description")?,
            description_before
        );
        Ok(())
    }

    #[test]
    fn purge_removes_the_feature_from_storage() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        tracker.create("x", Some("new"), "doomed")?;
        tracker.set_property("x", "size", toml::Value::Integer(3))?;
        tracker.save()?;

        let mut tracker = reload(&temp_dir)?;
        tracker.purge("x")?;
        tracker.save()?;

        let storage = FileStorage::new(temp_dir.path());
        assert!(!storage.exists(".deft/data/x.feature"));
        assert!(!storage.exists(".deft/data/x.description"));
        assert!(!storage.exists(".deft/data/x.properties"));

        let mut tracker = reload(&temp_dir)?;
        let err = tracker.feature_named("x").unwrap_err();
        assert!(err.downcast_ref::<UserError>().is_some());
        assert!(err.to_string().contains("no feature named x"));
        Ok(())
    }

    #[test]
    fn unknown_names_fail_lookup_and_purge() -> Result<()> {
        let (_temp, mut tracker) = init_tracker()?;

        let err = tracker.feature_named("ghost").unwrap_err();
        assert!(err.to_string().contains("no feature named ghost"));

        let err = tracker.purge("ghost").unwrap_err();
        assert!(err.to_string().contains("no feature named ghost"));
        Ok(())
    }
}

mod metadata {
    use super::*;

    #[test]
    fn descriptions_can_be_replaced_and_persist() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        tracker.create("x", Some("new"), "first")?;
        tracker.set_description("x", "second")?;
        tracker.save()?;

        let mut tracker = reload(&temp_dir)?;
        assert_eq!(tracker.feature_named("x")?.description(), "second");
        Ok(())
    }

    #[test]
    fn properties_keep_their_types_across_a_round_trip() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        tracker.create("x", Some("new"), "")?;
        tracker.set_property("x", "estimate", toml::Value::Integer(5))?;
        tracker.set_property("x", "owner", toml::Value::String("ana".to_string()))?;
        tracker.set_property("x", "blocked", toml::Value::Boolean(false))?;
        tracker.save()?;

        let mut tracker = reload(&temp_dir)?;
        let properties = tracker.feature_named("x")?.properties();
        assert_eq!(properties["estimate"], toml::Value::Integer(5));
        assert_eq!(properties["owner"], toml::Value::String("ana".to_string()));
        assert_eq!(properties["blocked"], toml::Value::Boolean(false));
        Ok(())
    }

    #[test]
    fn a_record_without_sibling_files_reads_as_empty() -> Result<()> {
        let (temp_dir, mut tracker) = init_tracker()?;
        let storage = FileStorage::new(temp_dir.path());
        storage.write_text(".deft/data/bare.feature", "status = \"new\"\npriority = 1\n")?;

        let feature = tracker.feature_named("bare")?;
        assert_eq!(feature.description(), "");
        assert!(feature.properties().is_empty());
        Ok(())
    }
}
