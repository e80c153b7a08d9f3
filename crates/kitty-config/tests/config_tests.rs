use kitty_config::{Config, ConfigError, ConfigManager};
use kitty_domain::{GroupId, TimeWindow};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert!(cfg.profile.group_id.is_default());
    assert_eq!(cfg.default_window, TimeWindow::All);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(manager.backups_dir().exists());
}

#[test]
fn config_manager_persists_profile_and_preferences() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.currency = "EUR".to_string();
    cfg.profile.sign_in("Sam");
    cfg.profile.group_id = GroupId::new("flat-42");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency, "EUR");
    assert_eq!(loaded.profile.person(), Some("Sam"));
    assert_eq!(loaded.group_id().as_str(), "flat-42");
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn backups_round_trip_and_list_newest_first() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    let mut cfg = Config::default();
    cfg.locale = "pt-PT".into();
    let backup = manager.backup(&cfg, Some("Before move")).expect("backup");
    assert!(backup.name.starts_with("config_"));
    assert!(backup.name.ends_with("_before-move.json"));
    assert!(backup.created_at.is_some());

    let listed = manager.list_backups().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, backup.name);

    let restored = manager.restore(&backup.name).expect("restore");
    assert_eq!(restored.locale, "pt-PT");
}

#[test]
fn restoring_unknown_backup_fails() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    let err = manager.restore("config_19990101_000000.json").unwrap_err();
    assert!(matches!(err, ConfigError::BackupNotFound(_)));
}
