//! Tests for configuration loading and root folder resolution
//!
//! Uses serial_test: tests that touch COW_ROOT_FOLDER or COW_REMOTE_TOKEN are
//! marked #[serial] so they never race on the process environment.

use cow_common::config::{
    default_root_folder, RemoteImageConfig, RootFolderInitializer, RootFolderResolver, TomlConfig,
    REMOTE_TOKEN_ENV, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root = RootFolderResolver::new("test-module").resolve();
    assert_eq!(root, default_root_folder());
    assert!(!root.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_resolver_env_var() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/cow-test-env-folder");

    let root = RootFolderResolver::new("test-module").resolve();
    assert_eq!(root, PathBuf::from("/tmp/cow-test-env-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_blank_env_var_is_ignored() {
    env::set_var(ROOT_FOLDER_ENV, "   ");

    let root = RootFolderResolver::new("test-module").resolve();
    assert_eq!(root, default_root_folder());

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_priority_cli_over_env_over_toml() {
    let toml = TomlConfig::from_toml_str("root_folder = \"/tmp/cow-from-toml\"").unwrap();

    env::set_var(ROOT_FOLDER_ENV, "/tmp/cow-from-env");
    let root = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/cow-from-cli")))
        .with_toml(&toml)
        .resolve();
    assert_eq!(root, PathBuf::from("/tmp/cow-from-cli"));

    let root = RootFolderResolver::new("test-module")
        .with_toml(&toml)
        .resolve();
    assert_eq!(root, PathBuf::from("/tmp/cow-from-env"));

    env::remove_var(ROOT_FOLDER_ENV);
    let root = RootFolderResolver::new("test-module")
        .with_toml(&toml)
        .resolve();
    assert_eq!(root, PathBuf::from("/tmp/cow-from-toml"));
}

#[test]
fn test_initializer_creates_directory() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("nested").join("cow");

    let init = RootFolderInitializer::new(root.clone());
    init.ensure_directory_exists().unwrap();
    assert!(root.is_dir());

    // idempotent
    init.ensure_directory_exists().unwrap();
    assert_eq!(init.database_path(), root.join("cow.db"));
    assert_eq!(init.root_folder(), root.as_path());
}

#[test]
fn test_load_or_default_with_missing_file() {
    let temp = tempfile::tempdir().unwrap();
    let config = TomlConfig::load_or_default(Some(&temp.path().join("absent.toml")));
    assert_eq!(config.port, TomlConfig::default().port);
}

#[test]
fn test_load_or_default_with_broken_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("cow.toml");
    std::fs::write(&path, "port = [this is not toml").unwrap();

    let config = TomlConfig::load_or_default(Some(&path));
    assert_eq!(config.port, TomlConfig::default().port);
}

#[test]
fn test_load_or_default_reads_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("cow.toml");
    std::fs::write(
        &path,
        r#"
        root_folder = "/srv/cow"
        port = 5999

        [image]
        size = 512

        [remote_image]
        base_url = "http://localhost:9000"
        timeout_secs = 5
        "#,
    )
    .unwrap();

    let config = TomlConfig::load_or_default(Some(&path));
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/cow")));
    assert_eq!(config.port, 5999);
    assert_eq!(config.image.size, 512);
    assert_eq!(config.remote_image.base_url, "http://localhost:9000");
    assert_eq!(config.remote_image.timeout_secs, 5);
    assert!(config.remote_image.enabled);
}

#[test]
#[serial]
fn test_remote_token_env_overrides_toml() {
    let remote = RemoteImageConfig {
        token: Some("from-toml".to_string()),
        ..Default::default()
    };

    env::set_var(REMOTE_TOKEN_ENV, "from-env");
    assert_eq!(remote.resolve_token().as_deref(), Some("from-env"));

    env::remove_var(REMOTE_TOKEN_ENV);
    assert_eq!(remote.resolve_token().as_deref(), Some("from-toml"));
}

#[test]
#[serial]
fn test_remote_token_blank_means_none() {
    env::remove_var(REMOTE_TOKEN_ENV);
    let remote = RemoteImageConfig {
        token: Some("  ".to_string()),
        ..Default::default()
    };
    assert_eq!(remote.resolve_token(), None);

    env::set_var(REMOTE_TOKEN_ENV, "");
    assert_eq!(remote.resolve_token(), None);
    env::remove_var(REMOTE_TOKEN_ENV);
}
