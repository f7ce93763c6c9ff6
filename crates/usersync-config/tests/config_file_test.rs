#![allow(clippy::unwrap_used)]
// File-backed tests for profile loading and saving.

use std::time::Duration;

use pretty_assertions::assert_eq;
use usersync_config::{
    Config, Profile, load_config_from, profile_to_client_config, save_config_to,
};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(cfg.default_profile_name(), "default");
    assert_eq!(cfg.defaults.output, "table");
    assert_eq!(cfg.defaults.timeout, 15);
    assert!(cfg.profiles.is_empty());
}

#[test]
fn toml_profile_loads_into_client_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_profile = "legacy"

[defaults]
output = "json"

[profiles.legacy]
base_url = "http://10.0.0.5:8080/api"
resource = "user"
timeout = 4
"#,
    )
    .unwrap();

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(cfg.defaults.output, "json");

    let name = cfg.default_profile_name().to_owned();
    let client = profile_to_client_config(cfg.profile(&name).unwrap(), &name).unwrap();

    assert_eq!(client.base_url.as_str(), "http://10.0.0.5:8080/api");
    assert_eq!(client.paths.collection, "user");
    assert_eq!(client.paths.paged_list, "user/page");
    assert_eq!(client.timeout, Duration::from_secs(4));
}

#[test]
fn saved_config_reloads_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.profiles.insert(
        "default".into(),
        Profile {
            paged_list: Some("users/paged".into()),
            ..Profile::new("http://localhost:8080/api")
        },
    );
    save_config_to(&cfg, &path).unwrap();

    let reloaded = load_config_from(&path).unwrap();
    assert_eq!(reloaded, cfg);
}

#[test]
fn malformed_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[profiles.x]\nbase_url = ").unwrap();

    assert!(load_config_from(&path).is_err());
}
