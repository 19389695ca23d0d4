// Integration tests for configuration loading

use serial_test::serial;
use sitesearch::core::config::{Config, FacetKind};
use sitesearch::core::search::Field;
use sitesearch::core::xdg::XdgDirs;
use std::env;
use tempfile::TempDir;

const STORE_CONFIG: &str = r#"
[search]
default_page_size = 10
max_page_size = 50

[languages]
known = ["en", "da"]

[sites.store1]
home = "{110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9}"
index = "store1_index"

[facets.category]
kind = "value"
field = "template"

[facets.radius]
kind = "distance"
"#;

fn clear_env() {
    env::remove_var("SITESEARCH_CONFIG");
    env::remove_var("SITESEARCH_CONFIG_FILE");
    env::remove_var("SITESEARCH_MAX_PAGE_SIZE");
}

#[test]
#[serial]
fn test_load_from_xdg_config_dir() {
    clear_env();
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), STORE_CONFIG).unwrap();

    let config = Config::load_with_xdg(&XdgDirs::with_config_dir(temp.path())).unwrap();

    assert_eq!(config.search.default_page_size, 10);
    assert_eq!(config.search.max_page_size, Some(50));
    assert_eq!(config.languages.known, vec!["en", "da"]);
    assert_eq!(config.sites["store1"].index.as_deref(), Some("store1_index"));
    assert_eq!(config.facets["category"].field, Some(Field::Template));
    assert_eq!(config.facets["radius"].kind, FacetKind::Distance);
}

#[test]
#[serial]
fn test_config_env_var_wins_over_xdg() {
    clear_env();
    let xdg = TempDir::new().unwrap();
    std::fs::write(xdg.path().join("config.toml"), STORE_CONFIG).unwrap();

    let other = TempDir::new().unwrap();
    let explicit = other.path().join("explicit.toml");
    std::fs::write(&explicit, "[index]\ndefault = \"explicit_index\"\n").unwrap();
    env::set_var("SITESEARCH_CONFIG", &explicit);

    let config = Config::load_with_xdg(&XdgDirs::with_config_dir(xdg.path())).unwrap();
    clear_env();

    assert_eq!(config.index.default, "explicit_index");
    assert!(config.sites.is_empty());
}

#[test]
#[serial]
fn test_env_overrides_file_values() {
    clear_env();
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), STORE_CONFIG).unwrap();
    env::set_var("SITESEARCH_MAX_PAGE_SIZE", "30");

    let config = Config::load_with_xdg(&XdgDirs::with_config_dir(temp.path())).unwrap();
    clear_env();

    assert_eq!(config.search.max_page_size, Some(30));
    assert_eq!(config.search.default_page_size, 10);
}

#[test]
#[serial]
fn test_invalid_config_rejected() {
    clear_env();
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("config.toml"),
        "[sites.broken]\nhome = \"/sitecore/content/home\"\n",
    )
    .unwrap();

    let result = Config::load_with_xdg(&XdgDirs::with_config_dir(temp.path()));
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_defaults_without_config_file() {
    clear_env();
    let temp = TempDir::new().unwrap();

    let config = Config::load_with_xdg(&XdgDirs::with_config_dir(temp.path())).unwrap();

    assert_eq!(config.search.default_page_size, 20);
    assert_eq!(config.index.default, "web_index");
    assert_eq!(config.search.shell_site, "shell");
}
