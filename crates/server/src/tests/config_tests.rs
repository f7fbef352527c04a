use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn blank_database_url_falls_back_to_default() {
    assert_eq!(normalize_database_url("   "), Settings::default().database_url);
}

#[test]
fn keeps_memory_and_full_urls_untouched() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("sqlite://./data/hotels.db"),
        "sqlite://./data/hotels.db"
    );
}

#[test]
fn creates_parent_dir_for_sqlite_path() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();

    let temp_root = env::temp_dir().join(format!("hotel_server_test_{suffix}"));
    let db_path = temp_root.join("data").join("test.db");

    prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare db url");
    assert!(temp_root.join("data").exists());

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn file_values_apply_over_defaults() {
    let mut file_cfg = HashMap::new();
    file_cfg.insert("bind_addr".to_string(), "0.0.0.0:9000".to_string());
    file_cfg.insert("csrf_token".to_string(), "from-file".to_string());

    let settings = resolve_settings(&file_cfg, env_from(&[]));
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.csrf_token.as_deref(), Some("from-file"));
    assert_eq!(settings.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
}

#[test]
fn prefixed_env_wins_over_short_form_and_file() {
    let mut file_cfg = HashMap::new();
    file_cfg.insert("database_url".to_string(), "sqlite://file.db".to_string());

    let settings = resolve_settings(
        &file_cfg,
        env_from(&[
            ("DATABASE_URL", "sqlite://short.db"),
            ("APP__DATABASE_URL", "sqlite://prefixed.db"),
            ("APP__MAX_BODY_BYTES", "1024"),
        ]),
    );
    assert_eq!(settings.database_url, "sqlite://prefixed.db");
    assert_eq!(settings.max_body_bytes, 1024);
}

#[test]
fn blank_csrf_token_is_treated_as_unset() {
    let settings = resolve_settings(&HashMap::new(), env_from(&[("CSRF_TOKEN", "  ")]));
    assert_eq!(settings.csrf_token, None);
}
