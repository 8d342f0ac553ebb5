use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_dir(label: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("noem_dashboard_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn missing_file_gives_placeholder_defaults() {
    let dir = temp_dir("defaults");
    let settings = load_settings_from(&dir.join("absent.toml"), no_env).expect("settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.hours_range, "Comptes Rendu!A:E");
    assert!(!settings.webhook().is_configured());
    assert!(!settings.weather().is_configured());

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn file_values_override_defaults_and_keep_the_rest() {
    let dir = temp_dir("file");
    let path = dir.join("dashboard.toml");
    fs::write(
        &path,
        "api_key = \"real-key\"\nwebhook_url = \"https://hooks.example.test/exec\"\n",
    )
    .expect("write config");

    let settings = load_settings_from(&path, no_env).expect("settings");
    assert_eq!(settings.api_key, "real-key");
    assert!(settings.webhook().is_configured());
    assert_eq!(settings.announcements_range, "Annonces!A:D");

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn prefixed_environment_wins_over_plain() {
    let dir = temp_dir("env");
    let vars: HashMap<&str, &str> = HashMap::from([
        ("SHEET_ID", "plain-sheet"),
        ("APP__SHEET_ID", "prefixed-sheet"),
        ("HOURS_RANGE", "Heures!A:E"),
    ]);

    let settings = load_settings_from(&dir.join("absent.toml"), |key| {
        vars.get(key).map(|value| value.to_string())
    })
    .expect("settings");

    assert_eq!(settings.sheet_id, "prefixed-sheet");
    assert_eq!(settings.ranges().hours, "Heures!A:E");

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn malformed_file_is_an_error() {
    let dir = temp_dir("malformed");
    let path = dir.join("dashboard.toml");
    fs::write(&path, "api_key = \n").expect("write config");

    let err = load_settings_from(&path, no_env).expect_err("must fail");
    assert!(err.to_string().contains("failed to parse config file"));

    fs::remove_dir_all(dir).expect("cleanup");
}

#[tokio::test]
async fn placeholder_api_key_disables_sheet_reads() {
    let settings = Settings::default();
    let source = settings.sheet_source().expect("source");

    let err = source
        .fetch_range(&settings.hours_range)
        .await
        .expect_err("must fail");
    assert_eq!(err.code(), shared::error::ErrorCode::MissingConfig);
}

#[test]
fn settings_round_trip_through_toml() {
    let settings = Settings {
        api_key: "real-key".into(),
        ..Settings::default()
    };
    let rendered = settings.to_toml().expect("toml");
    assert!(rendered.contains("api_key = \"real-key\""));
    assert_eq!(toml::from_str::<Settings>(&rendered).expect("parse"), settings);
}
