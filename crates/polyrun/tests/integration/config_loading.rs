use polyrun::Config;

use super::FIXTURES_PATH;

#[test]
fn test_load_valid_config() {
    let path = format!("{FIXTURES_PATH}/configs/valid_full.toml");
    let config = Config::from_file(&path).expect("Failed to load config");

    assert_eq!(config.timeout, 5);
    assert_eq!(config.workspace_prefix, "fixture_");
    assert_eq!(config.languages.python.source_name, "main.py");
    assert_eq!(
        config.languages.python.run.env.get("PYTHONDONTWRITEBYTECODE"),
        Some(&"1".to_owned())
    );
}

#[test]
fn test_load_invalid_empty_run_command() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_empty_run_command.toml");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_load_invalid_missing_language() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_missing_language.toml");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_loaded_config_drives_pipeline() {
    let path = format!("{FIXTURES_PATH}/configs/valid_full.toml");
    let config = Config::from_file(&path).expect("Failed to load config");
    let pipeline = polyrun::Pipeline::new(config);
    assert_eq!(pipeline.config().timeout, 5);
}
