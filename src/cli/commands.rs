//! CLI command implementations
//!
//! Every command loads the configuration, applies its log level and loads the
//! definitions directory before doing anything else.

use std::path::Path;

use serde_json::{json, Value};

use crate::model::{ConstructOptions, ModelRegistry};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::validation::Validator;

use super::args::Command;
use super::config::Config;
use super::errors::CliResult;
use super::io::{read_requests, write_error, write_response};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Models { config } => models(&config),
        Command::Schema { config, model } => schema(&config, &model),
        Command::Validate {
            config,
            model,
            mapping,
        } => validate(&config, &model, mapping.as_deref()),
    }
}

/// Load config, set the log level and read every declaration.
fn boot(config_path: &Path) -> CliResult<(Config, ModelRegistry)> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let config_name = config_path.display().to_string();
    let strict = config.strict_formats.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", config_name.as_str()),
            ("definitions_dir", config.definitions_dir.as_str()),
            ("strict_formats", strict.as_str()),
        ],
    );

    let mut registry = ModelRegistry::new(&config.definitions_path(config_path));
    registry.load_all()?;

    Ok((config, registry))
}

/// List declared model types with their parents
pub fn models(config_path: &Path) -> CliResult<()> {
    let (_, registry) = boot(config_path)?;

    let models: Vec<Value> = registry
        .names()
        .filter_map(|name| registry.declaration(name))
        .map(|decl| {
            json!({
                "name": decl.name,
                "extends": decl.extends,
            })
        })
        .collect();

    write_response(json!({ "models": models }))
}

/// Print one type's resolved schema and mapping names
pub fn schema(config_path: &Path, model_name: &str) -> CliResult<()> {
    let (_, registry) = boot(config_path)?;
    let model = registry.resolve(model_name)?;

    let mappings: Vec<&str> = model.mappings().keys().map(String::as_str).collect();
    write_response(json!({
        "name": model.name(),
        "parent": model.parent(),
        "fields": serde_json::to_value(model.schema())?,
        "mappings": mappings,
    }))
}

/// Construct and validate each stdin record as `model_name`.
///
/// Bad lines produce an error response and processing continues with the
/// next line. Only a failure to resolve the type aborts the command.
pub fn validate(config_path: &Path, model_name: &str, mapping: Option<&str>) -> CliResult<()> {
    let (config, registry) = boot(config_path)?;
    let model = registry.resolve(model_name)?;

    // Fail before reading input if the mapping does not exist
    if let Some(name) = mapping {
        model.mapping(name)?;
    }

    let validator = if config.strict_formats {
        Validator::strict()
    } else {
        Validator::standard()
    };

    for request in read_requests() {
        let raw = match request {
            Ok(raw) => raw,
            Err(e) => {
                write_error(e.code_str(), e.message())?;
                continue;
            }
        };

        let options = match mapping {
            Some(name) => ConstructOptions::with_mapping(name),
            None => ConstructOptions::default(),
        };

        let instance = match model.construct(Some(&raw), options) {
            Ok(instance) => instance,
            Err(e) => {
                write_error(e.code(), &e.to_string())?;
                continue;
            }
        };

        let errors = instance.validate_with(&validator);
        write_response(json!({
            "record": instance.serialize(),
            "errors": serde_json::to_value(&errors)?,
        }))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(declarations: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("models")).unwrap();
        fs::write(tmp.path().join("models").join("people.json"), declarations).unwrap();

        let config_path = tmp.path().join("schemata.json");
        fs::write(
            &config_path,
            r#"{ "definitions_dir": "models", "log_level": "error" }"#,
        )
        .unwrap();
        (tmp, config_path)
    }

    #[test]
    fn test_boot_loads_definitions_relative_to_config() {
        let (_tmp, config_path) = setup(
            r#"[
                {
                    "name": "Person",
                    "fields": { "givenName": { "type": "string", "required": true } }
                },
                {
                    "name": "Worker",
                    "extends": "Person",
                    "fields": { "position": { "type": "string" } }
                }
            ]"#,
        );

        let (config, registry) = boot(&config_path).unwrap();
        assert!(!config.strict_formats);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["Person", "Worker"]);
    }

    #[test]
    fn test_boot_reports_bad_definitions() {
        let (_tmp, config_path) = setup("{ not json");
        let err = boot(&config_path).unwrap_err();
        assert_eq!(err.code_str(), "CLI_MODEL_ERROR");
        assert!(err.message().contains("MODEL_DEFINITION"));
    }

    #[test]
    fn test_schema_unknown_model() {
        let (_tmp, config_path) = setup(r#"{ "name": "Person", "fields": {} }"#);
        let err = schema(&config_path, "Robot").unwrap_err();
        assert_eq!(err.code_str(), "CLI_MODEL_ERROR");
    }

    #[test]
    fn test_validate_unknown_mapping_fails_before_input() {
        let (_tmp, config_path) = setup(r#"{ "name": "Person", "fields": {} }"#);
        let err = validate(&config_path, "Person", Some("ldap")).unwrap_err();
        assert!(err.message().contains("MAPPING_UNKNOWN"));
    }
}
