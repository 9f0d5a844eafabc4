//! `craftvista config`: inspect the effective configuration.

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.format() == OutputFormat::Json {
                output.json(&serde_json::json!({ "key": key, "value": value }))?;
            } else {
                output.print(&format!("{key} = {value}"))?;
            }
        }

        ConfigCommands::List => {
            if output.format() == OutputFormat::Json {
                output.json(&config)?;
            } else {
                let serialised = config
                    .to_toml()
                    .with_cli_context(|| "could not render configuration")?;
                output.header("Current configuration:")?;
                output.print(&serialised)?;
            }
        }

        ConfigCommands::Path => {
            let path = AppConfig::config_path();
            if output.format() == OutputFormat::Json {
                output.json(&path)?;
            } else {
                output.print(&path.display().to_string())?;
            }
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key in the serialized configuration.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let tree = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: "could not serialise configuration".into(),
        source: Some(Box::new(e)),
    })?;

    let pointer = format!("/{}", key.replace('.', "/"));
    match tree.pointer(&pointer) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Null) => Ok(String::new()),
        Some(value) if !value.is_object() => Ok(value.to_string()),
        _ => Err(CliError::UnknownConfigKey { key: key.into() }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "generator.provider").unwrap(), "template");
        assert_eq!(
            get_config_value(&cfg, "workflow.generation_timeout_secs").unwrap(),
            "30"
        );
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "store.path").unwrap(), "");
    }

    #[test]
    fn sections_and_unknown_keys_are_not_values() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "workflow"),
            Err(CliError::UnknownConfigKey { .. })
        ));
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::UnknownConfigKey { .. })
        ));
    }
}
