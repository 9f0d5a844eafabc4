//! `craftvista init`: write a default configuration file.

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let config_path = args.path.unwrap_or_else(AppConfig::config_path);

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    AppConfig::default()
        .write_to(&config_path)
        .with_cli_context(|| format!("could not write {}", config_path.display()))?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;
    output.info("Set generator.provider = \"gemini\" and CRAFTVISTA_LLM_KEY to use the hosted model")?;

    Ok(())
}
