/*!
# Refresh Probe

Reads an EDID dump (base block plus CTA-861 extension) and prints the highest
progressive refresh rate the display advertises, defaulting to 60 Hz.

## Usage

```bash
refresh_probe /sys/class/drm/card0-HDMI-A-1/edid
```

### Hex dumps and JSON output
```bash
refresh_probe --input hex --json edid.txt
```

### Generate a configuration file
```bash
refresh_probe config --output refresh_probe.toml
```
*/

use std::path::PathBuf;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};

mod config;
mod input;
mod output;

use config::{AppConfig, InputFormat, OutputFormat};
use edid_refresh::{analyze, CtaVicTable, TracingObserver};

const DEFAULT_CONFIG_PATH: &str = "refresh_probe.toml";

#[derive(Parser)]
#[command(name = "refresh_probe")]
#[command(about = "Report the highest progressive refresh rate advertised by an EDID dump")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// EDID dump to inspect (binary or hex text)
    path: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How to interpret the input file
    #[arg(short, long, value_enum)]
    input: Option<InputFormat>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Decimal places of the printed refresh rate
    #[arg(short, long)]
    precision: Option<usize>,

    /// List every candidate timing and log decode steps
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate configuration file
    Config {
        /// Output path for configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Config { output }) = &cli.command {
        return generate_config_file(output.clone());
    }

    let config = resolve_config(&cli)?;

    let level = if config.output.verbose { Level::DEBUG } else { Level::WARN };
    // Logs go to stderr to keep stdout clean for the result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let Some(path) = cli.path else {
        bail!("No filepath provided!");
    };

    debug!("edid_refresh {} reading {}", edid_refresh::VERSION, path.display());
    let record = input::load_record(&path, config.input.format)?;
    let report = analyze(&record, &CtaVicTable, &mut TracingObserver);

    println!("{}", output::render(&report, &config.output)?);
    Ok(())
}

/// Merge the config file with command-line overrides
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_or_default(path, true)?,
        None => AppConfig::load_or_default(DEFAULT_CONFIG_PATH, false)?,
    };

    if let Some(format) = cli.input {
        config.input.format = format;
    }
    if cli.json {
        config.output.format = OutputFormat::Json;
    }
    if let Some(precision) = cli.precision {
        config.output.precision = precision;
    }
    config.output.verbose |= cli.verbose;

    Ok(config)
}

/// Generate a default configuration file
fn generate_config_file(output_path: PathBuf) -> Result<()> {
    let config = AppConfig::new();
    config.save_to_file(&output_path)?;

    println!("Generated configuration file: {}", output_path.display());
    println!("Edit the file to customize settings, then run:");
    println!("   refresh_probe --config {} <EDID_FILE>", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.toml");
        std::fs::write(&path, "[output]\nprecision = 2\n").unwrap();

        let cli = Cli::parse_from([
            "refresh_probe",
            "--config",
            path.to_str().unwrap(),
            "--json",
            "--input",
            "hex",
            "edid.bin",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.output.precision, 2);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.input.format, InputFormat::Hex);
        assert_eq!(cli.path, Some(PathBuf::from("edid.bin")));
    }

    #[test]
    fn test_config_subcommand_parses() {
        let cli = Cli::parse_from(["refresh_probe", "config", "--output", "x.toml"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config { ref output }) if output == &PathBuf::from("x.toml")
        ));
        assert!(cli.path.is_none());
    }
}
