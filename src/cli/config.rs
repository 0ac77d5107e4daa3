//! Config CLI command.

use crate::config::MemopediaConfig;
use std::io::{self, Write};

/// Writes the effective configuration as TOML.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_config<W: Write>(
    writer: &mut W,
    config: &MemopediaConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = toml::to_string(config)?;
    write!(writer, "{text}")?;
    Ok(())
}

/// Executes the config command.
///
/// # Errors
///
/// Returns an error if serialization or output fails.
pub fn cmd_config(config: &MemopediaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_config(&mut handle, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_config_parses_back() {
        let config = MemopediaConfig::default()
            .with_base_url("https://saiverse.example")
            .with_persona("air");

        let mut out = Vec::new();
        write_config(&mut out, &config).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("base_url = \"https://saiverse.example\""));
        assert_eq!(MemopediaConfig::parse_toml(&text).unwrap(), config);
    }
}
