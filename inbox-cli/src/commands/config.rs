use std::io::{self, Write};

use inbox::config::Config;

/// Prints a default configuration file in the specified format.
///
/// # Arguments
/// * `format` - The format of the configuration file ("toml", "yaml" or "json").
///
/// # Errors
/// Returns an error if the format is unsupported or if writing to stdout fails.
pub fn generate_config(format: &str) -> anyhow::Result<()> {
    let rendered = Config::with_defaults().render(format)?;
    write_config(&mut io::stdout().lock(), &rendered)
}

fn write_config(out: &mut impl Write, rendered: &str) -> anyhow::Result<()> {
    out.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
