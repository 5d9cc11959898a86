//! Shared output helpers for text and JSON rendering.

use anyhow::Result;
use serde::Serialize;

use crate::{Cli, OutputFormat};

/// Print a result either as JSON or through a text renderer.
pub fn emit<T: Serialize>(value: &T, cli: &Cli, render_text: impl FnOnce(&T)) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                render_text(value);
            }
        }
    }
    Ok(())
}
