//! Reading an order draft from a file or stdin.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use orderdesk_core::order::OrderDraft;

/// Where the draft JSON comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftSource {
    Stdin,
    File(PathBuf),
}

impl DraftSource {
    /// Parse command-line arguments (program name already skipped).
    ///
    /// No argument or `-` means stdin; more than one argument is an error.
    pub fn from_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let source = match args.next() {
            None => Self::Stdin,
            Some(arg) if arg == "-" => Self::Stdin,
            Some(arg) => Self::File(PathBuf::from(arg)),
        };
        if let Some(extra) = args.next() {
            bail!("Unexpected argument '{extra}'. Usage: orderdesk-validate [PATH|-]");
        }
        Ok(source)
    }
}

/// Parse a draft from JSON text.
pub fn parse_draft(json: &str) -> anyhow::Result<OrderDraft> {
    serde_json::from_str(json).context("Order draft is not valid JSON")
}

/// Read and parse the draft from `source`.
pub fn read_draft(source: &DraftSource) -> anyhow::Result<OrderDraft> {
    let json = match source {
        DraftSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read order draft from stdin")?;
            buf
        }
        DraftSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read order draft from {}", path.display()))?,
    };
    parse_draft(&json)
}
