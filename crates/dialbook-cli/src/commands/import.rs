use crate::commands::{print_json, Context};
use crate::util::{now_utc, write_import_report};
use anyhow::{Context as _, Result};
use clap::Args;
use dialbook_core::domain::DuplicatePolicy;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file with a contact array; defaults to the configured import file
    pub file: Option<PathBuf>,
    /// Overwrite name and email of contacts whose phone already exists
    #[arg(long)]
    pub update: bool,
}

pub fn import_contacts(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let file = args
        .file
        .unwrap_or_else(|| ctx.config.import.default_file.clone());
    let policy = if args.update {
        DuplicatePolicy::Update
    } else {
        ctx.config.import.on_duplicate
    };

    let report = dialbook_import::import_file(ctx.store, &file, policy, now_utc())
        .with_context(|| format!("import contacts from {}", file.display()))?;
    info!(
        imported = report.imported,
        updated = report.updated,
        skipped = report.skipped,
        failed = report.failed,
        "import finished"
    );

    if ctx.json {
        return print_json(&report);
    }
    write_import_report(&mut io::stdout().lock(), &report)
}
