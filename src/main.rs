use chrono::NaiveDateTime;
use clap::Parser;
use color_eyre::eyre::{Result, bail};
use dialoguer::{Confirm, Input};
use exif_gps_fix::backup::Backup;
use exif_gps_fix::exif::LittleExifCodec;
use exif_gps_fix::time::{Correction, TimezoneOffset};
use exif_gps_fix::utils::{WalkOptions, collect_candidates};
use exif_gps_fix::{GpsFixError, GpsRewriter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// A tool to fix EXIF GPS date and time stamps.
#[derive(Parser, Debug)]
#[command(name = "exif-gps-fix")]
#[command(version, about, long_about = None)]
struct Cli {
    /// The folder/file(s) path(s) of the image(s) you want to edit
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Apply all edits without confirmation. Requires --timezone. Images are
    /// backed up first unless --no-backup is given
    #[arg(long)]
    auto_apply: bool,

    /// Disable the backup of the original images. Please be careful with this option
    #[arg(long)]
    no_backup: bool,

    /// Directory the original images are copied to before being edited
    #[arg(long, default_value = "exif-gps-backup")]
    backup_dir: PathBuf,

    /// Follow symlinks while walking folders
    #[arg(long)]
    follow_symlinks: bool,

    /// Recurse through all subfolders of the given folders
    #[arg(short, long)]
    recursive: bool,

    /// Also process files and folders whose name starts with '.'. By default they
    /// are skipped while walking folders (files named explicitly are always processed)
    #[arg(long)]
    include_hidden: bool,

    /// Offset of the camera clock from UTC, as {+|-}HHMM (e.g. -0800). Prompted for when absent
    #[arg(short, long, allow_hyphen_values = true)]
    timezone: Option<TimezoneOffset>,

    /// Only show the corrections, never write
    #[arg(long)]
    dry_run: bool,

    /// Print one JSON object per image instead of text
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FileReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    correction: Correction,
    offset: String,
    proposed_gps: NaiveDateTime,
    applied: bool,
}

#[derive(Debug, Default)]
struct Summary {
    applied: usize,
    unchanged: usize,
    skipped: usize,
    failed: usize,
}

fn prompt_offset() -> Result<TimezoneOffset> {
    let text: String = Input::new()
        .with_prompt("Timezone offset of the camera clock ({+|-}HHMM)")
        .validate_with(|input: &String| TimezoneOffset::parse(input).map(|_| ()))
        .interact_text()?;
    Ok(TimezoneOffset::parse(&text)?)
}

fn print_correction(
    path: &Path,
    correction: &Correction,
    offset: &TimezoneOffset,
    proposed: NaiveDateTime,
) {
    println!("{}", path.display());
    println!("  Original time : {} (local)", correction.original);
    println!("  GPS time      : {} (UTC)", correction.current_gps);
    println!("  New GPS time  : {proposed} (UTC, offset {offset})");
}

fn report_failure(path: &Path, error: &GpsFixError, summary: &mut Summary) {
    warn!(path = %path.display(), %error, "Skipping file");
    eprintln!("ERROR: {}: {error}", path.display());
    summary.failed += 1;
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if cli.auto_apply && cli.timezone.is_none() {
        bail!("--auto-apply requires --timezone so no prompt is needed");
    }

    let codec = LittleExifCodec::new();
    let walk = WalkOptions {
        recursive: cli.recursive,
        follow_symlinks: cli.follow_symlinks,
        include_hidden: cli.include_hidden,
    };
    let backup = (!cli.no_backup && !cli.dry_run).then(|| Backup::new(&cli.backup_dir));
    let rewriter = GpsRewriter::builder().codec(codec).maybe_backup(backup).build();
    let candidates = collect_candidates(&cli.paths, walk, |p| rewriter.is_image(p))?;

    let mut session_offset = cli.timezone;
    let mut summary = Summary::default();

    for path in &candidates {
        let correction = match rewriter.compute_correction(path) {
            Ok(correction) => correction,
            Err(e) => {
                report_failure(path, &e, &mut summary);
                continue;
            }
        };

        let offset = match session_offset {
            Some(offset) => offset,
            None => {
                let offset = prompt_offset()?;
                session_offset = Some(offset);
                offset
            }
        };
        let proposed = match offset.to_utc(correction.original) {
            Ok(proposed) => proposed,
            Err(e) => {
                report_failure(path, &e.into(), &mut summary);
                continue;
            }
        };

        if !cli.json {
            print_correction(path, &correction, &offset, proposed);
        }

        let applied = if correction.is_consistent(&offset) {
            if !cli.json {
                println!("  GPS time already matches, nothing to do.");
            }
            summary.unchanged += 1;
            false
        } else if cli.dry_run {
            summary.skipped += 1;
            false
        } else if cli.auto_apply
            || Confirm::new()
                .with_prompt(format!("Apply new GPS time to {}?", path.display()))
                .default(false)
                .interact()?
        {
            match rewriter.apply(path, correction.original, &offset) {
                Ok(_) => {
                    summary.applied += 1;
                    true
                }
                Err(e) => {
                    report_failure(path, &e, &mut summary);
                    false
                }
            }
        } else {
            summary.skipped += 1;
            false
        };

        if cli.json {
            let report = FileReport {
                path,
                correction,
                offset: offset.to_string(),
                proposed_gps: proposed,
                applied,
            };
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    eprintln!(
        "{} applied, {} already correct, {} skipped, {} failed ({} candidate files)",
        summary.applied,
        summary.unchanged,
        summary.skipped,
        summary.failed,
        candidates.len()
    );
    if let Some(backup) = rewriter.backup().filter(|_| summary.applied > 0) {
        eprintln!("Originals were backed up to {}", backup.dir().display());
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
