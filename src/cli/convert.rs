//! Convert command: select, convert, report, write outputs.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};

use super::args::ConvertArgs;
use crate::archive::{self, ARCHIVE_FILE_NAME};
use crate::batch::{Batch, Slot};
use crate::intake;
use crate::log;
use crate::logger::{self, ProgressLine};
use crate::options::ConversionOptions;
use crate::store::ArtifactStore;
use crate::utils::bytes::{format_bytes, size_delta};

pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    logger::set_verbose(args.verbose);

    let selection = intake::select_files(&args.files)?;
    if let Some(advisory) = selection.advisory() {
        log!("warn"; "{advisory}");
    }
    if selection.items.is_empty() {
        return Ok(());
    }

    let mut batch = Batch::new(Arc::new(ArtifactStore::new()));
    batch.select(selection);

    let options = ConversionOptions {
        format: args.format,
        quality: args.quality,
    };
    crate::debug!("convert"; "{} file(s), format {}, quality {}",
        batch.inputs().len(), options.format, options.quality);

    let progress = ProgressLine::new(&[("images", batch.inputs().len())]);
    batch.convert_all(&options, Some(&progress));
    progress.finish();

    report_results(&batch);

    let converted = batch.converted();
    if !converted.is_empty() {
        fs::create_dir_all(&args.output)?;
        if args.archive {
            write_archive(&batch, &args.output)?;
        } else {
            write_items(&batch, &args.output)?;
        }
    }

    if batch.all_failed() {
        bail!("all conversions failed");
    }
    Ok(())
}

/// One line per settled slot: savings for successes, reason for failures.
fn report_results(batch: &Batch) {
    for (input, slot) in batch.inputs().iter().zip(batch.slots()) {
        match slot {
            Slot::Converted(item) => {
                let delta = size_delta(input.size, item.size)
                    .map(|d| format!(", {d}"))
                    .unwrap_or_default();
                log!("convert"; "{} -> {} ({} -> {}{delta})",
                    input.file_name,
                    item.file_name,
                    format_bytes(input.size),
                    format_bytes(item.size));
            }
            Slot::Failed(reason) => log!("error"; "{reason}"),
            Slot::Pending => {}
        }
    }
}

/// Write each successful output as an individual file.
fn write_items(batch: &Batch, output_dir: &Path) -> Result<()> {
    for item in batch.converted() {
        let Some(content) = batch.store().fetch(&item.handle) else {
            // Released mid-write only happens if the batch was cleared; skip.
            continue;
        };
        fs::write(output_dir.join(&item.file_name), &content)?;
    }
    Ok(())
}

/// Bundle every successful output into converted-images.zip.
fn write_archive(batch: &Batch, output_dir: &Path) -> Result<()> {
    let converted = batch.converted();
    let bytes = archive::build_archive(&converted, batch.store())?;
    let path = output_dir.join(ARCHIVE_FILE_NAME);
    fs::write(&path, &bytes)?;
    log!("archive"; "{} ({}, {} entries)",
        path.display(),
        format_bytes(bytes.len() as u64),
        converted.len());
    Ok(())
}
