//! CLI command implementations.
//!
//! Commands that touch the game share the attach sequence in this module:
//! open the process, obtain offsets, then build an editor session.

pub mod catalog;
pub mod console;
pub mod dump;
pub mod exec;
pub mod offset;
pub mod status;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use bdth_core::{
    Catalog, Editor, EditorConfig, HousingOffsets, IconCache, ProcessHandle, ProcessMemory,
    load_offsets,
};
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::icons::PngDirectorySource;
use crate::retry::resolve_offsets_with_retry;
use crate::shutdown::ShutdownSignal;

/// Open the game by pid, or by the configured executable name
pub fn open_process(config: &CliConfig, pid: Option<u32>) -> Result<ProcessHandle> {
    let process = match pid {
        Some(pid) => ProcessHandle::open(pid)?,
        None => ProcessHandle::find_and_open(&config.process_name)?,
    };
    info!(
        "Attached to PID {} (base: {:#x}, size: {:#x})",
        process.pid, process.base_address, process.module_size
    );
    Ok(process)
}

/// Version tag stored with resolved offsets.
///
/// The main module size changes with every client patch.
pub fn build_tag(process: &ProcessHandle) -> String {
    format!("build-{:X}", process.module_size)
}

/// Offsets from the configured file, else from the built-in signatures.
///
/// Returns `Ok(None)` if shutdown was signaled while waiting.
pub fn obtain_offsets(
    process: &ProcessHandle,
    config: &CliConfig,
    shutdown: &ShutdownSignal,
) -> Result<Option<HousingOffsets>> {
    if let Some(path) = &config.offsets {
        match load_offsets(path) {
            Ok(offsets) => {
                info!("Loaded offsets {} from {}", offsets.version, path.display());
                return Ok(Some(offsets));
            }
            Err(e) if e.is_not_found() => {
                info!("No offsets at {}, resolving signatures", path.display())
            }
            Err(e) => warn!(
                "Failed to load offsets from {}: {}, resolving signatures",
                path.display(),
                e
            ),
        }
    }

    let reader = ProcessMemory::new(process);
    resolve_offsets_with_retry(
        &reader,
        process.module_size as usize,
        &build_tag(process),
        config.max_offset_attempts,
        config.offset_retry_delay(),
        shutdown,
    )
}

pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            Catalog::load(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => {
            warn!("No catalog configured, item names will not be shown");
            Ok(Catalog::default())
        }
    }
}

/// Editor session over an attached process with catalog and icons wired in
pub fn build_editor<'a>(
    process: &'a ProcessHandle,
    offsets: HousingOffsets,
    config: &CliConfig,
    editor_config: EditorConfig,
) -> Result<Editor<ProcessMemory<'a>>> {
    let mut editor = Editor::with_config(ProcessMemory::new(process), offsets, editor_config);
    editor.set_catalog(load_catalog(config.catalog.as_deref())?);

    if let Some(dir) = &config.icon_dir {
        if !dir.is_dir() {
            bail!("Icon directory {} does not exist", dir.display());
        }
        editor.set_icons(IconCache::new(Arc::new(PngDirectorySource::new(dir))));
    }
    Ok(editor)
}

/// Attach, obtain offsets, and hand the session to `run`.
///
/// Returns `Ok(())` without running if shutdown was signaled first.
pub fn with_session<F>(
    config: &CliConfig,
    pid: Option<u32>,
    editor_config: EditorConfig,
    shutdown: &ShutdownSignal,
    run: F,
) -> Result<()>
where
    F: FnOnce(&ProcessHandle, &mut Editor<ProcessMemory<'_>>) -> Result<()>,
{
    let process = open_process(config, pid)?;
    let Some(offsets) = obtain_offsets(&process, config, shutdown)? else {
        return Ok(());
    };

    let mut editor = build_editor(&process, offsets, config, editor_config)?;
    let result = run(&process, &mut editor);
    editor.teardown();
    result
}
