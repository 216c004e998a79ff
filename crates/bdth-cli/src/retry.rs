//! Retry utilities for attaching to a game that is still starting up.

use std::time::Duration;

use anyhow::{Result, bail};
use bdth_core::{HousingOffsets, ReadMemory, SignatureResolver, builtin_signatures};
use tracing::{debug, info};

use crate::shutdown::ShutdownSignal;

/// Run `attempt` until it succeeds, `max_attempts` is reached, or shutdown.
///
/// Returns `Ok(None)` if shutdown was signaled.
pub fn with_retry<T, E: std::fmt::Display>(
    what: &str,
    max_attempts: u32,
    delay: Duration,
    shutdown: &ShutdownSignal,
    mut attempt: impl FnMut() -> std::result::Result<T, E>,
) -> Result<Option<T>> {
    let mut last_error = None;

    for n in 1..=max_attempts {
        if shutdown.is_shutdown() {
            return Ok(None);
        }

        match attempt() {
            Ok(value) => return Ok(Some(value)),
            Err(e) => {
                info!(
                    "{} failed ({}), retrying in {}ms (attempt {}/{})",
                    what,
                    e,
                    delay.as_millis(),
                    n,
                    max_attempts
                );
                last_error = Some(e.to_string());
            }
        }

        if n < max_attempts && shutdown.wait(delay) {
            return Ok(None);
        }
    }

    bail!(
        "{} failed after {} attempts: {}",
        what,
        max_attempts,
        last_error.unwrap_or_else(|| "no attempts made".to_string())
    )
}

/// Resolve the housing slots from the built-in signatures.
///
/// The slots only count once both resolve to valid offsets; the game fills
/// them in during startup.
pub fn resolve_offsets_with_retry<R: ReadMemory>(
    reader: &R,
    module_size: usize,
    version: &str,
    max_attempts: u32,
    delay: Duration,
    shutdown: &ShutdownSignal,
) -> Result<Option<HousingOffsets>> {
    let signatures = builtin_signatures();
    let resolver = SignatureResolver::new(reader, module_size);

    with_retry("Offset resolution", max_attempts, delay, shutdown, || {
        let offsets = resolver.resolve_offsets(&signatures, version)?;
        if !offsets.is_valid() {
            bail!("resolved offsets are incomplete");
        }
        debug!(
            "housing_module=0x{:X}, layout_world=0x{:X}",
            offsets.housing_module, offsets.layout_world
        );
        Ok(offsets)
    })
}
