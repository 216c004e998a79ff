//! Code signatures for the two housing singletons.
//!
//! Each signature matches an instruction that references a static slot
//! RIP-relatively. Resolving the displacement gives the slot address, which
//! survives patches far better than a raw offset does.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::memory::ReadMemory;
use crate::offset::HousingOffsets;

/// Bytes read from the module per scan step
const SCAN_CHUNK_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSignature {
    pub pattern: String,
    /// Offset of the referencing instruction from the match start
    pub instr_offset: usize,
    /// Offset of the 32-bit displacement within the instruction
    pub disp_offset: usize,
    pub instr_len: usize,
}

impl CodeSignature {
    pub fn pattern_bytes(&self) -> Result<Vec<Option<u8>>> {
        parse_pattern(&self.pattern)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousingSignatures {
    pub housing_module: CodeSignature,
    pub layout_world: CodeSignature,
}

pub fn builtin_signatures() -> HousingSignatures {
    HousingSignatures {
        // cmp [rip+disp], rbx inside the HousingModule singleton getter
        housing_module: CodeSignature {
            pattern: "40 53 48 83 EC 20 33 DB 48 39 1D ?? ?? ?? ?? 75 2C 45 33 C0 33 D2 B9 ?? ?? ?? ?? E8 ?? ?? ?? ?? 48 85 C0 74 11 48 8B C8 E8 ?? ?? ?? ?? 48 89 05 ?? ?? ?? ?? EB 07".to_string(),
            instr_offset: 8,
            disp_offset: 3,
            instr_len: 7,
        },
        // mov rcx, [rip+disp] ahead of the LayoutWorld null check
        layout_world: CodeSignature {
            pattern: "48 8B 0D ?? ?? ?? ?? 48 85 C9 74 ?? 48 8B 49 40 E9 ?? ?? ?? ??".to_string(),
            instr_offset: 0,
            disp_offset: 3,
            instr_len: 7,
        },
    }
}

pub fn parse_pattern(pattern: &str) -> Result<Vec<Option<u8>>> {
    let mut bytes = Vec::new();
    for token in pattern.split_whitespace() {
        if token == "??" || token == "?" {
            bytes.push(None);
            continue;
        }

        let value = u8::from_str_radix(token, 16).map_err(|e| {
            Error::InvalidOffset(format!("Invalid signature token '{}': {}", token, e))
        })?;
        bytes.push(Some(value));
    }

    if bytes.iter().all(Option::is_none) {
        return Err(Error::InvalidOffset(
            "Signature pattern has no concrete bytes".to_string(),
        ));
    }

    Ok(bytes)
}

/// Resolves signatures against the main module image
pub struct SignatureResolver<'a, R: ReadMemory> {
    reader: &'a R,
    module_size: usize,
}

impl<'a, R: ReadMemory> SignatureResolver<'a, R> {
    pub fn new(reader: &'a R, module_size: usize) -> Self {
        Self {
            reader,
            module_size,
        }
    }

    /// Resolve both housing slots and return them as module-relative offsets
    pub fn resolve_offsets(
        &self,
        signatures: &HousingSignatures,
        version: &str,
    ) -> Result<HousingOffsets> {
        let base = self.reader.base_address();
        let housing_module = self.resolve("housing_module", &signatures.housing_module)?;
        let layout_world = self.resolve("layout_world", &signatures.layout_world)?;

        let offsets = HousingOffsets {
            version: version.to_string(),
            housing_module: housing_module.wrapping_sub(base),
            layout_world: layout_world.wrapping_sub(base),
        };
        debug!(
            "Resolved offsets: housing_module=0x{:X}, layout_world=0x{:X}",
            offsets.housing_module, offsets.layout_world
        );
        Ok(offsets)
    }

    /// Resolve one signature to the absolute address it references.
    ///
    /// The signature must match exactly one distinct target.
    pub fn resolve(&self, name: &str, signature: &CodeSignature) -> Result<u64> {
        let pattern = signature.pattern_bytes()?;
        let mut targets = Vec::new();

        for match_addr in self.scan(&pattern)? {
            let instr_addr = match_addr + signature.instr_offset as u64;
            let Ok(disp) = self
                .reader
                .read_i32(instr_addr + signature.disp_offset as u64)
            else {
                continue;
            };
            let next_ip = instr_addr + signature.instr_len as u64;
            targets.push(next_ip.wrapping_add_signed(disp as i64));
        }

        targets.sort_unstable();
        targets.dedup();

        match targets.as_slice() {
            [target] => {
                debug!("  {}: 0x{:X}", name, target);
                Ok(*target)
            }
            [] => Err(Error::SignatureNotFound(format!("{name}: no match"))),
            many => Err(Error::SignatureNotFound(format!(
                "{name}: {} distinct targets",
                many.len()
            ))),
        }
    }

    fn scan(&self, pattern: &[Option<u8>]) -> Result<Vec<u64>> {
        let base = self.reader.base_address();
        let mut results = Vec::new();
        let mut offset = 0usize;
        let mut tail: Vec<u8> = Vec::new();

        while offset < self.module_size {
            let read_size = (self.module_size - offset).min(SCAN_CHUNK_SIZE);
            let addr = base + offset as u64;

            let chunk = match self.reader.read_bytes(addr, read_size) {
                Ok(bytes) => bytes,
                Err(e) if offset == 0 => {
                    return Err(Error::SignatureNotFound(format!(
                        "Failed to read module image: {}",
                        e
                    )));
                }
                Err(e) => {
                    debug!("Signature scan stopped at offset {:#x}: {}", offset, e);
                    break;
                }
            };

            let mut data = Vec::with_capacity(tail.len() + chunk.len());
            data.extend_from_slice(&tail);
            data.extend_from_slice(&chunk);

            let data_base = addr - tail.len() as u64;
            results.extend(find_matches(&data, pattern).map(|i| data_base + i as u64));

            let keep = (pattern.len() - 1).min(data.len());
            tail = data[data.len() - keep..].to_vec();
            offset += read_size;
        }

        results.sort_unstable();
        results.dedup();
        Ok(results)
    }
}

/// Positions in `buffer` where `pattern` matches, wildcards included
fn find_matches<'b>(
    buffer: &'b [u8],
    pattern: &'b [Option<u8>],
) -> impl Iterator<Item = usize> + 'b {
    // Anchor on the first concrete byte so memchr does the bulk of the work.
    let (anchor_index, anchor) = pattern
        .iter()
        .enumerate()
        .find_map(|(i, b)| b.map(|v| (i, v)))
        .unwrap_or((0, 0));

    memchr::memchr_iter(anchor, buffer).filter_map(move |hit| {
        let start = hit.checked_sub(anchor_index)?;
        let window = buffer.get(start..start + pattern.len())?;
        window
            .iter()
            .zip(pattern)
            .all(|(byte, expected)| expected.is_none_or(|v| v == *byte))
            .then_some(start)
    })
}
