use crate::error::Result;
use crate::housing::{GateState, HousingGate, StructureLocator};
use crate::memory::ReadMemory;
use crate::memory::layout::{item, structure};
use crate::offset::HousingOffsets;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Offset dump for diagnostic purposes
#[derive(Debug, Clone, Serialize)]
pub struct OffsetDump {
    pub version: String,
    pub base_address: String,
    pub offsets: OffsetValues,
    pub chain: ResolvedChain,
    pub gate: GateState,
    pub memory_samples: MemorySamples,
}

/// Static slot addresses in hex string format
#[derive(Debug, Clone, Serialize)]
pub struct OffsetValues {
    pub housing_module_rva: String,
    pub layout_world_rva: String,
    pub housing_module_slot: String,
    pub layout_world_slot: String,
}

/// Each hop of the pointer chain as it resolved at dump time
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedChain {
    pub housing_module: Option<String>,
    pub outdoor_territory: Option<String>,
    pub indoor_territory: Option<String>,
    pub housing_structure: Option<String>,
    pub active_item: Option<String>,
    /// Item under the cursor, set before it is selected
    pub hover_item: Option<String>,
    /// Raw layout mode before the current one
    pub last_mode: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemorySamples {
    pub housing_structure: String,
    pub active_item: String,
}

fn hex(address: Option<u64>) -> Option<String> {
    address.map(|a| format!("0x{:X}", a))
}

impl OffsetDump {
    pub fn from_offsets<R: ReadMemory>(offsets: &HousingOffsets, reader: &R) -> Self {
        let base = reader.base_address();
        let locator = StructureLocator::new(reader, offsets);
        let housing_structure = locator.housing_structure();
        let active_item = housing_structure.and_then(|s| locator.active_item(s));

        let offset_values = OffsetValues {
            housing_module_rva: format!("0x{:X}", offsets.housing_module),
            layout_world_rva: format!("0x{:X}", offsets.layout_world),
            housing_module_slot: format!("0x{:X}", offsets.housing_module_slot(base)),
            layout_world_slot: format!("0x{:X}", offsets.layout_world_slot(base)),
        };

        let chain = ResolvedChain {
            housing_module: hex(locator.housing_module()),
            outdoor_territory: hex(locator.outdoor_territory()),
            indoor_territory: hex(locator.indoor_territory()),
            housing_structure: hex(housing_structure),
            active_item: hex(active_item),
            hover_item: hex(housing_structure.and_then(|s| {
                reader.read_pointer(s.checked_add(structure::HOVER_ITEM)?)
            })),
            last_mode: housing_structure.and_then(|s| {
                reader.read_u32(s.checked_add(structure::LAST_MODE)?).ok()
            }),
        };

        let memory_samples = MemorySamples {
            housing_structure: Self::read_memory_hex(
                reader,
                housing_structure.unwrap_or(0),
                structure::SAMPLE_SIZE,
            ),
            active_item: Self::read_memory_hex(reader, active_item.unwrap_or(0), item::SAMPLE_SIZE),
        };

        Self {
            version: offsets.version.clone(),
            base_address: format!("0x{:X}", base),
            offsets: offset_values,
            chain,
            gate: HousingGate::new(reader, offsets).evaluate(),
            memory_samples,
        }
    }

    fn read_memory_hex<R: ReadMemory>(reader: &R, address: u64, size: usize) -> String {
        if address == 0 {
            return "(address is 0)".to_string();
        }

        match reader.read_bytes(address, size) {
            Ok(bytes) => bytes
                .iter()
                .map(|b| format!("{:02X}", b))
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => "(read failed)".to_string(),
        }
    }

    /// Save dump to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
