use crate::error::{Error, Result};
use crate::memory::ProcessHandle;

/// Read access to a foreign address space.
///
/// Everything above this trait works against `ReadMemory` so the housing
/// logic can be tested without a live process.
pub trait ReadMemory {
    /// Base address of the main module
    fn base_address(&self) -> u64;

    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    fn read_u32(&self, address: u64) -> Result<u32> {
        Ok(u32::from_le_bytes(read_array(self, address)?))
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        Ok(i32::from_le_bytes(read_array(self, address)?))
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        Ok(u64::from_le_bytes(read_array(self, address)?))
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        Ok(f32::from_le_bytes(read_array(self, address)?))
    }

    /// Read a pointer, treating both null and unreadable slots as absent.
    fn read_pointer(&self, address: u64) -> Option<u64> {
        match self.read_u64(address) {
            Ok(0) | Err(_) => None,
            Ok(ptr) => Some(ptr),
        }
    }
}

/// Write access to a foreign address space.
pub trait WriteMemory {
    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()>;

    fn write_f32(&self, address: u64, value: f32) -> Result<()> {
        self.write_bytes(address, &value.to_le_bytes())
    }
}

fn read_array<R: ReadMemory + ?Sized, const N: usize>(reader: &R, address: u64) -> Result<[u8; N]> {
    let bytes = reader.read_bytes(address, N)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::MemoryReadFailed {
            address,
            message: format!("expected {} bytes, got {}", N, bytes.len()),
        })
}

impl<T: ReadMemory + ?Sized> ReadMemory for &T {
    fn base_address(&self) -> u64 {
        (**self).base_address()
    }

    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, size)
    }
}

impl<T: WriteMemory + ?Sized> WriteMemory for &T {
    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()> {
        (**self).write_bytes(address, data)
    }
}

/// Memory accessor bound to an attached process
pub struct ProcessMemory<'a> {
    process: &'a ProcessHandle,
}

impl<'a> ProcessMemory<'a> {
    pub fn new(process: &'a ProcessHandle) -> Self {
        Self { process }
    }

    pub fn process(&self) -> &ProcessHandle {
        self.process
    }
}

impl ReadMemory for ProcessMemory<'_> {
    fn base_address(&self) -> u64 {
        self.process.base_address
    }

    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.process.read_bytes(address, size)
    }
}

impl WriteMemory for ProcessMemory<'_> {
    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()> {
        self.process.write_bytes(address, data)
    }
}
