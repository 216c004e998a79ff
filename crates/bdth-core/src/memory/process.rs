//! Attach to the game process and move bytes in and out of it.

use crate::error::{Error, Result};

/// Default executable name of the game client
pub const DEFAULT_PROCESS_NAME: &str = "ffxiv_dx11.exe";

/// A running process matching the requested executable name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
}

/// Open handle to the game process and its main module.
///
/// Valid for one attach session; every read or write fails once the
/// process exits.
#[derive(Debug)]
pub struct ProcessHandle {
    #[cfg(target_os = "windows")]
    handle: windows::Win32::Foundation::HANDLE,
    pub pid: u32,
    pub base_address: u64,
    pub module_size: u32,
}

#[cfg(target_os = "windows")]
mod imp {
    use super::*;
    use std::ffi::c_void;
    use tracing::{debug, trace};
    use windows::Win32::Foundation::{BOOL, CloseHandle, HANDLE};
    use windows::Win32::System::Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory};
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, PROCESSENTRY32W,
        Process32FirstW, Process32NextW, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32,
        TH32CS_SNAPPROCESS,
    };
    use windows::Win32::System::Threading::{
        GetExitCodeProcess, OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_OPERATION,
        PROCESS_VM_READ, PROCESS_VM_WRITE,
    };

    /// Exit code reported for a process that is still running
    const STILL_ACTIVE: u32 = 259;

    fn wide_to_string(wide: &[u16]) -> String {
        let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
        String::from_utf16_lossy(&wide[..len])
    }

    pub fn list_processes(name: &str) -> Result<Vec<ProcessInfo>> {
        // SAFETY: the snapshot handle is closed before returning and the entry
        // struct is initialised with its size as the API requires.
        unsafe {
            let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)
                .map_err(|e| Error::ProcessNotFound(format!("Process snapshot failed: {e}")))?;

            let mut entry = PROCESSENTRY32W {
                dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
                ..Default::default()
            };

            let mut found = Vec::new();
            let mut ok = Process32FirstW(snapshot, &mut entry).is_ok();
            while ok {
                let exe = wide_to_string(&entry.szExeFile);
                if exe.eq_ignore_ascii_case(name) {
                    found.push(ProcessInfo {
                        pid: entry.th32ProcessID,
                        name: exe,
                    });
                }
                ok = Process32NextW(snapshot, &mut entry).is_ok();
            }

            let _ = CloseHandle(snapshot);
            Ok(found)
        }
    }

    fn main_module(pid: u32) -> Result<(u64, u32)> {
        // SAFETY: same snapshot discipline as `list_processes`.
        unsafe {
            let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid)
                .map_err(|e| Error::ProcessOpenFailed(format!("Module snapshot failed: {e}")))?;

            let mut entry = MODULEENTRY32W {
                dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
                ..Default::default()
            };

            let result = Module32FirstW(snapshot, &mut entry);
            let _ = CloseHandle(snapshot);
            result.map_err(|e| Error::ProcessOpenFailed(format!("No main module: {e}")))?;

            debug!(
                "Main module {} at {:#x} ({:#x} bytes)",
                wide_to_string(&entry.szModule),
                entry.modBaseAddr as u64,
                entry.modBaseSize
            );
            Ok((entry.modBaseAddr as u64, entry.modBaseSize))
        }
    }

    pub fn open(pid: u32) -> Result<ProcessHandle> {
        let access =
            PROCESS_VM_READ | PROCESS_VM_WRITE | PROCESS_VM_OPERATION | PROCESS_QUERY_INFORMATION;

        // SAFETY: OpenProcess has no memory-safety preconditions; the handle is
        // owned by the returned ProcessHandle and closed on drop.
        let handle = unsafe { OpenProcess(access, BOOL::from(false), pid) }
            .map_err(|e| Error::ProcessOpenFailed(format!("PID {pid}: {e}")))?;

        let (base_address, module_size) = match main_module(pid) {
            Ok(module) => module,
            Err(e) => {
                // SAFETY: handle was just opened above.
                unsafe {
                    let _ = CloseHandle(handle);
                }
                return Err(e);
            }
        };

        Ok(ProcessHandle {
            handle,
            pid,
            base_address,
            module_size,
        })
    }

    pub fn read_bytes(handle: HANDLE, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        let mut read = 0usize;

        // SAFETY: the buffer is `size` bytes long and outlives the call.
        unsafe {
            ReadProcessMemory(
                handle,
                address as *const c_void,
                buffer.as_mut_ptr().cast(),
                size,
                Some(&mut read),
            )
        }
        .map_err(|e| Error::MemoryReadFailed {
            address,
            message: e.to_string(),
        })?;

        if read != size {
            return Err(Error::MemoryReadFailed {
                address,
                message: format!("partial read ({read} of {size} bytes)"),
            });
        }

        Ok(buffer)
    }

    pub fn write_bytes(handle: HANDLE, address: u64, data: &[u8]) -> Result<()> {
        let mut written = 0usize;
        trace!("write {} bytes at {:#x}", data.len(), address);

        // SAFETY: `data` is valid for `data.len()` bytes for the duration of the call.
        unsafe {
            WriteProcessMemory(
                handle,
                address as *const c_void,
                data.as_ptr().cast(),
                data.len(),
                Some(&mut written),
            )
        }
        .map_err(|e| Error::MemoryWriteFailed {
            address,
            message: e.to_string(),
        })?;

        if written != data.len() {
            return Err(Error::MemoryWriteFailed {
                address,
                message: format!("partial write ({written} of {} bytes)", data.len()),
            });
        }

        Ok(())
    }

    pub fn is_alive(handle: HANDLE) -> bool {
        let mut code = 0u32;
        // SAFETY: `code` is a valid out-pointer.
        unsafe { GetExitCodeProcess(handle, &mut code) }.is_ok() && code == STILL_ACTIVE
    }

    pub fn close(handle: HANDLE) {
        // SAFETY: the handle is owned by the ProcessHandle being dropped.
        unsafe {
            let _ = CloseHandle(handle);
        }
    }
}

#[cfg(target_os = "windows")]
impl ProcessHandle {
    /// Find the first process named `name` and open it
    pub fn find_and_open(name: &str) -> Result<Self> {
        let process = imp::list_processes(name)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::ProcessNotFound(name.to_string()))?;
        Self::open(process.pid)
    }

    /// Open a process by PID with read/write access to its memory
    pub fn open(pid: u32) -> Result<Self> {
        imp::open(pid)
    }

    pub fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        imp::read_bytes(self.handle, address, size)
    }

    pub fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()> {
        imp::write_bytes(self.handle, address, data)
    }

    /// Whether the process is still running
    pub fn is_alive(&self) -> bool {
        imp::is_alive(self.handle)
    }
}

#[cfg(target_os = "windows")]
impl Drop for ProcessHandle {
    fn drop(&mut self) {
        imp::close(self.handle);
    }
}

#[cfg(target_os = "windows")]
pub fn list_processes(name: &str) -> Result<Vec<ProcessInfo>> {
    imp::list_processes(name)
}

#[cfg(not(target_os = "windows"))]
const UNSUPPORTED: &str = "Process attach is only supported on Windows";

#[cfg(not(target_os = "windows"))]
impl ProcessHandle {
    pub fn find_and_open(name: &str) -> Result<Self> {
        Err(Error::ProcessNotFound(format!("{name}: {UNSUPPORTED}")))
    }

    pub fn open(pid: u32) -> Result<Self> {
        Err(Error::ProcessOpenFailed(format!("PID {pid}: {UNSUPPORTED}")))
    }

    pub fn read_bytes(&self, address: u64, _size: usize) -> Result<Vec<u8>> {
        Err(Error::MemoryReadFailed {
            address,
            message: UNSUPPORTED.to_string(),
        })
    }

    pub fn write_bytes(&self, address: u64, _data: &[u8]) -> Result<()> {
        Err(Error::MemoryWriteFailed {
            address,
            message: UNSUPPORTED.to_string(),
        })
    }

    pub fn is_alive(&self) -> bool {
        false
    }
}

#[cfg(not(target_os = "windows"))]
pub fn list_processes(_name: &str) -> Result<Vec<ProcessInfo>> {
    Ok(Vec::new())
}
