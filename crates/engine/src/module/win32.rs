//! Module enumeration via a ToolHelp snapshot of the current process

use std::mem;

use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Module32FirstW, Module32NextW, MODULEENTRY32W, TH32CS_SNAPMODULE,
    TH32CS_SNAPMODULE32,
};
use windows::Win32::System::Threading::GetCurrentProcessId;

use super::ModuleImage;

/// Collect every loaded module as (path, image)
pub(super) fn loaded_modules() -> Vec<(String, ModuleImage)> {
    let mut modules = Vec::new();

    unsafe {
        let snapshot = match CreateToolhelp32Snapshot(
            TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32,
            GetCurrentProcessId(),
        ) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("Module snapshot failed: {}", e);
                return modules;
            }
        };

        let mut entry = MODULEENTRY32W {
            dwSize: mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        if Module32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                let len = entry
                    .szExePath
                    .iter()
                    .position(|&c| c == 0)
                    .unwrap_or(entry.szExePath.len());
                let path = String::from_utf16_lossy(&entry.szExePath[..len]);

                modules.push((
                    path,
                    ModuleImage {
                        base: entry.modBaseAddr as usize,
                        size: entry.modBaseSize as usize,
                    },
                ));

                if Module32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }

        let _ = CloseHandle(snapshot);
    }

    modules
}
