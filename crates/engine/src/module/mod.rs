//! Loaded-module lookup
//!
//! Finds where a shared library is mapped in the current process so its
//! image can be scanned for signatures.

use std::ops::Range;

use crate::memory;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(windows)]
mod win32;

/// A loaded module's mapped range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleImage {
    /// Address the module is mapped at
    pub base: usize,
    /// Size of the mapped image in bytes
    pub size: usize,
}

impl ModuleImage {
    /// Mapped, readable parts of the image
    ///
    /// The span between the first and last loaded segment may contain
    /// `PROT_NONE` gaps; those are left out.
    pub fn readable_ranges(&self) -> Vec<Range<usize>> {
        memory::readable_ranges(self.base, self.size)
    }
}

/// Something that can find a loaded module by file name
///
/// The native implementation is [`ProcessModules`]; tests substitute images
/// backed by their own buffers.
pub trait ModuleLocator: Send + Sync {
    /// Find a module by file name (e.g. `libserver.so`, `server.dll`)
    fn locate(&self, file_name: &str) -> Option<ModuleImage>;
}

/// Enumerates the modules loaded in the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessModules;

impl ModuleLocator for ProcessModules {
    fn locate(&self, file_name: &str) -> Option<ModuleImage> {
        #[cfg(target_os = "linux")]
        let candidates = linux::loaded_modules();

        #[cfg(windows)]
        let candidates = win32::loaded_modules();

        #[cfg(not(any(target_os = "linux", windows)))]
        let candidates: Vec<(String, ModuleImage)> = Vec::new();

        select_module(
            candidates
                .iter()
                .map(|(path, image)| (path.as_str(), *image)),
            file_name,
        )
    }
}

/// Check if the file-name component of `path` equals `file_name`, ignoring case
pub fn file_name_matches(path: &str, file_name: &str) -> bool {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    name.eq_ignore_ascii_case(file_name)
}

/// Pick the module matching `file_name`
///
/// When the same file is mapped more than once, the largest image wins.
pub fn select_module<'a>(
    candidates: impl IntoIterator<Item = (&'a str, ModuleImage)>,
    file_name: &str,
) -> Option<ModuleImage> {
    candidates
        .into_iter()
        .filter(|(path, _)| file_name_matches(path, file_name))
        .map(|(_, image)| image)
        .filter(|image| image.base != 0 && image.size != 0)
        .max_by_key(|image| image.size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_matches() {
        assert!(file_name_matches(
            "/home/steam/cs2/game/csgo/bin/linuxsteamrt64/libserver.so",
            "libserver.so"
        ));
        assert!(file_name_matches(
            "C:\\cs2\\game\\csgo\\bin\\win64\\SERVER.DLL",
            "server.dll"
        ));
        assert!(file_name_matches("server.dll", "server.dll"));
        assert!(!file_name_matches("/lib/libserver.so.1", "libserver.so"));
        assert!(!file_name_matches("/lib/libmatchmaking_server.so", "server.so"));
    }

    #[test]
    fn test_select_largest_duplicate() {
        let small = ModuleImage { base: 0x1000, size: 0x100 };
        let large = ModuleImage { base: 0x8000, size: 0x4000 };
        let other = ModuleImage { base: 0x20000, size: 0x10000 };

        let selected = select_module(
            [
                ("/a/libserver.so", small),
                ("/b/libengine2.so", other),
                ("/c/libserver.so", large),
            ],
            "libserver.so",
        );
        assert_eq!(selected, Some(large));
    }

    #[test]
    fn test_select_missing() {
        let image = ModuleImage { base: 0x1000, size: 0x100 };
        assert_eq!(select_module([("/a/libclient.so", image)], "libserver.so"), None);
    }

    #[test]
    fn test_readable_ranges_of_heap_image() {
        let bytes = vec![0u8; 256];
        let base = bytes.as_ptr() as usize;
        let image = ModuleImage { base, size: bytes.len() };
        assert_eq!(image.readable_ranges(), vec![base..base + 256]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_locate_libc() {
        let found = linux::loaded_modules()
            .into_iter()
            .find(|(path, _)| path.contains("libc.so"));
        if let Some((path, image)) = found {
            let name = path.rsplit('/').next().unwrap().to_string();
            let located = ProcessModules.locate(&name).unwrap();
            assert!(located.size >= image.size);
        }
    }
}
