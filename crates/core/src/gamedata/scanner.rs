//! Signature scanning over loaded modules

use cs2kit_engine::memory;
use cs2kit_engine::{ModuleLocator, ProcessModules};
use cs2kit_sdk::Platform;

use super::pattern::BytePattern;

/// Finds byte signatures inside loaded modules
///
/// Library names are logical (`"server"`); the platform's naming convention
/// is applied before the module is looked up.
pub struct SignatureScanner {
    locator: Box<dyn ModuleLocator>,
    platform: Platform,
}

impl Default for SignatureScanner {
    fn default() -> Self {
        Self::new(Box::new(ProcessModules), Platform::current())
    }
}

impl SignatureScanner {
    /// Create a scanner over a custom module locator
    pub fn new(locator: Box<dyn ModuleLocator>, platform: Platform) -> Self {
        Self { locator, platform }
    }

    /// Platform whose library naming convention is applied
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Find the first match of `pattern` in `library`
    ///
    /// Returns the absolute address of the match. Only readable parts of the
    /// image are scanned.
    pub fn find_pattern(&self, library: &str, pattern: &BytePattern) -> Option<usize> {
        let file_name = self.platform.module_file_name(library);

        let Some(image) = self.locator.locate(&file_name) else {
            tracing::warn!("Module not found: {}", file_name);
            return None;
        };

        tracing::debug!(
            "Scanning {} (base {:#x}, size {:#x})",
            file_name,
            image.base,
            image.size
        );

        let found = image.readable_ranges().into_iter().find_map(|run| {
            // SAFETY: the run was just reported mapped and readable
            let bytes = unsafe { std::slice::from_raw_parts(run.start as *const u8, run.len()) };
            pattern.scan(bytes).map(|offset| run.start + offset)
        });

        match found {
            Some(address) => {
                tracing::debug!("Pattern matched in {} at {:#x}", file_name, address);
                Some(address)
            }
            None => {
                tracing::warn!("Pattern not found in {}: {}", file_name, pattern);
                None
            }
        }
    }

    /// Resolve a RIP-relative displacement, see [`memory::resolve_relative`]
    pub fn resolve_relative(
        &self,
        address: usize,
        disp_offset: usize,
        disp_size: usize,
    ) -> Option<usize> {
        memory::resolve_relative(address, disp_offset, disp_size)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use cs2kit_engine::{ModuleImage, ModuleLocator};

    /// Module locator over heap buffers, counting lookups
    #[derive(Default)]
    pub struct FakeModules {
        images: HashMap<String, Vec<u8>>,
        pub lookups: Arc<AtomicUsize>,
    }

    impl FakeModules {
        pub fn with(mut self, file_name: &str, bytes: Vec<u8>) -> Self {
            self.images.insert(file_name.to_string(), bytes);
            self
        }

        pub fn base_of(&self, file_name: &str) -> usize {
            self.images[file_name].as_ptr() as usize
        }
    }

    impl ModuleLocator for FakeModules {
        fn locate(&self, file_name: &str) -> Option<ModuleImage> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.images.get(file_name).map(|bytes| ModuleImage {
                base: bytes.as_ptr() as usize,
                size: bytes.len(),
            })
        }
    }
}
