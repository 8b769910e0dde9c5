//! Module enumeration via `dl_iterate_phdr`

use std::ffi::{c_int, c_void, CStr};

use super::ModuleImage;

/// Collect every loaded object as (path, image)
///
/// The image size is the end of the highest `PT_LOAD` segment. Gaps between
/// segments can be unmapped; see [`ModuleImage::readable_ranges`].
pub(super) fn loaded_modules() -> Vec<(String, ModuleImage)> {
    let mut modules: Vec<(String, ModuleImage)> = Vec::new();

    // SAFETY: the callback only touches `modules` through the data pointer,
    // and dl_iterate_phdr does not retain it past the call.
    unsafe {
        libc::dl_iterate_phdr(
            Some(collect_module),
            &mut modules as *mut Vec<(String, ModuleImage)> as *mut c_void,
        );
    }

    modules
}

unsafe extern "C" fn collect_module(
    info: *mut libc::dl_phdr_info,
    _size: libc::size_t,
    data: *mut c_void,
) -> c_int {
    let modules = &mut *(data as *mut Vec<(String, ModuleImage)>);
    let info = &*info;

    if info.dlpi_name.is_null() {
        return 0;
    }
    let path = CStr::from_ptr(info.dlpi_name).to_string_lossy().into_owned();
    if path.is_empty() {
        return 0;
    }

    let mut size = 0usize;
    if !info.dlpi_phdr.is_null() {
        let headers = std::slice::from_raw_parts(info.dlpi_phdr, info.dlpi_phnum as usize);
        for header in headers.iter().filter(|h| h.p_type == libc::PT_LOAD) {
            let segment_end = (header.p_vaddr + header.p_memsz) as usize;
            size = size.max(segment_end);
        }
    }

    modules.push((
        path,
        ModuleImage {
            base: info.dlpi_addr as usize,
            size,
        },
    ));

    0
}
