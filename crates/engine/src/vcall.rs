//! Virtual function invocation by table slot
//!
//! Engine behaviour without a public symbol is reached through an object's
//! vtable. The slot index comes from gamedata; nothing here can check that
//! the index or the argument types are right. Correctness rests entirely on
//! the data file matching the running binary.
//!
//! ```ignore
//! // CommitSuicide(bool explode, bool force)
//! let index = gamedata.offset("CommitSuicide")? as usize;
//! unsafe { call_virtual::<(), _>(index, pawn, (false, true)) };
//! ```

use std::ffi::c_void;
use std::ptr::NonNull;

/// Read the function pointer stored in slot `index` of `object`'s vtable
///
/// # Safety
/// `object` must point to a C++ object whose first word is a vtable pointer
/// with at least `index + 1` entries.
#[inline]
pub unsafe fn virtual_function(object: NonNull<c_void>, index: usize) -> *const () {
    let vtable = *(object.as_ptr() as *const *const *const ());
    *vtable.add(index)
}

/// Argument tuples that can be forwarded to a virtual function
///
/// Implemented for tuples of up to six elements. The object pointer is always
/// passed first, ahead of the tuple's elements.
pub trait VirtualArgs {
    /// Call `function` as `extern "C" fn(this, args...) -> R`
    ///
    /// # Safety
    /// `function` must have exactly that signature.
    unsafe fn invoke<R>(self, function: *const (), this: *mut c_void) -> R;
}

macro_rules! impl_virtual_args {
    ($($ty:ident $val:ident),*) => {
        impl<$($ty),*> VirtualArgs for ($($ty,)*) {
            #[inline]
            unsafe fn invoke<R>(self, function: *const (), this: *mut c_void) -> R {
                let ($($val,)*) = self;
                let function: unsafe extern "C" fn(*mut c_void $(, $ty)*) -> R =
                    std::mem::transmute_copy(&function);
                function(this $(, $val)*)
            }
        }
    };
}

impl_virtual_args!();
impl_virtual_args!(A a);
impl_virtual_args!(A a, B b);
impl_virtual_args!(A a, B b, C c);
impl_virtual_args!(A a, B b, C c, D d);
impl_virtual_args!(A a, B b, C c, D d, E e);
impl_virtual_args!(A a, B b, C c, D d, E e, F f);

/// Call the virtual function at `index` on `object`
///
/// `R` and the element types of `args` spell out the callee's signature.
///
/// # Safety
/// - `object` must be a live C++ object with a vtable of more than `index` entries
/// - The function in that slot must take `(this, args...)` and return `R`
#[inline]
pub unsafe fn call_virtual<R, A: VirtualArgs>(index: usize, object: NonNull<c_void>, args: A) -> R {
    let function = virtual_function(object, index);
    args.invoke(function, object.as_ptr())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    struct FakeObject {
        vtable: *const *const (),
        value: i32,
        flags: (bool, bool),
    }

    unsafe extern "C" fn get_value(this: *mut c_void) -> i32 {
        (*(this as *mut FakeObject)).value
    }

    unsafe extern "C" fn add_value(this: *mut c_void, amount: i32) -> i32 {
        let object = &mut *(this as *mut FakeObject);
        object.value += amount;
        object.value
    }

    unsafe extern "C" fn set_flags(this: *mut c_void, first: bool, second: bool) {
        (*(this as *mut FakeObject)).flags = (first, second);
    }

    fn fake_vtable() -> [*const (); 3] {
        [
            get_value as *const (),
            add_value as *const (),
            set_flags as *const (),
        ]
    }

    #[test]
    fn test_virtual_function_reads_slot() {
        let vtable = fake_vtable();
        let mut object = FakeObject {
            vtable: vtable.as_ptr(),
            value: 0,
            flags: (false, false),
        };
        let ptr = NonNull::new(&mut object as *mut FakeObject as *mut c_void).unwrap();

        unsafe {
            assert_eq!(virtual_function(ptr, 1), add_value as *const ());
        }
    }

    #[test]
    fn test_call_virtual_with_arguments() {
        let vtable = fake_vtable();
        let mut object = FakeObject {
            vtable: vtable.as_ptr(),
            value: 10,
            flags: (false, false),
        };
        let ptr = NonNull::new(&mut object as *mut FakeObject as *mut c_void).unwrap();

        unsafe {
            assert_eq!(call_virtual::<i32, _>(0, ptr, ()), 10);
            assert_eq!(call_virtual::<i32, _>(1, ptr, (5i32,)), 15);
            call_virtual::<(), _>(2, ptr, (false, true));
        }

        assert_eq!(object.value, 15);
        assert_eq!(object.flags, (false, true));
    }
}
