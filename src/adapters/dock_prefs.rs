//! Dock preference reader.
//!
//! On macOS the dock edge is the `orientation` key of the
//! `com.apple.dock` preferences domain, read in-process through
//! CoreFoundation.  Other hosts have no such preference and always answer
//! `None`, leaving detection to the screen geometry.

use log::debug;

use crate::app::ports::DockPreferencePort;

#[cfg(target_os = "macos")]
mod cf {
    use std::ffi::{CStr, c_char, c_void};

    const K_CF_STRING_ENCODING_UTF8: u32 = 0x0800_0100;
    const VALUE_BUF_LEN: usize = 64;

    #[link(name = "CoreFoundation", kind = "framework")]
    unsafe extern "C" {
        fn CFStringCreateWithCString(
            alloc: *const c_void,
            c_str: *const c_char,
            encoding: u32,
        ) -> *const c_void;
        fn CFPreferencesAppSynchronize(application_id: *const c_void) -> bool;
        fn CFPreferencesCopyAppValue(key: *const c_void, application_id: *const c_void)
        -> *const c_void;
        fn CFGetTypeID(cf: *const c_void) -> usize;
        fn CFStringGetTypeID() -> usize;
        fn CFStringGetCString(
            string: *const c_void,
            buffer: *mut c_char,
            buffer_size: isize,
            encoding: u32,
        ) -> bool;
        fn CFRelease(cf: *const c_void);
    }

    /// String value of `key` in `app`'s preferences domain.  `None` when
    /// unset or not a string.
    pub fn copy_app_string(app: &CStr, key: &CStr) -> Option<String> {
        unsafe {
            let app_id =
                CFStringCreateWithCString(std::ptr::null(), app.as_ptr(), K_CF_STRING_ENCODING_UTF8);
            if app_id.is_null() {
                return None;
            }
            let key_ref =
                CFStringCreateWithCString(std::ptr::null(), key.as_ptr(), K_CF_STRING_ENCODING_UTF8);
            if key_ref.is_null() {
                CFRelease(app_id);
                return None;
            }

            // Another process owns the domain; drop the cached copy first.
            CFPreferencesAppSynchronize(app_id);
            let value = CFPreferencesCopyAppValue(key_ref, app_id);
            CFRelease(key_ref);
            CFRelease(app_id);
            if value.is_null() {
                return None;
            }

            let mut buf = [0 as c_char; VALUE_BUF_LEN];
            let ok = CFGetTypeID(value) == CFStringGetTypeID()
                && CFStringGetCString(
                    value,
                    buf.as_mut_ptr(),
                    VALUE_BUF_LEN as isize,
                    K_CF_STRING_ENCODING_UTF8,
                );
            CFRelease(value);
            if !ok {
                return None;
            }
            Some(CStr::from_ptr(buf.as_ptr()).to_string_lossy().into_owned())
        }
    }
}

#[derive(Default)]
pub struct SystemDockPreference;

impl SystemDockPreference {
    pub fn new() -> Self {
        Self
    }
}

impl DockPreferencePort for SystemDockPreference {
    #[cfg(target_os = "macos")]
    fn orientation_preference(&self) -> Option<String> {
        let value = cf::copy_app_string(c"com.apple.dock", c"orientation");
        if value.is_none() {
            // Key unset: the dock is at its default edge.
            debug!("Dock preference: orientation unset");
        }
        value.filter(|v| !v.is_empty())
    }

    #[cfg(not(target_os = "macos"))]
    fn orientation_preference(&self) -> Option<String> {
        debug!("Dock preference: not available on this platform");
        None
    }
}

/// Preference fixed at construction (`--dock` on the command line).
pub struct FixedDockPreference(pub Option<String>);

impl DockPreferencePort for FixedDockPreference {
    fn orientation_preference(&self) -> Option<String> {
        self.0.clone()
    }
}
