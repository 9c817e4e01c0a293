//! FFI bindings for Wetbulb
//!
//! This module provides C-compatible functions for calling Wetbulb from mobile
//! shells. String results are allocated here and must be freed by the caller
//! using `wetbulb_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_double, c_int};
use std::ptr;

use chrono::{DateTime, Utc};

use crate::estimator::estimate_wet_bulb;
use crate::guideline::Guideline;
use crate::pipeline::open_meteo_to_report;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Numeric API
// ============================================================================

/// Estimate wet-bulb temperature (°C) from temperature (°C) and relative humidity (%).
#[no_mangle]
pub extern "C" fn wetbulb_estimate(temperature: c_double, humidity: c_double) -> c_double {
    estimate_wet_bulb(temperature, humidity)
}

/// Classify a wet-bulb temperature into a band index (0 = safe … 5 = death).
///
/// Returns -1 for NaN; call `wetbulb_last_error` for the message.
#[no_mangle]
pub extern "C" fn wetbulb_classify(wet_bulb: c_double) -> c_int {
    clear_last_error();

    match Guideline::classify(wet_bulb) {
        Ok(guideline) => guideline.index() as c_int,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Report API
// ============================================================================

/// Process an Open-Meteo forecast response and return heat report JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - `now_rfc3339` may be NULL (current time is used) or a valid null-terminated
///   RFC 3339 timestamp.
/// - Returns a newly allocated string that must be freed with `wetbulb_free_string`.
/// - Returns NULL on error; call `wetbulb_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wetbulb_open_meteo_to_report(
    json: *const c_char,
    now_rfc3339: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let query_instant = if now_rfc3339.is_null() {
        Utc::now()
    } else {
        let parsed = cstr_to_string(now_rfc3339)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));
        match parsed {
            Some(dt) => dt,
            None => {
                set_last_error("Invalid query instant (expected RFC 3339)");
                return ptr::null_mut();
            }
        }
    };

    match open_meteo_to_report(&json_str, query_instant) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory & diagnostics
// ============================================================================

/// Free a string returned by this library.
///
/// # Safety
/// `ptr` must be NULL or a pointer previously returned by a `wetbulb_*`
/// function that has not already been freed.
#[no_mangle]
pub unsafe extern "C" fn wetbulb_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message for the calling thread, or NULL.
///
/// # Safety
/// The returned pointer is owned by the library and valid until the next
/// `wetbulb_*` call on the same thread. Do not free it.
#[no_mangle]
pub unsafe extern "C" fn wetbulb_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version string.
///
/// # Safety
/// The returned pointer is static. Do not free it.
#[no_mangle]
pub unsafe extern "C" fn wetbulb_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
