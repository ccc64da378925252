//! FFI interface for host interop
//!
//! Provides C-compatible functions for record extraction and image class
//! scanning. Options and results are passed as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Serialize;

use crate::error::{HarvestError, Result};
use crate::extractors::{
    extract, scan_image_classes_with, CandidateSelector, ExtractionRequest, ExtractionResult, ScanOptions,
};

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via harvest_free_result
#[repr(C)]
pub struct HarvestResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the call failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Extract records from HTML.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `request_json` - JSON `ExtractionRequest` (null-terminated); its `html`
///   field may be omitted and is replaced by the HTML argument
///
/// # Returns
/// HarvestResultFFI with json_ptr holding an `ExtractionResult` on success.
/// Blank HTML and invalid selectors are successful calls with an empty result.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `harvest_free_result`
#[no_mangle]
pub unsafe extern "C" fn harvest_extract(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> HarvestResultFFI {
    into_ffi(extract_from_ffi(html_ptr, html_len, request_json))
}

unsafe fn extract_from_ffi(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> Result<ExtractionResult> {
    let html = read_html(html_ptr, html_len)?;
    let request_str = read_c_str(request_json, "Request JSON")?;

    let mut request: ExtractionRequest =
        serde_json::from_str(request_str).map_err(HarvestError::InvalidRequest)?;
    request.html = html.to_string();

    Ok(extract(&request))
}

/// Rank image-class selector candidates.
///
/// `options_json` may be null for defaults, otherwise a JSON `ScanOptions`.
///
/// # Safety
/// Same as harvest_extract
#[no_mangle]
pub unsafe extern "C" fn harvest_scan_image_classes(
    html_ptr: *const c_char,
    html_len: usize,
    options_json: *const c_char,
) -> HarvestResultFFI {
    into_ffi(scan_from_ffi(html_ptr, html_len, options_json))
}

unsafe fn scan_from_ffi(
    html_ptr: *const c_char,
    html_len: usize,
    options_json: *const c_char,
) -> Result<Vec<CandidateSelector>> {
    let html = read_html(html_ptr, html_len)?;

    let options = if options_json.is_null() {
        ScanOptions::default()
    } else {
        let options_str = read_c_str(options_json, "Options JSON")?;
        serde_json::from_str(options_str).map_err(HarvestError::InvalidRequest)?
    };

    Ok(scan_image_classes_with(html, &options))
}

/// Free a HarvestResultFFI returned by this module
///
/// # Safety
/// - `result` must have been returned by a `harvest_*` function
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn harvest_free_result(result: HarvestResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

// Null or empty HTML reads as the empty document
unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> Result<&'a str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| HarvestError::InvalidUtf8("HTML content"))
}

unsafe fn read_c_str<'a>(value: *const c_char, what: &'static str) -> Result<&'a str> {
    if value.is_null() {
        return Err(HarvestError::NullPointer(what));
    }
    CStr::from_ptr(value)
        .to_str()
        .map_err(|_| HarvestError::InvalidUtf8(what))
}

fn into_ffi<T: Serialize>(outcome: Result<T>) -> HarvestResultFFI {
    let json = outcome
        .and_then(|value| serde_json::to_string(&value).map_err(HarvestError::Serialize))
        .and_then(|json| CString::new(json).map_err(|_| HarvestError::NulByte));

    match json {
        Ok(cstr) => HarvestResultFFI {
            json_ptr: cstr.into_raw(),
            error_ptr: ptr::null_mut(),
        },
        Err(err) => make_error_result(&err.to_string()),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> HarvestResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    HarvestResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
