//! C-ABI FFI bindings for cross-language integration.
//!
//! This module provides a C-compatible API for using mdlex from hosts
//! such as C#, Python, and Node.js. All strings cross the boundary as
//! null-terminated UTF-8.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::render::{JsonFormat, RenderOptions};
use crate::viewer::{load_editor_state, ViewState};
use crate::Mdlex;

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct MdlexResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The result data (null if failed). Must be freed with `mdlex_free_result`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `mdlex_free_result`.
    pub error: *mut c_char,
}

impl MdlexResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }

    fn from_result(result: crate::Result<String>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Read a required string argument.
unsafe fn read_str<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, MdlexResult> {
    if ptr.is_null() {
        return Err(MdlexResult::error(format!("{} cannot be null", name)));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| MdlexResult::error(format!("Invalid UTF-8 {}", name)))
}

fn json_format(pretty: bool) -> JsonFormat {
    if pretty {
        JsonFormat::Pretty
    } else {
        JsonFormat::Compact
    }
}

/// Convert Markdown text to editor state JSON.
///
/// # Safety
///
/// The `markdown` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `mdlex_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mdlex_to_json(markdown: *const c_char, pretty: bool) -> MdlexResult {
    let markdown = match read_str(markdown, "markdown") {
        Ok(s) => s,
        Err(e) => return e,
    };
    MdlexResult::from_result(crate::to_json(markdown, json_format(pretty)))
}

/// Convert an mdast JSON tree to editor state JSON.
///
/// # Safety
///
/// The `mdast` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `mdlex_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mdlex_mdast_to_json(mdast: *const c_char, pretty: bool) -> MdlexResult {
    let mdast = match read_str(mdast, "mdast") {
        Ok(s) => s,
        Err(e) => return e,
    };
    MdlexResult::from_result(
        crate::convert_json(mdast).and_then(|result| result.to_json_with(json_format(pretty))),
    )
}

/// Get the number of pages a Markdown document splits into.
///
/// A `page_size` of 0 uses the default.
///
/// # Safety
///
/// The `markdown` must be a valid null-terminated UTF-8 string.
/// Returns -1 on error.
#[no_mangle]
pub unsafe extern "C" fn mdlex_page_count(markdown: *const c_char, page_size: usize) -> i32 {
    let Ok(markdown) = read_str(markdown, "markdown") else {
        return -1;
    };
    let result = builder(page_size).with_highlight(false).convert_markdown(markdown);
    i32::try_from(result.page_count()).unwrap_or(-1)
}

/// Get the editor state JSON of one page.
///
/// # Safety
///
/// The `markdown` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `mdlex_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mdlex_page_json(
    markdown: *const c_char,
    page_size: usize,
    index: usize,
) -> MdlexResult {
    let markdown = match read_str(markdown, "markdown") {
        Ok(s) => s,
        Err(e) => return e,
    };

    let result = builder(page_size).convert_markdown(markdown);
    let pages = result.pages();
    match pages.get(index) {
        Some(page) => MdlexResult::from_result(page.to_json(JsonFormat::Compact)),
        None => MdlexResult::error(crate::Error::PageOutOfRange(index, pages.len()).to_string()),
    }
}

/// Validate stored editor state JSON for display.
///
/// Always succeeds: a null, malformed or empty document yields the
/// matching placeholder document, and `error` is set only for malformed
/// input alongside it.
///
/// # Safety
///
/// The `json` must be null or a valid null-terminated UTF-8 string.
/// The returned result must be freed with `mdlex_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mdlex_load_view(json: *const c_char) -> MdlexResult {
    let view = if json.is_null() {
        load_editor_state(None)
    } else {
        match CStr::from_ptr(json).to_str() {
            Ok(json) => load_editor_state(Some(json)),
            Err(e) => ViewState::failed(format!("Invalid UTF-8 json: {}", e)),
        }
    };
    let error = view.error().map(str::to_string);
    let mut result = MdlexResult::from_result(crate::render::to_json(
        view.state(),
        JsonFormat::Compact,
    ));
    if let (true, Some(message)) = (result.success, error) {
        result.error = CString::new(message).unwrap_or_default().into_raw();
    }
    result
}

fn builder(page_size: usize) -> Mdlex {
    let page_size = if page_size == 0 {
        RenderOptions::default().page_size
    } else {
        page_size
    };
    Mdlex::new().with_page_size(page_size)
}

/// Free a result returned by any mdlex function.
///
/// # Safety
///
/// The `result` must have been returned by an mdlex function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn mdlex_free_result(result: MdlexResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Get the version of the mdlex library.
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn mdlex_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn data(result: &MdlexResult) -> String {
        CStr::from_ptr(result.data).to_str().unwrap().to_string()
    }

    #[test]
    fn test_version() {
        let version = mdlex_version();
        assert!(!version.is_null());
    }

    #[test]
    fn test_null_markdown() {
        unsafe {
            let result = mdlex_to_json(ptr::null(), false);
            assert!(!result.success);
            assert!(!result.error.is_null());
            mdlex_free_result(result);

            assert_eq!(mdlex_page_count(ptr::null(), 5), -1);
        }
    }

    #[test]
    fn test_to_json() {
        let markdown = CString::new("# Hi").unwrap();
        unsafe {
            let result = mdlex_to_json(markdown.as_ptr(), false);
            assert!(result.success);
            assert!(data(&result).contains("\"tag\":\"h1\""));
            mdlex_free_result(result);
        }
    }

    #[test]
    fn test_pages() {
        let markdown = CString::new("a\n\nb\n\nc\n").unwrap();
        unsafe {
            assert_eq!(mdlex_page_count(markdown.as_ptr(), 2), 2);
            assert_eq!(mdlex_page_count(markdown.as_ptr(), 0), 1);

            let page = mdlex_page_json(markdown.as_ptr(), 2, 1);
            assert!(page.success);
            assert!(data(&page).contains("\"text\":\"c\""));
            mdlex_free_result(page);

            let missing = mdlex_page_json(markdown.as_ptr(), 2, 5);
            assert!(!missing.success);
            mdlex_free_result(missing);
        }
    }

    #[test]
    fn test_load_view_malformed() {
        let json = CString::new("{broken").unwrap();
        unsafe {
            let result = mdlex_load_view(json.as_ptr());
            assert!(result.success);
            assert!(!result.error.is_null());
            assert!(data(&result).contains("Error loading content"));
            mdlex_free_result(result);

            let empty = mdlex_load_view(ptr::null());
            assert!(empty.success);
            assert!(empty.error.is_null());
            mdlex_free_result(empty);
        }
    }

    #[test]
    fn test_load_view_invalid_utf8() {
        let json = CString::new(vec![b'{', 0xff, 0xfe, b'}']).unwrap();
        unsafe {
            let result = mdlex_load_view(json.as_ptr());
            assert!(result.success);
            assert!(!result.error.is_null());
            assert!(data(&result).contains("Error loading content"));
            assert!(!data(&result).contains("Upload a file"));
            mdlex_free_result(result);
        }
    }
}
