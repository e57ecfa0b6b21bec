//! Barcode scanner conventions
//!
//! Scanners type the code and finish with Enter. The console and the
//! browser bindings both read these rules from here.

use crate::models::EntityKind;

/// Key code sent by Enter, and by scanners at the end of a code
pub const ENTER_KEY_CODE: u32 = 13;

/// Whether a key press in a scan field should run a lookup
pub fn is_scan_submit(key_code: u32, value: &str) -> bool {
    key_code == ENTER_KEY_CODE && !value.trim().is_empty()
}

/// Canonical form of a scanned code for a lookup of `kind`.
///
/// Raw-material codes are stored lowercase; barcodes are only trimmed.
pub fn normalize_scan_code(kind: EntityKind, code: &str) -> String {
    match kind {
        EntityKind::RawMaterial => code.trim().to_lowercase(),
        _ => code.trim().to_string(),
    }
}
