//! Tag colors
//!
//! Tags without a stored color get one derived from their name. The mapping
//! is a pure function of the name so a tag always renders with the same hue.

/// Saturation used for derived colors
const SATURATION: u8 = 65;

/// Lightness used for derived colors
const LIGHTNESS: u8 = 55;

/// Derive a CSS color for a tag name
///
/// Hashes the UTF-16 code units with a 32-bit rolling hash and maps the
/// result onto the hue circle.
pub fn color_for(name: &str) -> String {
    let hue = name_hash(name).unsigned_abs() % 360;
    format!("hsl({}, {}%, {}%)", hue, SATURATION, LIGHTNESS)
}

fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}
