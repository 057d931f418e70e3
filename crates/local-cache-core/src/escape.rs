//! Cookie-safe escaping compatible with the browser `escape()` function.
//!
//! Operates on UTF-16 code units: units below 256 outside the safe set
//! become `%XX`, wider units become `%uXXXX`. Cookies written by script
//! code using `escape()` read back unchanged.

fn is_unescaped(unit: u16) -> bool {
    matches!(unit,
        0x30..=0x39 // 0-9
        | 0x41..=0x5A // A-Z
        | 0x61..=0x7A // a-z
        | 0x40 | 0x2A | 0x5F | 0x2B | 0x2D | 0x2E | 0x2F // @ * _ + - . /
    )
}

/// Escape a string for use in a cookie name or value.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for unit in input.encode_utf16() {
        if is_unescaped(unit) {
            out.push(unit as u8 as char);
        } else if unit < 256 {
            out.push_str(&format!("%{:02X}", unit));
        } else {
            out.push_str(&format!("%u{:04X}", unit));
        }
    }
    out
}

/// Reverse [`escape`].
///
/// Malformed escape sequences are copied through literally. Unpaired
/// surrogates are replaced with U+FFFD.
pub fn unescape(input: &str) -> String {
    let units: Vec<u16> = input.encode_utf16().collect();
    let mut out = Vec::with_capacity(units.len());
    let mut i = 0;

    while i < units.len() {
        if units[i] == u16::from(b'%') {
            if units.get(i + 1) == Some(&u16::from(b'u')) {
                if let Some(decoded) = hex_units(&units, i + 2, 4) {
                    out.push(decoded);
                    i += 6;
                    continue;
                }
            } else if let Some(decoded) = hex_units(&units, i + 1, 2) {
                out.push(decoded);
                i += 3;
                continue;
            }
        }
        out.push(units[i]);
        i += 1;
    }

    String::from_utf16_lossy(&out)
}

fn hex_units(units: &[u16], start: usize, len: usize) -> Option<u16> {
    let digits = units.get(start..start + len)?;
    digits.iter().try_fold(0u16, |acc, &unit| {
        let digit = char::from_u32(u32::from(unit))?.to_digit(16)?;
        Some(acc * 16 + digit as u16)
    })
}
