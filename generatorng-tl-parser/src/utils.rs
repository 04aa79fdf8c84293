//! Constructor ids for definitions written without an explicit `#id`.

/// Compute the TL constructor id of a definition the way Telegram does.
///
/// `definition` is the text without its `#id` and trailing `;`. Template
/// braces are dropped, generic arguments lose their angle brackets
/// (`Vector<long>` hashes as `Vector long`) and whitespace runs collapse to
/// one space before the CRC32 is taken, so `vector {t:Type} # [ t ] = Vector t`
/// hashes as `vector t:Type # [ t ] = Vector t`.
pub(crate) fn tl_id(definition: &str) -> u32 {
    let cleaned = definition
        .replace(['{', '}', '<'], " ")
        .replace('>', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    crc32(cleaned.as_bytes())
}

/// Standard CRC-32 (ISO 3309 / ITU-T V.42).
fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}
