//! Packed ARGB helpers.

/// Splits a packed `0xAARRGGBB` value into its red, green and blue channels.
pub(crate) fn rgb_channels(argb: u32) -> (u32, u32, u32) {
    ((argb >> 16) & 0xFF, (argb >> 8) & 0xFF, argb & 0xFF)
}

/// Packs 8-bit channels into `0xAARRGGBB`.
pub(crate) fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Luma with 0.21/0.72/0.07 weights, truncated toward zero.
///
/// Computed in integer hundredths: `floor(0.21 * r + 0.72 * g + 0.07 * b)`
/// without floating point rounding.
pub(crate) fn luma(argb: u32) -> u8 {
    let (r, g, b) = rgb_channels(argb);
    ((21 * r + 72 * g + 7 * b) / 100) as u8
}

/// Opaque gray pixel with `value` replicated across all three channels.
pub(crate) fn gray_argb(value: u8) -> u32 {
    pack_argb(0xFF, value, value, value)
}
