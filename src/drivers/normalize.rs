use crate::drivers::frame::{MemoryDepth, DISPLAY_RESOLUTION};
/// Brings a native-depth payload up to [`DISPLAY_RESOLUTION`] points.
///
/// 10k payloads already match the display grid and are copied as-is. 1k
/// payloads are hold-repeated: native sample `k` fills display slots
/// `[10k, 10k + 10)`, so `out[i] == payload[i / 10]`.
pub fn normalize(payload: &[i8], depth: MemoryDepth) -> Vec<i8> {
    debug_assert_eq!(payload.len(), depth.native_len());
    match depth {
        MemoryDepth::K10 => payload.to_vec(),
        MemoryDepth::K1 => hold_repeat(payload, depth.repeat_factor()),
    }
}
pub fn hold_repeat(payload: &[i8], factor: usize) -> Vec<i8> {
    let mut out = Vec::with_capacity(payload.len() * factor);
    for &sample in payload {
        out.extend(std::iter::repeat(sample).take(factor));
    }
    out
}
/// Flat stand-in for a channel the capture did not include.
pub fn placeholder() -> Vec<i8> {
    vec![0; DISPLAY_RESOLUTION]
}
