//! Bit-level precision conversions.

/// Convert f32 to bf16 bits (round to nearest even)
pub fn f32_to_bf16(value: f32) -> u16 {
    half::bf16::from_f32(value).to_bits()
}

/// Convert bf16 bits to f32
pub fn bf16_to_f32(value: u16) -> f32 {
    half::bf16::from_bits(value).to_f32()
}

/// Convert f32 to fp16 bits (IEEE half precision)
pub fn f32_to_fp16(value: f32) -> u16 {
    half::f16::from_f32(value).to_bits()
}

/// Convert fp16 bits to f32
pub fn fp16_to_f32(value: u16) -> f32 {
    half::f16::from_bits(value).to_f32()
}
