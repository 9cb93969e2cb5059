//! Raw sample assembly and fixed-point to physical-unit conversion.
//!
//! The MPL3115A2 reports pressure/altitude as a 20-bit Q18.2 / Q16.4 value left-aligned
//! in a 3-byte burst, and temperature as a 12-bit Q8.4 value left-aligned in 2 bytes.

/// Assembles a 24-bit unsigned value from a MSB-first burst read.
pub(crate) fn assemble_u24(bytes: [u8; 3]) -> u32 {
    (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32
}

/// Assembles a 16-bit unsigned value from a MSB-first burst read.
pub(crate) fn assemble_u16(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Sign-extends the low `width` bits of `value` into a full 32-bit signed integer.
pub(crate) fn sign_extend(value: u32, width: u32) -> i32 {
    if value & 1 << (width - 1) != 0 {
        (value | u32::MAX << width) as i32
    } else {
        value as i32
    }
}

/// Converts a 3-byte pressure burst into kPa. 2 fractional bits after discarding the alignment padding.
pub(crate) fn pressure_kpa(bytes: [u8; 3]) -> f32 {
    (assemble_u24(bytes) >> 4) as f32 / 4.0
}

/// Converts a 3-byte altitude burst into meters. The 20-bit value is signed; 4 fractional bits.
pub(crate) fn altitude_meters(bytes: [u8; 3]) -> f32 {
    sign_extend(assemble_u24(bytes) >> 4, 20) as f32 / 16.0
}

/// Converts a 2-byte temperature burst into degrees Celsius. 4 fractional bits.
///
/// The 12-bit value is deliberately treated as unsigned, matching the established
/// behavior of this conversion even though the sign bit (bit 11) exists on the device.
pub(crate) fn temperature_celsius(bytes: [u8; 2]) -> f32 {
    (assemble_u16(bytes) >> 4) as f32 / 16.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_bursts_msb_first() {
        assert_eq!(assemble_u24([0x12, 0x34, 0x56]), 0x123456);
        assert_eq!(assemble_u16([0xAB, 0xCD]), 0xABCD);
    }

    #[test]
    fn assembly_round_trips_sampled_values() {
        // Deterministic LCG over the 24-bit space.
        let mut value = 0x1234_5678u32;

        for _ in 0..10_000 {
            value = value.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);

            let raw = value >> 8;
            let bytes = [(raw >> 16) as u8, (raw >> 8) as u8, raw as u8];

            assert_eq!(assemble_u24(bytes), raw);
        }
    }

    #[test]
    fn sign_extension_boundaries() {
        assert_eq!(sign_extend(0x00000, 20), 0);
        assert_eq!(sign_extend(0x7FFFF, 20), 524_287);
        assert_eq!(sign_extend(0x80000, 20), -524_288);
        assert_eq!(sign_extend(0xFFFFF, 20), -1);
    }

    #[test]
    fn pressure_follows_documented_formula() {
        assert_eq!(pressure_kpa([0x60, 0x00, 0x00]), (0x600000u32 >> 4) as f32 / 4.0);
        assert_eq!(pressure_kpa([0x60, 0x00, 0x00]), 98_304.0);
        assert_eq!(pressure_kpa([0x00, 0x00, 0x10]), 0.25);
    }

    #[test]
    fn pressure_is_monotonic_in_raw_value() {
        let samples = [
            [0x00, 0x00, 0x00],
            [0x00, 0x00, 0xF0],
            [0x01, 0x86, 0x40],
            [0x60, 0x00, 0x00],
            [0xFF, 0xFF, 0xF0],
        ];

        for window in samples.windows(2) {
            assert!(pressure_kpa(window[0]) < pressure_kpa(window[1]));
        }
    }

    #[test]
    fn altitude_sign_extends_negative_values() {
        // 0xFFFFC0 >> 4 = 0xFFFFC, bit 19 set, sign-extends to -4 sixteenths.
        assert_eq!(altitude_meters([0xFF, 0xFF, 0xC0]), -0.25);
        assert_eq!(altitude_meters([0x80, 0x00, 0x00]), -32_768.0);
        assert_eq!(altitude_meters([0x7F, 0xFF, 0xF0]), 32_767.9375);
        assert_eq!(altitude_meters([0x01, 0x94, 0x20]), 404.125);
    }

    #[test]
    fn temperature_is_not_sign_extended() {
        // Bit 11 of the shifted value set. A signed reading would be -32.0 °C;
        // the conversion keeps the raw value unsigned and yields 224.0.
        assert_eq!(temperature_celsius([0xE0, 0x00]), 224.0);
        assert_eq!(temperature_celsius([0x01, 0x40]), 1.25);
        assert_eq!(temperature_celsius([0x14, 0x80]), 20.5);
    }
}
