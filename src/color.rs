use palette::{Hsl, IntoColor, Srgb};
use rand::Rng;

// ---------------------------------------------------------------------------
// Qualitative palette
// ---------------------------------------------------------------------------

/// ColorBrewer "Paired" (12 classes) followed by "Set3" (12 classes).
pub const PALETTE: [Srgb<u8>; 24] = [
    Srgb::new(0xa6, 0xce, 0xe3),
    Srgb::new(0x1f, 0x78, 0xb4),
    Srgb::new(0xb2, 0xdf, 0x8a),
    Srgb::new(0x33, 0xa0, 0x2c),
    Srgb::new(0xfb, 0x9a, 0x99),
    Srgb::new(0xe3, 0x1a, 0x1c),
    Srgb::new(0xfd, 0xbf, 0x6f),
    Srgb::new(0xff, 0x7f, 0x00),
    Srgb::new(0xca, 0xb2, 0xd6),
    Srgb::new(0x6a, 0x3d, 0x9a),
    Srgb::new(0xff, 0xff, 0x99),
    Srgb::new(0xb1, 0x59, 0x28),
    Srgb::new(0x8d, 0xd3, 0xc7),
    Srgb::new(0xff, 0xff, 0xb3),
    Srgb::new(0xbe, 0xba, 0xda),
    Srgb::new(0xfb, 0x80, 0x72),
    Srgb::new(0x80, 0xb1, 0xd3),
    Srgb::new(0xfd, 0xb4, 0x62),
    Srgb::new(0xb3, 0xde, 0x69),
    Srgb::new(0xfc, 0xcd, 0xe5),
    Srgb::new(0xd9, 0xd9, 0xd9),
    Srgb::new(0xbc, 0x80, 0xbd),
    Srgb::new(0xcc, 0xeb, 0xc5),
    Srgb::new(0xff, 0xed, 0x6f),
];

// ---------------------------------------------------------------------------
// Color assignment
// ---------------------------------------------------------------------------

/// Color for the dataset at `index`.
///
/// Indices inside the palette are deterministic. Anything past the end gets a
/// random hue, so two runs will not agree on overflow colors.
pub fn color_for<R: Rng + ?Sized>(index: usize, palette: &[Srgb<u8>], rng: &mut R) -> Srgb<u8> {
    match palette.get(index) {
        Some(color) => *color,
        None => random_color(rng),
    }
}

/// A random, saturated color.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Srgb<u8> {
    let hue: f32 = rng.gen_range(0.0..360.0);
    let hsl = Hsl::new(hue, 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    Srgb::new(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// `#rrggbb`, always six lowercase hex digits.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_hex_color(s: &str) -> bool {
        s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn palette_entries_are_stable() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(to_hex(color_for(0, &PALETTE, &mut rng)), "#a6cee3");
        assert_eq!(to_hex(color_for(11, &PALETTE, &mut rng)), "#b15928");
        assert_eq!(to_hex(color_for(23, &PALETTE, &mut rng)), "#ffed6f");
    }

    #[test]
    fn overflow_colors_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);
        for i in 24..200 {
            let hex = to_hex(color_for(i, &PALETTE, &mut rng));
            assert!(is_hex_color(&hex), "{hex}");
        }
    }

    #[test]
    fn hex_pads_small_components() {
        assert_eq!(to_hex(Srgb::new(0, 5, 16)), "#000510");
    }
}
