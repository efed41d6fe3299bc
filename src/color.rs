use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed series colors
// ---------------------------------------------------------------------------

/// Series color for `Hommes` (the dashboard's fixed blue).
pub const MALE: Color32 = Color32::from_rgb(0x63, 0x6E, 0xFA);
/// Series color for `Femmes` (the dashboard's fixed red-orange).
pub const FEMALE: Color32 = Color32::from_rgb(0xEF, 0x55, 0x3B);

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Used for pie slices and per-category bars.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sequential scale (choropleth)
// ---------------------------------------------------------------------------

/// Teal-green ramp stops, light to dark.
const SCALE_STOPS: [(u8, u8, u8); 4] = [
    (176, 242, 188),
    (96, 208, 160),
    (56, 160, 150),
    (37, 125, 152),
];

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}

/// Map `t` in `[0, 1]` onto the teal-green ramp colouring the choropleth.
/// Out-of-range inputs clamp, so a degenerate value range stays drawable.
pub fn sequential_scale(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let scaled = t * (SCALE_STOPS.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(SCALE_STOPS.len() - 2);
    let local = scaled - i as f32;
    let (r0, g0, b0) = SCALE_STOPS[i];
    let (r1, g1, b1) = SCALE_STOPS[i + 1];
    Color32::from_rgb(lerp(r0, r1, local), lerp(g0, g1, local), lerp(b0, b1, local))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_size_matches_request() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
    }

    #[test]
    fn palette_colors_are_distinct() {
        let palette = generate_palette(12);
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn scale_endpoints_are_the_ramp_ends() {
        assert_eq!(sequential_scale(0.0), Color32::from_rgb(176, 242, 188));
        assert_eq!(sequential_scale(1.0), Color32::from_rgb(37, 125, 152));
    }

    #[test]
    fn scale_clamps_out_of_range_input() {
        assert_eq!(sequential_scale(-3.0), sequential_scale(0.0));
        assert_eq!(sequential_scale(2.5), sequential_scale(1.0));
    }
}
