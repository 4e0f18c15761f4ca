use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

/// Fill for countries without data for the selected year.
pub const NO_DATA: Color32 = Color32::from_rgb(0xdc, 0xdc, 0xdc);

/// Fill for the country under the pointer.
pub const HOVER: Color32 = Color32::from_rgb(0xe6, 0x39, 0x46);

pub const BLOC: Color32 = Color32::from_rgb(0x88, 0x84, 0xd8);
pub const REST: Color32 = Color32::from_rgb(0x82, 0xca, 0x9d);
pub const COMPARISON_BAR: Color32 = Color32::from_rgb(0x88, 0x84, 0xd8);
pub const HISTORICAL_BAR: Color32 = Color32::from_rgb(0xff, 0x6b, 0x6b);

// ---------------------------------------------------------------------------
// Series palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

/// Colour for the `index`-th line of a chart with `count` lines.
pub fn series_color(index: usize, count: usize) -> Color32 {
    generate_palette(count.max(1))
        .get(index % count.max(1))
        .copied()
        .unwrap_or(Color32::LIGHT_BLUE)
}

// ---------------------------------------------------------------------------
// Sequential red ramp for the choropleth
// ---------------------------------------------------------------------------

/// Stops of a white → dark red ramp, evenly spaced over `[0, 1]`.
const REDS: [(u8, u8, u8); 5] = [
    (0xff, 0xf5, 0xf0),
    (0xfc, 0xbb, 0xa1),
    (0xfb, 0x6a, 0x4a),
    (0xcb, 0x18, 0x1d),
    (0x67, 0x00, 0x0d),
];

/// Interpolate the red ramp at `t` (clamped to `[0, 1]`) in linear RGB.
pub fn reds(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let segments = (REDS.len() - 1) as f32;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(REDS.len() - 2);
    let local = pos - i as f32;

    let from = stop(REDS[i]);
    let to = stop(REDS[i + 1]);
    let mixed: LinSrgb = from.mix(to, local);
    let rgb: Srgb = mixed.into_color();
    to_color32(rgb)
}

/// Map fill for a snapshot intensity; `None` is the neutral "no data" colour.
pub fn map_fill(intensity: Option<f64>) -> Color32 {
    intensity.map(reds).unwrap_or(NO_DATA)
}

fn stop((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        assert_ne!(p[0], p[3]);
        assert_eq!(series_color(7, 6), p[1]);
    }

    #[test]
    fn ramp_endpoints_match_stops() {
        assert_eq!(reds(0.0), Color32::from_rgb(0xff, 0xf5, 0xf0));
        assert_eq!(reds(1.0), Color32::from_rgb(0x67, 0x00, 0x0d));
        assert_eq!(reds(2.0), reds(1.0));
    }

    #[test]
    fn ramp_darkens_with_intensity() {
        let light = reds(0.2);
        let dark = reds(0.9);
        assert!(dark.g() < light.g());
    }

    #[test]
    fn missing_intensity_is_neutral() {
        assert_eq!(map_fill(None), NO_DATA);
        assert_ne!(map_fill(Some(0.5)), NO_DATA);
    }
}
