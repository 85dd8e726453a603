use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Srgb};

// ---------------------------------------------------------------------------
// Sequential scale: year → colour (bar chart)
// ---------------------------------------------------------------------------

/// Position `t ∈ [0, 1]` on a dark-violet → yellow ramp.
pub fn sequential(t: f32) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let hue = 265.0 - t * 210.0;
    let lightness = 0.30 + t * 0.32;
    let hsl = Hsl::new(hue, 0.80, lightness);
    let rgb: Srgb = hsl.into_color();
    to_color32(rgb)
}

/// Colour of `year` within the inclusive `(first, last)` span.
pub fn year_color(year: i32, (first, last): (i32, i32)) -> Color32 {
    if last <= first {
        return sequential(0.5);
    }
    sequential((year - first) as f32 / (last - first) as f32)
}

// ---------------------------------------------------------------------------
// Diverging scale: correlation → colour (heatmap)
// ---------------------------------------------------------------------------

const COOL: (f32, f32, f32) = (0.230, 0.299, 0.754);
const NEUTRAL: (f32, f32, f32) = (0.865, 0.865, 0.865);
const WARM: (f32, f32, f32) = (0.706, 0.016, 0.150);

/// Blue (−1) through light grey (0) to red (+1). `NaN` is drawn dark grey.
pub fn diverging(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::DARK_GRAY;
    }
    let v = value.clamp(-1.0, 1.0) as f32;
    let (from, to, t) = if v < 0.0 {
        (COOL, NEUTRAL, v + 1.0)
    } else {
        (NEUTRAL, WARM, v)
    };
    let a: LinSrgb = Srgb::new(from.0, from.1, from.2).into_linear();
    let b: LinSrgb = Srgb::new(to.0, to.1, to.2).into_linear();
    let mixed = LinSrgb::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
    );
    to_color32(Srgb::from_linear(mixed))
}

/// Black or white, whichever reads better on `background`.
pub fn text_on(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}
