/// Sequential blue scheme, four steps (fine low-density buckets).
pub const BLUES_4: [&str; 4] = ["#eff3ff", "#bdd7e7", "#6baed6", "#2171b5"];

/// Sequential blue scheme, six steps (coarse high-density buckets).
pub const BLUES_6: [&str; 6] = [
    "#eff3ff", "#c6dbef", "#9ecae1", "#6baed6", "#3182bd", "#08519c",
];

/// Qualitative scheme for categorical slices.
pub const SET2: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

/// Parse `#rrggbb` into RGB bytes.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Format RGBA as a CSS color string.
pub fn rgba_css(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("rgba({r},{g},{b},{a})")
}

/// Colour for the `index`-th category, cycling through `palette`.
pub fn ordinal<'a>(palette: &[&'a str], index: usize) -> &'a str {
    if palette.is_empty() {
        return "#000000";
    }
    palette[index % palette.len()]
}
