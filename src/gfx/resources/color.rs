//! Color parsing
//!
//! Scene descriptions name colors the way a web page would: a CSS color
//! keyword (`"pink"`) or a hex string (`"#add8e6"`, `"#fff"`). Parsed colors are
//! sRGB; shaders work in linear space, so [`parse_linear`] is what materials
//! and lights use.

/// Error produced when a color string cannot be interpreted
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,

    #[error("invalid hex color '{0}'")]
    InvalidHex(String),

    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

/// CSS color keywords, sorted by name
#[rustfmt::skip]
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aqua", 0x00ffff), ("aquamarine", 0x7fffd4), ("beige", 0xf5f5dc),
    ("black", 0x000000), ("blue", 0x0000ff), ("brown", 0xa52a2a),
    ("coral", 0xff7f50), ("crimson", 0xdc143c), ("cyan", 0x00ffff),
    ("darkblue", 0x00008b), ("darkgray", 0xa9a9a9), ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9), ("darkorange", 0xff8c00), ("darkred", 0x8b0000),
    ("deeppink", 0xff1493), ("deepskyblue", 0x00bfff), ("dimgray", 0x696969),
    ("dimgrey", 0x696969), ("fuchsia", 0xff00ff), ("gold", 0xffd700),
    ("gray", 0x808080), ("green", 0x008000), ("grey", 0x808080),
    ("hotpink", 0xff69b4), ("indigo", 0x4b0082), ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c), ("lavender", 0xe6e6fa), ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080), ("lightcyan", 0xe0ffff), ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90), ("lightgrey", 0xd3d3d3), ("lightpink", 0xffb6c1),
    ("lightskyblue", 0x87cefa), ("lightyellow", 0xffffe0), ("lime", 0x00ff00),
    ("magenta", 0xff00ff), ("maroon", 0x800000), ("mintcream", 0xf5fffa),
    ("navy", 0x000080), ("olive", 0x808000), ("orange", 0xffa500),
    ("orchid", 0xda70d6), ("peachpuff", 0xffdab9), ("pink", 0xffc0cb),
    ("plum", 0xdda0dd), ("purple", 0x800080), ("red", 0xff0000),
    ("royalblue", 0x4169e1), ("salmon", 0xfa8072), ("seagreen", 0x2e8b57),
    ("silver", 0xc0c0c0), ("skyblue", 0x87ceeb), ("slategray", 0x708090),
    ("slategrey", 0x708090), ("steelblue", 0x4682b4), ("tan", 0xd2b48c),
    ("teal", 0x008080), ("thistle", 0xd8bfd8), ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0), ("violet", 0xee82ee), ("wheat", 0xf5deb3),
    ("white", 0xffffff), ("whitesmoke", 0xf5f5f5), ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

/// Parses a color keyword or hex string into sRGB components in `0.0..=1.0`
pub fn parse_srgb(input: &str) -> Result<[f32; 3], ColorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColorError::Empty);
    }

    let hex = match trimmed.strip_prefix('#') {
        Some(digits) => parse_hex(digits).ok_or_else(|| ColorError::InvalidHex(trimmed.to_string()))?,
        None => {
            let name = trimmed.to_ascii_lowercase();
            NAMED_COLORS
                .binary_search_by(|(candidate, _)| candidate.cmp(&name.as_str()))
                .map(|index| NAMED_COLORS[index].1)
                .map_err(|_| ColorError::UnknownName(trimmed.to_string()))?
        }
    };

    Ok(hex_to_rgb(hex))
}

/// Parses a color and converts it to linear RGB
pub fn parse_linear(input: &str) -> Result<[f32; 3], ColorError> {
    parse_srgb(input).map(|rgb| rgb.map(srgb_to_linear))
}

/// sRGB transfer function inverse for a single channel
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn parse_hex(digits: &str) -> Option<u32> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match digits.len() {
        6 => u32::from_str_radix(digits, 16).ok(),
        3 => {
            // #rgb expands each nibble: #fa0 == #ffaa00
            let short = u32::from_str_radix(digits, 16).ok()?;
            let r = (short >> 8) & 0xF;
            let g = (short >> 4) & 0xF;
            let b = short & 0xF;
            Some((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11)
        }
        _ => None,
    }
}

fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_named_colors_are_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_parse_named_color() {
        let [r, g, b] = parse_srgb("lightblue").unwrap();
        assert_relative_eq!(r, 173.0 / 255.0);
        assert_relative_eq!(g, 216.0 / 255.0);
        assert_relative_eq!(b, 230.0 / 255.0);

        assert_eq!(parse_srgb("  Pink ").unwrap(), parse_srgb("#ffc0cb").unwrap());
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_srgb("#ffffff").unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(parse_srgb("#fa0").unwrap(), parse_srgb("#ffaa00").unwrap());
        assert_eq!(parse_srgb("#000").unwrap(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_srgb("   "), Err(ColorError::Empty));
        assert_eq!(parse_srgb("#12345"), Err(ColorError::InvalidHex("#12345".into())));
        assert_eq!(parse_srgb("#gg0000"), Err(ColorError::InvalidHex("#gg0000".into())));
        assert_eq!(
            parse_srgb("blurple"),
            Err(ColorError::UnknownName("blurple".into()))
        );
    }

    #[test]
    fn test_linear_conversion() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert_relative_eq!(srgb_to_linear(1.0), 1.0);
        assert_relative_eq!(srgb_to_linear(0.5), 0.214_041, epsilon = 1e-5);

        let [r, g, b] = parse_linear("white").unwrap();
        assert_relative_eq!(r + g + b, 3.0);
    }
}
