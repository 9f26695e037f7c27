/// Split a 0xRRGGBB hex color into sRGB components in [0, 1]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// sRGB transfer function inverse, per channel
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Hex color converted to linear RGB, ready for shading on an sRGB surface
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_rgb(hex).map(srgb_to_linear)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb_channels() {
        assert_eq!(hex_to_rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_rgb(0x00ff00), [0.0, 1.0, 0.0]);
        assert_eq!(hex_to_rgb(0x0000ff), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = hex_to_linear(0xffffff);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_linear_darkens_midtones() {
        let mid = hex_to_linear(0x808080);
        assert!(mid[0] < 0.5 && mid[0] > 0.2);
    }
}
