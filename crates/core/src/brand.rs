//! Brand kit rules: colors, watermark placement, and asset types.

use crate::error::CoreError;

pub const POSITION_TOP_LEFT: &str = "top_left";
pub const POSITION_TOP_RIGHT: &str = "top_right";
pub const POSITION_BOTTOM_LEFT: &str = "bottom_left";
pub const POSITION_BOTTOM_RIGHT: &str = "bottom_right";

pub const VALID_WATERMARK_POSITIONS: &[&str] = &[
    POSITION_TOP_LEFT,
    POSITION_TOP_RIGHT,
    POSITION_BOTTOM_LEFT,
    POSITION_BOTTOM_RIGHT,
];

pub const DEFAULT_WATERMARK_POSITION: &str = POSITION_BOTTOM_RIGHT;
pub const DEFAULT_WATERMARK_OPACITY: f64 = 0.8;

/// Pixel inset between the watermark and the frame edge.
pub const WATERMARK_MARGIN_PX: u32 = 24;

pub const ASSET_LOGO: &str = "logo";
pub const ASSET_WATERMARK: &str = "watermark";
pub const ASSET_FONT: &str = "font";
pub const ASSET_IMAGE: &str = "image";
pub const ASSET_AUDIO: &str = "audio";

pub const VALID_ASSET_TYPES: &[&str] = &[
    ASSET_LOGO,
    ASSET_WATERMARK,
    ASSET_FONT,
    ASSET_IMAGE,
    ASSET_AUDIO,
];

/// Largest brand asset accepted by the upload endpoint.
pub const MAX_ASSET_BYTES: usize = 20 * 1024 * 1024;

pub fn validate_watermark_position(position: &str) -> Result<(), CoreError> {
    if VALID_WATERMARK_POSITIONS.contains(&position) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid watermark position '{position}'. Must be one of: {}",
            VALID_WATERMARK_POSITIONS.join(", ")
        )))
    }
}

pub fn validate_opacity(opacity: f64) -> Result<(), CoreError> {
    if (0.0..=1.0).contains(&opacity) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Watermark opacity must be between 0 and 1, got {opacity}"
        )))
    }
}

/// Accepts `#RGB` or `#RRGGBB`.
pub fn validate_hex_color(color: &str) -> Result<(), CoreError> {
    let ok = color
        .strip_prefix('#')
        .is_some_and(|hex| (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Expected #RGB or #RRGGBB"
        )))
    }
}

pub fn validate_asset_type(asset_type: &str) -> Result<(), CoreError> {
    if VALID_ASSET_TYPES.contains(&asset_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid asset type '{asset_type}'. Must be one of: {}",
            VALID_ASSET_TYPES.join(", ")
        )))
    }
}

/// ffmpeg `overlay` x:y expression for a corner position.
pub fn overlay_coordinates(position: &str) -> String {
    let m = WATERMARK_MARGIN_PX;
    match position {
        POSITION_TOP_LEFT => format!("{m}:{m}"),
        POSITION_TOP_RIGHT => format!("W-w-{m}:{m}"),
        POSITION_BOTTOM_LEFT => format!("{m}:H-h-{m}"),
        _ => format!("W-w-{m}:H-h-{m}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(validate_hex_color("#fff").is_ok());
        assert!(validate_hex_color("#FF5500").is_ok());
        assert!(validate_hex_color("FF5500").is_err());
        assert!(validate_hex_color("#GG5500").is_err());
        assert!(validate_hex_color("#FF550").is_err());
    }

    #[test]
    fn opacity_bounds() {
        assert!(validate_opacity(0.0).is_ok());
        assert!(validate_opacity(1.0).is_ok());
        assert!(validate_opacity(1.2).is_err());
        assert!(validate_opacity(-0.1).is_err());
    }

    #[test]
    fn positions_and_asset_types() {
        assert!(validate_watermark_position("top_left").is_ok());
        assert!(validate_watermark_position("center").is_err());
        assert!(validate_asset_type("logo").is_ok());
        assert!(validate_asset_type("video").is_err());
    }

    #[test]
    fn overlay_expressions() {
        assert_eq!(overlay_coordinates(POSITION_TOP_LEFT), "24:24");
        assert_eq!(overlay_coordinates(POSITION_BOTTOM_RIGHT), "W-w-24:H-h-24");
        assert_eq!(overlay_coordinates("unknown"), "W-w-24:H-h-24");
    }
}
