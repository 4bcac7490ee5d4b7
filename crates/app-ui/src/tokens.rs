//! Design tokens for Carfinder
//!
//! Colors, spacing, radii, typography scales and animation timings shared
//! by every screen. Values are platform-independent: colors are CSS color
//! strings and sizes are density-independent pixels.

use app_state::TimerVariant;
use serde::{Deserialize, Serialize};

// =============================================================================
// Color Tokens
// =============================================================================

/// A ten-step color ramp, light (50) to dark (900)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    /// Lightest shade
    pub shade_50: &'static str,
    /// Shade 100
    pub shade_100: &'static str,
    /// Shade 200
    pub shade_200: &'static str,
    /// Shade 300
    pub shade_300: &'static str,
    /// Shade 400
    pub shade_400: &'static str,
    /// Base shade
    pub shade_500: &'static str,
    /// Shade 600
    pub shade_600: &'static str,
    /// Shade 700
    pub shade_700: &'static str,
    /// Shade 800
    pub shade_800: &'static str,
    /// Darkest shade
    pub shade_900: &'static str,
}

impl Palette {
    /// Get a shade by its level (50, 100, ..., 900)
    pub fn shade(&self, level: u16) -> Option<&'static str> {
        match level {
            50 => Some(self.shade_50),
            100 => Some(self.shade_100),
            200 => Some(self.shade_200),
            300 => Some(self.shade_300),
            400 => Some(self.shade_400),
            500 => Some(self.shade_500),
            600 => Some(self.shade_600),
            700 => Some(self.shade_700),
            800 => Some(self.shade_800),
            900 => Some(self.shade_900),
            _ => None,
        }
    }
}

/// Color palettes
pub mod colors {
    use super::Palette;

    /// Brand blue, used for primary actions and the compass ring
    pub const PRIMARY: Palette = Palette {
        shade_50: "#E3F2FD",
        shade_100: "#BBDEFB",
        shade_200: "#90CAF9",
        shade_300: "#64B5F6",
        shade_400: "#42A5F5",
        shade_500: "#2196F3",
        shade_600: "#1E88E5",
        shade_700: "#1976D2",
        shade_800: "#1565C0",
        shade_900: "#0D47A1",
    };

    /// Secondary purple
    pub const SECONDARY: Palette = Palette {
        shade_50: "#F3E5F5",
        shade_100: "#E1BEE7",
        shade_200: "#CE93D8",
        shade_300: "#BA68C8",
        shade_400: "#AB47BC",
        shade_500: "#9C27B0",
        shade_600: "#8E24AA",
        shade_700: "#7B1FA2",
        shade_800: "#6A1B9A",
        shade_900: "#4A148C",
    };

    /// Success green
    pub const SUCCESS: Palette = Palette {
        shade_50: "#E8F5E8",
        shade_100: "#C8E6C9",
        shade_200: "#A5D6A7",
        shade_300: "#81C784",
        shade_400: "#66BB6A",
        shade_500: "#4CAF50",
        shade_600: "#43A047",
        shade_700: "#388E3C",
        shade_800: "#2E7D32",
        shade_900: "#1B5E20",
    };

    /// Error red, also the compass arrow
    pub const ERROR: Palette = Palette {
        shade_50: "#FFEBEE",
        shade_100: "#FFCDD2",
        shade_200: "#EF9A9A",
        shade_300: "#E57373",
        shade_400: "#EF5350",
        shade_500: "#F44336",
        shade_600: "#E53935",
        shade_700: "#D32F2F",
        shade_800: "#C62828",
        shade_900: "#B71C1C",
    };

    /// Warning amber
    pub const WARNING: Palette = Palette {
        shade_50: "#FFF8E1",
        shade_100: "#FFECB3",
        shade_200: "#FFE082",
        shade_300: "#FFD54F",
        shade_400: "#FFCA28",
        shade_500: "#FFC107",
        shade_600: "#FFB300",
        shade_700: "#FFA000",
        shade_800: "#FF8F00",
        shade_900: "#FF6F00",
    };

    /// Neutral grays
    pub const NEUTRAL: Palette = Palette {
        shade_50: "#FAFAFA",
        shade_100: "#F5F5F5",
        shade_200: "#EEEEEE",
        shade_300: "#E0E0E0",
        shade_400: "#BDBDBD",
        shade_500: "#9E9E9E",
        shade_600: "#757575",
        shade_700: "#616161",
        shade_800: "#424242",
        shade_900: "#212121",
    };

    /// Get a palette by name
    pub fn get(name: &str) -> Option<Palette> {
        match name {
            "primary" => Some(PRIMARY),
            "secondary" => Some(SECONDARY),
            "success" => Some(SUCCESS),
            "error" => Some(ERROR),
            "warning" => Some(WARNING),
            "neutral" => Some(NEUTRAL),
            _ => None,
        }
    }

    /// Background colors (the app is dark-only)
    pub mod background {
        /// Screen background
        pub const PRIMARY: &str = "#000000";
        /// Cards and the compass face
        pub const SECONDARY: &str = "#1a1a1a";
        /// Raised surfaces
        pub const TERTIARY: &str = "#2d2d2d";
        /// Modal scrim
        pub const OVERLAY: &str = "rgba(0, 0, 0, 0.7)";
    }

    /// Text colors
    pub mod text {
        /// Body text
        pub const PRIMARY: &str = "#FFFFFF";
        /// Subtitles
        pub const SECONDARY: &str = "rgba(255, 255, 255, 0.9)";
        /// Captions
        pub const TERTIARY: &str = "rgba(255, 255, 255, 0.7)";
        /// Disabled controls
        pub const DISABLED: &str = "rgba(255, 255, 255, 0.5)";
    }
}

/// Colors for one timer severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerColors {
    /// Card fill
    pub background: &'static str,
    /// Card outline
    pub border: &'static str,
    /// Digits
    pub text: &'static str,
}

/// Colors of the parking timer card for a severity
pub fn timer_colors(variant: TimerVariant) -> TimerColors {
    match variant {
        TimerVariant::Inactive => TimerColors {
            background: "rgba(30, 136, 229, 0.15)",
            border: "rgba(30, 136, 229, 0.3)",
            text: "#1E88E5",
        },
        TimerVariant::Normal => TimerColors {
            background: "rgba(16, 185, 129, 0.15)",
            border: "rgba(16, 185, 129, 0.3)",
            text: "#10B981",
        },
        TimerVariant::Warning => TimerColors {
            background: "rgba(245, 158, 11, 0.15)",
            border: "rgba(245, 158, 11, 0.3)",
            text: "#F59E0B",
        },
        TimerVariant::Danger => TimerColors {
            background: "rgba(239, 68, 68, 0.15)",
            border: "rgba(239, 68, 68, 0.3)",
            text: "#EF4444",
        },
    }
}

// =============================================================================
// Spacing Tokens
// =============================================================================

/// Spacing scale in pixels
pub mod spacing {
    /// 4px - Extra small
    pub const XS: f32 = 4.0;
    /// 8px - Small
    pub const SM: f32 = 8.0;
    /// 16px - Medium
    pub const MD: f32 = 16.0;
    /// 24px - Large
    pub const LG: f32 = 24.0;
    /// 32px - Extra large
    pub const XL: f32 = 32.0;
    /// 48px - 2x large
    pub const XXL: f32 = 48.0;
    /// 64px - 3x large
    pub const XXXL: f32 = 64.0;

    /// Get spacing value by name
    pub fn get(name: &str) -> Option<f32> {
        match name {
            "xs" => Some(XS),
            "sm" => Some(SM),
            "md" => Some(MD),
            "lg" => Some(LG),
            "xl" => Some(XL),
            "xxl" => Some(XXL),
            "xxxl" => Some(XXXL),
            _ => None,
        }
    }
}

// =============================================================================
// Border Radius Tokens
// =============================================================================

/// Corner radii in pixels
pub mod radius {
    /// 4px
    pub const XS: f32 = 4.0;
    /// 8px
    pub const SM: f32 = 8.0;
    /// 12px
    pub const MD: f32 = 12.0;
    /// 16px
    pub const LG: f32 = 16.0;
    /// 20px
    pub const XL: f32 = 20.0;
    /// 25px, buttons
    pub const XXL: f32 = 25.0;
    /// 35px, status cards
    pub const XXXL: f32 = 35.0;
    /// Pill shape
    pub const FULL: f32 = 999.0;

    /// Get radius value by name
    pub fn get(name: &str) -> Option<f32> {
        match name {
            "xs" => Some(XS),
            "sm" => Some(SM),
            "md" => Some(MD),
            "lg" => Some(LG),
            "xl" => Some(XL),
            "xxl" => Some(XXL),
            "xxxl" => Some(XXXL),
            "full" => Some(FULL),
            _ => None,
        }
    }
}

// =============================================================================
// Typography Tokens
// =============================================================================

/// Font sizes in pixels
pub mod font_size {
    /// 12px
    pub const XS: f32 = 12.0;
    /// 14px
    pub const SM: f32 = 14.0;
    /// 16px
    pub const BASE: f32 = 16.0;
    /// 18px
    pub const LG: f32 = 18.0;
    /// 20px
    pub const XL: f32 = 20.0;
    /// 24px
    pub const XL2: f32 = 24.0;
    /// 28px
    pub const XL3: f32 = 28.0;
    /// 32px
    pub const XL4: f32 = 32.0;
    /// 36px
    pub const XL5: f32 = 36.0;
    /// 48px, timer digits
    pub const XL6: f32 = 48.0;

    /// Get font size by name
    pub fn get(name: &str) -> Option<f32> {
        match name {
            "xs" => Some(XS),
            "sm" => Some(SM),
            "base" => Some(BASE),
            "lg" => Some(LG),
            "xl" => Some(XL),
            "2xl" => Some(XL2),
            "3xl" => Some(XL3),
            "4xl" => Some(XL4),
            "5xl" => Some(XL5),
            "6xl" => Some(XL6),
            _ => None,
        }
    }
}

/// Font weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// 400
    Normal,
    /// 500
    Medium,
    /// 600
    Semibold,
    /// 700
    Bold,
    /// 800
    Extrabold,
}

impl FontWeight {
    /// Numeric CSS weight
    pub fn value(&self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Medium => 500,
            FontWeight::Semibold => 600,
            FontWeight::Bold => 700,
            FontWeight::Extrabold => 800,
        }
    }
}

/// Line height multipliers
pub mod line_height {
    /// Headings
    pub const TIGHT: f32 = 1.2;
    /// Body text
    pub const NORMAL: f32 = 1.5;
    /// Long-form text
    pub const RELAXED: f32 = 1.75;
}

// =============================================================================
// Animation Tokens
// =============================================================================

/// Animation durations in milliseconds
pub mod duration {
    /// Button feedback
    pub const FAST: u32 = 200;
    /// Most transitions
    pub const NORMAL: u32 = 300;
    /// Screen entrances
    pub const SLOW: u32 = 500;
    /// One half of the status pulse
    pub const PULSE: u32 = 1500;
}
