//! Fixed board-color and surface-finish catalogs.
//!
//! Keys and colors of existing entries never change; new entries are
//! appended. The first entry of each catalog is the fallback for unknown keys.

use crate::Color;

/// Color of exposed base material.
pub const SUBSTRATE_COLOR: Color = Color::from_u32(0xa7a763);

/// Silkscreen ink on every board except the white one.
pub const SILKSCREEN_NORMAL: Color = Color::WHITE;

/// Silkscreen ink on the white board.
pub const SILKSCREEN_ON_WHITE: Color = Color::BLACK;

/// The board key whose silkscreen is printed black.
pub const WHITE_BOARD_KEY: &str = "white";

/// A solder-mask color with its two shades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardColorDef {
    pub name: &'static str,
    /// Localized picker label.
    pub label: &'static str,
    pub key: &'static str,
    /// Mask over copper.
    pub light: Color,
    /// Mask over base material.
    pub deep: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceFinishDef {
    pub name: &'static str,
    pub label: &'static str,
    pub key: &'static str,
    pub color: Color,
}

pub static BOARD_COLORS: [BoardColorDef; 8] = [
    BoardColorDef {
        name: "Green",
        label: "绿",
        key: "green",
        light: Color::from_u32(0x266f36),
        deep: Color::from_u32(0x16612e),
    },
    BoardColorDef {
        name: "Blue",
        label: "蓝",
        key: "blue",
        light: Color::from_u32(0x0059af),
        deep: Color::from_u32(0x002763),
    },
    BoardColorDef {
        name: "Red",
        label: "红",
        key: "red",
        light: Color::from_u32(0xd10305),
        deep: Color::from_u32(0x8f0300),
    },
    BoardColorDef {
        name: "White",
        label: "白",
        key: WHITE_BOARD_KEY,
        light: Color::from_u32(0xe2e2e2),
        deep: Color::from_u32(0xf6f6f6),
    },
    BoardColorDef {
        name: "Yellow",
        label: "黄",
        key: "yellow",
        light: Color::from_u32(0xe59500),
        deep: Color::from_u32(0xb19a0c),
    },
    BoardColorDef {
        name: "Black",
        label: "黑",
        key: "black",
        light: Color::from_u32(0x000000),
        deep: Color::from_u32(0x101010),
    },
    BoardColorDef {
        name: "Purple",
        label: "紫",
        key: "purple",
        light: Color::from_u32(0x760853),
        deep: Color::from_u32(0x18001d),
    },
    BoardColorDef {
        name: "Copper",
        label: "铜",
        key: "copper",
        light: Color::from_u32(0xef9e53),
        deep: Color::from_u32(0x655c45),
    },
];

pub static SURFACE_FINISHES: [SurfaceFinishDef; 2] = [
    SurfaceFinishDef {
        name: "Gold (ENIG)",
        label: "沉金",
        key: "gold",
        color: Color::from_u32(0xbf9a39),
    },
    SurfaceFinishDef {
        name: "Silver (HASL)",
        label: "喷锡",
        key: "silver",
        color: Color::from_u32(0x818181),
    },
];

/// Look up a board color, falling back to the first entry.
pub fn board_color(key: &str) -> &'static BoardColorDef {
    BOARD_COLORS
        .iter()
        .find(|b| b.key == key)
        .unwrap_or(&BOARD_COLORS[0])
}

/// Look up a surface finish, falling back to the first entry.
pub fn surface_finish(key: &str) -> &'static SurfaceFinishDef {
    SURFACE_FINISHES
        .iter()
        .find(|f| f.key == key)
        .unwrap_or(&SURFACE_FINISHES[0])
}
