use ratatui::style::Color;

pub const VIAL_GLASS: Color = Color::Rgb(0x9c, 0xa3, 0xaf);
pub const VIAL_LABEL: Color = Color::Rgb(0xe5, 0xe5, 0xe5);
pub const STOCK_CRITICAL: Color = Color::Rgb(0xef, 0x44, 0x44);
pub const STOCK_LOW: Color = Color::Rgb(0xf5, 0x9e, 0x0b);
pub const STOCK_ADEQUATE: Color = Color::Rgb(0xb9, 0x1c, 0x1c);
