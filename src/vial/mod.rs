//! Blood vial drawing.
//!
//! [`render_vial`] turns a snapshot into a list of draw operations and
//! nothing else; [`VialWidget`] paints those operations into a ratatui
//! buffer. Layout for a 5x6 area (label row at the bottom):
//!
//! ```text
//! │   │
//! │   │
//! │▆▆▆│   <- meniscus
//! │███│
//! ╰───╯
//!  OK
//! ```

mod theme;
mod widget;

use ratatui::style::Color;

use crate::inventory::StockStatus;

pub use widget::{render_row, VialWidget};

/// Smallest area a vial can be drawn in.
pub const MIN_WIDTH: u16 = 3;
pub const MIN_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VialPalette {
    pub glass: Color,
    pub label: Color,
    pub critical: Color,
    pub low: Color,
    pub adequate: Color,
}

impl VialPalette {
    pub fn fill_for(&self, status: StockStatus) -> Color {
        match status {
            StockStatus::Critical => self.critical,
            StockStatus::Low => self.low,
            StockStatus::Adequate => self.adequate,
        }
    }
}

impl Default for VialPalette {
    fn default() -> Self {
        Self {
            glass: theme::VIAL_GLASS,
            label: theme::VIAL_LABEL,
            critical: theme::STOCK_CRITICAL,
            low: theme::STOCK_LOW,
            adequate: theme::STOCK_ADEQUATE,
        }
    }
}

/// Everything needed to draw one vial.
#[derive(Debug, Clone, PartialEq)]
pub struct VialSnapshot {
    fill_level: f64,
    pub status: StockStatus,
    pub caption: Option<String>,
    pub palette: VialPalette,
}

impl VialSnapshot {
    /// `fill_level` is clamped to `0.0..=1.0`; NaN counts as empty.
    pub fn new(fill_level: f64, status: StockStatus) -> Self {
        let fill_level = if fill_level.is_nan() {
            0.0
        } else {
            fill_level.clamp(0.0, 1.0)
        };
        Self {
            fill_level,
            status,
            caption: None,
            palette: VialPalette::default(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_palette(mut self, palette: VialPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn fill_level(&self) -> f64 {
        self.fill_level
    }
}

/// One drawing primitive, in coordinates relative to the vial's area.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    VLine { x: u16, y: u16, height: u16, glyph: char, color: Color },
    HLine { x: u16, y: u16, width: u16, glyph: char, color: Color },
    Glyph { x: u16, y: u16, glyph: char, color: Color },
    FillRect { x: u16, y: u16, width: u16, height: u16, color: Color },
    Meniscus { x: u16, y: u16, width: u16, color: Color },
    Label { x: u16, y: u16, text: String, color: Color },
}

/// Inner (liquid) height of a vial drawn `height` rows tall.
pub fn inner_height(height: u16) -> u16 {
    height.saturating_sub(2)
}

/// Rows of liquid for `fill_level` in a tube with `inner` rows.
pub fn fill_rows(fill_level: f64, inner: u16) -> u16 {
    let rows = (fill_level * f64::from(inner)).round();
    (rows.max(0.0) as u16).min(inner)
}

/// Compute the draw operations for `snapshot` in a `width` x `height` area.
///
/// Areas smaller than [`MIN_WIDTH`] x [`MIN_HEIGHT`] draw nothing.
pub fn render_vial(snapshot: &VialSnapshot, width: u16, height: u16) -> Vec<DrawOp> {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Vec::new();
    }

    let palette = &snapshot.palette;
    let base_y = height - 2;
    let label_y = height - 1;
    let inner_w = width - 2;
    let inner_h = inner_height(height);

    let mut ops = vec![
        DrawOp::VLine { x: 0, y: 0, height: base_y, glyph: '│', color: palette.glass },
        DrawOp::VLine { x: width - 1, y: 0, height: base_y, glyph: '│', color: palette.glass },
        DrawOp::Glyph { x: 0, y: base_y, glyph: '╰', color: palette.glass },
        DrawOp::HLine { x: 1, y: base_y, width: inner_w, glyph: '─', color: palette.glass },
        DrawOp::Glyph { x: width - 1, y: base_y, glyph: '╯', color: palette.glass },
    ];

    let rows = fill_rows(snapshot.fill_level, inner_h);
    if rows > 0 {
        let fill = palette.fill_for(snapshot.status);
        let top = base_y - rows;
        ops.push(DrawOp::FillRect { x: 1, y: top, width: inner_w, height: rows, color: fill });
        ops.push(DrawOp::Meniscus { x: 1, y: top, width: inner_w, color: fill });
    }

    let text = snapshot
        .caption
        .clone()
        .unwrap_or_else(|| snapshot.status.label().to_string());
    let text: String = text.chars().take(usize::from(width)).collect();
    let len = text.chars().count() as u16;
    ops.push(DrawOp::Label {
        x: (width - len) / 2,
        y: label_y,
        text,
        color: palette.label,
    });

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_rect(ops: &[DrawOp]) -> Option<(u16, u16)> {
        ops.iter().find_map(|op| match op {
            DrawOp::FillRect { y, height, .. } => Some((*y, *height)),
            _ => None,
        })
    }

    #[test]
    fn fill_height_rounds_against_inner_height() {
        // 12 rows tall -> 10 inner rows
        let ops = render_vial(&VialSnapshot::new(0.34, StockStatus::Low), 5, 12);
        assert_eq!(fill_rect(&ops), Some((7, 3)));

        let ops = render_vial(&VialSnapshot::new(0.36, StockStatus::Low), 5, 12);
        assert_eq!(fill_rect(&ops), Some((6, 4)));
    }

    #[test]
    fn empty_vial_has_outline_and_label_only() {
        let ops = render_vial(&VialSnapshot::new(0.0, StockStatus::Critical), 5, 8);
        assert!(fill_rect(&ops).is_none());
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Meniscus { .. })));
        assert!(matches!(ops.last(), Some(DrawOp::Label { text, .. }) if text == "CRITI"));
    }

    #[test]
    fn fill_level_is_clamped() {
        let over = VialSnapshot::new(4.2, StockStatus::Adequate);
        assert_eq!(over.fill_level(), 1.0);
        let ops = render_vial(&over, 4, 7);
        assert_eq!(fill_rect(&ops), Some((0, 5)));

        assert_eq!(VialSnapshot::new(-1.0, StockStatus::Low).fill_level(), 0.0);
        assert_eq!(VialSnapshot::new(f64::NAN, StockStatus::Low).fill_level(), 0.0);
    }

    #[test]
    fn fill_uses_status_color() {
        let palette = VialPalette::default();
        let ops = render_vial(&VialSnapshot::new(0.5, StockStatus::Critical), 6, 10);
        let color = ops.iter().find_map(|op| match op {
            DrawOp::FillRect { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(color, Some(palette.critical));
    }

    #[test]
    fn too_small_area_draws_nothing() {
        let snap = VialSnapshot::new(0.5, StockStatus::Low);
        assert!(render_vial(&snap, 2, 10).is_empty());
        assert!(render_vial(&snap, 10, 2).is_empty());
    }

    #[test]
    fn rendering_is_deterministic() {
        let snap = VialSnapshot::new(0.61, StockStatus::Adequate).with_caption("O- 31u");
        assert_eq!(render_vial(&snap, 7, 9), render_vial(&snap, 7, 9));
    }
}
