use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use super::{render_vial, DrawOp, VialSnapshot};

const FILL_GLYPH: char = '█';
const MENISCUS_GLYPH: char = '▆';

/// Paints a [`VialSnapshot`] into a ratatui buffer.
pub struct VialWidget<'a> {
    snapshot: &'a VialSnapshot,
}

impl<'a> VialWidget<'a> {
    pub fn new(snapshot: &'a VialSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Widget for VialWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for op in render_vial(self.snapshot, area.width, area.height) {
            paint(&op, area, buf);
        }
    }
}

fn paint(op: &DrawOp, area: Rect, buf: &mut Buffer) {
    match op {
        DrawOp::VLine { x, y, height, glyph, color } => {
            for dy in 0..*height {
                put(buf, area, *x, y + dy, *glyph, *color);
            }
        }
        DrawOp::HLine { x, y, width, glyph, color } => {
            for dx in 0..*width {
                put(buf, area, x + dx, *y, *glyph, *color);
            }
        }
        DrawOp::Glyph { x, y, glyph, color } => put(buf, area, *x, *y, *glyph, *color),
        DrawOp::FillRect { x, y, width, height, color } => {
            for dy in 0..*height {
                for dx in 0..*width {
                    put(buf, area, x + dx, y + dy, FILL_GLYPH, *color);
                }
            }
        }
        DrawOp::Meniscus { x, y, width, color } => {
            for dx in 0..*width {
                put(buf, area, x + dx, *y, MENISCUS_GLYPH, *color);
            }
        }
        DrawOp::Label { x, y, text, color } => {
            buf.set_string(area.x + x, area.y + y, text, Style::default().fg(*color));
        }
    }
}

fn put(buf: &mut Buffer, area: Rect, x: u16, y: u16, glyph: char, color: Color) {
    if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
        cell.set_char(glyph).set_fg(color);
    }
}

/// Draw vials side by side and return the plain-text rows.
///
/// Each vial gets `width` columns plus one column of spacing. Vials that
/// would start past `u16::MAX` columns are left out.
pub fn render_row(snapshots: &[VialSnapshot], width: u16, height: u16) -> Vec<String> {
    if snapshots.is_empty() || width == 0 {
        return Vec::new();
    }
    let stride = width.saturating_add(1);
    let fits = usize::from(u16::MAX / stride).max(1);
    let shown = &snapshots[..snapshots.len().min(fits)];
    let total = u16::try_from(shown.len())
        .map(|n| stride.saturating_mul(n))
        .unwrap_or(u16::MAX);
    let mut buf = Buffer::empty(Rect::new(0, 0, total, height));
    let mut x = 0u16;
    for snapshot in shown {
        VialWidget::new(snapshot).render(Rect::new(x, 0, width, height), &mut buf);
        x = x.saturating_add(stride);
    }

    (0..height)
        .map(|y| {
            let line: String = (0..total)
                .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}
