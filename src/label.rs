use crate::command::DrawCommand;
use crate::config::RenderConfig;
use crate::geometry::{Point, center};
use crate::ir::Bounds;
use crate::theme::Rgb;

/// Number of rows a title wants inside a box of the given width.
pub fn line_count(char_count: usize, width: f32, config: &RenderConfig) -> usize {
    let wanted = (config.font_scale * config.scale * char_count as f32 / width).ceil();
    if wanted.is_finite() && wanted > 0.0 {
        wanted as usize
    } else {
        0
    }
}

/// Positions a node title as one to three text rows around the box center.
/// Titles that would need more than three rows are packed into three.
pub fn layout_text(title: &str, bounds: &Bounds, config: &RenderConfig, color: Rgb) -> Vec<DrawCommand> {
    let scale = config.scale;
    let font_scale = config.font_scale;
    let len = title.chars().count();
    let mid = center(bounds);
    let step = font_scale * scale;

    let text = |row: &str, anchor: Point| DrawCommand::Text {
        text: row.to_string(),
        anchor,
        font_scale,
        color,
        thickness: scale,
    };

    match line_count(len, bounds.width, config) {
        0 | 1 => {
            let x = (mid.x - scale / 2.0 * len as f32 - step) * scale;
            vec![text(title, Point::new(x, mid.y * scale))]
        }
        2 => {
            let half = len / 2;
            let x = (mid.x - 2.2 * half as f32 - step) * scale;
            let split = byte_offset(title, half);
            let rows = [(&title[..split], -4.0), (&title[split..], 4.0)];
            rows.into_iter()
                .filter(|(row, _)| !row.is_empty())
                .map(|(row, offset)| text(row, Point::new(x, mid.y * scale + offset * step)))
                .collect()
        }
        _ => {
            let third = len / 3;
            let x = (mid.x - 4.0 * third as f32 - step) * scale;
            let first = byte_offset(title, third);
            let second = byte_offset(title, third * 2);
            let rows = [
                (&title[..first], -5.0),
                (&title[first..second], 0.0),
                (&title[second..], 5.0),
            ];
            rows.into_iter()
                .filter(|(row, _)| !row.is_empty())
                .map(|(row, offset)| text(row, Point::new(x, mid.y * scale + offset * step)))
                .collect()
        }
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
