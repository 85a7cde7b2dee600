//! Smooth Unicode progress bar widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ACCENT, C_MUTED, C_SEPARATOR};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Render a one-row bar: `left  ████▌     right`.
/// `fraction` is clamped to 0.0..=1.0.
pub fn draw_progress(frame: &mut Frame, area: Rect, fraction: f64, left: &str, right: &str) {
    if area.width < 4 || area.height == 0 {
        return;
    }

    let label_w = (left.chars().count() + right.chars().count() + 2) as u16;
    let bar_w = area.width.saturating_sub(label_w).max(4) as usize;
    let bar = bar_cells(fraction, bar_w);
    let filled = bar.trim_end().to_string();
    let empty = "·".repeat(bar_w.saturating_sub(filled.chars().count()));

    let spans = vec![
        Span::styled(format!("{} ", left), Style::default().fg(C_MUTED)),
        Span::styled(filled, Style::default().fg(C_ACCENT)),
        Span::styled(empty, Style::default().fg(C_SEPARATOR)),
        Span::styled(format!(" {}", right), Style::default().fg(C_MUTED)),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Fill `width` cells with eighth-block precision, padded with spaces.
pub fn bar_cells(fraction: f64, width: usize) -> String {
    let eighths = (fraction.clamp(0.0, 1.0) * width as f64 * 8.0) as usize;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width + 4);
    for _ in 0..full_blocks {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}
