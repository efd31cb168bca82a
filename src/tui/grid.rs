use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::shared::PadView;

pub const PAD_COLS: usize = 4;
const PAD_HEIGHT: u16 = 5;

// colour mode walks through these; anything off the list starts at the front
pub const PAD_PALETTE: [&str; 8] = [
    "#e74c3c", "#e67e22", "#f1c40f", "#2ecc71",
    "#1abc9c", "#3498db", "#9b59b6", "#282828",
];

pub fn next_color(current: &str) -> &'static str {
    let current = current.to_ascii_lowercase();
    match PAD_PALETTE.iter().position(|c| *c == current) {
        Some(i) => PAD_PALETTE[(i + 1) % PAD_PALETTE.len()],
        None => PAD_PALETTE[0],
    }
}

// "#rrggbb" (or "#rgb") to a terminal colour
pub fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#').filter(|h| h.is_ascii())?;
    let channel = |h: &str| u8::from_str_radix(h, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

pub fn draw_pad_grid(frame: &mut Frame, area: Rect, pads: &[PadView], selected: Option<usize>, remove_mode: bool) {
    if pads.is_empty() {
        let hint = Paragraph::new("No pads. Press a to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(hint, area);
        return;
    }

    let row_count = pads.len().div_ceil(PAD_COLS);
    let rows = Layout::vertical(vec![Constraint::Length(PAD_HEIGHT); row_count]).split(area);
    let col_constraints = [Constraint::Ratio(1, PAD_COLS as u32); PAD_COLS];

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::horizontal(col_constraints).split(*row_area);
        for (col_idx, cell_area) in cols.iter().enumerate() {
            let pad_idx = row_idx * PAD_COLS + col_idx;
            let Some(pad) = pads.get(pad_idx) else {
                break;
            };
            draw_pad(frame, *cell_area, pad, selected == Some(pad_idx), remove_mode);
        }
    }
}

fn draw_pad(frame: &mut Frame, area: Rect, pad: &PadView, selected: bool, remove_mode: bool) {
    let fill = parse_hex(&pad.color).unwrap_or(Color::DarkGray);
    let accent = parse_hex(&pad.accent).unwrap_or(Color::Gray);
    let style = if pad.flashing {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().fg(Color::White).bg(fill)
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .style(style);
    if selected {
        block = block.border_type(BorderType::Thick);
    }
    if remove_mode {
        block = block.title(Line::from(" x ").alignment(Alignment::Right));
    }

    let label_style = if pad.bound {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let text = Text::from(vec![
        Line::styled(pad.label.clone(), label_style),
        Line::from(format!("vol {:>3}%", (pad.volume * 100.0).round() as u32)),
    ]);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center).block(block), area);
}
