use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

use crate::pipeline::layout::{ContentBlock, FlexWeight, Theme};
use crate::shared::{DisplayState, EditMode, TrackView, ZoneView};

use super::grid::draw_pad_grid;
use super::input::DIVIDER_STEP_PX;
use super::mode::{PromptPurpose, TuiState};

const TRACK_HEIGHT: u16 = 3;

struct Palette {
    accent: Color,
    text: Color,
    dim: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Default => Palette { accent: Color::Cyan, text: Color::White, dim: Color::DarkGray },
        Theme::Alt1 => Palette { accent: Color::LightMagenta, text: Color::Gray, dim: Color::DarkGray },
        Theme::Alt2 => Palette { accent: Color::LightGreen, text: Color::White, dim: Color::Gray },
    }
}

// a fixed basis becomes columns, anything else shares what's left by its grow factor
pub fn zone_constraint(weight: &str) -> Constraint {
    let weight = FlexWeight(weight.to_string());
    match weight.basis_px() {
        Some(px) => Constraint::Length(u16::try_from(px / DIVIDER_STEP_PX).unwrap_or(u16::MAX).max(1)),
        None => Constraint::Fill((weight.grow().round() as u16).max(1)),
    }
}

pub fn render(frame: &mut Frame, area: Rect, ds: &DisplayState, ts: &TuiState) {
    let pal = palette(ds.theme);
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_header(frame, header, ds, &pal);

    let [left, right] =
        Layout::horizontal([zone_constraint(&ds.left.weight), zone_constraint(&ds.right.weight)]).areas(body);
    draw_zone(frame, left, &ds.left, ds, ts, &pal);
    draw_zone(frame, right, &ds.right, ds, ts, &pal);

    draw_footer(frame, footer, ds, ts, &pal);
}

fn draw_header(frame: &mut Frame, area: Rect, ds: &DisplayState, pal: &Palette) {
    let mode = match ds.edit_mode {
        EditMode::Normal => Span::styled("play", Style::default().fg(pal.dim)),
        EditMode::Remove => Span::styled("REMOVE", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        EditMode::Color => Span::styled("COLOUR", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    };
    let line = Line::from(vec![
        Span::styled(" padboard ", Style::default().fg(pal.accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!("[{}] ", ds.theme.name()), Style::default().fg(pal.dim)),
        mode,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_zone(frame: &mut Frame, area: Rect, zone: &ZoneView, ds: &DisplayState, ts: &TuiState, pal: &Palette) {
    let focused = ts.focus == zone.block;
    let border = if ts.resizing {
        Style::default().fg(Color::Yellow)
    } else if focused {
        Style::default().fg(pal.accent)
    } else {
        Style::default().fg(pal.dim)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", zone.block.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match zone.block {
        ContentBlock::PadBank => {
            let selected = focused.then_some(ts.selected_pad);
            draw_pad_grid(frame, inner, &ds.pads, selected, ds.edit_mode == EditMode::Remove);
        }
        ContentBlock::TrackList => {
            let selected = focused.then_some(ts.selected_track);
            draw_tracks(frame, inner, &ds.tracks, selected, pal);
        }
    }
}

fn draw_tracks(frame: &mut Frame, area: Rect, tracks: &[TrackView], selected: Option<usize>, pal: &Palette) {
    if tracks.is_empty() {
        let hint = Paragraph::new("No tracks. Press o to open a file.").style(Style::default().fg(pal.dim));
        frame.render_widget(hint, area);
        return;
    }

    let rows = Layout::vertical(vec![Constraint::Length(TRACK_HEIGHT); tracks.len()]).split(area);
    for (i, (track, row)) in tracks.iter().zip(rows.iter()).enumerate() {
        let [title, gauge] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(*row);

        let marker = if selected == Some(i) { "> " } else { "  " };
        let state = if track.playing { "playing" } else { "paused" };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(pal.accent)),
            Span::styled(track.name.clone(), Style::default().fg(pal.text).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {state}"), Style::default().fg(pal.dim)),
            Span::styled(format!("  vol {:.0}%", track.volume * 100.0), Style::default().fg(pal.dim)),
        ];
        if track.looping {
            spans.push(Span::styled("  loop", Style::default().fg(pal.accent)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), title);

        let percent = track.progress.clamp(0.0, 100.0);
        let bar = Gauge::default()
            .gauge_style(Style::default().fg(pal.accent).bg(Color::Black))
            .ratio(percent / 100.0)
            .label(format!("{percent:.0}%"));
        frame.render_widget(bar, gauge);
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, ds: &DisplayState, ts: &TuiState, pal: &Palette) {
    let line = if let Some(prompt) = &ts.prompt {
        let ask = match prompt.purpose {
            PromptPurpose::AddTrack => "track file: ",
            PromptPurpose::DropOnPad(_) => "sound file: ",
        };
        Line::from(vec![
            Span::styled(ask, Style::default().fg(pal.accent)),
            Span::styled(format!("{}_", prompt.text), Style::default().fg(pal.text)),
        ])
    } else if ts.resizing {
        Line::from(Span::styled(
            format!(" resizing: {}px  (arrows, Enter to finish)", ds.divider_px),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        let hints = match ts.focus {
            ContentBlock::PadBank => "Enter hit  a add  1-3 library  f file  m remove  c colour  +/- vol",
            ContentBlock::TrackList => "Space play  0 restart  l loop  o open  x remove  +/- vol",
        };
        Line::from(vec![
            Span::styled(format!(" {} ", ds.status), Style::default().fg(pal.text)),
            Span::styled(format!("| {hints}  Tab s r L q"), Style::default().fg(pal.dim)),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}
