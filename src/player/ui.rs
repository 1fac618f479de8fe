use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};

use super::app::{App, Deck, HitAreas};
use super::preview::Preview;
use crate::gallery::Photo;
use crate::kit::pages::{self, Page, Section};
use crate::playback::waveform::{amplitude_to_blocks, display_bars};
use crate::playback::{AudioBackend, Playback, format_time};

const PLAYED_COLOR: Color = Color::Cyan;
const UNPLAYED_COLOR: Color = Color::DarkGray;

pub fn draw<B: AudioBackend>(f: &mut Frame, app: &App<B>) {
    let size = f.area();
    app.hit_areas.set(HitAreas {
        frame: size,
        waveform: None,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Page tabs
            Constraint::Min(5),    // Page body
            Constraint::Length(1), // Status / hints
        ])
        .split(size);

    draw_tabs(f, chunks[0], app);

    match &app.kit {
        Some(kit) => {
            let sections = pages::compose(app.page, kit);
            draw_sections(f, chunks[1], app, &sections);
        }
        None => draw_player(f, chunks[1], app),
    }

    draw_status(f, chunks[2], app);

    if app.gallery.is_open() {
        draw_lightbox(f, size, app);
    }
    if app.help_visible() {
        draw_help(f, size);
    }
}

/// Area of the lightbox overlay within `area`; clicks outside close it.
pub fn lightbox_rect(area: Rect) -> Rect {
    centered_rect(area, 80, 80)
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = (area.width as u32 * percent_x as u32 / 100) as u16;
    let height = (area.height as u32 * percent_y as u32 / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_tabs<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let Some(kit) = &app.kit else {
        let title = Paragraph::new("EPK Player")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        f.render_widget(title, area);
        return;
    };

    let mut spans = vec![
        Span::styled(
            kit.name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
    ];
    for page in [Page::Home, Page::PressKit] {
        let style = if page == app.page {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", page.title()), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn section_height<B: AudioBackend>(section: &Section, app: &App<B>, width: u16) -> Constraint {
    let wrapped = |text: &str| (text.chars().count() as u16 / width.max(1)) + 1;
    match section {
        Section::Heading { .. } => Constraint::Length(3),
        Section::Text(text) => Constraint::Length(wrapped(text) + 1),
        Section::Bio(paragraphs) => Constraint::Length(
            paragraphs.iter().map(|p| wrapped(p) + 1).sum::<u16>() + 2,
        ),
        Section::Members(members) => Constraint::Length(members.len() as u16 + 2),
        Section::FeaturedPhoto(_) => Constraint::Min(8),
        Section::Player => Constraint::Length(player_height(app)),
        Section::Gallery => Constraint::Min(app.gallery.photos().len().min(8) as u16 + 2),
        Section::Links(links) => Constraint::Length(links.len() as u16 + 2),
    }
}

fn player_height<B: AudioBackend>(app: &App<B>) -> u16 {
    // Waveform, transport line, volume gauge and borders
    let base = 3 + 1 + 1 + 2;
    let tracks = app.deck.tracks().len() as u16;
    if tracks > 0 { base + tracks + 1 } else { base }
}

fn draw_sections<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>, sections: &[Section]) {
    let constraints: Vec<Constraint> = sections
        .iter()
        .map(|s| section_height(s, app, area.width.saturating_sub(4)))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(1)
        .constraints(constraints)
        .split(area);

    for (section, chunk) in sections.iter().zip(chunks.iter()) {
        draw_section(f, *chunk, app, section);
    }
}

fn draw_section<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>, section: &Section) {
    match section {
        Section::Heading { title, subtitle } => {
            let lines = vec![
                Line::from(Span::styled(
                    title.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    subtitle.clone(),
                    Style::default().fg(Color::Magenta),
                )),
            ];
            f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
        }
        Section::Text(text) => {
            let paragraph = Paragraph::new(text.clone())
                .style(Style::default().add_modifier(Modifier::ITALIC))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, area);
        }
        Section::Bio(paragraphs) => {
            let mut lines = Vec::new();
            for paragraph in paragraphs {
                lines.push(Line::from(paragraph.clone()));
                lines.push(Line::from(""));
            }
            lines.pop();
            let bio = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Bio "));
            f.render_widget(bio, area);
        }
        Section::Members(members) => {
            let lines: Vec<Line> = members
                .iter()
                .map(|m| {
                    Line::from(vec![
                        Span::styled(m.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw("  "),
                        Span::styled(m.role.clone(), Style::default().fg(Color::Gray)),
                    ])
                })
                .collect();
            let block = Block::default().borders(Borders::ALL).title(" Members ");
            f.render_widget(Paragraph::new(lines).block(block), area);
        }
        Section::FeaturedPhoto(index) => {
            if let Some(photo) = app.gallery.photos().get(*index) {
                let block = Block::default().borders(Borders::ALL);
                let inner = block.inner(area);
                f.render_widget(block, area);
                draw_photo(f, inner, app, photo, &photo.thumbnail);
            }
        }
        Section::Player => draw_player(f, area, app),
        Section::Gallery => draw_gallery(f, area, app),
        Section::Links(links) => {
            let lines: Vec<Line> = links
                .iter()
                .map(|l| {
                    Line::from(vec![
                        Span::styled("→ ", Style::default().fg(Color::Magenta)),
                        Span::styled(
                            l.label.clone(),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::UNDERLINED),
                        ),
                        Span::styled(format!("  {}", l.href), Style::default().fg(Color::DarkGray)),
                    ])
                })
                .collect();
            let block = Block::default().borders(Borders::ALL).title(" Links ");
            f.render_widget(Paragraph::new(lines).block(block), area);
        }
    }
}

fn draw_photo<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>, photo: &Photo, url: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let path = app.asset_path(url);
    let preview = path.as_deref().and_then(|path| app.previews.get(path));
    match preview {
        Some(Preview::Image(_)) => {
            let lines = path
                .as_deref()
                .and_then(|path| app.previews.lines(path, chunks[0].width, chunks[0].height))
                .unwrap_or_default();
            f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[0]);
        }
        Some(Preview::Broken) => {
            let text = format!("[broken image] {}", photo.alt_text());
            let placeholder = Paragraph::new(text)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center);
            f.render_widget(placeholder, chunks[0]);
        }
        Some(Preview::Loading) | None => {
            let loading = Paragraph::new("Loading…")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(loading, chunks[0]);
        }
    }

    let caption = Paragraph::new(photo.caption())
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(caption, chunks[1]);
}

fn draw_player<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let binding = app.deck.binding();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.deck.title()))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let tracks = app.deck.tracks();
    let mut constraints = vec![
        Constraint::Length(3), // Waveform
        Constraint::Length(1), // Transport + time
        Constraint::Length(1), // Volume
    ];
    if !tracks.is_empty() {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Min(tracks.len() as u16));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    draw_waveform(f, chunks[0], app);
    draw_transport(f, chunks[1], app);

    let volume = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(binding.volume().clamp(0.0, 1.0) as f64)
        .label(format!("vol {:>3}%", (binding.volume() * 100.0).round() as u32));
    f.render_widget(volume, chunks[2]);

    if !tracks.is_empty() {
        draw_tracklist(f, chunks[4], app);
    }
}

fn draw_waveform<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let binding = app.deck.binding();
    let mut areas = app.hit_areas.get();
    areas.waveform = Some(area);
    app.hit_areas.set(areas);

    let message = match binding.playback() {
        Playback::Loading => Some(("Loading…", Color::Yellow)),
        Playback::Failed => Some(("Track unavailable", Color::Red)),
        Playback::Idle => Some(("No track", Color::DarkGray)),
        Playback::Paused | Playback::Playing => None,
    };
    if let Some((text, color)) = message {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, Rect { y: area.y + area.height / 2, height: 1, ..area });
        return;
    }

    let width = area.width as usize;
    let bars = display_bars(binding.peaks(), width);
    let played = (binding.progress() * width as f64) as usize;

    let lines: Vec<Line> = (0..area.height)
        .map(|row| {
            // Rows count down from the top; each row holds eight levels
            let floor = (area.height - row - 1) as f32;
            let spans: Vec<Span> = bars
                .iter()
                .enumerate()
                .map(|(x, bar)| {
                    let level = (bar * area.height as f32 - floor).clamp(0.0, 1.0);
                    let color = if x < played { PLAYED_COLOR } else { UNPLAYED_COLOR };
                    Span::styled(amplitude_to_blocks(level), Style::default().fg(color))
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_transport<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let binding = app.deck.binding();
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);
    let has_playlist = matches!(app.deck, Deck::Playlist(_));

    let mut spans = Vec::new();
    if has_playlist {
        let style = if app.deck.can_skip_prev() { enabled } else { disabled };
        spans.push(Span::styled("[⏮ p] ", style));
    }
    let (glyph, style) = match binding.playback() {
        Playback::Playing => ("[❚❚ space]", enabled.fg(Color::Yellow)),
        Playback::Paused => ("[▶ space]", enabled.fg(Color::Green)),
        _ => ("[▶ space]", disabled),
    };
    spans.push(Span::styled(glyph, style));
    if has_playlist {
        let style = if app.deck.can_skip_next() { enabled } else { disabled };
        spans.push(Span::styled(" [n ⏭]", style));
    }
    spans.push(Span::raw(format!(
        "   {} / {}",
        format_time(binding.position()),
        format_time(binding.duration())
    )));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_tracklist<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let active = app.deck.active_index();
    let playing = app.deck.binding().is_playing();

    let lines: Vec<Line> = app
        .deck
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_active = active == Some(i);
            let marker = if is_active && playing {
                " ❚❚".to_string()
            } else {
                format!("{:>3}", i + 1)
            };
            let style = if is_active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(marker, style),
                Span::raw("  "),
                Span::styled(track.title.clone(), style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_gallery<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let photos = app.gallery.photos();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Photos ({}) ", photos.len()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Keep the selection in view
    let visible = inner.height.max(1) as usize;
    let first = app.selected_tile.saturating_sub(visible - 1);

    let lines: Vec<Line> = photos
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, photo)| {
            let selected = i == app.selected_tile;
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::styled(if selected { "▸ " } else { "  " }, style),
                Span::styled(photo.alt_text(), style),
            ];
            if app.gallery.show_download() {
                spans.push(Span::styled("  [d] download", Style::default().fg(Color::DarkGray)));
            }
            Line::from(spans)
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_lightbox<B: AudioBackend>(f: &mut Frame, size: Rect, app: &App<B>) {
    let (Some(index), Some(photo)) = (app.gallery.open_index(), app.gallery.current()) else {
        return;
    };
    let area = lightbox_rect(size);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ({}/{}) ", photo.id, index + 1, app.gallery.photos().len()))
        .title_bottom(Line::from(" ← prev  → next  esc close ").centered());
    let inner = block.inner(area);
    f.render_widget(block, area);

    draw_photo(f, inner, app, photo, &photo.full_size);
}

fn draw_help(f: &mut Frame, size: Rect) {
    let area = centered_rect(size, 50, 60);
    f.render_widget(Clear, area);

    let entries = [
        ("q", "quit"),
        ("tab", "switch page"),
        ("space", "play / pause"),
        ("n / p", "next / previous track"),
        ("1-9", "select track"),
        ("+ / -", "volume"),
        ("← / →", "seek 5s (photos in lightbox)"),
        ("click", "seek on waveform"),
        ("j / k", "select photo"),
        ("enter", "open photo"),
        ("d", "download original"),
        ("esc", "close overlay"),
        ("?", "toggle help"),
    ];
    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>8}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Keys "),
    );
    f.render_widget(help, area);
}

fn draw_status<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let line = match &app.status_message {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(vec![
            Span::styled("[?]", Style::default().fg(Color::Blue)),
            Span::raw(" help  "),
            Span::styled("[q]", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ]),
    };
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lightbox_rect_is_centered() {
        let rect = lightbox_rect(Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(10, 4, 80, 32));
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(5, 5, 7, 3);
        let rect = centered_rect(area, 80, 80);
        assert!(rect.x >= area.x && rect.right() <= area.right());
        assert!(rect.y >= area.y && rect.bottom() <= area.bottom());
    }
}
