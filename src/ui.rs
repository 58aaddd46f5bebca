use crate::app::{App, Selection, PANEL_WIDTH};
use crate::braille::BrailleCanvas;
use crate::map::{Label, LabelKind, MapLayers};
use crate::news::format::summary_lines;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map (plus detail panel when open)
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // A selection opens a detail panel on the right
    let map_area = match &app.selection {
        Some(selection) => {
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(30), Constraint::Length(PANEL_WIDTH)])
                .split(chunks[0]);
            render_detail_panel(frame, app, selection, split[1]);
            split[0]
        }
        None => chunks[0],
    };

    render_map(frame, app, map_area);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.projection.is_globe() {
        " News Globe "
    } else {
        " News Map "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Render at the braille resolution of the visible area
    let mut projection = app.projection.clone();
    projection.set_size(inner.width as usize * 2, inner.height as usize * 4);

    let layers = app
        .map_renderer
        .render(inner.width as usize, inner.height as usize, &projection);

    let cursor_pos = app.mouse_pixel_pos().and_then(|(px, py)| {
        let cx = (px / 2) as u16;
        let cy = (py / 4) as u16;
        (cx < inner.width && cy < inner.height).then_some((cx, cy))
    });

    frame.render_widget(
        MapWidget {
            layers,
            cursor_pos,
        },
        inner,
    );
}

/// Widget that blits the braille layers and overlays text labels.
struct MapWidget {
    layers: MapLayers,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget {
    fn blit_canvas(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille cells so lower layers show through
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }

    fn draw_label(label: &Label, area: Rect, buf: &mut Buffer) {
        if label.y >= area.height || label.x >= area.width {
            return;
        }

        let style = match label.kind {
            LabelKind::Name => Style::default().fg(Color::White),
            LabelKind::Count => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            // The overlay box: dark text on a light background
            LabelKind::Overlay => Style::default().fg(Color::Black).bg(Color::Gray),
        };

        let max_len = (area.width - label.x) as usize;
        let max_display = match label.kind {
            LabelKind::Count => 4,
            LabelKind::Name => 24,
            LabelKind::Overlay => 40,
        };

        let x = area.x + label.x;
        let y = area.y + label.y;
        for (i, ch) in label
            .text
            .chars()
            .take(max_len.min(max_display))
            .enumerate()
        {
            buf[(x + i as u16, y)].set_char(ch).set_style(style);
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: coastlines, borders, markers
        Self::blit_canvas(&self.layers.coastlines, Color::Cyan, area, buf);
        Self::blit_canvas(&self.layers.borders, Color::DarkGray, area, buf);
        Self::blit_canvas(&self.layers.markers, Color::Yellow, area, buf);

        for label in &self.layers.labels {
            Self::draw_label(label, area, buf);
        }

        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

/// Detail panel: every selected marker's location title followed by its
/// bulleted summaries.
fn render_detail_panel(frame: &mut Frame, app: &App, selection: &Selection, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for &idx in &selection.members {
        let Some(marker) = app.map_renderer.markers.get(idx) else {
            continue;
        };

        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            marker.title(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));

        for summary in &marker.summaries {
            for item in summary_lines(summary) {
                if item.is_empty() {
                    lines.push(Line::default());
                } else {
                    lines.push(Line::from(vec![
                        Span::styled("• ", Style::default().fg(Color::Cyan)),
                        Span::raw(item),
                    ]));
                }
            }
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No summaries here",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = if selection.members.len() > 1 {
        format!(" {} locations ", selection.members.len())
    } else {
        " Summaries ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(ratatui::widgets::Wrap { trim: false })
        .scroll((selection.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;
    let markers = app.map_renderer.markers.len();

    let status = Line::from(vec![
        Span::styled(
            format!(" {} ", app.mode_name()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{markers} marker{}", if markers == 1 { "" } else { "s" }),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(" ", Style::default()),
        Span::styled(
            if settings.show_borders { "[B]order " } else { "[b]order " },
            Style::default().fg(if settings.show_borders { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(
            if settings.show_labels { "[L]abels " } else { "[l]abels " },
            Style::default().fg(if settings.show_labels { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(
            if settings.show_overlay { "[O]verlay " } else { "[o]verlay " },
            Style::default().fg(if settings.show_overlay { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(
            "| g:globe tab:next click:open hjkl:pan +/-:zoom q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
