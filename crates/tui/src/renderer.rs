use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use profile_svg_core::interaction::{Gesture, PointerMapping};
use profile_svg_core::{Figure, SceneState, ViewportCommand};
use profile_svg_protocol::Transform;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::Block,
};
use tracing::{debug, warn};

/// Distinct rectangle tops, top of the figure first. Each gets one terminal
/// row.
fn row_layout(figure: &Figure) -> Vec<f64> {
    let mut rows: Vec<f64> = figure.rects().iter().map(|r| r.bounds.y).collect();
    rows.sort_by(f64::total_cmp);
    rows.dedup();
    rows
}

/// Columns `(start, width)` covered by the screen-space span `[left, right)`.
fn cell_span(left: f64, right: f64, cols_per_px: f64, width: u16) -> Option<(u16, u16)> {
    let start = (left * cols_per_px).floor().max(0.0);
    let end = (right * cols_per_px).ceil().min(f64::from(width));
    if end <= start {
        return None;
    }
    Some((start as u16, (end - start) as u16))
}

/// Stable warm color per function name.
fn frame_color(short_info: &str) -> Color {
    let h = short_info
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
    Color::Rgb(220, 80 + (h % 120) as u8, 40 + (h / 120 % 40) as u8)
}

struct Preview {
    figure: Figure,
    scene: SceneState,
    rows: Vec<f64>,
    hovered: Option<usize>,
    clock: Instant,
}

impl Preview {
    fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1e3
    }

    /// The content area plays the SVG element: its left edge is the SVG's
    /// left, and the CTM squeezes the figure width into its columns.
    fn mapping(&self, content: Rect) -> PointerMapping {
        let cols_per_px = f64::from(content.width) / self.figure.visible_width();
        PointerMapping {
            svg_left: f64::from(content.x),
            ctm: Some(Transform::new(cols_per_px, 1.0, 0.0, 0.0)),
        }
    }

    fn figure_point(&self, content: Rect, column: u16, row: u16) -> (f64, Option<f64>) {
        let x = self.mapping(content).to_figure_x(f64::from(column) + 0.5);
        let y = row
            .checked_sub(content.y)
            .and_then(|r| self.rows.get(usize::from(r)))
            .copied();
        (x, y)
    }

    fn gesture(&mut self, gesture: Gesture) {
        match self.figure.handle(gesture, self.now_ms()) {
            Ok(response) => self.scene.apply(&response.commands),
            Err(err) => warn!(%err, ?gesture, "gesture rejected"),
        }
    }

    fn hover(&mut self, target: Option<usize>) {
        if target == self.hovered {
            return;
        }
        if let Some(index) = self.hovered.take() {
            self.gesture(Gesture::HoverLeave { index });
        }
        if let Some(index) = target {
            self.gesture(Gesture::HoverEnter { index });
            self.hovered = Some(index);
        }
    }

    fn draw(&self, frame: &mut Frame) -> Rect {
        let area = frame.area();

        let header_area = Rect::new(0, 0, area.width, 1);
        let header = Block::default()
            .title(format!(
                " profile-svg: {} | {} frames | wheel zoom | click zoom | 0 reset | q quit ",
                self.figure.id(),
                self.figure.rects().len()
            ))
            .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(header, header_area);

        let content = Rect::new(0, 1, area.width, area.height.saturating_sub(2));
        frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), content);

        let viewport = self.scene.viewport;
        let cols_per_px = f64::from(content.width) / self.figure.visible_width();
        let buf = frame.buffer_mut();
        for (index, rect) in self.figure.rects().iter().enumerate() {
            let Some(row) = self.rows.iter().position(|y| *y == rect.bounds.y) else {
                continue;
            };
            let Ok(row) = u16::try_from(row) else {
                continue;
            };
            if row >= content.height {
                continue;
            }
            let left = viewport.apply_x(rect.bounds.x);
            let right = viewport.apply_x(rect.bounds.right());
            let Some((col, width)) = cell_span(left, right, cols_per_px, content.width) else {
                continue;
            };

            let label = self.scene.labels.get(index);
            let bg = if label.is_some_and(|l| l.highlighted) {
                Color::LightYellow
            } else {
                frame_color(&rect.short_info)
            };
            let text: Vec<char> = match label {
                Some(l) if self.scene.labels_visible && l.visible => l.text.chars().collect(),
                _ => Vec::new(),
            };
            // Labels are pinned to their rectangle's left edge by their own
            // transform; the offset is zero unless the engine says otherwise.
            let label_left = label.map_or(left, |l| viewport.apply_x(l.transform.apply_x(rect.bounds.x)));
            let offset = ((label_left - left) * cols_per_px).round().max(0.0) as usize;

            let y = content.y + row;
            for i in 0..width {
                let x = content.x + col + i;
                let ch = usize::from(i)
                    .checked_sub(offset)
                    .and_then(|c| text.get(c))
                    .copied()
                    .unwrap_or(' ');
                buf[(x, y)].set_char(ch).set_fg(Color::Black).set_bg(bg);
            }
        }

        let footer_y = area.height.saturating_sub(1);
        if let Some(details) = self.scene.details.as_ref().filter(|d| d.shown) {
            let time = details.time.as_deref().unwrap_or("");
            let line = format!(" {} {:>w$} ", details.details, time, w = usize::from(area.width / 3));
            for (i, ch) in line.chars().take(usize::from(area.width)).enumerate() {
                let Ok(x) = u16::try_from(i) else { break };
                buf[(x, footer_y)].set_char(ch).set_fg(Color::White).set_bg(Color::DarkGray);
            }
        }
        content
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            let commands = self.figure.tick(self.now_ms());
            self.scene.apply(&commands);

            let mut content = Rect::default();
            terminal.draw(|frame| content = self.draw(frame))?;

            let timeout = if self.figure.is_animating() {
                Duration::from_millis(16)
            } else {
                Duration::from_millis(100)
            };
            if !event::poll(timeout)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('0') | KeyCode::Char('r') => {
                        self.gesture(Gesture::DoubleClickBackground);
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    let (x, y) = self.figure_point(content, mouse.column, mouse.row);
                    let hit = y.and_then(|y| self.figure.hit_test(x, y));
                    match mouse.kind {
                        MouseEventKind::ScrollUp => self.gesture(Gesture::Wheel {
                            delta_y: -1.0,
                            pointer_x: x,
                        }),
                        MouseEventKind::ScrollDown => self.gesture(Gesture::Wheel {
                            delta_y: 1.0,
                            pointer_x: x,
                        }),
                        MouseEventKind::Down(MouseButton::Left) => {
                            debug!(x, ?hit, "click");
                            match hit {
                                Some(index) => self.gesture(Gesture::DoubleClickRect { index }),
                                None => self.gesture(Gesture::DoubleClickBackground),
                            }
                        }
                        MouseEventKind::Down(MouseButton::Right) => {
                            self.gesture(Gesture::DoubleClickBackground);
                        }
                        MouseEventKind::Moved => self.hover(hit),
                        _ => {}
                    }
                }
                _ => {}
            }
        }
    }
}

pub fn run_preview(figure: Figure, initial: &[ViewportCommand], clock: Instant) -> Result<()> {
    let mut scene = SceneState::new(figure.rects().len());
    scene.apply(initial);
    let mut preview = Preview {
        rows: row_layout(&figure),
        figure,
        scene,
        hovered: None,
        clock,
    };

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = preview.event_loop(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}
