//! Terminal control panel for the viewer.
//!
//! A Ratatui dashboard drives the per-tick loop: one iteration draws the
//! panel, advances playback, and polls for input. Key presses map to
//! explicit [`ControlEvent`] values which the loop applies to the scene
//! state; the cloud transform is re-logged only when a parameter actually
//! changed.
//!
//! Keys:
//! - Up/Down: select a parameter row
//! - Left/Right: adjust the selected parameter (Shift = coarse step)
//! - Space: play/pause
//! - q / Esc: quit

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Row, Table},
    Frame, Terminal,
};

use masscoords_core::alignment::{OFFSET_MAX, OFFSET_MIN, ROTATION_LIMIT};
use masscoords_core::{SceneState, TransformParameters};
use masscoords_core::visualization::SceneVisualizer;

/// Multiplier applied to a parameter's step when Shift is held.
const COARSE_STEP: f64 = 100.0;

/// One adjustable transform parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    OffsetX,
    OffsetY,
    OffsetZ,
    RotationY,
    MirrorX,
    MirrorY,
    MirrorZ,
}

impl Parameter {
    /// Display order in the parameter table.
    pub const ALL: [Parameter; 7] = [
        Parameter::OffsetX,
        Parameter::OffsetY,
        Parameter::OffsetZ,
        Parameter::RotationY,
        Parameter::MirrorX,
        Parameter::MirrorY,
        Parameter::MirrorZ,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Parameter::OffsetX => "Offset X",
            Parameter::OffsetY => "Offset Y",
            Parameter::OffsetZ => "Offset Z",
            Parameter::RotationY => "Rotation Y",
            Parameter::MirrorX => "Mirror X",
            Parameter::MirrorY => "Mirror Y",
            Parameter::MirrorZ => "Mirror Z",
        }
    }

    /// Fine adjustment step per key press (mirrors have none).
    pub fn step(&self) -> f64 {
        match self {
            Parameter::RotationY => 0.001,
            Parameter::MirrorX | Parameter::MirrorY | Parameter::MirrorZ => 0.0,
            _ => 0.01,
        }
    }

    pub fn is_mirror(&self) -> bool {
        matches!(
            self,
            Parameter::MirrorX | Parameter::MirrorY | Parameter::MirrorZ
        )
    }
}

/// Explicit "the user did something" message from the control surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Adjust a numeric parameter by a signed delta
    Adjust(Parameter, f64),
    /// Flip a mirror flag
    Toggle(Parameter),
    /// Toggle playback
    PlayPause,
    /// Leave the dashboard
    Quit,
}

/// Maps a key press to a control event, given the selected parameter row.
///
/// Pure function; selection movement (Up/Down) is dashboard state and
/// handled by the caller.
pub fn map_key(key: KeyEvent, selected: Parameter) -> Option<ControlEvent> {
    let direction = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ControlEvent::Quit),
        KeyCode::Char(' ') => return Some(ControlEvent::PlayPause),
        KeyCode::Left => -1.0,
        KeyCode::Right => 1.0,
        _ => return None,
    };

    if selected.is_mirror() {
        return Some(ControlEvent::Toggle(selected));
    }

    let mut delta = direction * selected.step();
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        delta *= COARSE_STEP;
    }
    Some(ControlEvent::Adjust(selected, delta))
}

/// Applies a control event to the scene; returns true when a transform
/// parameter changed (and the cloud placement needs a recompute).
pub fn apply_event(scene: &mut SceneState, event: ControlEvent) -> bool {
    match event {
        ControlEvent::Adjust(param, delta) => {
            let params = &mut scene.params;
            let slot = match param {
                Parameter::OffsetX => &mut params.offset_x,
                Parameter::OffsetY => &mut params.offset_y,
                Parameter::OffsetZ => &mut params.offset_z,
                Parameter::RotationY => &mut params.rotation_y,
                _ => return false,
            };
            let (min, max) = if param == Parameter::RotationY {
                (-ROTATION_LIMIT, ROTATION_LIMIT)
            } else {
                (OFFSET_MIN, OFFSET_MAX)
            };
            let before = *slot;
            *slot = (*slot + delta).clamp(min, max);
            *slot != before
        }
        ControlEvent::Toggle(param) => {
            let params = &mut scene.params;
            match param {
                Parameter::MirrorX => params.mirror_x = !params.mirror_x,
                Parameter::MirrorY => params.mirror_y = !params.mirror_y,
                Parameter::MirrorZ => params.mirror_z = !params.mirror_z,
                _ => return false,
            }
            true
        }
        ControlEvent::PlayPause => {
            scene.playback.toggle();
            false
        }
        ControlEvent::Quit => false,
    }
}

/// Interactive alignment/playback dashboard.
pub struct Dashboard {
    selected: usize,
    tick_timeout: Duration,
    last_logged_frame: Option<usize>,
}

impl Dashboard {
    /// Creates a dashboard polling input at the given tick rate (Hz).
    pub fn new(tick_rate_hz: u64) -> Self {
        Self {
            selected: 0,
            tick_timeout: Duration::from_millis(1000 / tick_rate_hz.max(1)),
            last_logged_frame: None,
        }
    }

    /// Runs the control loop until the user quits.
    ///
    /// One iteration = one tick: draw, advance playback, log markers when
    /// the integer frame moved, poll input.
    pub fn run(&mut self, scene: &mut SceneState, viz: &SceneVisualizer) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal, scene, viz);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        scene: &mut SceneState,
        viz: &SceneVisualizer,
    ) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.ui(f, scene))?;

            let frame = scene.advance();
            if self.last_logged_frame != Some(frame) {
                viz.log_markers(frame, &scene.marker_positions(frame));
                self.last_logged_frame = Some(frame);
            }

            if event::poll(self.tick_timeout)? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Up => {
                            self.selected = self.selected.saturating_sub(1);
                            continue;
                        }
                        KeyCode::Down => {
                            self.selected = (self.selected + 1).min(Parameter::ALL.len() - 1);
                            continue;
                        }
                        _ => {}
                    }

                    let Some(control) = map_key(key, Parameter::ALL[self.selected]) else {
                        continue;
                    };
                    if control == ControlEvent::Quit {
                        return Ok(());
                    }
                    if apply_event(scene, control) {
                        if let Some(placement) = scene.try_align() {
                            viz.log_cloud_transform(&placement);
                        }
                    }
                }
            }
        }
    }

    fn ui(&self, f: &mut Frame, scene: &SceneState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),  // Header
                Constraint::Min(9),     // Parameter table
                Constraint::Length(3),  // Playback gauge
                Constraint::Length(1),  // Footer
            ])
            .split(f.area());

        // === HEADER ===
        let aligned = if scene.placement.is_some() {
            Span::styled("aligned", Style::default().fg(Color::Green))
        } else {
            Span::styled("waiting for inputs", Style::default().fg(Color::Yellow))
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "masscoords viewer",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  "),
            aligned,
            Span::raw("  |  "),
            Span::raw(format!("{} agents", scene.trajectories.agent_count())),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, chunks[0]);

        // === PARAMETER TABLE ===
        let rows: Vec<Row> = Parameter::ALL
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let value = parameter_value(&scene.params, *param);
                let style = if i == self.selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Span::styled(param.label(), style),
                    Span::styled(value, style),
                ])
            })
            .collect();
        let table = Table::new(rows, [Constraint::Length(14), Constraint::Length(12)]).block(
            Block::default()
                .title("Cloud Transform (←/→ adjust, Shift = coarse)")
                .borders(Borders::ALL),
        );
        f.render_widget(table, chunks[1]);

        // === PLAYBACK GAUGE ===
        let frame = scene.playback.frame();
        let max_frame = scene.max_frame().unwrap_or(0);
        let ratio = if max_frame > 0 {
            frame as f64 / max_frame as f64
        } else {
            0.0
        };
        let state = if scene.playback.is_playing() {
            "▶ playing"
        } else {
            "⏸ paused"
        };
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(format!(
                        "Playback [{}] speed={}",
                        state,
                        scene.playback.speed()
                    ))
                    .borders(Borders::ALL),
            )
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("frame {}/{}", frame, max_frame));
        f.render_widget(gauge, chunks[2]);

        // === FOOTER ===
        let footer = Paragraph::new("↑/↓ select  ←/→ adjust  Space play/pause  q quit")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(footer, chunks[3]);
    }
}

fn parameter_value(params: &TransformParameters, param: Parameter) -> String {
    match param {
        Parameter::OffsetX => format!("{:+.2}", params.offset_x),
        Parameter::OffsetY => format!("{:+.2}", params.offset_y),
        Parameter::OffsetZ => format!("{:+.2}", params.offset_z),
        Parameter::RotationY => format!("{:+.3} rad", params.rotation_y),
        Parameter::MirrorX => flag(params.mirror_x),
        Parameter::MirrorY => flag(params.mirror_y),
        Parameter::MirrorZ => flag(params.mirror_z),
    }
}

fn flag(on: bool) -> String {
    if on { "on".to_string() } else { "off".to_string() }
}
