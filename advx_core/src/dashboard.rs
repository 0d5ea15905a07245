//! Terminal dashboard for live attack sessions.
//!
//! Renders the session as a confidence gauge, threat banner, confidence
//! sparkline, and recent-attack table. Telemetry arrives as owned
//! frames over a crossbeam channel from the stepping thread; the
//! dashboard only reads, it never touches the engine.
//!
//! Enable with the `dashboard` feature flag.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossbeam::channel::Receiver;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Row, Sparkline, Table},
    Frame, Terminal,
};

use crate::attack::AttackKind;
use crate::engine::{AttackResult, BASE_CONFIDENCE, DEFAULT_EPSILON};
use crate::metrics::SessionStats;

/// Classifier health, derived from current confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatStatus {
    /// Confidence above 80
    Stable,
    /// Confidence in (40, 80]
    Degraded,
    /// Confidence at or below 40
    Compromised,
}

impl ThreatStatus {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 80.0 {
            ThreatStatus::Stable
        } else if confidence > 40.0 {
            ThreatStatus::Degraded
        } else {
            ThreatStatus::Compromised
        }
    }
}

/// Lightweight per-step packet sent from the stepping thread to the TUI.
#[derive(Debug, Clone)]
pub struct TelemetryFrame {
    /// Step index this frame describes
    pub step: u64,
    /// Confidence after the step
    pub confidence: f64,
    /// Whether the step's attack landed
    pub success: bool,
    /// Attack active during the step
    pub attack: AttackKind,
    /// Total steps so far
    pub attack_count: u64,
    /// Rounded success percentage
    pub success_rate: u32,
    /// Perturbation budget at the time of the step
    pub epsilon: f64,
    /// Health classification of the classifier
    pub threat: ThreatStatus,
}

impl TelemetryFrame {
    /// Builds a frame from a step result and the session statistics.
    pub fn from_result(result: &AttackResult, stats: &SessionStats) -> Self {
        Self {
            step: result.step,
            confidence: result.confidence,
            success: result.success,
            attack: result.attack,
            attack_count: stats.attack_count,
            success_rate: stats.success_rate,
            epsilon: result.epsilon,
            threat: ThreatStatus::from_confidence(result.confidence),
        }
    }
}

impl Default for TelemetryFrame {
    fn default() -> Self {
        Self {
            step: 0,
            confidence: BASE_CONFIDENCE,
            success: false,
            attack: AttackKind::Fgsm,
            attack_count: 0,
            success_rate: 0,
            epsilon: DEFAULT_EPSILON,
            threat: ThreatStatus::Stable,
        }
    }
}

/// TUI dashboard for a live attack session.
pub struct AttackDashboard {
    rx: Receiver<TelemetryFrame>,
    confidence_history: VecDeque<u64>,
    recent: VecDeque<TelemetryFrame>,
    latest: TelemetryFrame,
    frame_count: usize,
}

impl AttackDashboard {
    /// Creates a dashboard reading telemetry from the given channel.
    pub fn new(rx: Receiver<TelemetryFrame>) -> Self {
        Self {
            rx,
            confidence_history: VecDeque::with_capacity(100),
            recent: VecDeque::with_capacity(10),
            latest: TelemetryFrame::default(),
            frame_count: 0,
        }
    }

    /// Records one telemetry frame into the display buffers.
    fn record(&mut self, frame: TelemetryFrame) {
        self.confidence_history.push_back(frame.confidence as u64);
        if self.confidence_history.len() > 100 {
            self.confidence_history.pop_front();
        }

        self.recent.push_front(frame.clone());
        self.recent.truncate(10);

        self.latest = frame;
    }

    /// Runs the TUI main loop. Blocks until 'q' or Esc is pressed.
    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        loop {
            while let Ok(frame) = self.rx.try_recv() {
                self.record(frame);
            }

            terminal.draw(|f| self.ui(f))?;
            self.frame_count += 1;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                        break;
                    }
                }
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(5), // Status + gauge
                Constraint::Length(6), // Confidence sparkline
                Constraint::Min(5),    // Recent attacks
                Constraint::Length(1), // Footer
            ])
            .split(f.area());

        // === HEADER ===
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "⚔ AdversarialX Attack Monitor",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  "),
            Span::styled(
                format!("step {}", self.latest.step),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("  |  "),
            Span::raw(format!("Frame: {}", self.frame_count)),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, chunks[0]);

        // === STATUS + CONFIDENCE GAUGE ===
        let gauge_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(chunks[1]);

        let (status_text, status_color) = match self.latest.threat {
            ThreatStatus::Stable => ("STABLE", Color::Green),
            ThreatStatus::Degraded => ("DEGRADED", Color::Yellow),
            ThreatStatus::Compromised => ("COMPROMISED", Color::Red),
        };
        let status = Paragraph::new(format!("■ {}", status_text))
            .style(Style::default().fg(status_color).add_modifier(Modifier::BOLD))
            .block(Block::default().title("Model").borders(Borders::ALL));
        f.render_widget(status, gauge_chunks[0]);

        let confidence_gauge = Gauge::default()
            .block(Block::default().title("Confidence").borders(Borders::ALL))
            .gauge_style(Style::default().fg(status_color))
            .percent(self.latest.confidence.clamp(0.0, 100.0) as u16)
            .label(format!("{:.1}%", self.latest.confidence));
        f.render_widget(confidence_gauge, gauge_chunks[1]);

        let attack_info = Paragraph::new(format!(
            "{}  ε={:.3}  hit rate {}%",
            self.latest.attack.label(),
            self.latest.epsilon,
            self.latest.success_rate
        ))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().title("Active Attack").borders(Borders::ALL));
        f.render_widget(attack_info, gauge_chunks[2]);

        // === CONFIDENCE SPARKLINE ===
        let history: Vec<u64> = self.confidence_history.iter().cloned().collect();
        let sparkline = Sparkline::default()
            .block(
                Block::default()
                    .title("Confidence (last 100 steps)")
                    .borders(Borders::ALL),
            )
            .data(&history)
            .style(Style::default().fg(Color::Cyan));
        f.render_widget(sparkline, chunks[2]);

        // === RECENT ATTACKS ===
        let header_cells = ["Step", "Attack", "Result", "Confidence"]
            .iter()
            .map(|h| Span::styled(*h, Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = self
            .recent
            .iter()
            .map(|frame| {
                let (result_text, result_color) = if frame.success {
                    ("HIT", Color::Red)
                } else {
                    ("MISS", Color::Green)
                };
                Row::new(vec![
                    Span::raw(format!("{}", frame.step)),
                    Span::raw(frame.attack.label()),
                    Span::styled(result_text, Style::default().fg(result_color)),
                    Span::raw(format!("{:.1}%", frame.confidence)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title("Recent Attacks (last 10)")
                .borders(Borders::ALL),
        );
        f.render_widget(table, chunks[3]);

        // === FOOTER ===
        let footer =
            Paragraph::new("Press 'q' to quit").style(Style::default().fg(Color::DarkGray));
        f.render_widget(footer, chunks[4]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_frame_default() {
        let frame = TelemetryFrame::default();
        assert_eq!(frame.step, 0);
        assert_eq!(frame.threat, ThreatStatus::Stable);
    }

    #[test]
    fn test_threat_status_thresholds() {
        assert_eq!(ThreatStatus::from_confidence(97.2), ThreatStatus::Stable);
        assert_eq!(ThreatStatus::from_confidence(80.1), ThreatStatus::Stable);
        assert_eq!(ThreatStatus::from_confidence(80.0), ThreatStatus::Degraded);
        assert_eq!(ThreatStatus::from_confidence(41.0), ThreatStatus::Degraded);
        assert_eq!(
            ThreatStatus::from_confidence(40.0),
            ThreatStatus::Compromised
        );
        assert_eq!(
            ThreatStatus::from_confidence(5.0),
            ThreatStatus::Compromised
        );
    }

    #[test]
    fn test_recent_attacks_bounded() {
        let (_tx, rx) = crossbeam::channel::unbounded();
        let mut dashboard = AttackDashboard::new(rx);
        for step in 1..=15u64 {
            dashboard.record(TelemetryFrame {
                step,
                ..TelemetryFrame::default()
            });
        }
        assert_eq!(dashboard.recent.len(), 10);
        assert_eq!(dashboard.recent[0].step, 15);
        assert_eq!(dashboard.latest.step, 15);
        assert_eq!(dashboard.confidence_history.len(), 15);
    }

    #[test]
    fn test_frame_from_result() {
        use crate::engine::AttackEngine;

        let mut engine = AttackEngine::new();
        engine.set_attack(AttackKind::Pgd);
        let result = engine.step();
        let frame = TelemetryFrame::from_result(&result, &engine.statistics());
        assert_eq!(frame.step, 1);
        assert_eq!(frame.attack, AttackKind::Pgd);
        assert_eq!(frame.success_rate, 100);
        assert_eq!(frame.threat, ThreatStatus::Stable);
    }
}
