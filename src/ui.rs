//! Terminal UI rendering for the quadrant board.
//!
//! Design philosophy:
//! - Minimal chrome: no box drawing, the four quadrants are separated by
//!   whitespace and a thin rule
//! - Each quadrant keeps one fixed accent color for its title
//! - Selection uses the REVERSED modifier so it adapts to the terminal theme
//! - Scrolloff navigation: selection stays centered, content flows past
//!
//! This module renders from RenderState (immutable snapshot) - it never
//! mutates application state.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::render::{QuadrantView, RenderState, TaskView};
use crate::task::Quadrant;
use crate::tea::{InputKind, Mode, Notification, NotificationLevel};

// Color tokens (selection uses REVERSED modifier to adapt to terminal theme)
const COLOR_TEXT_DIMMED: Color = Color::Gray;
const COLOR_TEXT_MUTED: Color = Color::DarkGray;
const COLOR_SEPARATOR: Color = Color::White;

// Quadrant accents
const COLOR_DO_FIRST: Color = Color::Green;
const COLOR_DO_LATER: Color = Color::Cyan;
const COLOR_DELEGATE: Color = Color::Yellow;
const COLOR_ELIMINATE: Color = Color::Red;

const CHECK_DONE: &str = "✓ ";
const CHECK_OPEN: &str = "· ";

const NOT_SAVED_BADGE: &str = " NOT SAVED ";

pub fn quadrant_color(quadrant: Quadrant) -> Color {
    match quadrant {
        Quadrant::DoFirst => COLOR_DO_FIRST,
        Quadrant::DoLater => COLOR_DO_LATER,
        Quadrant::Delegate => COLOR_DELEGATE,
        Quadrant::Eliminate => COLOR_ELIMINATE,
    }
}

// -----------------------------------------------------------------------------
// Context-sensitive keymap system
// -----------------------------------------------------------------------------

/// Context for determining which keybindings to display.
/// Derived from RenderState - this is the "view model" for the statusbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapContext {
    /// Browsing the board
    Board { has_selection: bool },
    /// A task is grabbed
    Dragging,
    /// Text input mode (add, edit)
    TextInput { can_pick_quadrant: bool },
    /// Delete confirmation mode
    DeleteConfirm,
}

impl KeymapContext {
    /// Derive keymap context from render state.
    pub fn from_render_state(state: &RenderState) -> Self {
        match state.mode {
            Mode::Input(InputKind::ConfirmDelete) => KeymapContext::DeleteConfirm,
            Mode::Input(kind) => KeymapContext::TextInput {
                can_pick_quadrant: kind == InputKind::AddTask,
            },
            Mode::Dragging => KeymapContext::Dragging,
            Mode::Board => {
                let focused = &state.quadrants[state.focus.index()];
                KeymapContext::Board {
                    has_selection: focused.selected.is_some(),
                }
            }
        }
    }
}

/// A single keybinding entry for display.
struct Keybinding(&'static str, &'static str);

/// A group of related keybindings (separated by │).
struct KeybindingGroup(Vec<Keybinding>);

/// Get keybindings for a given context.
fn keybindings_for_context(ctx: KeymapContext) -> Vec<KeybindingGroup> {
    match ctx {
        KeymapContext::Board { has_selection } => {
            let task_actions = if has_selection {
                vec![
                    Keybinding("e", "edit"),
                    Keybinding("d", "delete"),
                    Keybinding("x", "done"),
                    Keybinding("m", "move"),
                ]
            } else {
                vec![]
            };

            vec![
                KeybindingGroup(vec![Keybinding("hjkl", "navigate"), Keybinding("1-4", "quadrant")]),
                KeybindingGroup(vec![Keybinding("n", "new")]),
                KeybindingGroup(task_actions),
                KeybindingGroup(vec![Keybinding("q", "quit")]),
            ]
        }
        KeymapContext::Dragging => vec![
            KeybindingGroup(vec![Keybinding("hl/1-4", "quadrant"), Keybinding("jk", "position")]),
            KeybindingGroup(vec![Keybinding("Enter", "drop"), Keybinding("Esc", "cancel")]),
        ],
        KeymapContext::TextInput { can_pick_quadrant } => {
            let mut keys = vec![Keybinding("Enter", "submit")];
            if can_pick_quadrant {
                keys.push(Keybinding("Tab", "quadrant"));
            }
            keys.push(Keybinding("Esc", "cancel"));
            vec![KeybindingGroup(keys)]
        }
        KeymapContext::DeleteConfirm => vec![KeybindingGroup(vec![
            Keybinding("Enter", "delete"),
            Keybinding("Esc", "cancel"),
        ])],
    }
}

/// Main render function - entry point for all UI drawing.
/// Takes an immutable RenderState snapshot.
pub fn draw(frame: &mut Frame, state: &RenderState) {
    render_main_layout(frame, state);

    if let Some(ref notification) = state.notification {
        render_notification(frame, notification, frame.area());
    }
}

/// Render the main layout: 2x2 board + status bar.
fn render_main_layout(frame: &mut Frame, state: &RenderState) {
    let area = frame.area();

    if area.height < 3 {
        render_statusbar(frame, state, area);
        return;
    }

    let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(area);
    render_board(frame, state, chunks[0]);
    render_statusbar(frame, state, chunks[1]);
}

/// Render the four quadrants as two rows of two, with a rule between rows.
fn render_board(frame: &mut Frame, state: &RenderState, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .split(area);

    for (row_idx, row) in [rows[0], rows[2]].into_iter().enumerate() {
        let cols = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .split(row);

        for (col_idx, cell) in [cols[0], cols[2]].into_iter().enumerate() {
            let view = &state.quadrants[row_idx * 2 + col_idx];
            render_quadrant(frame, state, view, cell);
        }
    }

    render_separator(frame, rows[1]);
}

/// Render the separator - solid divider line between the two board rows.
fn render_separator(frame: &mut Frame, area: Rect) {
    let solid = "─".repeat(area.width as usize);
    let line = Line::from(Span::styled(solid, Style::default().fg(COLOR_SEPARATOR)));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render one quadrant: title line followed by its task rows.
fn render_quadrant(frame: &mut Frame, state: &RenderState, view: &QuadrantView, area: Rect) {
    if area.height == 0 {
        return;
    }

    let focused = view.quadrant == state.focus;
    let mut lines = Vec::with_capacity(area.height as usize);
    lines.push(render_title_line(view, focused, area.width));

    let content_height = area.height.saturating_sub(1) as usize;
    if view.tasks.is_empty() {
        let hint = if focused && state.mode == Mode::Board {
            "No tasks. Press 'n' to add one."
        } else {
            "No tasks"
        };
        lines.push(Line::from(Span::styled(
            truncate(hint, area.width as usize),
            Style::default().fg(COLOR_TEXT_MUTED),
        )));
    } else {
        // Scrolloff: keep selection centered
        let selected = view.selected.unwrap_or(0);
        let center = content_height / 2;
        let start = selected.saturating_sub(center);
        let end = (start + content_height).min(view.tasks.len());
        let start = end.saturating_sub(content_height);

        lines.extend(
            view.tasks
                .iter()
                .enumerate()
                .skip(start)
                .take(content_height)
                .map(|(idx, task)| {
                    render_task_row(task, view.selected == Some(idx), area.width)
                }),
        );
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Title with completion count, e.g. "DO FIRST  1/3".
fn render_title_line(view: &QuadrantView, focused: bool, width: u16) -> Line<'static> {
    let color = quadrant_color(view.quadrant);
    let (done, total) = view.progress();

    let marker = if focused { "▸ " } else { "  " };
    let mut title_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    if view.is_drop_target {
        title_style = Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD);
    }

    let title = truncate(view.quadrant.title(), (width as usize).saturating_sub(2));
    Line::from(vec![
        Span::styled(marker, Style::default().fg(color)),
        Span::styled(title, title_style),
        Span::styled(
            format!("  {}/{}", done, total),
            Style::default().fg(COLOR_TEXT_MUTED),
        ),
    ])
}

/// Render a single task row.
fn render_task_row(task: &TaskView, is_selected: bool, width: u16) -> Line<'static> {
    let check = if task.completed { CHECK_DONE } else { CHECK_OPEN };
    let content_width = (width as usize).saturating_sub(2 + check.chars().count());
    let content = truncate(&task.content, content_width);

    let mut style = if task.completed {
        Style::default()
            .fg(COLOR_TEXT_MUTED)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    if task.is_dragged {
        style = style.add_modifier(Modifier::ITALIC | Modifier::BOLD);
    }
    if task.is_drop_target {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if is_selected {
        style = style.add_modifier(Modifier::REVERSED);
    }

    let check_style = if task.completed {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(COLOR_TEXT_DIMMED)
    };

    Line::from(vec![
        Span::raw("  "),
        Span::styled(check, check_style),
        Span::styled(content, style),
    ])
}

/// Render the bottom status line. Shows one of:
/// - Input prompt (when in Input mode)
/// - Grabbed task and where it would land (when dragging)
/// - "?" indicator, expanded to the full keymap via '?'
///
/// When saves reach no session store, shows a "NOT SAVED" badge on the right.
fn render_statusbar(frame: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = match state.mode {
        Mode::Input(kind) => input_spans(state, kind),
        Mode::Dragging => drag_spans(state),
        Mode::Board => keymap_spans(state),
    };
    if !state.persisted {
        push_badge(&mut spans, area.width);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render keybindings legend for the bottom line.
/// When show_keymap is false: Shows just "?" (grayed out)
/// When show_keymap is true: Shows "? │ <full keymap legend>" with bright "?"
fn keymap_spans(state: &RenderState) -> Vec<Span<'static>> {
    let ctx = KeymapContext::from_render_state(state);
    let groups = keybindings_for_context(ctx);

    let help_style = if state.show_keymap {
        Style::default()
    } else {
        Style::default().fg(COLOR_TEXT_MUTED)
    };
    let mut spans = vec![Span::styled("?", help_style)];

    if state.show_keymap {
        push_groups(&mut spans, &groups);
    }
    spans
}

fn push_groups(spans: &mut Vec<Span<'static>>, groups: &[KeybindingGroup]) {
    let key_style = Style::default().fg(COLOR_TEXT_DIMMED);
    let desc_style = Style::default().fg(COLOR_TEXT_MUTED);
    let sep_style = Style::default().fg(COLOR_TEXT_MUTED);

    for group in groups {
        if group.0.is_empty() {
            continue;
        }
        if !spans.is_empty() {
            spans.push(Span::styled(" │ ", sep_style));
        }
        for (key_idx, keybinding) in group.0.iter().enumerate() {
            if key_idx > 0 {
                spans.push(Span::styled(" • ", sep_style));
            }
            spans.push(Span::styled(keybinding.0, key_style));
            spans.push(Span::styled(format!(" {}", keybinding.1), desc_style));
        }
    }
}

/// Grabbed task preview: "Moving <content> → DO LATER", plus the keys.
fn drag_spans(state: &RenderState) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if let Some(preview) = &state.drag_preview {
        let color = quadrant_color(state.focus);
        spans.push(Span::styled("Moving ", Style::default().fg(COLOR_TEXT_DIMMED)));
        spans.push(Span::styled(
            truncate(&preview.content, 40),
            Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ));
        spans.push(Span::styled(" → ", Style::default().fg(COLOR_TEXT_MUTED)));
        spans.push(Span::styled(
            state.focus.title(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    push_groups(&mut spans, &keybindings_for_context(KeymapContext::Dragging));
    spans
}

/// Render input prompt for the bottom line (replaces keymap when in input mode).
fn input_spans(state: &RenderState, kind: InputKind) -> Vec<Span<'static>> {
    let hint_style = Style::default().fg(COLOR_TEXT_MUTED);
    let label_style = Style::default().fg(Color::Reset);
    let input_style = Style::default().fg(Color::White);
    let cursor_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::SLOW_BLINK);

    let hints = match kind {
        InputKind::ConfirmDelete => "Enter • Esc  ",
        InputKind::AddTask => "Enter • Tab • Esc  ",
        InputKind::EditTask => "Enter • Esc  ",
    };
    let mut spans = vec![Span::styled(hints, hint_style)];

    match kind {
        InputKind::ConfirmDelete => {
            spans.push(Span::styled(kind.label(), label_style));
        }
        InputKind::AddTask => {
            let quadrant = state.pending_quadrant;
            spans.push(Span::styled(format!("{} in ", kind.label()), label_style));
            spans.push(Span::styled(
                quadrant.title(),
                Style::default()
                    .fg(quadrant_color(quadrant))
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(": ", label_style));
            spans.push(Span::styled(state.input_buffer.clone(), input_style));
            spans.push(Span::styled("_", cursor_style));
        }
        InputKind::EditTask => {
            spans.push(Span::styled(format!("{}: ", kind.label()), label_style));
            spans.push(Span::styled(state.input_buffer.clone(), input_style));
            spans.push(Span::styled("_", cursor_style));
        }
    }
    spans
}

/// Right-align the NOT SAVED badge.
fn push_badge(spans: &mut Vec<Span<'static>>, width: u16) {
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let spacer_width = (width as usize)
        .saturating_sub(content_width)
        .saturating_sub(NOT_SAVED_BADGE.len());

    if spacer_width > 0 {
        spans.push(Span::raw(" ".repeat(spacer_width)));
    }

    // Caution sign colorscheme: black text on yellow background
    spans.push(Span::styled(
        NOT_SAVED_BADGE,
        Style::default().fg(Color::Black).bg(Color::Yellow),
    ));
}

/// Render notification message on the bottom line of the screen.
///
/// Displays a single-line notification with appropriate styling based on the notification level:
/// - Error: Red text with "Error:" prefix and bold styling
/// - Info: Green text without prefix
fn render_notification(frame: &mut Frame, notification: &Notification, area: Rect) {
    let notification_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, notification_area);

    let line = match notification.level {
        NotificationLevel::Error => Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                notification.message.clone(),
                Style::default().fg(Color::Red),
            ),
        ]),
        NotificationLevel::Info => Line::from(Span::styled(
            notification.message.clone(),
            Style::default().fg(Color::Green),
        )),
    };

    frame.render_widget(Paragraph::new(line), notification_area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{}~", truncated)
    }
}
