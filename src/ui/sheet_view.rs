use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::Theme;
use crate::config::{KeyResolver, SheetAction};
use crate::dom::{Clock, Document, Node};
use crate::sheet::platform::{NodeId, Platform};
use crate::sheet::{Sheet, VISIBLE_CLASS};

/// Rows taken by the fully open sheet, borders included.
const SHEET_HEIGHT: u16 = 9;
const MAX_WIDTH: u16 = 72;

/// Draws an attached sheet sliding up from the bottom edge.
///
/// The slide position follows the content node's presentation class and
/// transition duration, so the animation tracks `show()` and `hide()`
/// without the view holding any timing state of its own.
#[derive(Debug, Default)]
pub struct SheetView {
    hits: Vec<(Rect, NodeId)>,
}

impl SheetView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The clickable node under a terminal cell, from the last render.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<NodeId> {
        self.hits
            .iter()
            .find(|(area, _)| {
                column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
            })
            .map(|(_, node)| *node)
    }

    pub fn render<C: Clock>(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        sheet: &Sheet<Document<C>>,
        resolver: &KeyResolver,
    ) {
        self.hits.clear();

        let doc = sheet.platform();
        let nodes = sheet.nodes();
        if !doc.is_attached(nodes.modal) {
            return;
        }
        let Some(content) = doc.node(nodes.content) else {
            return;
        };

        let openness = openness(content, doc.now());
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.backdrop())),
            area,
        );

        let width = area.width.min(MAX_WIDTH);
        let full_height = SHEET_HEIGHT.min(area.height);
        let height = visible_rows(full_height, openness);
        if width == 0 || height == 0 {
            return;
        }
        let sheet_area = Rect::new(
            area.x + (area.width - width) / 2,
            area.bottom() - height,
            width,
            height,
        );
        frame.render_widget(Clear, sheet_area);

        let block = Block::default()
            .title(" Link ")
            .title_style(Style::default().fg(theme.title()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.background()));

        // Lay out as if fully open, then clip to what has slid into view
        let full_area = Rect::new(sheet_area.x, sheet_area.y, width, full_height);
        let inner = block.inner(full_area);
        let clip = block.inner(sheet_area);
        frame.render_widget(block, sheet_area);

        let [prompt_row, _, input_area, buttons_row, hints_row] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let fully_open = height == full_height;

        if let Some(prompt) = doc.node(nodes.prompt) {
            let paragraph = Paragraph::new(prompt.text.clone())
                .style(Style::default().fg(theme.text()).add_modifier(Modifier::BOLD));
            render_clipped(frame, paragraph, prompt_row, clip);
        }

        let input_focused = doc.focused() == Some(nodes.input);
        if let Some(input) = doc.node(nodes.input) {
            render_input(frame, input, input_area, clip, theme, sheet.is_valid(), input_focused);
            if fully_open {
                self.hits.push((input_area, nodes.input));
            }
        }

        let buttons: Vec<NodeId> = nodes
            .cancel
            .into_iter()
            .chain([nodes.remove, nodes.confirm])
            .collect();
        let mut x = buttons_row.right();
        let mut spans = Vec::new();
        for id in buttons.iter().rev() {
            let Some(button) = doc.node(*id) else {
                continue;
            };
            let label = format!("[ {} ]", button.text);
            let label_width = u16::try_from(label.chars().count()).unwrap_or(u16::MAX);
            x = x.saturating_sub(label_width + 1).max(buttons_row.x);

            let mut style = Style::default().fg(if button.disabled {
                theme.disabled()
            } else {
                theme.text()
            });
            if doc.focused() == Some(*id) {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            spans.push(Span::styled(label, style));

            if fully_open && !button.disabled {
                let hit = Rect::new(x, buttons_row.y, label_width, 1).intersection(buttons_row);
                self.hits.push((hit, *id));
            }
        }
        spans.reverse();
        let spans: Vec<Span> = spans
            .into_iter()
            .flat_map(|span| [span, Span::raw(" ")])
            .collect();
        render_clipped(
            frame,
            Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
            buttons_row,
            clip,
        );

        let key_style = Style::default().fg(theme.key_hint()).add_modifier(Modifier::BOLD);
        let hint_style = Style::default().fg(theme.muted());
        let hints = Line::from(vec![
            Span::styled(resolver.display_sheet(SheetAction::Submit), key_style),
            Span::styled(" save  ", hint_style),
            Span::styled(resolver.display_sheet(SheetAction::Dismiss), key_style),
            Span::styled(" cancel  ", hint_style),
            Span::styled(resolver.display_sheet(SheetAction::Next), key_style),
            Span::styled(" next", hint_style),
        ]);
        render_clipped(frame, Paragraph::new(hints), hints_row, clip);
    }
}

fn render_input(
    frame: &mut Frame,
    input: &Node,
    area: Rect,
    clip: Rect,
    theme: &Theme,
    valid: bool,
    focused: bool,
) {
    let border = match (focused, valid, input.field.value().is_empty()) {
        (_, true, _) => theme.valid(),
        (true, false, false) => theme.invalid(),
        (true, false, true) => theme.border_focused(),
        (false, false, _) => theme.border(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.input_background()));

    let text_width = usize::from(block.inner(area).width.max(1));
    let line = input_line(input, text_width, focused, theme);
    render_clipped(frame, Paragraph::new(line).block(block), area, clip);
}

/// How far open the content is, from 0.0 (hidden) to 1.0 (shown).
fn openness(content: &Node, now: std::time::Instant) -> f64 {
    let progress = content.transition_progress(now);
    if content.has_class(VISIBLE_CLASS) {
        progress
    } else {
        1.0 - progress
    }
}

// Clamped to 0..=full_height before the cast
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn visible_rows(full_height: u16, openness: f64) -> u16 {
    (f64::from(full_height) * openness)
        .round()
        .clamp(0.0, f64::from(full_height)) as u16
}

/// Render `widget` only if `area` lies entirely within `clip`.
fn render_clipped(frame: &mut Frame, widget: Paragraph<'_>, area: Rect, clip: Rect) {
    if !area.is_empty() && area.intersection(clip) == area {
        frame.render_widget(widget, area);
    }
}

/// The input's text, scrolled so the cursor stays in view.
fn input_line(input: &Node, width: usize, focused: bool, theme: &Theme) -> Line<'static> {
    let value = input.field.value();
    let chars: Vec<char> = value
        .chars()
        .map(|c| if c == '\n' { '⏎' } else { c })
        .collect();
    let cursor = value[..input.field.cursor()].chars().count();
    let start = cursor.saturating_sub(width.saturating_sub(1));

    let text_style = Style::default().fg(theme.text());
    if !focused {
        let visible: String = chars.iter().skip(start).take(width).collect();
        return Line::from(Span::styled(visible, text_style));
    }

    let before: String = chars[start..cursor].iter().collect();
    let at = chars.get(cursor).copied().unwrap_or(' ');
    let after: String = chars.iter().skip(cursor + 1).take(width.saturating_sub(cursor - start + 1)).collect();
    let cursor_style = Style::default()
        .fg(theme.background())
        .bg(theme.text())
        .add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled(before, text_style),
        Span::styled(at.to_string(), cursor_style),
        Span::styled(after, text_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ManualClock;
    use crate::sheet::DEFAULT_TRANSITION;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn render(view: &mut SheetView, sheet: &Sheet<Document<ManualClock>>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        let resolver = KeyResolver::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.render(frame, area, &Theme::default(), sheet, &resolver);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(ratatui::buffer::Cell::symbol).collect()
    }

    fn sheet(clock: &ManualClock) -> Sheet<Document<ManualClock>> {
        let doc = Document::new(clock.clone());
        Sheet::new(doc, Arc::default(), "Paste the link", Some("https://example.com")).unwrap()
    }

    #[test]
    fn test_hidden_sheet_renders_nothing() {
        let clock = ManualClock::new();
        let sheet = sheet(&clock);
        let mut view = SheetView::new();

        let screen = render(&mut view, &sheet);

        assert!(!screen.contains("Paste the link"));
        assert_eq!(view.hit_test(30, 14), None);
    }

    #[test]
    fn test_open_sheet_shows_prompt_and_buttons() {
        let clock = ManualClock::new();
        let mut sheet = sheet(&clock);
        let mut view = SheetView::new();
        sheet.show();
        clock.advance(DEFAULT_TRANSITION);

        let screen = render(&mut view, &sheet);

        assert!(screen.contains("Paste the link"));
        assert!(screen.contains("https://example.com"));
        assert!(screen.contains("[ Save ]"));
        assert!(screen.contains("[ Cancel ]"));
    }

    #[test]
    fn test_sheet_slides_in() {
        let clock = ManualClock::new();
        let mut sheet = sheet(&clock);
        let mut view = SheetView::new();
        sheet.show();

        let screen = render(&mut view, &sheet);
        assert!(!screen.contains("Paste the link"));
        assert!(view.hits.is_empty());

        clock.advance(DEFAULT_TRANSITION);
        render(&mut view, &sheet);
        assert!(!view.hits.is_empty());
    }

    #[test]
    fn test_hit_test_finds_enabled_buttons() {
        let clock = ManualClock::new();
        let mut sheet = sheet(&clock);
        let mut view = SheetView::new();
        sheet.show();
        clock.advance(DEFAULT_TRANSITION);
        render(&mut view, &sheet);

        let nodes = sheet.nodes();
        let confirm = view
            .hits
            .iter()
            .find(|(_, node)| *node == nodes.confirm)
            .map(|(area, _)| *area)
            .unwrap();
        assert_eq!(view.hit_test(confirm.x, confirm.y), Some(nodes.confirm));

        let input = view
            .hits
            .iter()
            .find(|(_, node)| *node == nodes.input)
            .map(|(area, _)| *area)
            .unwrap();
        assert_eq!(view.hit_test(input.x + 1, input.y + 1), Some(nodes.input));
    }

    #[test]
    fn test_openness_follows_class_and_duration() {
        let clock = ManualClock::new();
        let mut sheet = sheet(&clock);
        sheet.show();
        let content = sheet.nodes().content;

        let node = sheet.platform().node(content).unwrap();
        assert!(openness(node, clock.now()).abs() < f64::EPSILON);
        assert!((openness(node, clock.now() + DEFAULT_TRANSITION / 2) - 0.5).abs() < 1e-9);

        clock.advance(DEFAULT_TRANSITION);
        sheet.hide();
        let node = sheet.platform().node(content).unwrap();
        assert!((openness(node, clock.now()) - 1.0).abs() < f64::EPSILON);
        assert!(openness(node, clock.now() + DEFAULT_TRANSITION).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reshow_during_hide_continues_from_current_position() {
        let clock = ManualClock::new();
        let mut sheet = sheet(&clock);
        let content = sheet.nodes().content;
        sheet.show();
        clock.advance(DEFAULT_TRANSITION);

        sheet.hide();
        clock.advance(DEFAULT_TRANSITION * 3 / 10);
        let node = sheet.platform().node(content).unwrap();
        assert!((openness(node, clock.now()) - 0.7).abs() < 1e-9);

        sheet.show();
        let node = sheet.platform().node(content).unwrap();
        assert!((openness(node, clock.now()) - 0.7).abs() < 1e-9);
        assert!((openness(node, clock.now() + DEFAULT_TRANSITION * 3 / 10) - 1.0).abs() < 1e-9);
    }
}
