use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tui_textarea::TextArea;
use unicode_width::UnicodeWidthStr;

use crate::app::{ConfirmChoice, Dialog, DialogForm, FilePicker, Focus, PickerMode, Toasts};
use crate::core::{Menu, Severity, StatusProjection};

pub struct UiModel<'a> {
    pub editor: &'a TextArea<'static>,
    pub status: StatusProjection,
    pub menu: Option<Menu>,
    pub menu_selected: usize,
    pub dialog: Option<&'a Dialog>,
    pub toasts: &'a Toasts,
}

const BAR: Style = Style::new().fg(Color::White).bg(Color::Blue);
const FOCUSED: Style = Style::new().fg(Color::Yellow);

pub fn draw(frame: &mut Frame<'_>, model: UiModel<'_>) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_menu_bar(frame, chunks[0], model.menu);
    frame.render_widget(model.editor, chunks[1]);
    draw_status(frame, chunks[2], &model.status);
    draw_toasts(frame, chunks[1], model.toasts);

    if let Some(menu) = model.menu {
        draw_dropdown(frame, chunks[1], menu, model.menu_selected);
    }
    if let Some(dialog) = model.dialog {
        draw_dialog(frame, area, dialog);
    }
}

/// Column where each menu title starts on the bar.
fn menu_offset(menu: Menu) -> u16 {
    let mut x = 1;
    for m in Menu::ALL {
        if m == menu {
            break;
        }
        x += m.title().width() as u16 + 2;
    }
    x
}

fn draw_menu_bar(frame: &mut Frame<'_>, area: Rect, open: Option<Menu>) {
    let mut spans = vec![Span::raw(" ")];
    for menu in Menu::ALL {
        let style = if open == Some(menu) {
            BAR.add_modifier(Modifier::REVERSED)
        } else {
            BAR
        };
        spans.push(Span::styled(format!(" {} ", menu.title()), style));
    }
    spans.push(Span::raw("  F10 menu | F1 about"));
    frame.render_widget(Paragraph::new(Line::from(spans)).style(BAR), area);
}

fn draw_dropdown(frame: &mut Frame<'_>, area: Rect, menu: Menu, selected: usize) {
    let items = menu.items();
    let label_w = items.iter().map(|i| i.label.width()).max().unwrap_or(0);
    let key_w = items.iter().map(|i| i.shortcut.width()).max().unwrap_or(0);
    let width = ((label_w + key_w + 6) as u16).min(area.width);
    // Slides left when the title sits too close to the right edge.
    let x = (area.x + menu_offset(menu)).min(area.right().saturating_sub(width));
    let rect = Rect {
        x,
        y: area.y,
        width,
        height: (items.len() as u16 + 2).min(area.height),
    }
    .intersection(area);
    if rect.is_empty() {
        return;
    }

    let lines: Vec<ListItem> = items
        .iter()
        .map(|item| {
            ListItem::new(format!(
                "{:<label_w$}  {:>key_w$}",
                item.label, item.shortcut
            ))
        })
        .collect();
    let mut state = ListState::default();
    state.select(Some(selected));

    frame.render_widget(Clear, rect);
    frame.render_stateful_widget(
        List::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
        rect,
        &mut state,
    );
}

fn draw_status(frame: &mut Frame<'_>, area: Rect, status: &StatusProjection) {
    let left = format!(
        " Ln {}, Col {} | Words {} | {}",
        status.line, status.col, status.words, status.encoding
    );
    let right = format!("{} ", status.display_name());
    let gap = (area.width as usize).saturating_sub(left.width() + right.width());
    let text = format!("{left}{}{right}", " ".repeat(gap.max(1)));
    frame.render_widget(Paragraph::new(text).style(BAR), area);
}

fn draw_toasts(frame: &mut Frame<'_>, area: Rect, toasts: &Toasts) {
    if toasts.is_empty() {
        return;
    }
    let lines: Vec<Line> = toasts
        .iter()
        .map(|toast| {
            let color = match toast.severity {
                Severity::Info => Color::Green,
                Severity::Warning => Color::Yellow,
                Severity::Error => Color::Red,
            };
            Line::styled(toast.message.clone(), Style::default().fg(color))
        })
        .collect();
    let widest = toasts.iter().map(|t| t.message.width()).max().unwrap_or(0);
    let width = (widest as u16 + 2).min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y + area.height.saturating_sub(height),
        width,
        height,
    };
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        rect,
    );
}

fn draw_dialog(frame: &mut Frame<'_>, area: Rect, dialog: &Dialog) {
    match &dialog.form {
        DialogForm::Confirm {
            title,
            message,
            choice,
        } => {
            let rect = centered_rect(60, 30, area);
            frame.render_widget(Clear, rect);
            let yes = if *choice == ConfirmChoice::Yes {
                "[Yes]"
            } else {
                " Yes "
            };
            let no = if *choice == ConfirmChoice::No {
                "[No]"
            } else {
                " No "
            };
            let widget = Paragraph::new(format!("{message}\n\n{yes}   {no}"))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false })
                .block(Block::default().title(title.as_str()).borders(Borders::ALL));
            frame.render_widget(widget, rect);
        }
        DialogForm::Input {
            title,
            placeholder,
            value,
        } => {
            let rect = centered_rect(40, 20, area);
            frame.render_widget(Clear, rect);
            let textarea = input_field(title, placeholder, value, true);
            frame.render_widget(&textarea, rect);
        }
        DialogForm::Info { title, lines } => {
            let rect = centered_rect(60, 50, area);
            frame.render_widget(Clear, rect);
            let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
            let widget = Paragraph::new(text)
                .alignment(Alignment::Left)
                .block(Block::default().title(title.as_str()).borders(Borders::ALL));
            frame.render_widget(widget, rect);
        }
        DialogForm::Picker(picker) => draw_picker(frame, area, picker),
    }
}

fn draw_picker(frame: &mut Frame<'_>, area: Rect, picker: &FilePicker) {
    let rect = centered_rect(80, 70, area);
    frame.render_widget(Clear, rect);

    let (title, field_title, hint) = match picker.mode {
        PickerMode::Open => (
            "Open",
            "Encoding (blank = auto)",
            "Tab focus | Enter open | Backspace up | Esc cancel",
        ),
        PickerMode::Save => (
            "Save As",
            "File name",
            "Tab focus | Enter save | Backspace up | Esc cancel",
        ),
    };
    let outer = Block::default().title(title).borders(Borders::ALL);
    let inner = outer.inner(rect);
    frame.render_widget(outer, rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let path = input_field("Path", "", &picker.path_input, picker.focus == Focus::Path);
    frame.render_widget(&path, chunks[0]);

    let mut rows = Vec::with_capacity(picker.row_count());
    if picker.has_parent() {
        rows.push(ListItem::new("../"));
    }
    for entry in &picker.entries {
        let item = if entry.is_dir {
            ListItem::new(format!("{}/", entry.name)).style(Style::default().fg(Color::Cyan))
        } else {
            ListItem::new(entry.name.as_str())
        };
        rows.push(item);
    }
    let mut state = ListState::default();
    if picker.row_count() > 0 {
        state.select(Some(picker.selected));
    }
    let mut block = Block::default()
        .title(picker.dir.display().to_string())
        .borders(Borders::ALL);
    if picker.focus == Focus::Entries {
        block = block.border_style(FOCUSED);
    }
    frame.render_stateful_widget(
        List::new(rows)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
        chunks[1],
        &mut state,
    );

    let field = input_field(field_title, "", &picker.field, picker.focus == Focus::Field);
    frame.render_widget(&field, chunks[2]);
    frame.render_widget(Paragraph::new(hint), chunks[3]);
}

fn input_field<'a>(title: &'a str, placeholder: &str, value: &str, focused: bool) -> TextArea<'a> {
    let mut textarea = TextArea::default();
    textarea.insert_str(value);
    if !placeholder.is_empty() {
        textarea.set_placeholder_text(placeholder);
    }
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block = block.border_style(FOCUSED);
    } else {
        textarea.set_cursor_style(Style::default());
    }
    textarea.set_block(block);
    textarea.set_cursor_line_style(Style::default());
    textarea
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
