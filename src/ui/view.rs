//! Rendering. Everything here is a function of [`App`] state.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use super::app::{App, Tab};
use super::theme::Theme;
use crate::flow::{DocumentSummaryFlow, TextSummaryFlow, MAX_CHARS};

/// Spinner frames for the loading button.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

pub fn render(f: &mut Frame, app: &App, theme: &Theme) {
    let [header, tabs, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_header(f, header, theme);
    render_tabs(f, tabs, app.tab, theme);
    match app.tab {
        Tab::Text => render_text_tab(f, body, &app.text, app.tick, theme),
        Tab::Document => {
            render_document_tab(f, body, &app.document, &app.path_input, app.tick, theme)
        }
    }
    render_footer(f, footer, app.tab, theme);
}

fn render_header(f: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from(vec![
            Span::styled("crux", Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            Span::styled("AI", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(
            "TEXT & DOCUMENT SUMMARY",
            Style::default().fg(theme.dim),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_tabs(f: &mut Frame, area: Rect, tab: Tab, theme: &Theme) {
    let tabs = Tabs::new(Tab::TITLES)
        .select(tab.index())
        .style(Style::default().fg(theme.dim))
        .highlight_style(
            Style::default()
                .fg(theme.tab_active_fg)
                .bg(theme.tab_active_bg)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" ");
    let [centered] = Layout::horizontal([Constraint::Length(22)])
        .flex(ratatui::layout::Flex::Center)
        .areas(area);
    f.render_widget(tabs, centered);
}

fn render_text_tab(f: &mut Frame, area: Rect, flow: &TextSummaryFlow, tick: usize, theme: &Theme) {
    let error_height = if flow.error_message().is_empty() { 0 } else { 3 };
    let summary = flow.summary();
    let input_constraint = if summary.is_empty() {
        Constraint::Min(5)
    } else {
        Constraint::Percentage(40)
    };

    let [input, counter, error, button, output] = Layout::vertical([
        input_constraint,
        Constraint::Length(1),
        Constraint::Length(error_height),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    // Text area with a trailing cursor, scrolled to keep the end in view
    let mut content = flow.content().to_string();
    if !flow.is_loading() {
        content.push('\u{2588}');
    }
    let inner_width = input.width.saturating_sub(2).max(1);
    let inner_height = input.height.saturating_sub(2);
    let scroll = tail_scroll(&content, inner_width, inner_height);
    let placeholder = flow.content().is_empty();
    let text_style = if placeholder {
        Style::default().fg(theme.dim)
    } else {
        Style::default().fg(theme.text)
    };
    let shown = if placeholder {
        "Paste your text here (articles, reports, emails)...".to_string()
    } else {
        content
    };
    f.render_widget(
        Paragraph::new(shown)
            .style(text_style)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(bordered(theme)),
        input,
    );

    let count_style = if flow.near_limit() {
        Style::default().fg(theme.error)
    } else {
        Style::default().fg(theme.dim)
    };
    f.render_widget(
        Paragraph::new(format!("{} / {} characters", flow.char_count(), MAX_CHARS))
            .style(count_style),
        counter,
    );

    render_error(f, error, flow.error_message(), theme);
    render_button(
        f,
        button,
        "Summarize Text",
        flow.is_loading(),
        flow.can_submit(),
        tick,
        theme,
    );

    if !summary.is_empty() {
        let title = match flow.phase().finished_at() {
            Some(at) => format!(" Summary: ({}) ", at.format("%H:%M:%S")),
            None => " Summary: ".to_string(),
        };
        render_card(f, output, &title, summary, theme);
    }
}

fn render_document_tab(
    f: &mut Frame,
    area: Rect,
    flow: &DocumentSummaryFlow,
    path_input: &str,
    tick: usize,
    theme: &Theme,
) {
    let error_height = if flow.error_message().is_empty() { 0 } else { 3 };
    let [upload, error, button, results] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(error_height),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let status = match flow.selected_file() {
        Some(file) => Line::from(Span::styled(
            format!("Selected: {} ({})", file.name, human_size(file.size())),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "Type a path and press Enter to select a file",
            Style::default().fg(theme.text),
        )),
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Path: ", Style::default().fg(theme.dim)),
            Span::styled(path_input.to_string(), Style::default().fg(theme.text)),
            Span::styled("\u{2588}", Style::default().fg(theme.accent)),
        ]),
        status,
        Line::from(Span::styled("PDF files only", Style::default().fg(theme.dim))),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(bordered(theme)),
        upload,
    );

    render_error(f, error, flow.error_message(), theme);
    render_button(
        f,
        button,
        "Summarize Document",
        flow.is_loading(),
        flow.can_submit(),
        tick,
        theme,
    );

    // Only populated sections are shown
    let sections: Vec<(&str, &str)> = [
        (" Extracted Text: ", flow.extracted_text()),
        (" Summary: ", flow.summary()),
    ]
    .into_iter()
    .filter_map(|(title, content)| content.map(|c| (title, c)))
    .collect();

    if sections.is_empty() {
        return;
    }
    let areas = Layout::vertical(vec![Constraint::Ratio(1, sections.len() as u32); sections.len()])
        .split(results);
    for ((title, content), area) in sections.into_iter().zip(areas.iter()) {
        render_card(f, *area, title, content, theme);
    }
}

fn render_error(f: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    if message.is_empty() || area.height == 0 {
        return;
    }
    f.render_widget(
        Paragraph::new(message.to_string())
            .style(theme.error_style())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.error)),
            ),
        area,
    );
}

fn render_button(
    f: &mut Frame,
    area: Rect,
    label: &str,
    loading: bool,
    enabled: bool,
    tick: usize,
    theme: &Theme,
) {
    let text = if loading {
        format!("{} Summarizing...", spinner_char(tick))
    } else {
        label.to_string()
    };
    let style = theme.button_style(enabled && !loading);
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(style)
            .block(bordered(theme)),
        area,
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, content: &str, theme: &Theme) {
    if area.height < 3 {
        return;
    }
    f.render_widget(
        Paragraph::new(content.to_string())
            .style(Style::default().fg(theme.text))
            .wrap(Wrap { trim: false })
            .block(
                bordered(theme).title(Span::styled(
                    title.to_string(),
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                )),
            ),
        area,
    );
}

fn render_footer(f: &mut Frame, area: Rect, tab: Tab, theme: &Theme) {
    let hints = match tab {
        Tab::Text => "Tab switch \u{2502} Ctrl-S summarize \u{2502} Ctrl-U clear \u{2502} Esc quit",
        Tab::Document => {
            "Tab switch \u{2502} Enter select \u{2502} Ctrl-S summarize \u{2502} Ctrl-U clear \u{2502} Esc quit"
        }
    };
    f.render_widget(
        Paragraph::new(hints)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.dim)),
        area,
    );
}

fn bordered(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
}

/// Rows to scroll so the last wrapped line stays visible.
fn tail_scroll(text: &str, width: u16, height: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = text
        .split('\n')
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum();
    rows.saturating_sub(height as usize).min(u16::MAX as usize) as u16
}

fn human_size(bytes: usize) -> String {
    match bytes {
        b if b < 1024 => format!("{b} B"),
        b if b < 1024 * 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
    }
}
