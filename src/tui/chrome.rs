// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, footer, help, and style helpers used by TUI rendering.
fn stack_sidebar_below(area: Rect) -> bool {
    area.width < 90
}

fn view_title(label: &str, key: char, tail: Option<&str>) -> String {
    let mut title = format!("─[{key}]─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn panel_border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default()
    }
}

fn rgb_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn label_style(label: &LabelButton) -> Style {
    match label.color {
        Some(rgb) => Style::default().fg(Color::Black).bg(rgb_color(rgb)),
        None => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    }
}

fn tile_border_style(is_cursor: bool, is_selected: bool, grid_focused: bool) -> Style {
    match (is_selected, is_cursor && grid_focused) {
        (true, _) => Style::default()
            .fg(SELECTED_COLOR)
            .add_modifier(Modifier::BOLD),
        (false, true) => Style::default().fg(FOOTER_KEY_COLOR),
        (false, false) => Style::default().fg(Color::DarkGray),
    }
}

/// File name shown in place of an image.
fn image_caption(path: &str) -> &str {
    path.rsplit(|ch| ch == '/' || ch == '\\').next().unwrap_or(path)
}

fn attempts_label(left: u32, max: u32) -> String {
    let width = max.to_string().len();
    format!("[{left:0width$}/{max}]")
}

/// First grid row to draw so that `cursor_row` stays inside `visible_rows`.
fn grid_scroll_for(cursor_row: usize, current: usize, visible_rows: usize) -> usize {
    let visible_rows = visible_rows.max(1);
    if cursor_row < current {
        cursor_row
    } else if cursor_row >= current + visible_rows {
        cursor_row + 1 - visible_rows
    } else {
        current
    }
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn footer_help_line(screen: &ResultsScreen, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let bar = &screen.view.search_bar;
    let controller = &screen.controller;

    if screen.palette.is_some() {
        push_footer_entry(&mut spans, "pick", "Enter");
        push_footer_entry(&mut spans, "close", "Esc");
    } else if controller.help_open() {
        push_footer_entry(&mut spans, "scroll", "j/k");
        push_footer_entry(&mut spans, "close", "Esc/?");
    } else if controller.context().is_some() {
        push_footer_entry(&mut spans, "select", "Enter");
        push_footer_entry(&mut spans, "answer", "a");
        if screen.view.context_controls.visible(true) {
            push_footer_entry(&mut spans, "shift", "</>");
        }
        push_footer_entry(&mut spans, "close", "Esc");
    } else {
        match screen.focus {
            Focus::Query => {
                push_footer_entry(&mut spans, bar.primary_label, "Enter");
                push_footer_entry(&mut spans, "grid", "Esc");
            }
            Focus::TopClasses => {
                push_footer_entry(&mut spans, "add", "Enter");
                push_footer_entry(&mut spans, "grid", "Esc");
            }
            Focus::Grid => {
                push_footer_entry(&mut spans, "select", "Enter");
                push_footer_entry(&mut spans, "answer", "a");
                push_footer_entry(&mut spans, "label", "1-9");
                push_footer_entry_maybe_disabled(&mut spans, "query", "/", !bar.input_visible);
                if bar.similarity_visible {
                    push_footer_entry(&mut spans, bar.similarity_label, "s");
                }
                push_footer_entry(&mut spans, "bayes", "b");
                push_footer_entry(&mut spans, "next", "n");
            }
        }
        push_footer_entry(&mut spans, "help", "?");
        push_footer_entry(&mut spans, "quit", "q");
    }

    if let Some(message) = toast_suffix.strip_prefix(" | ") {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
        spans.push(Span::raw(message.to_owned()));
    }

    Line::from(spans)
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn help_lines() -> Vec<Line<'static>> {
    let key_style = help_key_style();
    let header_style = help_header_style();
    let key_col_width = "←/→/↑/↓, h/j/k/l".len();

    let mut lines = Vec::<Line<'static>>::new();

    lines.push(Line::from(Span::styled("--- Results ---", header_style)));
    lines.push(help_kv("←/→/↑/↓, h/j/k/l", "Move between images", key_col_width, key_style));
    lines.push(help_kv("Enter/Space", "Select image (again: show context)", key_col_width, key_style));
    lines.push(help_kv("a", "Submit image as the answer", key_col_width, key_style));
    lines.push(help_kv("1-9", "Add class of the image to the query", key_col_width, key_style));
    lines.push(help_kv("+/-", "Show more/fewer classes", key_col_width, key_style));
    lines.push(help_kv("s, Ctrl-s", "Similarity search from selection", key_col_width, key_style));
    lines.push(help_kv("b", "Relevance feedback from selection", key_col_width, key_style));
    lines.push(help_kv("n", "Skip to the next searched image", key_col_width, key_style));
    lines.push(help_kv("c", "Clear the query", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Query ---", header_style)));
    lines.push(help_kv("/, i", "Edit the text query", key_col_width, key_style));
    lines.push(help_kv("Enter", "Search", key_col_width, key_style));
    lines.push(help_kv("Tab", "Cycle grid/query/top classes", key_col_width, key_style));
    lines.push(help_kv("\\", "Find a class by name", key_col_width, key_style));
    lines.push(help_kv("Esc", "Back to the grid", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Context ---", header_style)));
    lines.push(help_kv("←/→", "Move between neighbors", key_col_width, key_style));
    lines.push(help_kv("Enter", "Select neighbor", key_col_width, key_style));
    lines.push(help_kv("a", "Submit the center image", key_col_width, key_style));
    lines.push(help_kv("</>", "Shift the window", key_col_width, key_style));
    lines.push(help_kv("Esc", "Close", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Help ---", header_style)));
    lines.push(help_kv("j/k, ↑/↓", "Scroll help", key_col_width, key_style));
    lines.push(help_kv("Esc/?", "Close help", key_col_width, key_style));
    lines.push(help_kv("q", "Quit", key_col_width, key_style));
    lines
}

fn render_help(frame: &mut Frame<'_>, help_scroll: &mut u16, main_area: Rect) {
    let area = centered_rect(82, 84, main_area);
    frame.render_widget(Clear, area);

    let lines = help_lines();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Help ─")
        .border_style(Style::default().fg(FOCUS_COLOR))
        .title_style(
            Style::default()
                .fg(FOCUS_COLOR)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    let max_scroll = lines
        .len()
        .saturating_sub(inner.height.max(1) as usize)
        .min(u16::MAX as usize) as u16;
    *help_scroll = (*help_scroll).min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .scroll((*help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_confirm(frame: &mut Frame<'_>, backdrop: &Buffer, message: &str) {
    frame.buffer_mut().merge(backdrop);

    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let lines = vec![
        Line::from(message.to_owned()),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", key_style),
            Span::raw(" yes   "),
            Span::styled("[n]", key_style),
            Span::raw(" no"),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(WARNING_COLOR))
        .title("─ Gasearch ─");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_maybe_disabled(spans, label, value, false);
}

fn push_footer_entry_maybe_disabled(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    disabled: bool,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.extend(footer_value_spans(value, disabled));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn footer_value_spans(value: &str, disabled: bool) -> Vec<Span<'static>> {
    let color = if disabled {
        Color::DarkGray
    } else {
        FOOTER_KEY_COLOR
    };
    vec![Span::styled(
        value.to_owned(),
        Style::default()
            .fg(color)
            .add_modifier(Modifier::BOLD),
    )]
}
