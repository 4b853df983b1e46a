//! UI rendering

use browser_core::format;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use secret_tree::{Highlight, Row, TreeNode};

use crate::app::{App, LoadState, Mode};

/// Values longer than this are cut unless they carry a search match
const VALUE_WIDTH: usize = 80;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    // Create main layout: header, search, content, footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_search(f, app, chunks[1]);
    draw_content(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let summary = match &app.state {
        LoadState::Loading => Line::from(Span::styled(
            "Loading secrets...",
            Style::default().fg(Color::DarkGray),
        )),
        LoadState::Failed(_) => Line::from(Span::styled(
            "Could not load secrets",
            Style::default().fg(Color::Red),
        )),
        LoadState::Ready => {
            let mut spans = vec![
                Span::raw(format!("Loaded {} from ", format::plural(app.secret_count, "secret"))),
                Span::styled(app.credentials.environment.clone(), Style::default().fg(Color::White).bold()),
                Span::raw(" environment"),
            ];
            if let Some(region) = &app.region {
                spans.push(Span::styled(format!("  [{}]", region), Style::default().fg(Color::DarkGray)));
            }
            if let Some(at) = app.fetched_at {
                spans.push(Span::styled(
                    format!("  at {}", format::time(at)),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
    };

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" Infisical Secrets Browser ", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" - "),
            Span::styled(
                format!("project {}", format::truncate(&app.credentials.project_id, 40)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        summary,
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn draw_search(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == Mode::Search;
    let border_color = if editing { Color::Yellow } else { Color::Blue };

    let mut spans = vec![Span::styled(" / ", Style::default().fg(Color::Cyan).bold())];
    if app.query.is_empty() && !editing {
        spans.push(Span::styled(
            "press / to search names and values",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(app.query.as_str().to_string()));
        if editing {
            spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
        }
    }

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Search ")
            .title_style(Style::default().fg(Color::Blue).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );

    f.render_widget(search, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Secrets ")
        .title_style(Style::default().fg(Color::Magenta).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    match &app.state {
        LoadState::Loading => {
            let msg = Paragraph::new(Line::from(Span::styled(
                "Authenticating and fetching secrets...",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            f.render_widget(msg, area);
        }
        LoadState::Failed(error) => {
            let msg = Paragraph::new(vec![
                Line::from(Span::styled("Error", Style::default().fg(Color::Red).bold())),
                Line::from(""),
                Line::from(error.as_str()),
                Line::from(""),
                Line::from(Span::styled(
                    "Check your credentials (browse check) and press r to retry.",
                    Style::default().fg(Color::LightRed),
                )),
            ])
            .block(block)
            .wrap(Wrap { trim: true });
            f.render_widget(msg, area);
        }
        LoadState::Ready => draw_tree(f, app, area, block),
    }
}

fn draw_tree(f: &mut Frame, app: &App, area: Rect, block: Block) {
    let rows = app.rows();

    if rows.is_empty() {
        let text = if app.query.is_empty() {
            "No secrets found"
        } else {
            "No secrets match the search"
        };
        let msg = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))))
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row_line(row, app.mask_values))).collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn row_line<'a>(row: &Row<'a>, mask_values: bool) -> Line<'a> {
    let mut spans = vec![Span::raw("  ".repeat(row.depth))];

    match row.node {
        TreeNode::Folder { name, .. } => {
            let icon = if row.open { "▾ " } else { "▸ " };
            let style = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);
            spans.push(Span::styled(icon, style));
            spans.extend(highlighted(name, row.name_match, style));
            spans.push(Span::styled(
                format!(" ({})", row.visible_children),
                Style::default().fg(Color::DarkGray),
            ));
        }
        TreeNode::Secret { name, value, .. } => {
            let style = Style::default().fg(Color::White);
            spans.push(Span::raw("  "));
            spans.extend(highlighted(name, row.name_match, style));
            spans.push(Span::styled(" : ", Style::default().fg(Color::DarkGray)));

            let value_style = Style::default().fg(Color::Green);
            if mask_values {
                spans.push(Span::styled(format::mask(value), value_style));
            } else if row.value_match.is_some() {
                spans.extend(highlighted(value, row.value_match, value_style));
            } else {
                spans.push(Span::styled(format::truncate(value, VALUE_WIDTH), value_style));
            }
        }
    }

    Line::from(spans)
}

fn highlighted(text: &str, hit: Option<Highlight>, base: Style) -> Vec<Span<'_>> {
    match hit {
        Some(h) => {
            let (before, matched, after) = h.split(text);
            vec![
                Span::styled(before, base),
                Span::styled(matched, base.fg(Color::Black).bg(Color::Yellow)),
                Span::styled(after, base),
            ]
        }
        None => vec![Span::styled(text, base)],
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    if let Some(status) = &app.status {
        let footer = Paragraph::new(Line::from(format!(" {}", status)))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(footer, area);
        return;
    }

    let help = match app.mode {
        Mode::Search => Line::from(vec![
            Span::styled(" Enter", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" done  "),
            Span::styled("Esc", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" clear search"),
        ]),
        Mode::Browse => Line::from(vec![
            Span::styled(" q", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" quit  "),
            Span::styled("/", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" search  "),
            Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" toggle  "),
            Span::styled("E/C", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" expand/collapse all  "),
            Span::styled("m", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" mask  "),
            Span::styled("?", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" help"),
        ]),
    };

    let footer = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn draw_help_overlay(f: &mut Frame) {
    let area = f.area();

    // Center the help popup
    let popup_width = 52;
    let popup_height = 18;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(x, y, popup_width.min(area.width), popup_height.min(area.height));

    f.render_widget(Clear, popup_area);

    let bindings = [
        ("  q / Esc  ", "Quit (Esc clears a search first)"),
        ("  j/k      ", "Move down/up"),
        ("  g/G      ", "Jump to top/bottom"),
        ("  Enter    ", "Open/close folder"),
        ("  l / h    ", "Open folder / close or go to parent"),
        ("  E        ", "Expand folder and everything below"),
        ("  C        ", "Collapse folder"),
        ("  /        ", "Search names and values"),
        ("  m        ", "Mask/unmask values"),
        ("  o        ", "Open folder in Infisical"),
        ("  r        ", "Refetch secrets"),
        ("  ?        ", "Toggle this help"),
    ];

    let mut help_text = vec![Line::from("")];
    for (key, action) in bindings {
        help_text.push(Line::from(vec![
            Span::styled(key, Style::default().fg(Color::Cyan)),
            Span::raw(action),
        ]));
    }
    help_text.push(Line::from(""));
    help_text.push(
        Line::from(Span::styled("Press ? to close", Style::default().fg(Color::DarkGray))).centered(),
    );

    let help_popup = Paragraph::new(help_text).block(
        Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(help_popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use browser_core::Secret;
    use secret_tree::{build_tree, visible_rows, ExpansionState, Query};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_row_line_highlights_value() {
        let tree = build_tree(&[Secret::new("DB_PORT", "5432", "/prod/db")]);
        let rows = visible_rows(&tree, &Query::new("43"), &ExpansionState::new());
        let port = rows.iter().find(|r| r.node.name() == "DB_PORT").unwrap();

        let line = row_line(port, false);
        assert_eq!(text(&line), "      DB_PORT : 5432");
        assert!(line.spans.iter().any(|s| s.content == "43" && s.style.bg == Some(Color::Yellow)));
    }

    #[test]
    fn test_row_line_masks_values() {
        let tree = build_tree(&[Secret::new("TOKEN", "hunter2", "/")]);
        let rows = visible_rows(&tree, &Query::default(), &ExpansionState::new());
        let line = row_line(&rows[0], true);
        assert!(!text(&line).contains("hunter2"));
    }

    #[test]
    fn test_folder_line_shows_count() {
        let tree = build_tree(&[Secret::new("A", "1", "/x"), Secret::new("B", "2", "/x")]);
        let rows = visible_rows(&tree, &Query::default(), &ExpansionState::new());
        assert_eq!(text(&row_line(&rows[0], false)), "▸ x (2)");
    }
}
