use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::SessionContext;
use crate::domain::{SummaryResult, Table};
use crate::tui::app::{ActivePane, TuiApp};

pub fn render(frame: &mut Frame, app: &TuiApp, ctx: &SessionContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35), // Content pane
            Constraint::Percentage(30), // Tables pane
            Constraint::Min(8),         // Summary pane
            Constraint::Length(1),      // Status bar
        ])
        .split(frame.area());

    render_content_pane(frame, app, ctx, chunks[0]);
    render_tables_pane(frame, app, ctx, chunks[1]);
    render_summary_pane(frame, app, ctx, chunks[2]);
    render_status_bar(frame, app, ctx, chunks[3]);
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_content_pane(frame: &mut Frame, app: &TuiApp, ctx: &SessionContext, area: Rect) {
    let (title, content) = if let Some(extract) = &ctx.extract {
        let title = format!(
            " Content — {} ({}) ",
            extract.url,
            extract.fetched_at.format("%H:%M:%S")
        );
        let text = if extract.raw_text.is_empty() {
            Text::from("Page contained no text content")
        } else {
            Text::from(extract.raw_text.as_str())
        };
        (title, text)
    } else {
        (
            " Content ".to_string(),
            Text::from("No page scraped yet — press s"),
        )
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(app.active_pane == ActivePane::Content));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.content_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_tables_pane(frame: &mut Frame, app: &TuiApp, ctx: &SessionContext, area: Rect) {
    let is_active = app.active_pane == ActivePane::Tables;

    let mut lines: Vec<Line> = Vec::new();
    let table_count = ctx.extract.as_ref().map(|e| e.tables.len()).unwrap_or(0);

    if let Some(extract) = &ctx.extract {
        if extract.tables.is_empty() {
            lines.push(Line::from("No tables on this page"));
        } else {
            for (index, table) in extract.tables.iter().enumerate() {
                let label = format!("Table {} ({} rows)", index + 1, table.len());
                let style = if index == app.table_index && is_active {
                    Style::default()
                        .bg(Color::Cyan)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else if index == app.table_index {
                    Style::default().bg(Color::DarkGray)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(label, style)));
            }

            if let Some(table) = extract.tables.get(app.table_index) {
                lines.push(Line::from(""));
                let preview_rows = (area.height as usize).saturating_sub(table_count + 4);
                lines.extend(table_lines(table, preview_rows.max(3)));
            }
        }
    } else {
        lines.push(Line::from("Scrape a page to see its tables"));
    }

    let title = format!(" Tables ({table_count}) ");
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

/// Render a table as pipe-separated rows; the first row is the header by
/// convention.
fn table_lines(table: &Table, max_rows: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, row) in table.iter().take(max_rows).enumerate() {
        let joined = row.join(" | ");
        if index == 0 {
            lines.push(Line::from(Span::styled(
                joined,
                Style::default().add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(joined));
        }
    }
    if table.len() > max_rows {
        lines.push(Line::from(Span::styled(
            format!("... {} more rows", table.len() - max_rows),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn render_summary_pane(frame: &mut Frame, app: &TuiApp, ctx: &SessionContext, area: Rect) {
    let content = if let Some(summary) = &ctx.summary {
        let lines: Vec<Line> = summary_lines(summary).into_iter().map(Line::from).collect();
        Text::from(lines)
    } else if ctx.extract.is_some() {
        Text::from("Press a to analyze the scraped content")
    } else {
        Text::from("Login (l), scrape (s), then analyze (a)")
    };

    let title = match &ctx.summary {
        Some(SummaryResult::Structured(_)) => " Summary ",
        Some(SummaryResult::Raw(_)) => " Summary (raw model reply) ",
        None => " Summary ",
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(app.active_pane == ActivePane::Summary));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.summary_scroll, 0));

    frame.render_widget(paragraph, area);
}

/// Shared rendering of a summary as display lines; the CLI prints the same
/// lines the TUI draws.
pub fn summary_lines(summary: &SummaryResult) -> Vec<String> {
    match summary {
        SummaryResult::Structured(summary) => {
            let mut lines = vec![
                format!("Total claims: {}", summary.total_claims),
                format!("Ready to move forward: {}", summary.ready_claims.len()),
            ];
            for claim in &summary.ready_claims {
                let mut line = format!("  {} — {}", claim.id, claim.status);
                if let Some(next_step) = &claim.next_step {
                    line.push_str(&format!(" (next: {next_step})"));
                }
                lines.push(line);
            }
            if !summary.attention_items.is_empty() {
                lines.push(format!("Needs attention: {}", summary.attention_items.len()));
                for item in &summary.attention_items {
                    lines.push(format!("  {item}"));
                }
            }
            if let Some(notes) = &summary.notes {
                lines.push(String::new());
                lines.push(format!("Notes: {notes}"));
            }
            lines
        }
        SummaryResult::Raw(text) => text.lines().map(String::from).collect(),
    }
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, ctx: &SessionContext, area: Rect) {
    let status = if let Some(ref busy) = app.busy_message {
        busy.clone()
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else {
        let auth = if ctx.is_authenticated() {
            "authenticated"
        } else {
            "not logged in"
        };
        format!("[{auth}]  l:Login  c:Check  s:Scrape  a:Analyze  e:Export  j/k:Scroll  Tab:Pane  q:Quit")
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}
