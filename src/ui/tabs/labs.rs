use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::LabResult;
use crate::ui::styles;
use crate::ui::tabs::{loadable_status, render_status};
use crate::utils::{format_opt_date, format_optional, truncate_string};

/// Render the Labs tab - released lab results for the current pregnancy
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_labs_table(frame, app, chunks[0]);
    render_lab_detail(frame, app, chunks[1]);
}

fn render_labs_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    if let Some(line) = loadable_status(&app.labs) {
        render_status(frame, area, "Lab Results", focused, line);
        return;
    }
    let Some(labs) = app.labs.as_ready() else {
        return;
    };

    let header = Row::new([
        Cell::from("Test"),
        Cell::from("Result"),
        Cell::from("Sampled"),
        Cell::from("Released"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = labs
        .iter()
        .enumerate()
        .map(|(i, lab)| {
            let style = if i == app.labs_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(truncate_string(lab.test_name.as_deref().unwrap_or("-"), 24)),
                Cell::from(truncate_string(lab.test_result.as_deref().unwrap_or("-"), 16)),
                Cell::from(format_opt_date(&lab.date_sample_taken)),
                Cell::from(format_opt_date(&lab.released_time)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(34),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
    ];

    let title = format!(" Lab Results ({}) ", labs.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.labs_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_lab_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected: Option<&LabResult> = app
        .labs
        .as_ready()
        .and_then(|labs| labs.get(app.labs_selection));

    let lines = match selected {
        Some(lab) => vec![
            Line::from(Span::styled(
                lab.test_name.clone().unwrap_or_else(|| "-".to_string()),
                styles::title_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Result:       ", styles::muted_style()),
                Span::styled(
                    format_optional(&lab.test_result, "-"),
                    styles::highlight_style(),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Sampled:      ", styles::muted_style()),
                Span::raw(format_opt_date(&lab.date_sample_taken)),
            ]),
            Line::from(vec![
                Span::styled("Received:     ", styles::muted_style()),
                Span::raw(format_opt_date(&lab.date_order_received_by_lab)),
            ]),
            Line::from(vec![
                Span::styled("Resulted:     ", styles::muted_style()),
                Span::raw(format_opt_date(&lab.result_date)),
            ]),
            Line::from(vec![
                Span::styled("Released:     ", styles::muted_style()),
                Span::raw(format_opt_date(&lab.released_time)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Request:      ", styles::muted_style()),
                Span::raw(format!("#{}", lab.test_request_id)),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "No result selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Result Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
