use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::ui::tabs::{loadable_status, render_status};
use crate::utils::{format_opt_date, format_optional, truncate_string};

/// Render the Contraceptives tab
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_table(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    if let Some(line) = loadable_status(&app.contraceptives) {
        render_status(frame, area, "Contraceptives", focused, line);
        return;
    }
    let Some(used) = app.contraceptives.as_ready() else {
        return;
    };

    let header = Row::new([
        Cell::from("Method"),
        Cell::from("Date"),
        Cell::from("Comments"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = used
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.contraceptives_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(truncate_string(
                    item.contraceptive.as_deref().unwrap_or("-"),
                    24,
                )),
                Cell::from(format_opt_date(&item.date_used)),
                Cell::from(truncate_string(item.comments.as_deref().unwrap_or("-"), 32)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Length(14),
        Constraint::Percentage(50),
    ];

    let title = format!(" Contraceptives ({}) ", used.len());

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
    state.select(Some(app.contraceptives_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app
        .contraceptives
        .as_ready()
        .and_then(|used| used.get(app.contraceptives_selection));

    let lines = match selected {
        Some(item) => vec![
            Line::from(Span::styled(
                item.contraceptive.clone().unwrap_or_else(|| "-".to_string()),
                styles::title_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Date used: ", styles::muted_style()),
                Span::raw(format_opt_date(&item.date_used)),
            ]),
            Line::from(""),
            Line::from(Span::styled("Comments", styles::highlight_style())),
            Line::from(format_optional(&item.comments, "-")),
            Line::from(""),
            Line::from(vec![
                Span::styled("Recorded:  ", styles::muted_style()),
                Span::raw(format_opt_date(&item.created_at)),
                Span::styled(" by ", styles::muted_style()),
                Span::raw(format_optional(&item.created_by, "-")),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "No record selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
