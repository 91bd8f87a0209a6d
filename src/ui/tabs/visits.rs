use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus, VisitsView};
use crate::ui::styles;
use crate::ui::tabs::{loadable_status, render_status};
use crate::utils::{format_opt_date, format_optional, truncate_string};

/// Render the Visits tab - home visits or hospital admissions
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    match app.visits_view {
        VisitsView::HomeVisits => {
            render_home_visits_table(frame, app, chunks[0]);
            render_home_visit_detail(frame, app, chunks[1]);
        }
        VisitsView::Admissions => {
            render_admissions_table(frame, app, chunks[0]);
            render_admission_detail(frame, app, chunks[1]);
        }
    }
}

fn render_home_visits_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    if let Some(line) = loadable_status(&app.home_visits) {
        render_status(frame, area, "Home Visits", focused, line);
        return;
    }
    let Some(visits) = app.home_visits.as_ready() else {
        return;
    };

    let header = Row::new([Cell::from("Date"), Cell::from("Reason"), Cell::from("By")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = visits
        .iter()
        .enumerate()
        .map(|(i, visit)| {
            let style = if i == app.visits_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(format_opt_date(&visit.date_of_visit)),
                Cell::from(truncate_string(visit.reason.as_deref().unwrap_or("-"), 32)),
                Cell::from(truncate_string(visit.created_by.as_deref().unwrap_or("-"), 20)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Percentage(50),
        Constraint::Percentage(30),
    ];

    let title = format!(" Home Visits ({}) - [n]ew [e]dit ", visits.len());

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
    state.select(Some(app.visits_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_home_visit_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app
        .home_visits
        .as_ready()
        .and_then(|visits| visits.get(app.visits_selection));

    let lines = match selected {
        Some(visit) => {
            let mut lines = vec![
                Line::from(Span::styled("Home Visit", styles::title_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Date:     ", styles::muted_style()),
                    Span::raw(format_opt_date(&visit.date_of_visit)),
                ]),
                Line::from(vec![
                    Span::styled("Reason:   ", styles::muted_style()),
                    Span::raw(format_optional(&visit.reason, "-")),
                ]),
                Line::from(""),
                Line::from(Span::styled("Comments", styles::highlight_style())),
                Line::from(format_optional(&visit.comments, "-")),
                Line::from(""),
            ];
            lines.push(Line::from(vec![
                Span::styled("Recorded: ", styles::muted_style()),
                Span::raw(format_opt_date(&visit.created_at)),
                Span::styled(" by ", styles::muted_style()),
                Span::raw(format_optional(&visit.created_by, "-")),
            ]));
            if visit.updated_at.is_some() {
                lines.push(Line::from(vec![
                    Span::styled("Updated:  ", styles::muted_style()),
                    Span::raw(format_opt_date(&visit.updated_at)),
                    Span::styled(" by ", styles::muted_style()),
                    Span::raw(format_optional(&visit.updated_by, "-")),
                ]));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No visit selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Visit Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_admissions_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    if let Some(line) = loadable_status(&app.admissions) {
        render_status(frame, area, "Hospital Admissions", focused, line);
        return;
    }
    let Some(admissions) = app.admissions.as_ready() else {
        return;
    };

    let header = Row::new([
        Cell::from("Admitted"),
        Cell::from("Facility"),
        Cell::from("Reason"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = admissions
        .iter()
        .enumerate()
        .map(|(i, admission)| {
            let style = if i == app.admissions_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(format_opt_date(&admission.date_admitted)),
                Cell::from(truncate_string(
                    admission.facility.as_deref().unwrap_or("-"),
                    24,
                )),
                Cell::from(truncate_string(
                    admission.reason.as_deref().unwrap_or("-"),
                    32,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Percentage(35),
        Constraint::Percentage(45),
    ];

    let title = format!(" Hospital Admissions ({}) ", admissions.len());

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
    state.select(Some(app.admissions_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_admission_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app
        .admissions
        .as_ready()
        .and_then(|admissions| admissions.get(app.admissions_selection));

    let lines = match selected {
        Some(admission) => vec![
            Line::from(Span::styled("Hospital Admission", styles::title_style())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Admitted: ", styles::muted_style()),
                Span::raw(format_opt_date(&admission.date_admitted)),
            ]),
            Line::from(vec![
                Span::styled("Facility: ", styles::muted_style()),
                Span::raw(format_optional(&admission.facility, "-")),
            ]),
            Line::from(vec![
                Span::styled("Reason:   ", styles::muted_style()),
                Span::raw(format_optional(&admission.reason, "-")),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Recorded: ", styles::muted_style()),
                Span::raw(format_opt_date(&admission.created_at)),
                Span::styled(" by ", styles::muted_style()),
                Span::raw(format_optional(&admission.created_by, "-")),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "No admission selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Admission Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
