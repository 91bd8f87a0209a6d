use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus, InfantDetailView};
use crate::ui::styles;
use crate::ui::tabs::{loadable_status, render_status};
use crate::utils::{format_opt_date, format_optional, truncate_string};

/// Render the Infants tab. The [p]cr report view is clinic-wide rather than
/// per-infant, so it takes the whole content area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.infant_detail_view == InfantDetailView::PcrReport {
        render_pcr_report(frame, app, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_infant_table(frame, app, chunks[0]);

    match app.infant_detail_view {
        InfantDetailView::Details => render_infant_detail(frame, app, chunks[1]),
        InfantDetailView::HivScreenings => render_screenings(frame, app, chunks[1]),
        InfantDetailView::SyphilisScreenings => {
            render_syphilis_screenings(frame, app, chunks[1])
        }
        InfantDetailView::Diagnoses => render_diagnoses(frame, app, chunks[1]),
        InfantDetailView::PcrReport => {}
    }
}

fn render_infant_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    if let Some(line) = loadable_status(&app.infants) {
        render_status(frame, area, "Infants", focused, line);
        return;
    }
    let Some(infants) = app.infants.as_ready() else {
        return;
    };

    let header = Row::new([Cell::from("Name"), Cell::from("Date of Birth")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = infants
        .iter()
        .enumerate()
        .map(|(i, infant)| {
            let style = if i == app.infants_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(infant.display_name()),
                Cell::from(format_opt_date(&infant.dob)),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Percentage(60), Constraint::Percentage(40)];

    let title = format!(" Infants ({}) ", infants.len());

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
    state.select(Some(app.infants_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_infant_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app
        .infants
        .as_ready()
        .and_then(|infants| infants.get(app.infants_selection));

    let lines = match selected {
        Some(infant) => vec![
            Line::from(Span::styled(infant.display_name(), styles::title_style())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Born:       ", styles::muted_style()),
                Span::raw(format_opt_date(&infant.dob)),
            ]),
            Line::from(vec![
                Span::styled("Patient ID: ", styles::muted_style()),
                Span::raw(infant.patient_id.to_string()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press [s] for HIV, [y] for syphilis, [g] for diagnoses",
                styles::muted_style(),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "No infant selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Infant Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_screenings(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    if let Some(line) = loadable_status(&app.hiv_screenings) {
        render_status(frame, area, "HIV Screenings", focused, line);
        return;
    }
    let Some(screenings) = app.hiv_screenings.as_ready() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let header = Row::new([Cell::from("Test"), Cell::from("Due"), Cell::from("Result")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = screenings
        .iter()
        .enumerate()
        .map(|(i, screening)| {
            let style = if i == app.screenings_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(truncate_string(
                    screening.test_name.as_deref().unwrap_or("-"),
                    12,
                )),
                Cell::from(format_opt_date(&screening.due_date)),
                Cell::from(truncate_string(
                    screening.result.as_deref().unwrap_or("-"),
                    14,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(35),
        Constraint::Percentage(35),
    ];

    let title = format!(" HIV Screenings ({}) ", screenings.len());

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
    state.select(Some(app.screenings_selection));

    frame.render_stateful_widget(table, chunks[0], &mut state);

    // Shipping chain for the selected screening
    let lines = match screenings.get(app.screenings_selection) {
        Some(screening) => {
            let (timely_text, timely_style) = match screening.timely {
                Some(true) => ("Yes", styles::success_style()),
                Some(false) => ("No", styles::error_style()),
                None => ("-", styles::list_item_style()),
            };
            vec![
                Line::from(vec![
                    Span::styled("Sample:   ", styles::muted_style()),
                    Span::raw(format_optional(&screening.sample_code, "-")),
                    Span::styled("  taken ", styles::muted_style()),
                    Span::raw(format_opt_date(&screening.date_sample_taken)),
                ]),
                Line::from(vec![
                    Span::styled("Shipped:  ", styles::muted_style()),
                    Span::raw(format_opt_date(&screening.date_sample_shipped)),
                    Span::styled("  to ", styles::muted_style()),
                    Span::raw(format_optional(&screening.destination, "-")),
                ]),
                Line::from(vec![
                    Span::styled("At HQ:    ", styles::muted_style()),
                    Span::raw(format_opt_date(&screening.date_sample_received_at_hq)),
                ]),
                Line::from(vec![
                    Span::styled("Resulted: ", styles::muted_style()),
                    Span::raw(format_opt_date(&screening.date_result_received)),
                ]),
                Line::from(vec![
                    Span::styled("Shared:   ", styles::muted_style()),
                    Span::raw(format_opt_date(&screening.date_result_shared)),
                ]),
                Line::from(vec![
                    Span::styled("Timely:   ", styles::muted_style()),
                    Span::styled(timely_text, timely_style),
                ]),
            ]
        }
        None => vec![Line::from(Span::styled(
            "No screening selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Screening Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), chunks[1]);
}

fn render_syphilis_screenings(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    if let Some(line) = loadable_status(&app.syphilis_screenings) {
        render_status(frame, area, "Syphilis Screenings", focused, line);
        return;
    }
    let Some(screenings) = app.syphilis_screenings.as_ready() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let header = Row::new([Cell::from("Test"), Cell::from("Date"), Cell::from("Result")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = screenings
        .iter()
        .enumerate()
        .map(|(i, screening)| {
            let style = if i == app.syphilis_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(truncate_string(
                    screening.test_name.as_deref().unwrap_or("-"),
                    12,
                )),
                Cell::from(format_opt_date(&screening.screening_date)),
                Cell::from(truncate_string(
                    screening.result.as_deref().unwrap_or("-"),
                    14,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(35),
        Constraint::Percentage(35),
    ];

    let title = format!(" Syphilis Screenings ({}) ", screenings.len());

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
    state.select(Some(app.syphilis_selection));

    frame.render_stateful_widget(table, chunks[0], &mut state);

    let lines = match screenings.get(app.syphilis_selection) {
        Some(screening) => vec![
            Line::from(vec![
                Span::styled("Sampled:  ", styles::muted_style()),
                Span::raw(format_opt_date(&screening.date_sample_taken)),
            ]),
            Line::from(vec![
                Span::styled("Resulted: ", styles::muted_style()),
                Span::raw(format_opt_date(&screening.date_result_received)),
            ]),
            Line::from(vec![
                Span::styled("Timely:   ", styles::muted_style()),
                Span::raw(format_optional(&screening.timely, "-")),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "No screening selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Screening Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), chunks[1]);
}

fn render_diagnoses(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    if let Some(line) = loadable_status(&app.infant_diagnoses) {
        render_status(frame, area, "Diagnoses", focused, line);
        return;
    }
    let Some(diagnoses) = app.infant_diagnoses.as_ready() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let header = Row::new([Cell::from("Date"), Cell::from("Diagnosis")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = diagnoses
        .iter()
        .enumerate()
        .map(|(i, diagnosis)| {
            let style = if i == app.diagnoses_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(format_opt_date(&diagnosis.date)),
                Cell::from(truncate_string(
                    diagnosis.diagnosis.as_deref().unwrap_or("-"),
                    28,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Length(14), Constraint::Percentage(70)];

    let title = format!(" Diagnoses ({}) ", diagnoses.len());

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
    state.select(Some(app.diagnoses_selection));

    frame.render_stateful_widget(table, chunks[0], &mut state);

    let lines = match diagnoses.get(app.diagnoses_selection) {
        Some(diagnosis) => vec![
            Line::from(vec![
                Span::styled("Doctor:   ", styles::muted_style()),
                Span::raw(format_optional(&diagnosis.doctor, "-")),
            ]),
            Line::from(""),
            Line::from(Span::styled("Comments", styles::highlight_style())),
            Line::from(format_optional(&diagnosis.comments, "-")),
        ],
        None => vec![Line::from(Span::styled(
            "No diagnosis selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Diagnosis Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), chunks[1]);
}

fn render_pcr_report(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let title = format!(
        " Missing PCRs {} ([ and ] to change year) ",
        app.report_year
    );

    if let Some(line) = loadable_status(&app.pcr_report) {
        render_status(frame, area, &title, focused, line);
        return;
    }
    let Some(rows_data) = app.pcr_report.as_ready() else {
        return;
    };

    let header = Row::new([
        Cell::from("Infant"),
        Cell::from("Mother"),
        Cell::from("PCR 1"),
        Cell::from("PCR 2"),
        Cell::from("PCR 3"),
        Cell::from("ELISA"),
    ])
    .style(styles::title_style())
    .height(1);

    // A due date with no sample taken is what makes the row a "missing" PCR
    let test_cell = |due: &Option<String>, taken: &Option<String>| -> Cell<'static> {
        match (due, taken) {
            (_, Some(taken)) if !taken.is_empty() => {
                Cell::from(format_date_short(taken)).style(styles::success_style())
            }
            (Some(due), _) if !due.is_empty() => {
                Cell::from(format!("due {}", format_date_short(due))).style(styles::error_style())
            }
            _ => Cell::from("-").style(styles::muted_style()),
        }
    };

    let rows: Vec<Row> = rows_data
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i == app.report_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(truncate_string(&row.infant_name, 22)),
                Cell::from(truncate_string(&row.mother_name, 22)),
                test_cell(&row.pcr1_due_date, &row.pcr1_date_sample_taken),
                test_cell(&row.pcr2_due_date, &row.pcr2_date_sample_taken),
                test_cell(&row.pcr3_due_date, &row.pcr3_date_sample_taken),
                test_cell(&row.elisa_due_date, &row.elisa_date_sample_taken),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" {} ({} infants) ", title.trim(), rows_data.len()))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.report_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Compact date for the report grid (MM-DD)
fn format_date_short(date: &str) -> String {
    match date.get(5..10) {
        Some(md) => md.to_string(),
        None => date.to_string(),
    }
}
