use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus, PartnersView};
use crate::ui::styles;
use crate::ui::tabs::{loadable_status, render_status};
use crate::utils::{format_opt_date, format_optional, truncate_string};

/// Render the Partners tab - syphilis treatments or contact tracing
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    match app.partners_view {
        PartnersView::Treatments => {
            render_treatments_table(frame, app, chunks[0]);
            render_treatment_detail(frame, app, chunks[1]);
        }
        PartnersView::ContactTracing => {
            render_tracing_table(frame, app, chunks[0]);
            render_tracing_detail(frame, app, chunks[1]);
        }
    }
}

fn render_treatments_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    if let Some(line) = loadable_status(&app.syphilis_treatments) {
        render_status(frame, area, "Partner Syphilis Treatments", focused, line);
        return;
    }
    let Some(treatments) = app.syphilis_treatments.as_ready() else {
        return;
    };

    let header = Row::new([
        Cell::from("Date"),
        Cell::from("Medication"),
        Cell::from("Dosage"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = treatments
        .iter()
        .enumerate()
        .map(|(i, treatment)| {
            let style = if i == app.treatments_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(format_opt_date(&treatment.date)),
                Cell::from(truncate_string(
                    treatment.medication.as_deref().unwrap_or("-"),
                    28,
                )),
                Cell::from(truncate_string(
                    treatment.dosage.as_deref().unwrap_or("-"),
                    20,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Percentage(45),
        Constraint::Percentage(35),
    ];

    let title = format!(" Partner Syphilis Treatments ({}) ", treatments.len());

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
    state.select(Some(app.treatments_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_treatment_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app
        .syphilis_treatments
        .as_ready()
        .and_then(|treatments| treatments.get(app.treatments_selection));

    let lines = match selected {
        Some(treatment) => vec![
            Line::from(Span::styled("Syphilis Treatment", styles::title_style())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Date:       ", styles::muted_style()),
                Span::raw(format_opt_date(&treatment.date)),
            ]),
            Line::from(vec![
                Span::styled("Medication: ", styles::muted_style()),
                Span::raw(format_optional(&treatment.medication, "-")),
            ]),
            Line::from(vec![
                Span::styled("Dosage:     ", styles::muted_style()),
                Span::raw(format_optional(&treatment.dosage, "-")),
            ]),
            Line::from(""),
            Line::from(Span::styled("Comments", styles::highlight_style())),
            Line::from(format_optional(&treatment.comments, "-")),
            Line::from(""),
            Line::from(vec![
                Span::styled("Recorded:   ", styles::muted_style()),
                Span::raw(format_opt_date(&treatment.created_at)),
                Span::styled(" by ", styles::muted_style()),
                Span::raw(format_optional(&treatment.created_by, "-")),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "No treatment selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Treatment Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tracing_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    if let Some(line) = loadable_status(&app.contact_tracing) {
        render_status(frame, area, "Contact Tracing", focused, line);
        return;
    }
    let Some(tracings) = app.contact_tracing.as_ready() else {
        return;
    };

    let header = Row::new([Cell::from("Date"), Cell::from("Test"), Cell::from("Result")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = tracings
        .iter()
        .enumerate()
        .map(|(i, tracing)| {
            let style = if i == app.tracing_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(format_opt_date(&tracing.date)),
                Cell::from(truncate_string(tracing.test.as_deref().unwrap_or("-"), 24)),
                Cell::from(truncate_string(
                    tracing.test_result.as_deref().unwrap_or("-"),
                    24,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Percentage(40),
        Constraint::Percentage(40),
    ];

    let title = format!(" Contact Tracing ({}) ", tracings.len());

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
    state.select(Some(app.tracing_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_tracing_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app
        .contact_tracing
        .as_ready()
        .and_then(|tracings| tracings.get(app.tracing_selection));

    let lines = match selected {
        Some(tracing) => vec![
            Line::from(Span::styled("Contact Tracing", styles::title_style())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Date:   ", styles::muted_style()),
                Span::raw(format_opt_date(&tracing.date)),
            ]),
            Line::from(vec![
                Span::styled("Test:   ", styles::muted_style()),
                Span::raw(format_optional(&tracing.test, "-")),
            ]),
            Line::from(vec![
                Span::styled("Result: ", styles::muted_style()),
                Span::raw(format_optional(&tracing.test_result, "-")),
            ]),
            Line::from(""),
            Line::from(Span::styled("Comments", styles::highlight_style())),
            Line::from(format_optional(&tracing.comments, "-")),
        ],
        None => vec![Line::from(Span::styled(
            "No record selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Tracing Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
