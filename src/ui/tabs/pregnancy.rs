use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::fetch::Loadable;
use crate::ui::styles;
use crate::ui::tabs::{loadable_status, render_status};
use crate::utils::{format_opt_date, format_optional};

/// Render the Pregnancy tab - obstetric history with vitals detail
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_history_table(frame, app, chunks[0]);
    render_pregnancy_detail(frame, app, chunks[1]);
}

fn render_history_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    if let Some(line) = loadable_status(&app.patient) {
        render_status(frame, area, "Obstetric History", focused, line);
        return;
    }
    let Some(record) = app.patient.as_ready() else {
        return;
    };

    let header = Row::new([Cell::from("Event"), Cell::from("Date")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = record
        .obstetric_history
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let style = if i == app.history_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(event.event.clone()),
                Cell::from(format_opt_date(&event.date)),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Percentage(60), Constraint::Percentage(40)];

    let title = format!(" Obstetric History ({}) ", record.obstetric_history.len());

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
    state.select(Some(app.history_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pregnancy_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let placeholder = "-";

    let mut lines = vec![];

    // Patient header and demographics
    match &app.patient {
        Loadable::Ready(record) => {
            let patient = &record.patient;
            lines.push(Line::from(Span::styled(
                patient.full_name(),
                styles::title_style(),
            )));
            lines.push(Line::from(""));

            lines.push(Line::from(Span::styled("Patient", styles::highlight_style())));

            let age_str = patient
                .age()
                .map(|age| {
                    patient
                        .date_of_birth()
                        .map(|dob| format!("{} (born {})", age, dob.format("%b %d, %Y")))
                        .unwrap_or_else(|| age.to_string())
                })
                .unwrap_or_else(|| placeholder.to_string());
            lines.push(Line::from(vec![
                Span::styled("Age:        ", styles::muted_style()),
                Span::raw(age_str),
            ]));

            lines.push(Line::from(vec![
                Span::styled("District:   ", styles::muted_style()),
                Span::raw(format_optional(&patient.district, placeholder)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Community:  ", styles::muted_style()),
                Span::raw(format_optional(&patient.community, placeholder)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Education:  ", styles::muted_style()),
                Span::raw(format_optional(&patient.education, placeholder)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Ethnicity:  ", styles::muted_style()),
                Span::raw(format_optional(&patient.ethnicity, placeholder)),
            ]));

            let (hiv_text, hiv_style) = match patient.hiv {
                Some(true) => ("Positive".to_string(), styles::error_style()),
                Some(false) => ("Negative".to_string(), styles::success_style()),
                None => (placeholder.to_string(), styles::list_item_style()),
            };
            lines.push(Line::from(vec![
                Span::styled("HIV:        ", styles::muted_style()),
                Span::styled(hiv_text, hiv_style),
            ]));

            if let Some(kin) = record.next_of_kins.first() {
                let kin_str = match (&kin.name, &kin.phone_number) {
                    (Some(name), Some(phone)) => format!("{} ({})", name, phone),
                    (Some(name), None) => name.clone(),
                    _ => placeholder.to_string(),
                };
                lines.push(Line::from(vec![
                    Span::styled("Next of kin:", styles::muted_style()),
                    Span::raw(" "),
                    Span::raw(kin_str),
                ]));
            }
        }
        other => {
            if let Some(line) = loadable_status(other) {
                lines.push(line);
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Current Pregnancy",
        styles::highlight_style(),
    )));

    match &app.pregnancy {
        Loadable::Ready(summary) => {
            let vitals = &summary.pregnancy;

            lines.push(Line::from(vec![
                Span::styled("Gest. age:  ", styles::muted_style()),
                Span::styled(summary.gestational_age_label.clone(), styles::highlight_style()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Interval:   ", styles::muted_style()),
                Span::raw(format!("{} days", summary.interval_days)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("LMP:        ", styles::muted_style()),
                Span::raw(format_opt_date(&vitals.lmp)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("EDD:        ", styles::muted_style()),
                Span::raw(format_opt_date(&vitals.edd)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Diagnosed:  ", styles::muted_style()),
                Span::raw(format_opt_date(&vitals.diagnosis_date)),
            ]));

            let para = vitals
                .para
                .map(|p| p.to_string())
                .unwrap_or_else(|| placeholder.to_string());
            let cs = vitals
                .cs
                .map(|c| c.to_string())
                .unwrap_or_else(|| placeholder.to_string());
            lines.push(Line::from(vec![
                Span::styled("Para / CS:  ", styles::muted_style()),
                Span::raw(format!("{} / {}", para, cs)),
            ]));

            let planned = match vitals.planned {
                Some(true) => "Yes",
                Some(false) => "No",
                None => placeholder,
            };
            lines.push(Line::from(vec![
                Span::styled("Planned:    ", styles::muted_style()),
                Span::raw(planned),
            ]));

            let age_at_lmp = vitals
                .age_at_lmp
                .map(|a| a.to_string())
                .unwrap_or_else(|| placeholder.to_string());
            lines.push(Line::from(vec![
                Span::styled("Age at LMP: ", styles::muted_style()),
                Span::raw(age_at_lmp),
            ]));

            if vitals.apgar_first_minute.is_some() || vitals.apgar_fifth_minute.is_some() {
                let apgar1 = vitals
                    .apgar_first_minute
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| placeholder.to_string());
                let apgar5 = vitals
                    .apgar_fifth_minute
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| placeholder.to_string());
                lines.push(Line::from(vec![
                    Span::styled("Apgar 1'/5':", styles::muted_style()),
                    Span::raw(" "),
                    Span::raw(format!("{} / {}", apgar1, apgar5)),
                ]));
            }

            if let Some(ref outcome) = vitals.pregnancy_outcome {
                if !outcome.is_empty() {
                    lines.push(Line::from(vec![
                        Span::styled("Outcome:    ", styles::muted_style()),
                        Span::raw(outcome.clone()),
                    ]));
                }
            }
        }
        other => {
            if let Some(line) = loadable_status(other) {
                lines.push(line);
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Past Pregnancies",
        styles::highlight_style(),
    )));

    match &app.pregnancies {
        Loadable::Ready(pregnancies) => {
            if pregnancies.is_empty() {
                lines.push(Line::from(Span::styled("None recorded", styles::muted_style())));
            }
            for pregnancy in pregnancies {
                lines.push(Line::from(vec![
                    Span::styled("LMP ", styles::muted_style()),
                    Span::raw(format_opt_date(&pregnancy.lmp)),
                    Span::styled("  ended ", styles::muted_style()),
                    Span::raw(format_opt_date(&pregnancy.end_time)),
                ]));
            }
        }
        other => {
            if let Some(line) = loadable_status(other) {
                lines.push(line);
            }
        }
    }

    let block = Block::default()
        .title(" Pregnancy ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
