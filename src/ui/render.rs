use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{
    App, AppState, InfantDetailView, LoginFocus, PartnersView, Tab, VisitField, VisitsView,
};
use crate::fetch::{Loadable, SubmitState};

use super::styles;
use super::tabs::{contraceptives, infants, labs, partners, pregnancy, visits};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::EnteringPatient) {
        render_patient_overlay(frame, app);
    }

    if matches!(app.state, AppState::EditingVisit) {
        render_visit_form_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  EMTCT Records";
    let help_hint = "[?] Help";

    let patient_label = match &app.patient {
        Loadable::Ready(record) => {
            format!("  {} (#{})", record.patient.full_name(), record.patient.id)
        }
        _ => String::new(),
    };

    let used = title.len() + patient_label.len() + help_hint.len() + 4;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(patient_label, styles::highlight_style()),
        Span::raw(" ".repeat(area.width.saturating_sub(used as u16) as usize)),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    // Build main tabs text
    let main_tabs = vec![
        ("[1] Pregnancy", app.current_tab == Tab::Pregnancy),
        ("[2] Labs", app.current_tab == Tab::Labs),
        ("[3] Visits", app.current_tab == Tab::Visits),
        ("[4] Contraceptives", app.current_tab == Tab::Contraceptives),
        ("[5] Infants", app.current_tab == Tab::Infants),
        ("[6] Partners", app.current_tab == Tab::Partners),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in main_tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        if *selected {
            spans.push(Span::styled(*label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(*label, styles::muted_style()));
        }
    }

    // Add sub-view toggle on the right where the tab has one
    let detail_tabs: Option<Vec<(&str, bool)>> = match app.current_tab {
        Tab::Visits => Some(vec![
            ("[h]ome", app.visits_view == VisitsView::HomeVisits),
            ("[a]dmissions", app.visits_view == VisitsView::Admissions),
        ]),
        Tab::Infants => Some(vec![
            ("[d]etails", app.infant_detail_view == InfantDetailView::Details),
            (
                "[s]creenings",
                app.infant_detail_view == InfantDetailView::HivScreenings,
            ),
            (
                "s[y]philis",
                app.infant_detail_view == InfantDetailView::SyphilisScreenings,
            ),
            (
                "dia[g]noses",
                app.infant_detail_view == InfantDetailView::Diagnoses,
            ),
            (
                "[p]cr report",
                app.infant_detail_view == InfantDetailView::PcrReport,
            ),
        ]),
        Tab::Partners => Some(vec![
            ("[t]reatments", app.partners_view == PartnersView::Treatments),
            (
                "[c]ontact tracing",
                app.partners_view == PartnersView::ContactTracing,
            ),
        ]),
        _ => None,
    };

    if let Some(detail_tabs) = detail_tabs {
        // Calculate padding to push detail tabs to the right
        let main_width: usize = spans.iter().map(|s| s.content.len()).sum();
        let detail_width: usize = detail_tabs.iter().map(|(l, _)| l.len()).sum::<usize>()
            + (detail_tabs.len() - 1) * 3; // " | " separators
        let padding = (area.width as usize).saturating_sub(main_width + detail_width + 2);

        spans.push(Span::raw(" ".repeat(padding)));

        for (i, (label, selected)) in detail_tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", styles::muted_style()));
            }
            if *selected {
                spans.push(Span::styled(*label, styles::tab_style(true)));
            } else {
                spans.push(Span::styled(*label, styles::muted_style()));
            }
        }
    }

    let line = Line::from(spans);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.patient_id.is_none() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No patient loaded",
                styles::muted_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Press ", styles::muted_style()),
                Span::styled("/", styles::help_key_style()),
                Span::styled(" to look up a patient by id", styles::muted_style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    match app.current_tab {
        Tab::Pregnancy => pregnancy::render(frame, app, area),
        Tab::Labs => labs::render(frame, app, area),
        Tab::Visits => visits::render(frame, app, area),
        Tab::Contraceptives => contraceptives::render(frame, app, area),
        Tab::Infants => infants::render(frame, app, area),
        Tab::Partners => partners::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[/]patient | [u]pdate | [q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if let Some(ref data) = app.session.data {
        format!(" {} ", data.email)
    } else {
        " Not logged in ".to_string()
    };

    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Box-drawn EMTCT wordmark shared by the overlays
fn logo_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "      ╔═╗╔╦╗╔╦╗╔═╗╔╦╗",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "      ║╣ ║║║ ║ ║   ║ ",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "      ╚═╝╩ ╩ ╩ ╚═╝ ╩ ",
            styles::title_style(),
        )),
    ]
}

fn render_help_overlay(frame: &mut Frame, _app: &App) {
    let area = centered_rect_fixed(52, 26, frame.area());

    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines();
    help_text.extend(vec![
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  1-6       ", styles::help_key_style()),
            Span::styled("Switch tabs", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ←/→       ", styles::help_key_style()),
            Span::styled("Prev/next tab", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Tab       ", styles::help_key_style()),
            Span::styled("Switch focus (list ↔ detail)", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓       ", styles::help_key_style()),
            Span::styled("Navigate list", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  /         ", styles::help_key_style()),
            Span::styled("Look up patient by id", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  u         ", styles::help_key_style()),
            Span::styled("Refresh current tab", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  q         ", styles::help_key_style()),
            Span::styled("Quit", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Per tab", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  h/a       ", styles::help_key_style()),
            Span::styled("Visits: home visits / admissions", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  n/e       ", styles::help_key_style()),
            Span::styled("Visits: new / edit home visit", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  d/s/y/g/p ", styles::help_key_style()),
            Span::styled("Infants: detail views", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  [/]       ", styles::help_key_style()),
            Span::styled("PCR report: change year", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  t/c       ", styles::help_key_style()),
            Span::styled("Partners: treatments / tracing", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(48, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));

    // Email field
    let email_focused = app.login_focus == LoginFocus::Email;
    let email_style = if email_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let email_display = format!("{:<24}", truncate_tail(&app.login_email, 24));
    let cursor = if email_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Email:    [", styles::muted_style()),
        Span::styled(format!("{}{}", email_display, cursor), email_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field
    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let password_masked: String = "*".repeat(app.login_password.len().min(24));
    let password_display = format!("{:<24}", password_masked);
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{}{}", password_display, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Login button
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(""));
    if button_focused {
        lines.push(Line::from(vec![
            Span::raw("             ["),
            Span::styled(" ▶ Login ◀ ", button_style),
            Span::raw("]"),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::raw("             ["),
            Span::styled("   Login   ", button_style),
            Span::raw("]"),
        ]));
    }

    // Error message
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_patient_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(40, 7, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(" Patient lookup", styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Patient id: [", styles::muted_style()),
            Span::styled(
                format!("{:<12}▌", app.patient_input),
                styles::selected_style(),
            ),
            Span::styled("]", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("Enter", styles::help_key_style()),
            Span::styled(" to load, ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_visit_form_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = app.visit_form.as_ref() else {
        return;
    };

    let area = centered_rect_fixed(56, 13, frame.area());

    frame.render_widget(Clear, area);

    let field_style = |field: VisitField| {
        if form.focus == field {
            styles::selected_style()
        } else {
            styles::list_item_style()
        }
    };
    let cursor = |field: VisitField| if form.focus == field { "▌" } else { "" };

    let title = if form.editing_id.is_some() {
        " Edit Home Visit"
    } else {
        " New Home Visit"
    };

    let mut lines = vec![
        Line::from(Span::styled(title, styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Date:     [", styles::muted_style()),
            Span::styled(
                format!("{:<12}{}", form.date_of_visit, cursor(VisitField::Date)),
                field_style(VisitField::Date),
            ),
            Span::styled("]  (YYYY-MM-DD)", styles::muted_style()),
        ]),
        Line::from(vec![
            Span::styled(" Reason:   [", styles::muted_style()),
            Span::styled(
                format!(
                    "{:<32}{}",
                    truncate_tail(&form.reason, 32),
                    cursor(VisitField::Reason)
                ),
                field_style(VisitField::Reason),
            ),
            Span::styled("]", styles::muted_style()),
        ]),
        Line::from(vec![
            Span::styled(" Comments: [", styles::muted_style()),
            Span::styled(
                format!(
                    "{:<32}{}",
                    truncate_tail(&form.comments, 32),
                    cursor(VisitField::Comments)
                ),
                field_style(VisitField::Comments),
            ),
            Span::styled("]", styles::muted_style()),
        ]),
        Line::from(""),
    ];

    match &form.submit {
        SubmitState::Submitting => {
            lines.push(Line::from(Span::styled(" Saving...", styles::muted_style())));
        }
        SubmitState::Failed(e) => {
            lines.push(Line::from(Span::styled(
                format!(" {}", e),
                styles::error_style(),
            )));
        }
        _ => {
            lines.push(Line::from(""));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Tab", styles::help_key_style()),
        Span::styled(" next field  ", styles::muted_style()),
        Span::styled("Enter", styles::help_key_style()),
        Span::styled(" save  ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" cancel", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 10, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.extend(vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

/// Show the tail of a string that may exceed the field width
fn truncate_tail(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        chars[chars.len() - max_len..].iter().collect()
    }
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
