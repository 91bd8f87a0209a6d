//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_email_char, can_add_password_char, can_add_patient_id_char, App, AppState, Focus,
    InfantDetailView, LoginFocus, PartnersView, Tab, VisitsView,
};
use crate::fetch::SubmitState;

/// Page size for PageUp/PageDown list movement
const PAGE_SCROLL_SIZE: i64 = 10;

/// Maximum length for visit form text fields
const MAX_VISIT_FIELD_LENGTH: usize = 200;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle patient lookup prompt
    if matches!(app.state, AppState::EnteringPatient) {
        return handle_patient_input(app, key);
    }

    // Handle home visit form
    if matches!(app.state, AppState::EditingVisit) {
        return handle_visit_form_input(app, key);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('/') => {
            app.patient_input.clear();
            app.status_message = None;
            app.state = AppState::EnteringPatient;
            return Ok(false);
        }
        KeyCode::Char('u') => {
            app.status_message = None;
            app.refresh_current_tab();
            return Ok(false);
        }
        KeyCode::Char('1') => app.switch_tab(Tab::Pregnancy),
        KeyCode::Char('2') => app.switch_tab(Tab::Labs),
        KeyCode::Char('3') => app.switch_tab(Tab::Visits),
        KeyCode::Char('4') => app.switch_tab(Tab::Contraceptives),
        KeyCode::Char('5') => app.switch_tab(Tab::Infants),
        KeyCode::Char('6') => app.switch_tab(Tab::Partners),
        KeyCode::Left => app.switch_tab(app.current_tab.prev()),
        KeyCode::Right => app.switch_tab(app.current_tab.next()),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE),
        _ => return handle_tab_keys(app, key),
    }

    Ok(false)
}

/// Keys that only apply to the current tab
fn handle_tab_keys(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.current_tab {
        Tab::Visits => match key.code {
            KeyCode::Char('h') => app.visits_view = VisitsView::HomeVisits,
            KeyCode::Char('a') => app.visits_view = VisitsView::Admissions,
            KeyCode::Char('n') if app.visits_view == VisitsView::HomeVisits => {
                app.open_new_visit_form();
            }
            KeyCode::Char('e') if app.visits_view == VisitsView::HomeVisits => {
                app.open_edit_visit_form();
            }
            _ => {}
        },
        Tab::Infants => match key.code {
            KeyCode::Char('d') => app.set_infant_detail_view(InfantDetailView::Details),
            KeyCode::Char('s') => app.set_infant_detail_view(InfantDetailView::HivScreenings),
            KeyCode::Char('y') => {
                app.set_infant_detail_view(InfantDetailView::SyphilisScreenings)
            }
            KeyCode::Char('g') => app.set_infant_detail_view(InfantDetailView::Diagnoses),
            KeyCode::Char('p') => app.set_infant_detail_view(InfantDetailView::PcrReport),
            KeyCode::Char('[') if app.infant_detail_view == InfantDetailView::PcrReport => {
                app.report_year -= 1;
                app.fetch_pcr_report();
            }
            KeyCode::Char(']') if app.infant_detail_view == InfantDetailView::PcrReport => {
                app.report_year += 1;
                app.fetch_pcr_report();
            }
            _ => {}
        },
        Tab::Partners => match key.code {
            KeyCode::Char('t') => app.partners_view = PartnersView::Treatments,
            KeyCode::Char('c') => app.partners_view = PartnersView::ContactTracing,
            _ => {}
        },
        _ => {}
    }

    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // The overlay can only be dismissed once a session exists
            if app.is_authenticated() {
                app.state = AppState::Normal;
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => {
                app.login_focus = LoginFocus::Password;
            }
            LoginFocus::Password | LoginFocus::Button => {
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(&app.login_email) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(&app.login_password) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }

    Ok(false)
}

fn handle_patient_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            if let Ok(patient_id) = app.patient_input.parse::<i64>() {
                app.state = AppState::Normal;
                app.load_patient(patient_id);
            }
        }
        KeyCode::Backspace => {
            app.patient_input.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if can_add_patient_id_char(&app.patient_input) {
                app.patient_input.push(c);
            }
        }
        _ => {}
    }

    Ok(false)
}

fn handle_visit_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.cancel_visit_form();
            return Ok(false);
        }
        KeyCode::Enter => {
            app.submit_visit_form();
            return Ok(false);
        }
        _ => {}
    }

    let Some(form) = app.visit_form.as_mut() else {
        return Ok(false);
    };

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            form.focus = form.focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            // Three fields, so two steps forward is one step back
            form.focus = form.focus.next().next();
        }
        KeyCode::Backspace => {
            form.field_mut().pop();
            if matches!(form.submit, SubmitState::Failed(_)) {
                form.submit = SubmitState::Idle;
            }
        }
        KeyCode::Char(c) => {
            if form.field_mut().len() < MAX_VISIT_FIELD_LENGTH {
                form.field_mut().push(c);
            }
            if matches!(form.submit, SubmitState::Failed(_)) {
                form.submit = SubmitState::Idle;
            }
        }
        _ => {}
    }

    Ok(false)
}
