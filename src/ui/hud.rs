use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4::glib;

use super::LOG_DOMAIN;
use super::game::{ClearTicket, TickOutcome};
use super::scene::{show_result, sync_board};
use super::state::AppState;

pub(super) fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub(super) fn update_subtitle(st: &AppState) {
    if let Some(subtitle) = &st.title_game_subtitle {
        let game = st.game.state();
        let score = gettext("Score {}").replacen("{}", &game.score.to_string(), 1);
        subtitle.set_text(&format!(
            "{} | {}",
            score,
            format_clock(game.seconds_remaining)
        ));
    }
}

pub(super) fn stop_timer(st: &mut AppState) {
    if let Some(handle) = st.timer_handle.take() {
        handle.remove();
    }
}

pub(super) fn stop_mismatch_clear(st: &mut AppState) {
    if let Some(handle) = st.mismatch_handle.take() {
        handle.remove();
    }
}

pub(super) fn start_timer(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    stop_timer(&mut st);
    if st.game.state().is_over {
        return;
    }

    let generation = st.game.generation();
    let state_clone = state.clone();
    let handle = glib::timeout_add_local(std::time::Duration::from_secs(1), move || {
        let mut st = state_clone.borrow_mut();
        if !st.game.is_current(generation) {
            // The handle slot belongs to the newer generation's countdown.
            glib::g_debug!(LOG_DOMAIN, "Dropping countdown from generation {}", generation);
            return glib::ControlFlow::Break;
        }
        match st.game.tick() {
            TickOutcome::Running(_) => {
                update_subtitle(&st);
                glib::ControlFlow::Continue
            }
            TickOutcome::Expired => {
                st.timer_handle = None;
                update_subtitle(&st);
                sync_board(&st);
                show_result(&st);
                glib::ControlFlow::Break
            }
            TickOutcome::Stopped => {
                st.timer_handle = None;
                glib::ControlFlow::Break
            }
        }
    });
    st.timer_handle = Some(handle);
}

pub(super) fn schedule_mismatch_clear(state: &Rc<RefCell<AppState>>, ticket: ClearTicket) {
    let mut st = state.borrow_mut();
    stop_mismatch_clear(&mut st);

    let delay = std::time::Duration::from_millis(st.game.rules().mismatch_clear_ms);
    let state_clone = state.clone();
    let handle = glib::timeout_add_local_once(delay, move || {
        let mut st = state_clone.borrow_mut();
        st.mismatch_handle = None;
        if st.game.clear_mismatch(ticket) {
            sync_board(&st);
        } else {
            glib::g_debug!(LOG_DOMAIN, "Ignoring superseded mismatch clear");
        }
    });
    st.mismatch_handle = Some(handle);
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::ui::catalog::Catalog;
    use crate::ui::rules::GameRules;

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(300), "5:00");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn stale_countdown_leaves_newer_handle_alone() {
        let context = glib::MainContext::default();
        let _owner = context.acquire().expect("default main context is free");

        let catalog = Catalog::builtin().expect("builtin catalog should parse");
        let state = Rc::new(RefCell::new(AppState::new(catalog, GameRules::default())));

        // Leave the first countdown scheduled while a new deal starts its own.
        start_timer(&state);
        let orphan = state.borrow_mut().timer_handle.take();
        assert!(orphan.is_some());
        state.borrow_mut().game.reset();
        start_timer(&state);

        let deadline = Instant::now() + Duration::from_millis(1500);
        while Instant::now() < deadline {
            if !context.iteration(false) {
                std::thread::sleep(Duration::from_millis(10));
            }
        }

        let mut st = state.borrow_mut();
        assert_eq!(st.game.state().seconds_remaining, 299);
        assert!(st.timer_handle.is_some());
        stop_timer(&mut st);
        assert!(st.timer_handle.is_none());
    }
}
