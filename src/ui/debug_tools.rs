use std::cell::RefCell;
use std::rc::Rc;

use gtk4::gdk;
use gtk4::glib;

use super::LOG_DOMAIN;
use super::game::{SelectOutcome, TickOutcome};
use super::hud::{stop_timer, update_subtitle};
use super::rules::flag_enabled;
use super::scene::{show_result, sync_board};
use super::state::AppState;

const FAST_FORWARD_LEFT_SECS: u32 = 5;

pub fn debug_mode_enabled() -> bool {
    match std::env::var("CONCORD_DEBUG") {
        Ok(value) => flag_enabled(&value),
        Err(_) => false,
    }
}

/// Matches every unmatched pair except the last one through the normal
/// selection path. Returns how many pairs were matched.
fn match_all_but_one(st: &mut AppState) -> usize {
    let mut remaining: Vec<u32> = st
        .game
        .catalog()
        .items()
        .iter()
        .map(|item| item.id)
        .filter(|id| !st.game.is_matched(*id))
        .collect();
    remaining.pop();

    let mut applied = 0;
    for id in remaining {
        // Replace a lone pick first so the pair is never scored against it.
        let outcome = if st.game.state().selected_detail.is_some() {
            st.game.select_detail(id);
            st.game.select_concept(id)
        } else {
            st.game.select_concept(id);
            st.game.select_detail(id)
        };
        if matches!(outcome, SelectOutcome::Matched { .. }) {
            applied += 1;
        }
    }
    applied
}

fn fast_forward_clock(st: &mut AppState, leave_secs: u32) -> bool {
    while st.game.state().seconds_remaining > leave_secs {
        match st.game.tick() {
            TickOutcome::Running(_) => {}
            TickOutcome::Expired => return true,
            TickOutcome::Stopped => return false,
        }
    }
    false
}

pub fn handle_debug_shortcut(
    state: &Rc<RefCell<AppState>>,
    key: gdk::Key,
    mods: gdk::ModifierType,
) -> bool {
    if !mods.contains(gdk::ModifierType::CONTROL_MASK) || !debug_mode_enabled() {
        return false;
    }

    let mut st = state.borrow_mut();
    if st.game.state().is_over {
        return false;
    }

    match key {
        gdk::Key::M | gdk::Key::m => {
            if st.game.has_pending_clear() {
                eprintln!("[DEBUG] Wait for the mismatch to clear first.");
                return true;
            }
            let applied = match_all_but_one(&mut st);
            eprintln!("[DEBUG] Matched {} pairs, one left.", applied);
            glib::g_debug!(LOG_DOMAIN, "Debug near-win matched {} pairs", applied);
        }
        gdk::Key::T | gdk::Key::t => {
            let expired = fast_forward_clock(&mut st, FAST_FORWARD_LEFT_SECS);
            eprintln!(
                "[DEBUG] Clock fast-forwarded to {}s.",
                st.game.state().seconds_remaining
            );
            if expired {
                stop_timer(&mut st);
                show_result(&st);
            }
        }
        gdk::Key::E | gdk::Key::e => {
            fast_forward_clock(&mut st, 0);
            stop_timer(&mut st);
            eprintln!("[DEBUG] Clock expired.");
            show_result(&st);
        }
        _ => return false,
    }

    update_subtitle(&st);
    sync_board(&st);
    true
}
