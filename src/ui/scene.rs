use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::prelude::*;

use super::game::{EndMessage, Phase, Side};
use super::state::AppState;

fn result_text(message: EndMessage) -> String {
    match message {
        EndMessage::AllMatched { score } => {
            gettext("Congratulations! You matched every pair with a score of {}!")
                .replacen("{}", &score.to_string(), 1)
        }
        EndMessage::TimeExpired { score } => {
            gettext("Time's up! Your final score is {}.").replacen("{}", &score.to_string(), 1)
        }
    }
}

fn sync_button(st: &AppState, side: Side, position: usize, button: &gtk::Button) {
    let Some(card) = st.game.card_at(side, position) else {
        button.set_sensitive(false);
        return;
    };
    let matched = st.game.is_matched(card.id);
    let mismatched = st.game.is_mismatched(side, card.id);
    let selected = !mismatched && st.game.is_selected(side, card.id);

    for (class, enabled) in [
        ("matched", matched),
        ("mismatch", mismatched),
        ("selected", selected),
    ] {
        if enabled {
            button.add_css_class(class);
        } else {
            button.remove_css_class(class);
        }
    }
    button.set_sensitive(!matched && st.game.phase() == Phase::Playing);
}

/// Pushes the controller's view model onto every card button.
pub(super) fn sync_board(st: &AppState) {
    for side in [Side::Concept, Side::Detail] {
        for (position, button) in st.buttons(side).iter().enumerate() {
            sync_button(st, side, position, button);
        }
    }
}

pub(super) fn redraw_cards(st: &AppState) {
    for side in [Side::Concept, Side::Detail] {
        for button in st.buttons(side) {
            if let Some(child) = button.child() {
                child.queue_draw();
            }
        }
    }
}

pub(super) fn show_result(st: &AppState) {
    let Some(message) = st.game.end_message() else {
        return;
    };
    if let Some(label) = &st.result_label {
        label.set_text(&result_text(message));
    }
    if let Some(banner) = &st.result_banner {
        if matches!(message, EndMessage::AllMatched { .. }) {
            banner.add_css_class("won");
        } else {
            banner.remove_css_class("won");
        }
    }
    if let Some(revealer) = &st.result_revealer {
        revealer.set_reveal_child(true);
    }
}

pub(super) fn hide_result(st: &AppState) {
    if let Some(revealer) = &st.result_revealer {
        revealer.set_reveal_child(false);
    }
}
