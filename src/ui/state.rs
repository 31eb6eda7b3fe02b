use gtk4 as gtk;
use gtk4::glib;

use super::catalog::Catalog;
use super::game::{GameController, Side};
use super::rules::GameRules;

pub struct AppState {
    pub title_game_subtitle: Option<gtk::Label>,
    pub concept_buttons: Vec<gtk::Button>,
    pub detail_buttons: Vec<gtk::Button>,
    pub result_revealer: Option<gtk::Revealer>,
    pub result_banner: Option<gtk::Box>,
    pub result_label: Option<gtk::Label>,

    // Game state
    pub game: GameController,
    pub timer_handle: Option<glib::SourceId>,
    pub mismatch_handle: Option<glib::SourceId>,
}

impl AppState {
    pub fn new(catalog: Catalog, rules: GameRules) -> Self {
        AppState {
            title_game_subtitle: None,
            concept_buttons: Vec::new(),
            detail_buttons: Vec::new(),
            result_revealer: None,
            result_banner: None,
            result_label: None,
            game: GameController::new(catalog, rules),
            timer_handle: None,
            mismatch_handle: None,
        }
    }

    pub fn buttons(&self, side: Side) -> &[gtk::Button] {
        match side {
            Side::Concept => &self.concept_buttons,
            Side::Detail => &self.detail_buttons,
        }
    }
}
