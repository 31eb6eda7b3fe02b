use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use gettextrs::gettext;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;

use super::LOG_DOMAIN;
use super::board::{CONTENT_MARGIN, build_board};
use super::catalog::Catalog;
use super::debug_tools;
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::game::{SelectOutcome, Side};
use super::hud::{
    schedule_mismatch_clear,
    start_timer,
    stop_mismatch_clear,
    stop_timer,
    update_subtitle,
};
use super::rules::GameRules;
use super::scene::{hide_result, redraw_cards, show_result, sync_board};
use super::state::AppState;

const APP_ID: &str = "io.basshift.Concord";

pub fn handle_card_click(state: &Rc<RefCell<AppState>>, side: Side, position: usize) {
    let outcome = {
        let mut st = state.borrow_mut();
        let Some(id) = st.game.card_at(side, position).map(|card| card.id) else {
            return;
        };
        let outcome = st.game.select(side, id);
        if outcome == SelectOutcome::Ignored {
            return;
        }
        // Any accepted pick makes an older mismatch clear obsolete.
        stop_mismatch_clear(&mut st);

        if let SelectOutcome::Matched { won: true, .. } = outcome {
            stop_timer(&mut st);
            show_result(&st);
        }
        update_subtitle(&st);
        sync_board(&st);
        outcome
    };

    if let SelectOutcome::Mismatched { ticket } = outcome {
        schedule_mismatch_clear(state, ticket);
    }
}

pub(super) fn restart_game(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        stop_mismatch_clear(&mut st);
        st.game.reset();
        glib::g_info!(LOG_DOMAIN, "New game, generation {}", st.game.generation());
        hide_result(&st);
        update_subtitle(&st);
        sync_board(&st);
        redraw_cards(&st);
    }
    start_timer(state);
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::ScrolledWindow {
    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let banner = gtk::Box::new(gtk::Orientation::Vertical, 10);
    banner.add_css_class("result-banner");
    let message = gtk::Label::new(None);
    message.add_css_class("result-message");
    message.add_css_class("title-3");
    message.set_wrap(true);
    message.set_justify(gtk::Justification::Center);
    let again_btn = gtk::Button::with_label(&gettext("Play Again"));
    again_btn.add_css_class("suggested-action");
    again_btn.add_css_class("pill");
    again_btn.set_halign(gtk::Align::Center);
    again_btn.connect_clicked({
        let state = state.clone();
        move |_| {
            restart_game(&state);
        }
    });
    banner.append(&message);
    banner.append(&again_btn);

    let revealer = gtk::Revealer::builder()
        .transition_type(gtk::RevealerTransitionType::SlideDown)
        .reveal_child(false)
        .child(&banner)
        .build();

    content.append(&revealer);
    content.append(&build_board(state));

    let clamp = adw::Clamp::builder()
        .maximum_size(960)
        .child(&content)
        .build();

    let scroller = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .hexpand(true)
        .vexpand(true)
        .child(&clamp)
        .build();

    {
        let mut st = state.borrow_mut();
        st.result_revealer = Some(revealer);
        st.result_banner = Some(banner);
        st.result_label = Some(message);
    }

    scroller
}

pub fn run(catalog: Catalog, rules: GameRules) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        if let Some(win) = app.active_window() {
            win.present();
            return;
        }
        load_css();

        let title_text = catalog.title.clone();
        let state = Rc::new(RefCell::new(AppState::new(catalog.clone(), rules)));

        let new_game_action = SimpleAction::new("new-game", None);
        new_game_action.connect_activate({
            let state = state.clone();
            move |_, _| restart_game(&state)
        });
        app.add_action(&new_game_action);
        app.set_accels_for_action("app.new-game", &["<Control>r"]);

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<Control>q"]);

        let title_game_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_game_box.set_valign(gtk::Align::Center);
        title_game_box.set_halign(gtk::Align::Center);

        let title_game_main = gtk::Label::builder()
            .label(title_text.as_str())
            .halign(gtk::Align::Center)
            .ellipsize(gtk::pango::EllipsizeMode::End)
            .css_classes(vec!["title"])
            .build();

        let title_game_subtitle = gtk::Label::builder()
            .label("")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();

        title_game_box.append(&title_game_main);
        title_game_box.append(&title_game_subtitle);

        let header = adw::HeaderBar::builder()
            .title_widget(&title_game_box)
            .build();

        let menu_model = gio::Menu::new();
        menu_model.append(Some(gettext("New Game").as_str()), Some("app.new-game"));
        menu_model.append(Some(gettext("Instructions").as_str()), Some("app.instructions"));
        menu_model.append(Some(gettext("About Concord").as_str()), Some("app.about"));
        menu_model.append(Some(gettext("Quit").as_str()), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .action_name("app.new-game")
            .build();
        restart_button.set_tooltip_text(Some(gettext("New Game").as_str()));
        header.pack_start(&restart_button);
        header.pack_end(&menu_button);

        let game_view = build_game_view(&state);
        let toolbar = adw::ToolbarView::new();
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&game_view));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title(title_text.as_str())
            .default_width(900)
            .default_height(760)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 480);

        {
            let mut st = state.borrow_mut();
            st.title_game_subtitle = Some(title_game_subtitle);
            update_subtitle(&st);
            sync_board(&st);
        }

        let global_key = gtk::EventControllerKey::new();
        global_key.set_propagation_phase(gtk::PropagationPhase::Capture);
        global_key.connect_key_pressed({
            let state = state.clone();
            move |_, key, _, mods| {
                if debug_tools::handle_debug_shortcut(&state, key, mods) {
                    return glib::Propagation::Stop;
                }
                glib::Propagation::Proceed
            }
        });
        win.add_controller(global_key);

        win.connect_close_request({
            let state = state.clone();
            move |_| {
                let mut st = state.borrow_mut();
                stop_timer(&mut st);
                stop_mismatch_clear(&mut st);
                glib::Propagation::Proceed
            }
        });

        start_timer(&state);
        win.present();
    });

    app.run()
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        gio::resources_register_include!("concord.gresource")
            .expect("failed to register embedded resources");
    });

    let Some(display) = gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource("/io/basshift/Concord/style.css");
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
