use gettextrs::gettext;
use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let body = gettext(
        "Pick a concept on the left and the detail that belongs to it on the right.\n\
A correct pair scores 10 points. A wrong pair costs 5 points.\n\
Match all ten pairs before the five-minute clock runs out.",
    );
    let dialog = adw::AlertDialog::new(Some(gettext("Instructions").as_str()), Some(body.as_str()));
    dialog.add_response("ok", &gettext("Got it"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Concord")
        .application_icon("io.basshift.Concord")
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext("Pair each concept with its detail before time runs out."))
        .build();
    dialog.add_legal_section("Concord", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
