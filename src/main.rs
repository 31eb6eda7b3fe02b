mod ui;

use gettextrs::{LocaleCategory, bind_textdomain_codeset, bindtextdomain, setlocale, textdomain};

use ui::LOG_DOMAIN;
use ui::catalog::Catalog;
use ui::rules::GameRules;

const GETTEXT_PACKAGE: &str = "concord";
const DEFAULT_LOCALEDIR: &str = "/usr/share/locale";

fn init_i18n() {
    setlocale(LocaleCategory::LcAll, "");
    let localedir = option_env!("CONCORD_LOCALEDIR").unwrap_or(DEFAULT_LOCALEDIR);
    if let Err(err) = bindtextdomain(GETTEXT_PACKAGE, localedir) {
        glib::g_warning!(LOG_DOMAIN, "Unable to bind text domain: {}", err);
        return;
    }
    if let Err(err) = bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8") {
        glib::g_warning!(LOG_DOMAIN, "Unable to set text domain codeset: {}", err);
    }
    if let Err(err) = textdomain(GETTEXT_PACKAGE) {
        glib::g_warning!(LOG_DOMAIN, "Unable to switch text domain: {}", err);
    }
}

fn main() -> glib::ExitCode {
    init_i18n();

    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(err) => {
            glib::g_critical!(LOG_DOMAIN, "Cannot load card catalog: {}", err);
            return glib::ExitCode::FAILURE;
        }
    };

    ui::app::run(catalog, GameRules::default())
}
