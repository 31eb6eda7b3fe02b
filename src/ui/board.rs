use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use super::app::handle_card_click;
use super::game::Side;
use super::state::AppState;

pub const CONTENT_MARGIN: i32 = 12;
pub const CARD_GAP: i32 = 8;
const CARD_MIN_HEIGHT: i32 = 72;
const CARD_PADDING: f64 = 8.0;
const CARD_MAX_LINES: i32 = 4;

fn card_text(st: &AppState, side: Side, position: usize) -> Option<String> {
    let card = st.game.card_at(side, position)?;
    Some(match side {
        Side::Concept => card.label.clone(),
        Side::Detail => card.detail.clone(),
    })
}

fn paint_card_text(
    cr: &gtk::cairo::Context,
    text: &str,
    side: Side,
    width: i32,
    height: i32,
    fg: &gtk::gdk::RGBA,
) {
    cr.set_antialias(gtk::cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(cr);
    let mut font_desc = pango::FontDescription::new();
    font_desc.set_family("Cantarell, Noto Sans, sans");
    if side == Side::Concept {
        font_desc.set_weight(pango::Weight::Bold);
    }
    font_desc.set_size(11 * pango::SCALE);
    layout.set_font_description(Some(&font_desc));
    let text_width = (width as f64 - CARD_PADDING * 2.0).max(1.0);
    layout.set_width((text_width * pango::SCALE as f64) as i32);
    layout.set_wrap(pango::WrapMode::WordChar);
    layout.set_height(-CARD_MAX_LINES);
    layout.set_ellipsize(pango::EllipsizeMode::End);
    layout.set_text(text);

    cr.set_source_rgba(
        fg.red() as f64,
        fg.green() as f64,
        fg.blue() as f64,
        fg.alpha() as f64,
    );

    let (_, text_height) = layout.pixel_size();
    cr.move_to(CARD_PADDING, ((height - text_height) as f64 / 2.0).max(0.0));
    pangocairo::functions::show_layout(cr, &layout);
}

fn build_card_face(state: &Rc<RefCell<AppState>>, side: Side, position: usize) -> gtk::DrawingArea {
    let drawing_area = gtk::DrawingArea::builder()
        .hexpand(true)
        .content_height(CARD_MIN_HEIGHT)
        .build();
    drawing_area.add_css_class("concord-card-label");

    let state_draw = state.clone();
    drawing_area.set_draw_func(move |area, cr, width, height| {
        let Some(text) = card_text(&state_draw.borrow(), side, position) else {
            return;
        };

        let fg = area.style_context().color();
        paint_card_text(cr, &text, side, width, height, &fg);
    });

    drawing_area
}

fn build_column(state: &Rc<RefCell<AppState>>, side: Side) -> (gtk::Box, Vec<gtk::Button>) {
    let column = gtk::Box::new(gtk::Orientation::Vertical, CARD_GAP);
    column.set_hexpand(true);
    column.set_valign(gtk::Align::Start);

    let heading = match side {
        Side::Concept => gettext("Concepts"),
        Side::Detail => gettext("Details"),
    };
    let title = gtk::Label::builder()
        .label(heading)
        .halign(gtk::Align::Start)
        .css_classes(vec!["board-column-title", "title-4"])
        .build();
    column.append(&title);

    let count = state.borrow().game.cards(side).len();
    let mut buttons = Vec::with_capacity(count);
    for position in 0..count {
        let button = gtk::Button::builder()
            .css_classes(vec!["concord-card"])
            .hexpand(true)
            .build();
        button.set_child(Some(&build_card_face(state, side, position)));

        let state_clone = state.clone();
        button.connect_clicked(move |_| {
            handle_card_click(&state_clone, side, position);
        });

        column.append(&button);
        buttons.push(button);
    }

    (column, buttons)
}

pub fn build_board(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let board = gtk::Box::new(gtk::Orientation::Horizontal, CARD_GAP * 2);
    board.add_css_class("concord-board");
    board.set_homogeneous(true);
    board.set_hexpand(true);

    let (concepts, concept_buttons) = build_column(state, Side::Concept);
    let (details, detail_buttons) = build_column(state, Side::Detail);
    board.append(&concepts);
    board.append(&details);

    let mut st = state.borrow_mut();
    st.concept_buttons = concept_buttons;
    st.detail_buttons = detail_buttons;

    board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_text_paints_antialiased_ink() {
        let mut surface = gtk::cairo::ImageSurface::create(gtk::cairo::Format::ARgb32, 200, 72)
            .expect("image surface");
        {
            let cr = gtk::cairo::Context::new(&surface).expect("cairo context");
            let black = gtk::gdk::RGBA::new(0.0, 0.0, 0.0, 1.0);
            paint_card_text(&cr, "Free markets", Side::Concept, 200, 72, &black);
            assert_eq!(cr.antialias(), gtk::cairo::Antialias::Best);
        }
        surface.flush();

        let data = surface.data().expect("surface data");
        assert!(data.chunks(4).any(|px| px[3] != 0));
    }
}
