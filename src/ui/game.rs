use std::collections::BTreeSet;

use gtk4::glib;
use rand::Rng;
use rand::seq::SliceRandom;

use super::LOG_DOMAIN;
use super::catalog::{CardId, CardItem, Catalog};
use super::rules::{GameRules, ROUND_SECONDS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Concept,
    Detail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Over,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndMessage {
    AllMatched { score: u32 },
    TimeExpired { score: u32 },
}

/// Identifies one scheduled mismatch clear. Only the newest ticket of the
/// current generation has any effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearTicket {
    generation: u64,
    serial: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Ignored,
    Selected,
    Matched { id: CardId, won: bool },
    Mismatched { ticket: ClearTicket },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running(u32),
    Expired,
    Stopped,
}

#[derive(Clone, Debug, Default)]
pub struct GameState {
    pub shuffled_concepts: Vec<CardItem>,
    pub shuffled_details: Vec<CardItem>,
    pub selected_concept: Option<CardId>,
    pub selected_detail: Option<CardId>,
    pub matched: BTreeSet<CardId>,
    pub score: u32,
    pub seconds_remaining: u32,
    pub is_over: bool,
}

pub struct GameController {
    catalog: Catalog,
    rules: GameRules,
    state: GameState,
    generation: u64,
    mismatch_serial: u64,
    pending_clear: Option<u64>,
}

impl GameController {
    pub fn new(catalog: Catalog, rules: GameRules) -> Self {
        Self::new_with_rng(catalog, rules, &mut rand::rng())
    }

    pub fn new_with_rng<R: Rng + ?Sized>(catalog: Catalog, rules: GameRules, rng: &mut R) -> Self {
        let mut controller = GameController {
            catalog,
            rules,
            state: GameState::default(),
            generation: 0,
            mismatch_serial: 0,
            pending_clear: None,
        };
        controller.reset_with(rng);
        controller
    }

    pub fn reset(&mut self) {
        self.reset_with(&mut rand::rng());
    }

    pub fn reset_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut concepts = self.catalog.items().to_vec();
        let mut details = self.catalog.items().to_vec();
        concepts.shuffle(rng);
        details.shuffle(rng);

        self.generation = self.generation.wrapping_add(1);
        self.pending_clear = None;
        self.state = GameState {
            shuffled_concepts: concepts,
            shuffled_details: details,
            selected_concept: None,
            selected_detail: None,
            matched: BTreeSet::new(),
            score: 0,
            seconds_remaining: ROUND_SECONDS,
            is_over: false,
        };
        glib::g_debug!(LOG_DOMAIN, "Dealt generation {}", self.generation);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> GameRules {
        self.rules
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn phase(&self) -> Phase {
        if self.state.is_over {
            Phase::Over
        } else {
            Phase::Playing
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_over {
            return TickOutcome::Stopped;
        }
        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        if self.state.seconds_remaining == 0 {
            self.state.is_over = true;
            glib::g_info!(
                LOG_DOMAIN,
                "Time expired with {} of {} matched, score {}",
                self.state.matched.len(),
                self.catalog.len(),
                self.state.score
            );
            return TickOutcome::Expired;
        }
        TickOutcome::Running(self.state.seconds_remaining)
    }

    pub fn select_concept(&mut self, id: CardId) -> SelectOutcome {
        self.select(Side::Concept, id)
    }

    pub fn select_detail(&mut self, id: CardId) -> SelectOutcome {
        self.select(Side::Detail, id)
    }

    pub fn select(&mut self, side: Side, id: CardId) -> SelectOutcome {
        if self.state.is_over || self.is_matched(id) || !self.catalog.contains(id) {
            return SelectOutcome::Ignored;
        }

        // A fresh pick replaces whatever mismatch was still on display.
        self.pending_clear = None;
        match side {
            Side::Concept => self.state.selected_concept = Some(id),
            Side::Detail => self.state.selected_detail = Some(id),
        }

        match (self.state.selected_concept, self.state.selected_detail) {
            (Some(concept), Some(detail)) => self.evaluate_pair(concept, detail),
            _ => SelectOutcome::Selected,
        }
    }

    /// Scores a concept/detail pair. A mismatch is penalised right away; the
    /// selections stay up until the returned ticket is redeemed. Unknown or
    /// already matched ids leave the game untouched.
    pub fn evaluate_pair(&mut self, concept: CardId, detail: CardId) -> SelectOutcome {
        if self.state.is_over {
            return SelectOutcome::Ignored;
        }
        for id in [concept, detail] {
            if !self.catalog.contains(id) || self.is_matched(id) {
                return SelectOutcome::Ignored;
            }
        }

        if concept == detail {
            if !self.state.matched.insert(concept) {
                return SelectOutcome::Ignored;
            }
            self.state.score = self.state.score.saturating_add(self.rules.match_points);
            self.state.selected_concept = None;
            self.state.selected_detail = None;
            self.pending_clear = None;
            let won = self.is_won();
            if won {
                self.state.is_over = true;
                glib::g_info!(
                    LOG_DOMAIN,
                    "All pairs matched with {}s left, score {}",
                    self.state.seconds_remaining,
                    self.state.score
                );
            } else {
                glib::g_debug!(LOG_DOMAIN, "Matched pair {}", concept);
            }
            return SelectOutcome::Matched { id: concept, won };
        }

        self.state.selected_concept = Some(concept);
        self.state.selected_detail = Some(detail);
        self.state.score = self.state.score.saturating_sub(self.rules.mismatch_penalty);
        self.mismatch_serial = self.mismatch_serial.wrapping_add(1);
        self.pending_clear = Some(self.mismatch_serial);
        glib::g_debug!(
            LOG_DOMAIN,
            "Mismatch concept {} / detail {}, score {}",
            concept,
            detail,
            self.state.score
        );
        SelectOutcome::Mismatched {
            ticket: ClearTicket {
                generation: self.generation,
                serial: self.mismatch_serial,
            },
        }
    }

    /// Returns `false` when the ticket belongs to an older deal or was
    /// superseded by a later pick.
    pub fn clear_mismatch(&mut self, ticket: ClearTicket) -> bool {
        if ticket.generation != self.generation || self.pending_clear != Some(ticket.serial) {
            return false;
        }
        self.pending_clear = None;
        self.state.selected_concept = None;
        self.state.selected_detail = None;
        true
    }

    pub fn has_pending_clear(&self) -> bool {
        self.pending_clear.is_some()
    }

    pub fn is_matched(&self, id: CardId) -> bool {
        self.state.matched.contains(&id)
    }

    pub fn is_won(&self) -> bool {
        self.state.matched.len() == self.catalog.len()
    }

    pub fn is_selected(&self, side: Side, id: CardId) -> bool {
        let selected = match side {
            Side::Concept => self.state.selected_concept,
            Side::Detail => self.state.selected_detail,
        };
        selected == Some(id)
    }

    pub fn is_mismatched(&self, side: Side, id: CardId) -> bool {
        self.pending_clear.is_some() && self.is_selected(side, id)
    }

    pub fn cards(&self, side: Side) -> &[CardItem] {
        match side {
            Side::Concept => &self.state.shuffled_concepts,
            Side::Detail => &self.state.shuffled_details,
        }
    }

    pub fn card_at(&self, side: Side, position: usize) -> Option<&CardItem> {
        self.cards(side).get(position)
    }

    pub fn end_message(&self) -> Option<EndMessage> {
        if !self.state.is_over {
            return None;
        }
        let score = self.state.score;
        if self.is_won() {
            Some(EndMessage::AllMatched { score })
        } else {
            Some(EndMessage::TimeExpired { score })
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn controller(seed: u64) -> GameController {
        let catalog = Catalog::builtin().expect("builtin catalog should parse");
        let mut rng = StdRng::seed_from_u64(seed);
        GameController::new_with_rng(catalog, GameRules::default(), &mut rng)
    }

    fn sorted_ids(items: &[CardItem]) -> Vec<CardId> {
        let mut ids: Vec<CardId> = items.iter().map(|item| item.id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn reset_deals_fresh_permutations() {
        let mut game = controller(7);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            game.select_concept(4);
            game.select_detail(4);
            game.tick();
            game.reset_with(&mut rng);

            let st = game.state();
            assert!(st.matched.is_empty());
            assert_eq!(st.score, 0);
            assert_eq!(st.seconds_remaining, 300);
            assert!(!st.is_over);
            assert_eq!(st.selected_concept, None);
            assert_eq!(st.selected_detail, None);
            assert_eq!(sorted_ids(&st.shuffled_concepts), (1..=10).collect::<Vec<_>>());
            assert_eq!(sorted_ids(&st.shuffled_details), (1..=10).collect::<Vec<_>>());
            assert_eq!(game.phase(), Phase::Playing);
        }
    }

    #[test]
    fn reset_advances_generation() {
        let mut game = controller(1);
        let before = game.generation();
        game.reset();
        assert!(!game.is_current(before));
        assert!(game.is_current(game.generation()));
    }

    #[test]
    fn matching_pair_scores_and_clears_selection() {
        let mut game = controller(3);
        assert_eq!(game.select_concept(3), SelectOutcome::Selected);
        assert_eq!(
            game.select_detail(3),
            SelectOutcome::Matched { id: 3, won: false }
        );

        let st = game.state();
        assert_eq!(st.matched.iter().copied().collect::<Vec<_>>(), vec![3]);
        assert_eq!(st.score, 10);
        assert_eq!(st.selected_concept, None);
        assert_eq!(st.selected_detail, None);
        assert!(game.is_matched(3));
    }

    #[test]
    fn mismatch_penalises_now_and_clears_later() {
        let mut game = controller(5);
        game.select_concept(6);
        game.select_detail(6);
        assert_eq!(game.state().score, 10);

        game.select_concept(1);
        let SelectOutcome::Mismatched { ticket } = game.select_detail(2) else {
            panic!("expected a mismatch");
        };
        assert_eq!(game.state().score, 5);
        assert!(game.is_mismatched(Side::Concept, 1));
        assert!(game.is_mismatched(Side::Detail, 2));

        assert!(game.clear_mismatch(ticket));
        let st = game.state();
        assert_eq!(st.selected_concept, None);
        assert_eq!(st.selected_detail, None);
        assert_eq!(st.matched.iter().copied().collect::<Vec<_>>(), vec![6]);
        assert_eq!(st.score, 5);
        assert!(!game.has_pending_clear());
    }

    #[test]
    fn score_never_drops_below_zero() {
        let mut game = controller(11);
        for _ in 0..5 {
            game.select_concept(1);
            game.select_detail(2);
            assert_eq!(game.state().score, 0);
        }
    }

    #[test]
    fn countdown_expires_after_full_round() {
        let mut game = controller(2);
        for remaining in (1..300).rev() {
            assert_eq!(game.tick(), TickOutcome::Running(remaining));
        }
        assert_eq!(game.tick(), TickOutcome::Expired);
        assert_eq!(game.state().seconds_remaining, 0);
        assert!(game.state().is_over);
        assert_eq!(game.tick(), TickOutcome::Stopped);
        assert_eq!(game.state().seconds_remaining, 0);
        assert_eq!(
            game.end_message(),
            Some(EndMessage::TimeExpired { score: 0 })
        );
    }

    #[test]
    fn matching_everything_wins_regardless_of_clock() {
        let mut game = controller(8);
        game.tick();
        for id in 1..=10 {
            game.select_detail(id);
            let outcome = game.select_concept(id);
            assert_eq!(outcome, SelectOutcome::Matched { id, won: id == 10 });
        }
        assert!(game.is_won());
        assert!(game.state().is_over);
        assert_eq!(game.state().seconds_remaining, 299);
        assert_eq!(game.phase(), Phase::Over);
        assert_eq!(
            game.end_message(),
            Some(EndMessage::AllMatched { score: 100 })
        );
        assert_eq!(game.tick(), TickOutcome::Stopped);
    }

    #[test]
    fn matched_cards_and_finished_games_ignore_clicks() {
        let mut game = controller(4);
        game.select_concept(2);
        game.select_detail(2);
        assert_eq!(game.select_concept(2), SelectOutcome::Ignored);
        assert_eq!(game.select_detail(2), SelectOutcome::Ignored);
        assert_eq!(game.select_concept(42), SelectOutcome::Ignored);

        while game.tick() != TickOutcome::Expired {}
        assert_eq!(game.select_concept(5), SelectOutcome::Ignored);
        assert_eq!(game.state().selected_concept, None);
        assert_eq!(game.state().score, 10);
    }

    #[test]
    fn stale_ticket_is_inert_after_reset() {
        let mut game = controller(6);
        game.select_concept(1);
        let SelectOutcome::Mismatched { ticket } = game.select_detail(2) else {
            panic!("expected a mismatch");
        };
        game.reset();
        game.select_concept(7);

        assert!(!game.clear_mismatch(ticket));
        assert_eq!(game.state().selected_concept, Some(7));
    }

    #[test]
    fn new_pick_supersedes_pending_clear() {
        let mut game = controller(9);
        game.select_concept(1);
        let SelectOutcome::Mismatched { ticket } = game.select_detail(2) else {
            panic!("expected a mismatch");
        };

        // Detail 2 stays selected, so picking concept 2 completes a match.
        assert_eq!(
            game.select_concept(2),
            SelectOutcome::Matched { id: 2, won: false }
        );
        assert!(!game.clear_mismatch(ticket));
        assert_eq!(game.state().score, 10);
    }

    #[test]
    fn selection_on_same_side_replaces_previous() {
        let mut game = controller(10);
        game.select_concept(1);
        game.select_concept(4);
        assert!(game.is_selected(Side::Concept, 4));
        assert!(!game.is_selected(Side::Concept, 1));
        assert_eq!(
            game.select_detail(4),
            SelectOutcome::Matched { id: 4, won: false }
        );
    }

    #[test]
    fn evaluate_pair_scores_a_match_once() {
        let mut game = controller(12);
        assert_eq!(
            game.evaluate_pair(3, 3),
            SelectOutcome::Matched { id: 3, won: false }
        );
        assert_eq!(game.evaluate_pair(3, 3), SelectOutcome::Ignored);
        assert_eq!(game.evaluate_pair(3, 5), SelectOutcome::Ignored);

        let st = game.state();
        assert_eq!(st.matched.iter().copied().collect::<Vec<_>>(), vec![3]);
        assert_eq!(st.score, 10);
        assert!(!game.has_pending_clear());
    }

    #[test]
    fn evaluate_pair_ignores_ids_outside_catalog() {
        let mut game = controller(13);
        assert_eq!(game.evaluate_pair(42, 42), SelectOutcome::Ignored);
        assert_eq!(game.evaluate_pair(0, 4), SelectOutcome::Ignored);
        assert_eq!(game.evaluate_pair(4, 11), SelectOutcome::Ignored);

        let st = game.state();
        assert!(st.matched.is_empty());
        assert_eq!(st.score, 0);
        assert!(!st.is_over);
        assert!(!game.is_won());
    }

    #[test]
    fn evaluate_pair_mismatch_matches_select_path() {
        let mut game = controller(14);
        game.evaluate_pair(7, 7);
        let SelectOutcome::Mismatched { ticket } = game.evaluate_pair(1, 2) else {
            panic!("expected a mismatch");
        };
        assert_eq!(game.state().score, 5);
        assert_eq!(game.state().selected_concept, Some(1));
        assert_eq!(game.state().selected_detail, Some(2));
        assert!(game.clear_mismatch(ticket));
        assert_eq!(game.state().selected_concept, None);
    }
}
