//! The match engine facade.
//!
//! `MatchEngine` owns everything a match needs: the roster, the card
//! registry and deck, the dice, the configuration, the event notifier and
//! the live `MatchState`. Hosts drive it through a handful of operations,
//! each answering with a uniform [`Response`].
//!
//! ## Turn flow
//!
//! 1. Draw a card (reshuffling the discard pile if the deck is empty)
//! 2. Resolve it against both wrestlers
//! 3. Run the sub-game the last scoring move landed on, if any
//! 4. Record the turn in the match history
//!
//! A failure part-way through a turn puts the match state back the way it
//! was before the draw.

use tracing::{debug, debug_span, info, warn};

use crate::cards::{CardRegistry, Deck, Draw};
use crate::core::config::MatchConfig;
use crate::core::rng::{DiceSource, GameRng};
use crate::core::side::Side;
use crate::core::state::{MatchState, TurnRecord};
use crate::error::{EngineError, EngineResult};
use crate::events::{EventKind, EventNotifier, ListenerId, MatchEvent};
use crate::roster::{apply_grade, GradeKind, InMemoryRoster, Roster};
use crate::rules::flavor;
use crate::rules::{build_hot_box, resolve_card, resolve_triggers, HotBoxRequest, Movement, ResolverContext};

use super::checkpoint::MatchCheckpoint;
use super::response::{Response, ResponseData, TurnReport};

/// Source tag for moves made through `set_wrestler_position`.
pub const MANUAL_POSITION_SOURCE: &str = "Manual Position Set";

/// A single match between two wrestlers.
///
/// ```
/// use fttm_engine::cards::{Card, CardCategory, CardId, CardRegistry};
/// use fttm_engine::core::{ScriptedDice, Side};
/// use fttm_engine::engine::MatchEngine;
/// use fttm_engine::roster::{InMemoryRoster, TvGrade, Wrestler};
///
/// let roster: InMemoryRoster = [
///     Wrestler::new("Rex", TvGrade::A, 1),
///     Wrestler::new("Brick", TvGrade::C, -2),
/// ]
/// .into_iter()
/// .collect();
/// let registry: CardRegistry = [Card::new(CardId::new(1), CardCategory::Tv).with_fixed(3)]
///     .into_iter()
///     .collect();
///
/// let mut engine = MatchEngine::new(roster, registry).with_dice(ScriptedDice::new([]));
/// assert!(engine.setup("Rex", "Brick").succeeded);
///
/// let response = engine.play_turn();
/// assert!(response.succeeded);
/// assert_eq!(engine.state().unwrap().position(Side::Favored), 3);
/// ```
pub struct MatchEngine<R: Roster = InMemoryRoster> {
    roster: R,
    registry: CardRegistry,
    deck: Deck,
    dice: Box<dyn DiceSource>,
    config: MatchConfig,
    notifier: EventNotifier,
    state: Option<MatchState>,
}

impl<R: Roster> MatchEngine<R> {
    /// Engine with the default configuration.
    pub fn new(roster: R, registry: CardRegistry) -> Self {
        Self::with_config(roster, registry, MatchConfig::default())
    }

    /// Engine whose dice are seeded from `config.seed`.
    ///
    /// The deck starts in registry order; `setup` shuffles it.
    pub fn with_config(roster: R, registry: CardRegistry, config: MatchConfig) -> Self {
        let deck = Deck::from_registry(&registry);
        Self {
            roster,
            registry,
            deck,
            dice: Box::new(GameRng::new(config.seed)),
            config,
            notifier: EventNotifier::new(),
            state: None,
        }
    }

    /// Replace the dice (scripted dice for tests, a host RNG, ...).
    #[must_use]
    pub fn with_dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    // === Accessors ===

    /// The live match, once `setup` has succeeded.
    #[must_use]
    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn roster(&self) -> &R {
        &self.roster
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Has the current match been decided?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.as_ref().is_some_and(MatchState::is_over)
    }

    /// Names of the `count` wrestlers with the strongest grudges, skipping
    /// `excluded`.
    #[must_use]
    pub fn top_grudge_wrestlers(&self, count: usize, excluded: &[&str]) -> Vec<String> {
        self.roster
            .top_grudge(count, excluded)
            .into_iter()
            .map(|w| w.name.clone())
            .collect()
    }

    // === Events ===

    /// Listen to every event.
    pub fn subscribe(&mut self, listener: impl FnMut(&MatchEvent) + 'static) -> ListenerId {
        self.notifier.subscribe(listener)
    }

    /// Listen to one kind of event.
    pub fn subscribe_to(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&MatchEvent) + 'static,
    ) -> ListenerId {
        self.notifier.subscribe_to(kind, listener)
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // === Operations ===

    /// Start a match between two roster wrestlers.
    ///
    /// Both start at space 0 with nobody in control and an empty Hot Box.
    /// The discard pile is folded back into the deck and shuffled.
    pub fn setup(&mut self, favored: &str, underdog: &str) -> Response {
        let result = self.try_setup(favored.trim(), underdog.trim());
        self.respond("setup", result)
    }

    /// Draw and resolve one card.
    pub fn play_turn(&mut self) -> Response {
        let result = self.try_play_turn();
        self.respond("play_turn", result)
    }

    /// Put a wrestler in control. `None`, `"none"` or `"neither"` clears
    /// control.
    pub fn set_in_control(&mut self, wrestler: Option<&str>) -> Response {
        let result = self.try_set_in_control(wrestler);
        self.respond("set_in_control", result)
    }

    /// Move a wrestler to `position` directly.
    ///
    /// No sub-game is triggered and control is left alone.
    pub fn set_wrestler_position(&mut self, wrestler: &str, position: i32) -> Response {
        let result = self.try_set_wrestler_position(wrestler.trim(), position);
        self.respond("set_wrestler_position", result)
    }

    /// Seat allies, foes and grudge spectators at ringside.
    pub fn setup_hot_box(&mut self, request: HotBoxRequest) -> Response {
        let result = self.try_setup_hot_box(request);
        self.respond("setup_hot_box", result)
    }

    /// Roll for the pre-match highlight reel.
    pub fn pre_match_roll(&mut self) -> Response {
        let roll = flavor::pre_match(self.dice.as_mut());
        Response::success(roll.message(), ResponseData::Flavor(roll))
    }

    /// Roll for the post-match highlight reel.
    pub fn post_match_roll(&mut self, winner: Side) -> Response {
        let roll = flavor::post_match(self.dice.as_mut(), winner);
        Response::success(roll.message(), ResponseData::Flavor(roll))
    }

    /// Change a wrestler's TV or grudge grade on the roster.
    ///
    /// If the wrestler is in the current match, their in-match copy picks up
    /// the new grade too.
    pub fn update_wrestler_grade(&mut self, wrestler: &str, kind: GradeKind, value: &str) -> Response {
        let result = self.try_update_wrestler_grade(wrestler.trim(), kind, value);
        self.respond("update_wrestler_grade", result)
    }

    // === Checkpoints ===

    /// Save the match, deck order and dice position.
    ///
    /// Returns `None` unless the engine rolls its own seeded dice.
    #[must_use]
    pub fn checkpoint(&self) -> Option<MatchCheckpoint> {
        let dice = self.dice.checkpoint()?;
        Some(MatchCheckpoint {
            state: self.state.clone(),
            deck: self.deck.clone(),
            dice,
        })
    }

    /// Return to a saved checkpoint. Turns played afterwards repeat the ones
    /// played after it was taken.
    pub fn restore(&mut self, checkpoint: &MatchCheckpoint) {
        self.state = checkpoint.state.clone();
        self.deck = checkpoint.deck.clone();
        self.dice = Box::new(GameRng::from_state(&checkpoint.dice));
        info!(turn = checkpoint.turn(), seed = checkpoint.dice.seed, "Checkpoint restored");
    }

    // === Internals ===

    fn respond(&mut self, operation: &str, result: EngineResult<Response>) -> Response {
        match result {
            Ok(response) => response,
            Err(error) => {
                warn!(operation, %error, "Operation failed");
                self.notifier.publish(&MatchEvent::ErrorOccurred {
                    operation: operation.to_string(),
                    message: error.to_string(),
                });
                Response::failure(error)
            }
        }
    }

    fn try_setup(&mut self, favored: &str, underdog: &str) -> EngineResult<Response> {
        if favored.is_empty() || underdog.is_empty() {
            return Err(EngineError::WrestlersNotSelected);
        }
        if favored == underdog {
            return Err(EngineError::SameWrestler(favored.to_string()));
        }
        let lookup = |name: &str| {
            self.roster
                .get(name)
                .cloned()
                .ok_or_else(|| EngineError::UnknownWrestler(name.to_string()))
        };
        let favored_wrestler = lookup(favored)?;
        let underdog_wrestler = lookup(underdog)?;

        self.state = Some(MatchState::new(favored_wrestler, underdog_wrestler));
        self.deck.reset(self.dice.as_mut());
        info!(favored, underdog, cards = self.deck.len(), "Match set up");

        Ok(Response::success(
            format!("Match setup: {favored} (Face) vs {underdog} (Heel)"),
            ResponseData::Setup {
                favored: favored.to_string(),
                underdog: underdog.to_string(),
            },
        ))
    }

    fn try_play_turn(&mut self) -> EngineResult<Response> {
        let state = self.state.as_mut().ok_or(EngineError::WrestlersNotSelected)?;
        state.ensure_in_progress()?;

        let Draw { card, reshuffled } = self.deck.draw(self.dice.as_mut())?;
        if reshuffled {
            self.notifier.publish(&MatchEvent::DeckReshuffled {
                cards: self.deck.len() + 1,
            });
        }

        let snapshot = state.clone();
        state.turn_number += 1;
        let turn = state.turn_number;
        let _span = debug_span!("turn", turn, card = card.id.raw()).entered();
        state.current_card = Some(card.clone());
        let control_before = state.in_control;
        self.notifier.publish(&MatchEvent::CardDrawn {
            turn,
            card: card.clone(),
        });

        let mut ctx = ResolverContext::new(state, self.dice.as_mut(), &self.config, &mut self.notifier);
        let outcome = resolve_card(&mut ctx, &card).and_then(|()| {
            let narrative = ctx.resolution.narrative.clone();
            ctx.emit(MatchEvent::CardResolved {
                turn,
                card: card.id,
                narrative,
            });
            resolve_triggers(&mut ctx)
        });
        let resolution = ctx.finish();
        if let Err(error) = outcome {
            *state = snapshot;
            return Err(error);
        }

        let control_after = state.in_control;
        let positions = state.positions();
        state.record_turn(
            TurnRecord {
                turn,
                card: card.id,
                category: card.category.to_string(),
                control_before,
                control_after,
                positions: positions.clone(),
                narrative: resolution.narrative.clone(),
                outcome: resolution.outcome(),
            },
            self.config.history_limit,
        );
        debug!(?positions, ?control_after, "Turn recorded");

        let name_of = |side: Option<Side>| side.map(|s| state.wrestler(s).name.clone());
        let mut message = card.summary();
        for line in &resolution.narrative {
            message.push(' ');
            message.push_str(line);
        }
        let report = TurnReport {
            turn,
            card,
            reshuffled,
            control_before: name_of(control_before),
            control_after: name_of(control_after),
            positions,
            resolution,
        };
        Ok(Response::success(message, ResponseData::Turn(Box::new(report))))
    }

    fn try_set_in_control(&mut self, wrestler: Option<&str>) -> EngineResult<Response> {
        let state = self.state.as_mut().ok_or(EngineError::WrestlersNotSelected)?;
        let requested = wrestler.map(str::trim).filter(|name| {
            !name.is_empty() && !name.eq_ignore_ascii_case("none") && !name.eq_ignore_ascii_case("neither")
        });
        let side = match requested {
            Some(name) => Some(participant(&self.roster, state, name)?),
            None => None,
        };

        let previous = state.set_in_control(side);
        let name = side.map(|s| state.wrestler(s).name.clone());
        if previous != side {
            self.notifier.publish(&MatchEvent::InControlChanged {
                from: previous,
                to: side,
                wrestler: name.clone(),
            });
        }

        let message = match &name {
            Some(name) => format!("{name} is now in control"),
            None => "No wrestler is in control".to_string(),
        };
        Ok(Response::success(message, ResponseData::Control { wrestler: name }))
    }

    fn try_set_wrestler_position(&mut self, wrestler: &str, position: i32) -> EngineResult<Response> {
        let state = self.state.as_mut().ok_or(EngineError::WrestlersNotSelected)?;
        let side = participant(&self.roster, state, wrestler)?;
        let from = state.place(side, position)?;
        let to = state.position(side);

        let movement = Movement {
            side,
            wrestler: state.wrestler(side).name.clone(),
            from,
            to,
            points: i32::from(to) - i32::from(from),
            source: MANUAL_POSITION_SOURCE.to_string(),
        };
        debug!(wrestler = %movement.wrestler, from, to, "Position set manually");
        self.notifier.publish(&MatchEvent::WrestlerMoved(movement.clone()));

        Ok(Response::success(
            format!("{}'s position set to {to}", movement.wrestler),
            ResponseData::Position(movement),
        ))
    }

    fn try_setup_hot_box(&mut self, request: HotBoxRequest) -> EngineResult<Response> {
        let state = self.state.as_mut().ok_or(EngineError::WrestlersNotSelected)?;
        let hot_box = {
            let principals = [
                state.wrestler(Side::Favored).name.as_str(),
                state.wrestler(Side::Underdog).name.as_str(),
            ];
            build_hot_box(request, &self.roster, principals, self.config.grudge_spectators)?
        };
        state.hot_box = hot_box.clone();
        self.notifier.publish(&MatchEvent::HotBoxUpdated(hot_box.clone()));

        let seated: Vec<&str> = hot_box.names().collect();
        let message = if seated.is_empty() {
            "Hot Box is empty".to_string()
        } else {
            format!("Hot Box: {}", seated.join(", "))
        };
        info!(seated = seated.len(), "Hot Box set up");
        Ok(Response::success(message, ResponseData::HotBox(hot_box)))
    }

    fn try_update_wrestler_grade(
        &mut self,
        wrestler: &str,
        kind: GradeKind,
        value: &str,
    ) -> EngineResult<Response> {
        let change = self.roster.update_grade(wrestler, kind, value)?;
        if let Some(state) = self.state.as_mut() {
            if let Some(side) = state.side_of(wrestler) {
                apply_grade(state.wrestler_mut(side), kind, value)?;
            }
        }
        info!(%change, "Grade updated");
        Ok(Response::success(change.to_string(), ResponseData::Grade(change)))
    }
}

impl<R: Roster + std::fmt::Debug> std::fmt::Debug for MatchEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("roster", &self.roster)
            .field("cards", &self.registry.len())
            .field("deck", &self.deck.len())
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Side of `name` in the match. Distinguishes a roster wrestler sitting this
/// one out from a name nobody has heard of.
fn participant<R: Roster + ?Sized>(roster: &R, state: &MatchState, name: &str) -> EngineResult<Side> {
    state.side_of(name).ok_or_else(|| {
        if roster.contains(name) {
            EngineError::NotInMatch(name.to_string())
        } else {
            EngineError::UnknownWrestler(name.to_string())
        }
    })
}
