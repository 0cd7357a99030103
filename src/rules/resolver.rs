//! Card resolution.
//!
//! [`resolve_card`] interprets one drawn card against both wrestlers and the
//! match state, then [`resolve_triggers`] runs the pin or finisher attempt
//! the turn's last scoring move earned, if any.
//!
//! ## Dispatch
//!
//! 1. A control card with somebody in control is scored straight away for
//!    that wrestler.
//! 2. Otherwise the category decides who (if anyone) moves:
//!    - TV: better TV grade, per-grade points
//!    - Grudge: bigger grudge magnitude
//!    - Specialty: the wrestler with a specialty, scoring its own points
//!    - Trailing: the wrestler further back (level = underdog)
//!    - Signature: the wrestler in control, if they scored last, rolls a die
//!    - Test of Strength: two powerhouses lock up
//!    - Helped: an ally at ringside
//!    - Title Holder: the wrestler in control, if they hold a title
//!    - Wild Card / Highlight Reel / Ref Bump: text only
//!    - Skill cards: whoever can use the skill from where they stand
//!
//! Two equally eligible wrestlers go to the tie-break.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::hotbox::resolve_helped;
use super::movement::{move_wrestler, Movement};
use super::subgames::{finisher_attempt, pin_attempt, submission_hold, test_of_strength, SubGameReport};
use super::tiebreak::{tie_break, trailing};
use super::track::Trigger;
use crate::cards::{Card, CardCategory};
use crate::core::config::MatchConfig;
use crate::core::rng::DiceSource;
use crate::core::side::Side;
use crate::core::state::{MatchResult, MatchState};
use crate::error::{EngineError, EngineResult};
use crate::events::{EventNotifier, MatchEvent};
use crate::roster::Wrestler;

/// Everything one turn's resolution produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub narrative: Vec<String>,
    pub movements: Vec<Movement>,
    pub sub_games: Vec<SubGameReport>,
    pub result: Option<MatchResult>,
}

impl Resolution {
    /// The turn's last movement, if it scored.
    #[must_use]
    pub fn last_scoring_move(&self) -> Option<&Movement> {
        self.movements.last().filter(|m| m.scored())
    }

    /// Headline of the last sub-game played.
    #[must_use]
    pub fn outcome(&self) -> Option<String> {
        self.sub_games.last().map(SubGameReport::headline)
    }
}

/// Mutable view of a match while a card resolves.
pub struct ResolverContext<'a> {
    pub state: &'a mut MatchState,
    pub dice: &'a mut dyn DiceSource,
    pub config: &'a MatchConfig,
    pub notifier: &'a mut EventNotifier,
    pub resolution: Resolution,
}

impl<'a> ResolverContext<'a> {
    pub fn new(
        state: &'a mut MatchState,
        dice: &'a mut dyn DiceSource,
        config: &'a MatchConfig,
        notifier: &'a mut EventNotifier,
    ) -> Self {
        Self {
            state,
            dice,
            config,
            notifier,
            resolution: Resolution::default(),
        }
    }

    /// Name of the wrestler in `side`'s corner.
    #[must_use]
    pub fn name(&self, side: Side) -> String {
        self.state.wrestler(side).name.clone()
    }

    /// Add a line to the turn's narrative.
    pub fn narrate(&mut self, line: impl Into<String>) {
        self.resolution.narrative.push(line.into());
    }

    /// Publish an event.
    pub fn emit(&mut self, event: MatchEvent) {
        self.notifier.publish(&event);
    }

    /// Hand back what was produced.
    #[must_use]
    pub fn finish(self) -> Resolution {
        self.resolution
    }
}

/// Resolve a drawn card.
pub fn resolve_card(ctx: &mut ResolverContext<'_>, card: &Card) -> EngineResult<()> {
    ctx.state.ensure_in_progress()?;
    debug!(card = %card.summary(), in_control = ?ctx.state.in_control, "Resolving card");

    if card.requires_control && ctx.state.in_control.is_some() {
        return resolve_for_controller(ctx, card);
    }

    match &card.category {
        CardCategory::Tv => resolve_tv(ctx, card),
        CardCategory::Grudge => resolve_grudge(ctx, card),
        CardCategory::Specialty => resolve_specialty(ctx),
        CardCategory::Trailing => {
            let side = trailing(ctx.state);
            ctx.narrate(format!("{} is trailing.", ctx.name(side)));
            score_card(ctx, side, card);
        }
        CardCategory::Signature => resolve_signature(ctx),
        CardCategory::TestOfStrength => {
            if Side::BOTH.iter().all(|&s| ctx.state.wrestler(s).is_powerhouse()) {
                test_of_strength(ctx);
            } else {
                ctx.narrate("Both wrestlers must be strong or powerful for a test of strength.");
            }
        }
        CardCategory::Helped => resolve_helped(ctx, card),
        CardCategory::TitleHolder => resolve_title_holder(ctx, card),
        CardCategory::WildCard | CardCategory::HighlightReel | CardCategory::RefBump => {
            let text = card
                .text
                .clone()
                .unwrap_or_else(|| format!("{} card with no text.", card.category));
            ctx.narrate(text);
        }
        CardCategory::Skill(skill) => resolve_skill(ctx, card, skill),
    }
    Ok(())
}

/// Control card: score it for whoever is in control.
fn resolve_for_controller(ctx: &mut ResolverContext<'_>, card: &Card) -> EngineResult<()> {
    let side = ctx.state.in_control.ok_or(EngineError::MissingParticipant {
        context: "control card",
    })?;
    let grade = ctx.state.wrestler(side).tv_grade;
    ctx.narrate(format!("Control card for {}.", ctx.name(side)));

    let points = match card.category {
        CardCategory::Specialty => {
            let specialty = [side, side.opponent()]
                .into_iter()
                .map(|s| ctx.state.wrestler(s))
                .find(|w| w.has_specialty())
                .map(Wrestler::specialty_points);
            let Some(points) = specialty else {
                ctx.narrate("Nobody has a specialty. Nothing happens.");
                return Ok(());
            };
            points
        }
        CardCategory::Signature => i32::from(ctx.dice.roll_d6()),
        _ => card.points_for(grade, ctx.dice),
    };
    move_wrestler(ctx, side, points, card.category.label());
    Ok(())
}

fn score_card(ctx: &mut ResolverContext<'_>, side: Side, card: &Card) {
    let grade = ctx.state.wrestler(side).tv_grade;
    let points = card.points_for(grade, ctx.dice);
    move_wrestler(ctx, side, points, card.category.label());
}

fn resolve_tv(ctx: &mut ResolverContext<'_>, card: &Card) {
    let favored = ctx.state.wrestler(Side::Favored).tv_grade;
    let underdog = ctx.state.wrestler(Side::Underdog).tv_grade;
    let side = match favored.cmp(&underdog) {
        std::cmp::Ordering::Greater => Side::Favored,
        std::cmp::Ordering::Less => Side::Underdog,
        std::cmp::Ordering::Equal => {
            ctx.narrate(format!("Both wrestlers are TV grade {favored}."));
            tie_break(ctx.state)
        }
    };
    ctx.narrate(format!("{} wins the TV comparison.", ctx.name(side)));
    score_card(ctx, side, card);
}

fn resolve_grudge(ctx: &mut ResolverContext<'_>, card: &Card) {
    let favored = ctx.state.wrestler(Side::Favored).grudge_grade.magnitude();
    let underdog = ctx.state.wrestler(Side::Underdog).grudge_grade.magnitude();
    let side = match favored.cmp(&underdog) {
        std::cmp::Ordering::Greater => Side::Favored,
        std::cmp::Ordering::Less => Side::Underdog,
        std::cmp::Ordering::Equal => {
            ctx.narrate("The grudge runs equally deep.");
            tie_break(ctx.state)
        }
    };
    ctx.narrate(format!("{} carries the bigger grudge.", ctx.name(side)));
    score_card(ctx, side, card);
}

fn resolve_specialty(ctx: &mut ResolverContext<'_>) {
    let side = match eligible(ctx, |w| w.has_specialty()) {
        Some(side) => side,
        None => {
            ctx.narrate("Neither wrestler has a specialty. Nothing happens.");
            return;
        }
    };
    let wrestler = ctx.state.wrestler(side);
    let points = wrestler.specialty_points();
    let line = match &wrestler.specialty {
        Some(s) => format!("{} hits the {}!", wrestler.name, s.name),
        None => format!("{} hits a specialty move!", wrestler.name),
    };
    ctx.narrate(line);
    move_wrestler(ctx, side, points, CardCategory::Specialty.label());
}

fn resolve_signature(ctx: &mut ResolverContext<'_>) {
    let Some(side) = ctx.state.in_control.filter(|&s| ctx.state.wrestler(s).scored_last) else {
        ctx.narrate("Signature move needs the wrestler in control to have scored last. Nothing happens.");
        return;
    };
    let roll = ctx.dice.roll_d6();
    ctx.narrate(format!("{} goes for a signature move: rolled {roll}.", ctx.name(side)));
    move_wrestler(ctx, side, i32::from(roll), CardCategory::Signature.label());
}

fn resolve_title_holder(ctx: &mut ResolverContext<'_>, card: &Card) {
    let Some(side) = ctx.state.in_control.filter(|&s| ctx.state.wrestler(s).title_holder) else {
        ctx.narrate("The wrestler in control holds no title. Nothing happens.");
        return;
    };
    ctx.narrate(format!("{} shows why they carry the gold.", ctx.name(side)));
    score_card(ctx, side, card);
}

fn resolve_skill(ctx: &mut ResolverContext<'_>, card: &Card, skill: &str) {
    let Some(side) = eligible(ctx, |w| w.can_use_skill(skill)) else {
        ctx.narrate(format!("Neither wrestler can use {skill} from where they stand."));
        return;
    };
    if card.is_submission() {
        submission_hold(ctx, side, card);
    } else {
        ctx.narrate(format!("{} uses {skill}.", ctx.name(side)));
        score_card(ctx, side, card);
    }
}

/// The one eligible wrestler, the tie-break winner if both are, or `None`.
fn eligible(ctx: &ResolverContext<'_>, qualifies: impl Fn(&Wrestler) -> bool) -> Option<Side> {
    let favored = qualifies(ctx.state.wrestler(Side::Favored));
    let underdog = qualifies(ctx.state.wrestler(Side::Underdog));
    match (favored, underdog) {
        (true, true) => Some(tie_break(ctx.state)),
        (true, false) => Some(Side::Favored),
        (false, true) => Some(Side::Underdog),
        (false, false) => None,
    }
}

/// Run the pin or finisher attempt earned by the turn's last scoring move.
pub fn resolve_triggers(ctx: &mut ResolverContext<'_>) -> EngineResult<()> {
    if ctx.state.is_over() {
        return Ok(());
    }
    let Some(last) = ctx.resolution.last_scoring_move() else {
        return Ok(());
    };
    let side = last.side;
    match Trigger::for_position(ctx.state.position(side)) {
        Some(Trigger::Pin) => {
            pin_attempt(ctx);
        }
        Some(Trigger::Finisher) => {
            finisher_attempt(ctx, side);
        }
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardPoints};
    use crate::core::ScriptedDice;
    use crate::roster::{SkillZone, TvGrade};

    struct Table {
        state: MatchState,
        dice: ScriptedDice,
        config: MatchConfig,
        notifier: EventNotifier,
    }

    impl Table {
        fn new(favored: Wrestler, underdog: Wrestler) -> Self {
            Self {
                state: MatchState::new(favored, underdog),
                dice: ScriptedDice::new([]),
                config: MatchConfig::default(),
                notifier: EventNotifier::new(),
            }
        }

        fn play(&mut self, card: &Card) -> Resolution {
            let mut ctx =
                ResolverContext::new(&mut self.state, &mut self.dice, &self.config, &mut self.notifier);
            resolve_card(&mut ctx, card).unwrap();
            resolve_triggers(&mut ctx).unwrap();
            ctx.finish()
        }

        fn pos(&self) -> (u8, u8) {
            (self.state.position(Side::Favored), self.state.position(Side::Underdog))
        }
    }

    fn card(category: CardCategory) -> Card {
        Card::new(CardId::new(1), category)
    }

    fn pair(favored: TvGrade, underdog: TvGrade) -> Table {
        Table::new(Wrestler::new("Face", favored, 0), Wrestler::new("Heel", underdog, 0))
    }

    #[test]
    fn test_tv_better_grade_moves() {
        let mut table = pair(TvGrade::A, TvGrade::C);
        let tv = card(CardCategory::Tv).with_points(CardPoints::by_grade([(TvGrade::A, 3), (TvGrade::C, 1)]));

        table.play(&tv);

        assert_eq!(table.pos(), (3, 0));
        assert_eq!(table.state.in_control, Some(Side::Favored));
    }

    #[test]
    fn test_tv_missing_grade_scores_zero() {
        let mut table = pair(TvGrade::C, TvGrade::B);
        let tv = card(CardCategory::Tv).with_points(CardPoints::by_grade([(TvGrade::A, 3)]));

        let resolution = table.play(&tv);

        assert_eq!(table.pos(), (0, 0));
        assert_eq!(resolution.movements[0].side, Side::Underdog);
        assert_eq!(table.state.in_control, None);
    }

    #[test]
    fn test_grudge_magnitude() {
        let mut table = Table::new(
            Wrestler::new("Face", TvGrade::A, 2),
            Wrestler::new("Heel", TvGrade::A, -5),
        );
        table.play(&card(CardCategory::Grudge).with_fixed(2));
        assert_eq!(table.pos(), (0, 2));
    }

    #[test]
    fn test_equal_grades_tie_break() {
        let mut table = pair(TvGrade::B, TvGrade::B);
        table.state.wrestler_mut(Side::Favored).position = 6;
        table.state.wrestler_mut(Side::Underdog).position = 2;
        let tv = card(CardCategory::Tv).with_points(CardPoints::by_grade([(TvGrade::B, 2)]));

        table.play(&tv);

        assert_eq!(table.pos(), (6, 4));
    }

    #[test]
    fn test_specialty_scores_own_points() {
        let mut table = Table::new(
            Wrestler::new("Face", TvGrade::A, 0),
            Wrestler::new("Heel", TvGrade::A, 0).with_specialty("Dropkick", 4),
        );
        table.play(&card(CardCategory::Specialty).with_fixed(1));
        assert_eq!(table.pos(), (0, 4));

        let mut table = pair(TvGrade::A, TvGrade::A);
        let resolution = table.play(&card(CardCategory::Specialty).with_fixed(1));
        assert!(resolution.movements.is_empty());
    }

    #[test]
    fn test_trailing_moves_lower() {
        let mut table = pair(TvGrade::A, TvGrade::A);
        table.state.wrestler_mut(Side::Favored).position = 3;
        table.state.wrestler_mut(Side::Underdog).position = 7;

        table.play(&card(CardCategory::Trailing).with_fixed(2));

        assert_eq!(table.pos(), (5, 7));
    }

    #[test]
    fn test_signature_requires_scored_last() {
        let mut table = pair(TvGrade::A, TvGrade::A);
        table.dice.push([5]);
        table.state.in_control = Some(Side::Favored);

        table.play(&card(CardCategory::Signature));
        assert_eq!(table.pos(), (0, 0));
        assert_eq!(table.dice.rolled(), 0);

        table.state.wrestler_mut(Side::Favored).scored_last = true;
        table.play(&card(CardCategory::Signature));
        assert_eq!(table.pos(), (5, 0));
    }

    #[test]
    fn test_title_holder_only_for_champion_in_control() {
        let mut table = Table::new(
            Wrestler::new("Face", TvGrade::A, 0),
            Wrestler::new("Heel", TvGrade::A, 0).with_title(),
        );
        let belt = card(CardCategory::TitleHolder).with_fixed(3);

        table.play(&belt);
        assert_eq!(table.pos(), (0, 0));

        table.state.in_control = Some(Side::Underdog);
        table.play(&belt);
        assert_eq!(table.pos(), (0, 3));
    }

    #[test]
    fn test_narrative_cards_have_no_effect() {
        let mut table = pair(TvGrade::A, TvGrade::A);
        let resolution = table.play(&card(CardCategory::RefBump).with_text("The referee is down!"));
        assert!(resolution.movements.is_empty());
        assert_eq!(resolution.narrative, vec!["The referee is down!".to_string()]);

        let resolution = table.play(&card(CardCategory::WildCard));
        assert_eq!(resolution.narrative, vec!["Wild Card card with no text.".to_string()]);
    }

    #[test]
    fn test_skill_zone_gating() {
        let mut table = Table::new(
            Wrestler::new("Face", TvGrade::A, 0).with_skill("Agile", SkillZone::Square),
            Wrestler::new("Heel", TvGrade::A, 0).with_skill("Agile", SkillZone::Circle),
        );
        let agile = card(CardCategory::from_label("agile")).with_fixed(2);

        table.play(&agile);
        assert_eq!(table.pos(), (0, 2));

        table.state.wrestler_mut(Side::Favored).position = 5;
        table.state.wrestler_mut(Side::Underdog).position = 5;
        table.play(&agile);
        assert_eq!(table.pos(), (7, 5));

        let resolution = table.play(&card(CardCategory::from_label("Mean")).with_fixed(2));
        assert!(resolution.movements.is_empty());
    }

    #[test]
    fn test_control_card_bypasses_category() {
        let mut table = Table::new(
            Wrestler::new("Face", TvGrade::A, 0).with_specialty("Suplex", 3),
            Wrestler::new("Heel", TvGrade::C, 0).with_specialty("Rake", 2),
        );
        table.state.in_control = Some(Side::Underdog);

        let tv = card(CardCategory::Tv)
            .with_control()
            .with_points(CardPoints::by_grade([(TvGrade::A, 3), (TvGrade::C, 1)]));
        table.play(&tv);
        assert_eq!(table.pos(), (0, 1));

        table.play(&card(CardCategory::Specialty).with_control());
        assert_eq!(table.pos(), (0, 3));
    }

    #[test]
    fn test_control_specialty_falls_back_to_opponent() {
        let mut table = Table::new(
            Wrestler::new("Face", TvGrade::A, 0).with_specialty("Suplex", 3),
            Wrestler::new("Heel", TvGrade::C, 0),
        );
        table.state.in_control = Some(Side::Underdog);

        table.play(&card(CardCategory::Specialty).with_control());

        assert_eq!(table.pos(), (0, 3));
    }

    #[test]
    fn test_control_card_without_controller_resolves_normally() {
        let mut table = pair(TvGrade::C, TvGrade::A);
        let tv = card(CardCategory::Tv)
            .with_control()
            .with_points(CardPoints::by_grade([(TvGrade::A, 3), (TvGrade::C, 1)]));

        table.play(&tv);

        assert_eq!(table.pos(), (0, 3));
    }

    #[test]
    fn test_reaching_finisher_space_triggers_attempt() {
        let mut table = Table::new(
            Wrestler::new("Face", TvGrade::A, 0).with_finisher("Bomb", 11, 66),
            Wrestler::new("Heel", TvGrade::C, 0),
        );
        table.state.wrestler_mut(Side::Favored).position = 14;
        table.dice.push([2, 2]);
        let tv = card(CardCategory::Tv).with_points(CardPoints::by_grade([(TvGrade::A, 3)]));

        let resolution = table.play(&tv);

        assert_eq!(table.pos(), (15, 0));
        assert!(matches!(resolution.sub_games[0], SubGameReport::Finisher(ref f) if f.success));
        assert_eq!(table.state.result().unwrap().winner, Side::Favored);
    }

    #[test]
    fn test_pin_space_triggers_pin() {
        let mut table = pair(TvGrade::F, TvGrade::A);
        table.state.wrestler_mut(Side::Underdog).position = 9;
        table.state.wrestler_mut(Side::Favored).position = 11;
        table.dice.push([2, 2, 3, 3, 4, 4]);

        let resolution = table.play(&card(CardCategory::Trailing).with_fixed(4));

        assert_eq!(table.pos(), (11, 13));
        assert!(matches!(resolution.sub_games[0], SubGameReport::Pin(ref p) if p.pinner == Side::Underdog));
        assert!(table.state.is_over());
    }

    #[test]
    fn test_zero_point_move_does_not_trigger() {
        let mut table = pair(TvGrade::A, TvGrade::A);
        table.state.wrestler_mut(Side::Favored).position = 13;
        table.state.wrestler_mut(Side::Underdog).position = 14;

        let resolution = table.play(&card(CardCategory::Trailing).with_fixed(0));

        assert!(resolution.sub_games.is_empty());
    }

    #[test]
    fn test_finished_match_rejects_cards() {
        let mut table = pair(TvGrade::A, TvGrade::A);
        table.state.finish(Side::Favored, crate::core::WinMethod::Pinfall);
        let mut ctx =
            ResolverContext::new(&mut table.state, &mut table.dice, &table.config, &mut table.notifier);
        assert_eq!(
            resolve_card(&mut ctx, &card(CardCategory::Trailing)),
            Err(EngineError::MatchOver)
        );
    }
}
