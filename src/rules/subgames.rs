//! Sub-games: pin, finisher, submission hold, test of strength.
//!
//! Each sub-game is a short dice loop run to completion inside one turn.
//! Pins and finishers can end the match; submissions and tests of strength
//! only move wrestlers.
//!
//! ## Termination
//!
//! - Pin: at most three rolls.
//! - Finisher: one roll.
//! - Submission: the hold breaks on a roll of 3 or less (4 or less against
//!   a powerhouse), so every round ends it with probability at least 1/2.
//! - Test of strength: breaks on a 3-4, and is capped at
//!   `MatchConfig::test_of_strength_exchanges` exchanges when set.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::movement::{move_wrestler, relocate, set_control};
use super::resolver::ResolverContext;
use crate::cards::Card;
use crate::core::side::{Side, SideMap};
use crate::core::state::WinMethod;
use crate::events::MatchEvent;

/// Number of pin counts the pinner gets.
pub const PIN_ROLLS: usize = 3;

/// Hold-break threshold against a normal opponent.
pub const ESCAPE_THRESHOLD: u8 = 3;

/// Hold-break threshold against a strong or powerful opponent.
pub const POWERHOUSE_ESCAPE_THRESHOLD: u8 = 4;

/// Outcome of a pin attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinReport {
    pub pinner: Side,
    pub defender: Side,
    /// Inclusive d66 kick-out window.
    pub window: (u8, u8),
    pub rolls: SmallVec<[u8; PIN_ROLLS]>,
    pub kicked_out: bool,
}

/// Outcome of a finisher attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinisherReport {
    pub side: Side,
    pub finisher: Option<String>,
    pub range: Option<(u8, u8)>,
    /// `None` when the wrestler has no finisher to roll for.
    pub roll: Option<u8>,
    pub success: bool,
    /// Space the wrestler fell back to on a miss.
    pub reset_to: Option<u8>,
}

/// Outcome of a submission hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub side: Side,
    pub hold: Option<String>,
    pub base_points: i32,
    pub threshold: u8,
    pub rolls: Vec<u8>,
    /// Points added while the hold was kept on.
    pub extra_points: u32,
}

/// One exchange in a test of strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub roll: u8,
    /// `None` when the referee broke it up.
    pub winner: Option<Side>,
}

/// Outcome of a test of strength.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOfStrengthReport {
    pub exchanges: SmallVec<[Exchange; 3]>,
    /// Ended by the referee rather than the exchange cap.
    pub broken: bool,
    pub points: SideMap<u32>,
}

/// Sub-game played during a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubGameReport {
    Pin(PinReport),
    Finisher(FinisherReport),
    Submission(SubmissionReport),
    TestOfStrength(TestOfStrengthReport),
}

impl SubGameReport {
    /// One-line headline for the turn history.
    #[must_use]
    pub fn headline(&self) -> String {
        match self {
            SubGameReport::Pin(p) if p.kicked_out => format!("{} kicked out of the pin", p.defender),
            SubGameReport::Pin(p) => format!("{} won by pinfall", p.pinner),
            SubGameReport::Finisher(f) if f.success => format!("{} hit the finisher", f.side),
            SubGameReport::Finisher(f) => format!("{} missed the finisher", f.side),
            SubGameReport::Submission(s) => {
                format!("{} held the submission for {} extra", s.side, s.extra_points)
            }
            SubGameReport::TestOfStrength(t) => {
                format!("Test of strength over after {} exchanges", t.exchanges.len())
            }
        }
    }
}

/// Pin attempt. The wrestler further up the track pins; level positions go
/// to the favored wrestler.
pub fn pin_attempt(ctx: &mut ResolverContext<'_>) -> PinReport {
    let pinner = if ctx.state.position(Side::Underdog) > ctx.state.position(Side::Favored) {
        Side::Underdog
    } else {
        Side::Favored
    };
    let defender = pinner.opponent();
    let window = ctx.state.wrestler(defender).tv_grade.kick_out_window();

    ctx.narrate(format!(
        "{} goes for the pin on {}! Kick-out on {}-{}.",
        ctx.name(pinner),
        ctx.name(defender),
        window.start(),
        window.end()
    ));

    let mut rolls = SmallVec::new();
    let mut kicked_out = false;
    for count in 1..=PIN_ROLLS {
        let roll = ctx.dice.roll_d66();
        rolls.push(roll);
        debug!(count, roll, "Pin count");
        if window.contains(&roll) {
            kicked_out = true;
            ctx.narrate(format!("Count {count}: rolled {roll}. {} kicks out!", ctx.name(defender)));
            break;
        }
        ctx.narrate(format!("Count {count}: rolled {roll}."));
    }

    let report = PinReport {
        pinner,
        defender,
        window: (*window.start(), *window.end()),
        rolls,
        kicked_out,
    };
    ctx.emit(MatchEvent::PinAttempted(report.clone()));
    ctx.resolution.sub_games.push(SubGameReport::Pin(report.clone()));

    if !kicked_out {
        ctx.narrate(format!("1, 2, 3! {} wins by pinfall!", ctx.name(pinner)));
        end_match(ctx, pinner, WinMethod::Pinfall);
    }
    report
}

/// Finisher attempt for a wrestler on the Finisher space.
pub fn finisher_attempt(ctx: &mut ResolverContext<'_>, side: Side) -> FinisherReport {
    let finisher = ctx.state.wrestler(side).finisher.clone();
    let name = ctx.name(side);

    let (roll, success) = match &finisher {
        Some(f) => {
            let roll = ctx.dice.roll_d66();
            debug!(wrestler = %name, roll, low = f.range.0, high = f.range.1, "Finisher roll");
            ctx.narrate(format!(
                "{name} attempts the {} (needs {}-{}): rolled {roll}.",
                f.name, f.range.0, f.range.1
            ));
            (Some(roll), f.hits(roll))
        }
        None => {
            ctx.narrate(format!("{name} has no finisher to attempt."));
            (None, false)
        }
    };

    let mut reset_to = None;
    if success {
        ctx.narrate(format!("{name} hits the finisher and wins!"));
    } else {
        let space = ctx.config.finisher_reset_space;
        relocate(ctx, side, space, "Finisher");
        ctx.narrate(format!("The finisher fails. {name} falls back to {space}."));
        reset_to = Some(space);
    }

    let report = FinisherReport {
        side,
        finisher: finisher.as_ref().map(|f| f.name.clone()),
        range: finisher.as_ref().map(|f| f.range),
        roll,
        success,
        reset_to,
    };
    ctx.emit(MatchEvent::FinisherAttempted(report.clone()));
    ctx.resolution.sub_games.push(SubGameReport::Finisher(report.clone()));

    if success {
        end_match(ctx, side, WinMethod::Finisher);
    }
    report
}

/// Submission hold applied by `side` with `card`.
pub fn submission_hold(ctx: &mut ResolverContext<'_>, side: Side, card: &Card) -> SubmissionReport {
    let grade = ctx.state.wrestler(side).tv_grade;
    let base_points = card.points_for(grade, ctx.dice);
    let threshold = if ctx.state.wrestler(side.opponent()).is_powerhouse() {
        POWERHOUSE_ESCAPE_THRESHOLD
    } else {
        ESCAPE_THRESHOLD
    };

    ctx.narrate(format!("{} locks in a submission hold!", ctx.name(side)));
    move_wrestler(ctx, side, base_points, "Submission");

    let mut rolls = Vec::new();
    let mut extra_points = 0;
    loop {
        let roll = ctx.dice.roll_d6();
        rolls.push(roll);
        debug!(roll, threshold, "Submission escape roll");
        if roll <= threshold {
            ctx.narrate(format!("Rolled {roll}. {} escapes the hold.", ctx.name(side.opponent())));
            break;
        }
        ctx.narrate(format!("Rolled {roll}. The hold is still on!"));
        move_wrestler(ctx, side, 1, "Submission");
        extra_points += 1;
    }
    set_control(ctx, Some(side));

    let report = SubmissionReport {
        side,
        hold: card.text.clone(),
        base_points,
        threshold,
        rolls,
        extra_points,
    };
    ctx.emit(MatchEvent::SubmissionApplied(report.clone()));
    ctx.resolution.sub_games.push(SubGameReport::Submission(report.clone()));
    report
}

/// Test of strength between two powerhouses.
pub fn test_of_strength(ctx: &mut ResolverContext<'_>) -> TestOfStrengthReport {
    let cap = ctx.config.test_of_strength_exchanges;
    let mut report = TestOfStrengthReport::default();
    ctx.narrate("The wrestlers lock up in a test of strength!");

    loop {
        if cap.is_some_and(|cap| report.exchanges.len() as u32 >= cap) {
            ctx.narrate("The wrestlers break apart.");
            break;
        }
        let roll = ctx.dice.roll_d6();
        let winner = match roll {
            1 | 2 => Some(Side::Favored),
            3 | 4 => None,
            _ => Some(Side::Underdog),
        };
        debug!(roll, ?winner, "Test of strength exchange");
        report.exchanges.push(Exchange { roll, winner });

        let Some(side) = winner else {
            ctx.narrate(format!("Rolled {roll}. The referee breaks it up."));
            report.broken = true;
            break;
        };
        ctx.narrate(format!("Rolled {roll}. {} powers through!", ctx.name(side)));
        move_wrestler(ctx, side, 1, "Test of Strength");
        report.points[side] += 1;
    }

    ctx.emit(MatchEvent::TestOfStrength(report.clone()));
    ctx.resolution.sub_games.push(SubGameReport::TestOfStrength(report.clone()));
    report
}

fn end_match(ctx: &mut ResolverContext<'_>, winner: Side, method: WinMethod) {
    let result = ctx.state.finish(winner, method);
    info!(winner = %result.winner_name, %method, "Match ended");
    ctx.emit(MatchEvent::MatchEnded(result.clone()));
    ctx.resolution.result = Some(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCategory, CardId};
    use crate::core::{MatchConfig, MatchState, ScriptedDice};
    use crate::events::EventNotifier;
    use crate::roster::{SkillZone, TvGrade, Wrestler};

    struct Table {
        state: MatchState,
        dice: ScriptedDice,
        config: MatchConfig,
        notifier: EventNotifier,
    }

    impl Table {
        fn new(favored: Wrestler, underdog: Wrestler, faces: &[u8]) -> Self {
            Self {
                state: MatchState::new(favored, underdog),
                dice: ScriptedDice::new(faces.iter().copied()),
                config: MatchConfig::default(),
                notifier: EventNotifier::new(),
            }
        }

        fn ctx(&mut self) -> ResolverContext<'_> {
            ResolverContext::new(&mut self.state, &mut self.dice, &self.config, &mut self.notifier)
        }
    }

    fn grades(favored: TvGrade, underdog: TvGrade) -> (Wrestler, Wrestler) {
        (Wrestler::new("Face", favored, 0), Wrestler::new("Heel", underdog, 0))
    }

    #[test]
    fn test_pin_grade_f_three_misses_wins() {
        let (f, u) = grades(TvGrade::B, TvGrade::F);
        let mut table = Table::new(f, u, &[2, 2, 4, 4, 6, 6]);
        table.state.wrestler_mut(Side::Favored).position = 13;

        let report = pin_attempt(&mut table.ctx());

        assert_eq!(report.pinner, Side::Favored);
        assert_eq!(report.window, (11, 11));
        assert_eq!(report.rolls.as_slice(), &[22, 44, 66]);
        assert!(!report.kicked_out);
        assert_eq!(table.state.result().unwrap().method, WinMethod::Pinfall);
    }

    #[test]
    fn test_pin_grade_f_eleven_kicks_out() {
        let (f, u) = grades(TvGrade::B, TvGrade::F);
        let mut table = Table::new(f, u, &[2, 2, 1, 1, 6, 6]);
        table.state.wrestler_mut(Side::Favored).position = 12;

        let report = pin_attempt(&mut table.ctx());

        assert!(report.kicked_out);
        assert_eq!(report.rolls.as_slice(), &[22, 11]);
        assert!(!table.state.is_over());
        assert_eq!(table.dice.remaining(), 2);
    }

    #[test]
    fn test_higher_position_pins() {
        let (f, u) = grades(TvGrade::AAA, TvGrade::AAA);
        let mut table = Table::new(f, u, &[1, 1]);
        table.state.wrestler_mut(Side::Favored).position = 4;
        table.state.wrestler_mut(Side::Underdog).position = 14;

        let report = pin_attempt(&mut table.ctx());

        assert_eq!(report.pinner, Side::Underdog);
        assert_eq!(report.defender, Side::Favored);
        assert_eq!(report.window, (11, 43));
    }

    #[test]
    fn test_finisher_hit_and_miss() {
        let (f, u) = grades(TvGrade::A, TvGrade::A);
        let hit = f.clone().with_finisher("Bomb", 11, 36);
        let mut table = Table::new(hit, u.clone(), &[3, 5]);
        table.state.wrestler_mut(Side::Favored).position = 15;

        let report = finisher_attempt(&mut table.ctx(), Side::Favored);
        assert!(report.success);
        assert_eq!(report.roll, Some(35));
        assert_eq!(table.state.result().unwrap().winner, Side::Favored);

        let miss = f.with_finisher("Bomb", 11, 36);
        let mut table = Table::new(miss, u, &[4, 1]);
        table.state.wrestler_mut(Side::Favored).position = 15;

        let report = finisher_attempt(&mut table.ctx(), Side::Favored);
        assert!(!report.success);
        assert_eq!(report.reset_to, Some(9));
        assert_eq!(table.state.position(Side::Favored), 9);
        assert!(!table.state.is_over());
    }

    #[test]
    fn test_finisher_without_move_fails_without_roll() {
        let (f, u) = grades(TvGrade::A, TvGrade::A);
        let mut table = Table::new(f, u, &[]);
        table.config = MatchConfig::default().with_finisher_reset_space(7);
        table.state.wrestler_mut(Side::Underdog).position = 15;

        let report = finisher_attempt(&mut table.ctx(), Side::Underdog);

        assert_eq!(report.roll, None);
        assert!(!report.success);
        assert_eq!(table.dice.rolled(), 0);
        assert_eq!(table.state.position(Side::Underdog), 7);
    }

    #[test]
    fn test_submission_adds_one_per_round() {
        let (f, u) = grades(TvGrade::A, TvGrade::A);
        let mut table = Table::new(f, u, &[6, 5, 4, 2]);
        let card = Card::new(CardId::new(1), CardCategory::from_label("Mean"))
            .with_fixed(2)
            .with_text("Sleeper. Submission!");

        let report = submission_hold(&mut table.ctx(), Side::Favored, &card);

        assert_eq!(report.threshold, ESCAPE_THRESHOLD);
        assert_eq!(report.rolls, vec![6, 5, 4, 2]);
        assert_eq!(report.extra_points, 3);
        assert_eq!(table.state.position(Side::Favored), 5);
        assert_eq!(table.state.in_control, Some(Side::Favored));
    }

    #[test]
    fn test_submission_against_powerhouse() {
        let f = Wrestler::new("Face", TvGrade::A, 0);
        let u = Wrestler::new("Heel", TvGrade::A, 0).with_skill("Strong", SkillZone::Star);
        let mut table = Table::new(f, u, &[4]);
        let card = Card::new(CardId::new(1), CardCategory::from_label("Mean")).with_text("Submission!");

        let report = submission_hold(&mut table.ctx(), Side::Favored, &card);

        assert_eq!(report.threshold, POWERHOUSE_ESCAPE_THRESHOLD);
        assert_eq!(report.extra_points, 0);
        assert_eq!(table.state.position(Side::Favored), 0);
        assert_eq!(table.state.in_control, Some(Side::Favored));
    }

    #[test]
    fn test_strength_until_break() {
        let (f, u) = grades(TvGrade::A, TvGrade::A);
        let mut table = Table::new(f, u, &[1, 6, 3, 1]);
        table.config = MatchConfig::default().with_test_of_strength_exchanges(None);

        let report = test_of_strength(&mut table.ctx());

        assert!(report.broken);
        assert_eq!(report.exchanges.len(), 3);
        assert_eq!(report.points, SideMap::new(1, 1));
        assert_eq!(table.state.in_control, Some(Side::Underdog));
        assert_eq!(table.dice.remaining(), 1);
    }

    #[test]
    fn test_strength_cap() {
        let (f, u) = grades(TvGrade::A, TvGrade::A);
        let mut table = Table::new(f, u, &[2, 2, 2, 2]);

        let report = test_of_strength(&mut table.ctx());

        assert!(!report.broken);
        assert_eq!(report.exchanges.len(), 3);
        assert_eq!(table.state.position(Side::Favored), 3);
        assert_eq!(table.dice.remaining(), 1);
    }
}
