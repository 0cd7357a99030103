//! Movement and scoring.
//!
//! Every position change made while resolving a card goes through
//! [`move_wrestler`]: it clamps onto the track, hands over the "scored last"
//! flag, makes a scorer the wrestler in control, and publishes
//! `WrestlerMoved`. [`relocate`] is the bare position change used when a
//! failed finisher sends a wrestler back down the track.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::resolver::ResolverContext;
use super::track::advance;
use crate::core::side::Side;
use crate::events::MatchEvent;

/// One position change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub side: Side,
    pub wrestler: String,
    pub from: u8,
    pub to: u8,
    /// Points scored (before clamping).
    pub points: i32,
    /// What caused the move: a card category, a sub-game, or a manual edit.
    pub source: String,
}

impl Movement {
    #[must_use]
    pub fn scored(&self) -> bool {
        self.points > 0
    }
}

/// Score `points` for `side`.
pub fn move_wrestler(ctx: &mut ResolverContext<'_>, side: Side, points: i32, source: &str) -> Movement {
    let (from, to) = {
        let mover = ctx.state.wrestler_mut(side);
        let from = mover.position;
        mover.position = advance(from, points);
        mover.scored_last = true;
        (from, mover.position)
    };
    ctx.state.wrestler_mut(side.opponent()).scored_last = false;

    let movement = Movement {
        side,
        wrestler: ctx.name(side),
        from,
        to,
        points,
        source: source.to_string(),
    };
    debug!(wrestler = %movement.wrestler, from, to, points, source, "Wrestler moved");
    ctx.narrate(format!(
        "{} scores {} point{} ({} -> {}).",
        movement.wrestler,
        points,
        if points == 1 { "" } else { "s" },
        from,
        to
    ));
    ctx.emit(MatchEvent::WrestlerMoved(movement.clone()));
    ctx.resolution.movements.push(movement.clone());

    if points > 0 {
        set_control(ctx, Some(side));
    }
    movement
}

/// Put `side` on `to` without touching the scoring flags or control.
pub fn relocate(ctx: &mut ResolverContext<'_>, side: Side, to: u8, source: &str) -> Movement {
    let from = std::mem::replace(&mut ctx.state.wrestler_mut(side).position, to);
    let movement = Movement {
        side,
        wrestler: ctx.name(side),
        from,
        to,
        points: i32::from(to) - i32::from(from),
        source: source.to_string(),
    };
    debug!(wrestler = %movement.wrestler, from, to, source, "Wrestler relocated");
    ctx.emit(MatchEvent::WrestlerMoved(movement.clone()));
    ctx.resolution.movements.push(movement.clone());
    movement
}

/// Hand control to `side`, publishing `InControlChanged` if it changes hands.
pub fn set_control(ctx: &mut ResolverContext<'_>, side: Option<Side>) {
    let previous = ctx.state.set_in_control(side);
    if previous != side {
        let wrestler = side.map(|s| ctx.name(s));
        debug!(from = ?previous, to = ?side, "In control changed");
        ctx.emit(MatchEvent::InControlChanged {
            from: previous,
            to: side,
            wrestler,
        });
    }
}
