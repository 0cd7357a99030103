//! The Hot Box: allies, foes and grudge spectators at ringside.
//!
//! Only allies have a mechanical effect (Helped cards). Foes and grudge
//! spectators are recorded for the host's narrative.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::movement::move_wrestler;
use super::resolver::ResolverContext;
use super::tiebreak::tie_break;
use crate::cards::Card;
use crate::core::side::{Side, SideMap};
use crate::error::{EngineError, EngineResult};
use crate::roster::Roster;

/// Most grudge spectators the Hot Box seats.
pub const MAX_GRUDGE_SPECTATORS: usize = 2;

/// Ringside associations, all by wrestler name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotBox {
    pub allies: SideMap<Option<String>>,
    pub foes: SideMap<Option<String>>,
    pub grudge: Vec<String>,
}

impl HotBox {
    #[must_use]
    pub fn has_ally(&self, side: Side) -> bool {
        self.allies[side].is_some()
    }

    #[must_use]
    pub fn ally(&self, side: Side) -> Option<&str> {
        self.allies[side].as_deref()
    }

    #[must_use]
    pub fn foe(&self, side: Side) -> Option<&str> {
        self.foes[side].as_deref()
    }

    /// Every name seated in the Hot Box.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        Side::BOTH
            .into_iter()
            .flat_map(move |side| [self.ally(side), self.foe(side)])
            .flatten()
            .chain(self.grudge.iter().map(String::as_str))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names().next().is_none()
    }
}

/// Hot Box assignment requested by the host.
///
/// ## Example
///
/// ```
/// use fttm_engine::rules::HotBoxRequest;
///
/// let request = HotBoxRequest::new()
///     .with_favored_ally("Buddy")
///     .with_grudge(["Spoiler"]);
/// assert_eq!(request.grudge, vec!["Spoiler".to_string()]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotBoxRequest {
    pub favored_ally: Option<String>,
    pub favored_foe: Option<String>,
    pub underdog_ally: Option<String>,
    pub underdog_foe: Option<String>,
    /// Empty = seat the biggest grudges on the roster automatically.
    pub grudge: Vec<String>,
}

impl HotBoxRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_favored_ally(mut self, name: impl Into<String>) -> Self {
        self.favored_ally = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_favored_foe(mut self, name: impl Into<String>) -> Self {
        self.favored_foe = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_underdog_ally(mut self, name: impl Into<String>) -> Self {
        self.underdog_ally = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_underdog_foe(mut self, name: impl Into<String>) -> Self {
        self.underdog_foe = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_grudge<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.grudge = names.into_iter().map(Into::into).collect();
        self
    }
}

fn blank_to_none(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && !n.eq_ignore_ascii_case("none"))
}

/// Validate a request against the roster and fill in grudge spectators.
///
/// `principals` are never seated. When the request names no grudge
/// spectators, up to `spectators` wrestlers with the largest grudge
/// magnitude are seated, skipping everyone already in the Hot Box.
pub fn build_hot_box<R: Roster + ?Sized>(
    request: HotBoxRequest,
    roster: &R,
    principals: [&str; 2],
    spectators: usize,
) -> EngineResult<HotBox> {
    let mut hot_box = HotBox {
        allies: SideMap::new(
            blank_to_none(request.favored_ally),
            blank_to_none(request.underdog_ally),
        ),
        foes: SideMap::new(
            blank_to_none(request.favored_foe),
            blank_to_none(request.underdog_foe),
        ),
        grudge: request
            .grudge
            .into_iter()
            .filter_map(|n| blank_to_none(Some(n)))
            .collect(),
    };

    if hot_box.grudge.len() > MAX_GRUDGE_SPECTATORS {
        warn!(
            requested = hot_box.grudge.len(),
            seated = MAX_GRUDGE_SPECTATORS,
            "Too many grudge spectators; extra names ignored"
        );
        hot_box.grudge.truncate(MAX_GRUDGE_SPECTATORS);
    }

    for name in hot_box.names() {
        if !roster.contains(name) {
            return Err(EngineError::UnknownWrestler(name.to_string()));
        }
        if principals.contains(&name) {
            return Err(EngineError::PrincipalInHotBox(name.to_string()));
        }
    }

    if hot_box.grudge.is_empty() {
        let mut excluded: Vec<&str> = principals.to_vec();
        excluded.extend(hot_box.names());
        let seated: Vec<String> = roster
            .top_grudge(spectators.min(MAX_GRUDGE_SPECTATORS), &excluded)
            .into_iter()
            .map(|w| w.name.clone())
            .collect();
        hot_box.grudge = seated;
    }

    Ok(hot_box)
}

/// Helped card: an ally at ringside gives their wrestler a boost.
///
/// One side with an ally scores the card's points; both sides go to the
/// tie-break; nobody with an ally is a no-op. A card with no numeric payload
/// for the helped wrestler's grade only surfaces its text. The ally never
/// moves.
pub fn resolve_helped(ctx: &mut ResolverContext<'_>, card: &Card) {
    let helped: Vec<Side> = Side::BOTH
        .into_iter()
        .filter(|&side| ctx.state.hot_box.has_ally(side))
        .collect();

    let side = match helped.as_slice() {
        [] => {
            ctx.narrate("No allies at ringside. Nothing happens.");
            return;
        }
        [side] => *side,
        _ => tie_break(ctx.state),
    };
    let ally = ctx.state.hot_box.ally(side).unwrap_or_default().to_string();
    let grade = ctx.state.wrestler(side).tv_grade;

    if !card.points.as_ref().is_some_and(|p| p.covers(grade)) {
        let text = card.text.clone().unwrap_or_else(|| "No effect.".to_string());
        ctx.narrate(format!("{ally} gets involved for {}: {text}", ctx.name(side)));
        return;
    }

    let points = card.points_for(grade, ctx.dice);
    ctx.narrate(format!("{ally} helps {}!", ctx.name(side)));
    move_wrestler(ctx, side, points, "Helped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCategory, CardId, CardPoints};
    use crate::core::{MatchConfig, MatchState, ScriptedDice};
    use crate::events::EventNotifier;
    use crate::roster::{InMemoryRoster, TvGrade, Wrestler};

    fn roster() -> InMemoryRoster {
        [
            Wrestler::new("Face", TvGrade::A, 9),
            Wrestler::new("Heel", TvGrade::C, -9),
            Wrestler::new("Buddy", TvGrade::B, 1),
            Wrestler::new("Crony", TvGrade::D, -6),
            Wrestler::new("Spoiler", TvGrade::E, 5),
            Wrestler::new("Jobber", TvGrade::F, 2),
        ]
        .into_iter()
        .collect()
    }

    const PRINCIPALS: [&str; 2] = ["Face", "Heel"];

    #[test]
    fn test_auto_grudge_skips_principals_and_named() {
        let request = HotBoxRequest::new().with_favored_ally("Buddy").with_underdog_foe("Crony");
        let hot_box = build_hot_box(request, &roster(), PRINCIPALS, 2).unwrap();

        assert_eq!(hot_box.ally(Side::Favored), Some("Buddy"));
        assert_eq!(hot_box.foe(Side::Underdog), Some("Crony"));
        assert_eq!(hot_box.grudge, vec!["Spoiler".to_string(), "Jobber".to_string()]);
    }

    #[test]
    fn test_named_grudge_truncated() {
        let request = HotBoxRequest::new().with_grudge(["Jobber", "Buddy", "Spoiler"]);
        let hot_box = build_hot_box(request, &roster(), PRINCIPALS, 2).unwrap();
        assert_eq!(hot_box.grudge, vec!["Jobber".to_string(), "Buddy".to_string()]);
    }

    #[test]
    fn test_blank_names_ignored() {
        let request = HotBoxRequest::new().with_favored_ally("  ").with_underdog_ally("None");
        let hot_box = build_hot_box(request, &roster(), PRINCIPALS, 0).unwrap();
        assert!(hot_box.is_empty());
    }

    #[test]
    fn test_unknown_and_principal_rejected() {
        let request = HotBoxRequest::new().with_favored_ally("Ghost");
        assert_eq!(
            build_hot_box(request, &roster(), PRINCIPALS, 2),
            Err(EngineError::UnknownWrestler("Ghost".into()))
        );

        let request = HotBoxRequest::new().with_underdog_ally("Heel");
        assert_eq!(
            build_hot_box(request, &roster(), PRINCIPALS, 2),
            Err(EngineError::PrincipalInHotBox("Heel".into()))
        );
    }

    struct Table {
        state: MatchState,
        dice: ScriptedDice,
        config: MatchConfig,
        notifier: EventNotifier,
    }

    impl Table {
        fn new(allies: SideMap<Option<String>>) -> Self {
            let mut state = MatchState::new(
                Wrestler::new("Face", TvGrade::A, 9),
                Wrestler::new("Heel", TvGrade::C, -9),
            );
            state.hot_box.allies = allies;
            Self {
                state,
                dice: ScriptedDice::new([]),
                config: MatchConfig::default(),
                notifier: EventNotifier::new(),
            }
        }

        fn helped(&mut self, card: &Card) -> Vec<String> {
            let mut ctx = ResolverContext::new(&mut self.state, &mut self.dice, &self.config, &mut self.notifier);
            resolve_helped(&mut ctx, card);
            ctx.finish().narrative
        }
    }

    fn helped_card() -> Card {
        Card::new(CardId::new(1), CardCategory::Helped)
    }

    #[test]
    fn test_helped_single_ally_scores() {
        let mut table = Table::new(SideMap::new(None, Some("Crony".into())));
        let narrative = table.helped(&helped_card().with_fixed(2));

        assert_eq!(table.state.position(Side::Underdog), 2);
        assert_eq!(table.state.position(Side::Favored), 0);
        assert_eq!(table.state.in_control, Some(Side::Underdog));
        assert_eq!(narrative[0], "Crony helps Heel!");
    }

    #[test]
    fn test_helped_both_allies_tie_break() {
        let mut table = Table::new(SideMap::new(Some("Buddy".into()), Some("Crony".into())));
        table.state.wrestler_mut(Side::Favored).position = 5;
        table.state.wrestler_mut(Side::Underdog).position = 5;

        table.helped(&helped_card().with_fixed(3));

        assert_eq!(table.state.position(Side::Favored), 8);
        assert_eq!(table.state.position(Side::Underdog), 5);
    }

    #[test]
    fn test_helped_without_points_only_narrates() {
        let mut table = Table::new(SideMap::new(Some("Buddy".into()), None));
        let narrative = table.helped(&helped_card().with_text("Buddy distracts the referee."));

        assert_eq!(table.state.positions(), SideMap::new(0, 0));
        assert_eq!(table.state.in_control, None);
        assert!(!table.state.wrestler(Side::Favored).scored_last);
        assert_eq!(narrative, vec!["Buddy gets involved for Face: Buddy distracts the referee.".to_string()]);
    }

    #[test]
    fn test_helped_missing_grade_only_narrates() {
        let mut table = Table::new(SideMap::new(Some("Buddy".into()), None));
        table.state.wrestler_mut(Side::Underdog).scored_last = true;
        let card = helped_card()
            .with_points(CardPoints::by_grade([(TvGrade::C, 2)]))
            .with_text("Buddy trips the opponent.");

        let narrative = table.helped(&card);

        assert_eq!(table.state.position(Side::Favored), 0);
        assert!(table.state.wrestler(Side::Underdog).scored_last);
        assert!(!table.state.wrestler(Side::Favored).scored_last);
        assert!(narrative[0].ends_with("Buddy trips the opponent."));
    }

    #[test]
    fn test_helped_without_allies_is_noop() {
        let mut table = Table::new(SideMap::default());
        table.helped(&helped_card().with_fixed(4));
        assert_eq!(table.state.positions(), SideMap::new(0, 0));
    }
}
