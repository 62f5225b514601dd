//! Command processor: the only entry point that mutates battle state
//!
//! Every command runs a pure validation pass over `&BattleState` first.
//! Checks run in a fixed order (well-formed, actor, action flag, target,
//! legality) so rejections are deterministic. Nothing is mutated unless
//! validation succeeds.

use crate::battle::context::Resolution;
use crate::battle::events::{BattleEvent, EventLog};
use crate::battle::pathfinding::find_path;
use crate::battle::state::BattleState;
use crate::battle::turns::end_turn;
use crate::combat::engagement::execute_combat;
use crate::combat::resolution::can_attack;
use crate::command::types::{ActionReport, Command, CommandAction, CommandReport};
use crate::core::config::RulesConfig;
use crate::core::error::{CommandError, Result};
use crate::core::rng::BattleRng;
use crate::core::types::{GridCoord, PlayerId, UnitId};
use crate::skills::definitions::TriggerTiming;
use crate::skills::effects::effective_range;
use crate::skills::resolution::{skill_readiness, use_skill};
use crate::skills::targeting::collect_targets;
use crate::skills::triggers::fire_trigger;

/// Validated move
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    pub actor: usize,
    pub to: GridCoord,
    pub path: Vec<GridCoord>,
}

/// Validated attack; `heal` when a healer targets an ally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackPlan {
    pub actor: usize,
    pub target: usize,
    pub heal: bool,
}

/// Validated skill cast with its resolved targets
#[derive(Debug, Clone, PartialEq)]
pub struct SkillPlan {
    pub actor: usize,
    pub targets: Vec<usize>,
}

/// Validate and apply one command
pub fn execute(
    state: &mut BattleState,
    command: &Command,
    rng: &mut dyn BattleRng,
    rules: &RulesConfig,
) -> Result<CommandReport> {
    let mut events = EventLog::new();
    let action = {
        let mut res = Resolution::new(state, rng, rules, &mut events);
        match &command.action {
            CommandAction::Move { unit_id, from, to } => {
                let plan = validate_move(res.state, &command.player_id, unit_id, *from, *to)?;
                apply_move(&mut res, plan)
            }
            CommandAction::Attack {
                unit_id,
                target_id,
                from,
                to,
            } => {
                let plan = validate_attack(
                    res.state,
                    &command.player_id,
                    unit_id,
                    target_id,
                    *from,
                    *to,
                )?;
                apply_attack(&mut res, plan)
            }
            CommandAction::Skill {
                unit_id,
                skill_id,
                target_position,
            } => {
                let plan = validate_skill(
                    res.state,
                    &command.player_id,
                    unit_id,
                    skill_id,
                    *target_position,
                )?;
                let report = use_skill(&mut res, plan.actor, skill_id, &plan.targets)?;
                res.state.units[plan.actor].action_state.can_attack = false;
                ActionReport::Skill(report)
            }
            CommandAction::EndTurn => {
                validate_end_turn(res.state, &command.player_id)?;
                ActionReport::TurnEnded(end_turn(&mut res))
            }
        }
    };

    tracing::debug!(
        command = %command.id,
        kind = command.kind(),
        events = events.len(),
        "command applied"
    );
    Ok(CommandReport {
        command_id: command.id.clone(),
        action,
        events: events.into_events(),
    })
}

/// Actor exists, is alive and belongs to the commanding player
fn validate_actor(state: &BattleState, player_id: &PlayerId, unit_id: &UnitId) -> Result<usize> {
    let index = state
        .unit_index(unit_id)
        .ok_or_else(|| CommandError::UnitNotFound(unit_id.clone()))?;
    let unit = &state.units[index];
    if !unit.alive {
        return Err(CommandError::UnitDead(unit_id.clone()));
    }
    if &unit.owner_id != player_id {
        return Err(CommandError::NotYourUnit {
            unit: unit_id.clone(),
            owner: unit.owner_id.clone(),
        });
    }
    Ok(index)
}

fn check_position(unit_id: &UnitId, actual: GridCoord, claimed: GridCoord) -> Result<()> {
    if actual != claimed {
        return Err(CommandError::PositionMismatch {
            unit: unit_id.clone(),
            expected: actual,
            actual: claimed,
        });
    }
    Ok(())
}

pub fn validate_move(
    state: &BattleState,
    player_id: &PlayerId,
    unit_id: &UnitId,
    from: GridCoord,
    to: GridCoord,
) -> Result<MovePlan> {
    if from == to {
        return Err(CommandError::Malformed("move destination equals origin".into()));
    }
    let actor = validate_actor(state, player_id, unit_id)?;
    let unit = &state.units[actor];
    check_position(unit_id, unit.position, from)?;

    if unit.action_state.is_stunned {
        return Err(CommandError::Stunned(unit_id.clone()));
    }
    if !unit.action_state.can_move {
        return Err(CommandError::AlreadyMoved(unit_id.clone()));
    }

    if !state.in_bounds(to) {
        return Err(CommandError::OutOfBounds(to));
    }
    if state.is_occupied(to, Some(unit_id)) {
        return Err(CommandError::TileOccupied(to));
    }
    let path = find_path(state, from, to, unit_id).ok_or(CommandError::Unreachable(to))?;
    Ok(MovePlan { actor, to, path })
}

fn apply_move(res: &mut Resolution<'_>, plan: MovePlan) -> ActionReport {
    let unit = &mut res.state.units[plan.actor];
    unit.position = plan.to;
    unit.action_state.can_move = false;
    let unit_id = unit.id.clone();

    tracing::debug!(unit = %unit_id, to = %plan.to, steps = plan.path.len(), "unit moved");
    res.emit(BattleEvent::UnitMoved {
        unit_id: unit_id.clone(),
        x: plan.to.x,
        y: plan.to.y,
    });
    fire_trigger(res, plan.actor, None, TriggerTiming::OnMove);

    ActionReport::Moved {
        unit_id,
        path: plan.path,
    }
}

pub fn validate_attack(
    state: &BattleState,
    player_id: &PlayerId,
    unit_id: &UnitId,
    target_id: &UnitId,
    from: GridCoord,
    to: GridCoord,
) -> Result<AttackPlan> {
    if unit_id == target_id {
        return Err(CommandError::Malformed("a unit cannot target itself".into()));
    }
    let actor = validate_actor(state, player_id, unit_id)?;
    let unit = &state.units[actor];
    check_position(unit_id, unit.position, from)?;

    if unit.action_state.is_stunned {
        return Err(CommandError::Stunned(unit_id.clone()));
    }
    if !unit.action_state.can_attack {
        return Err(CommandError::AlreadyAttacked(unit_id.clone()));
    }

    let target = state
        .unit_index(target_id)
        .ok_or_else(|| CommandError::TargetNotFound(target_id.clone()))?;
    let target_unit = &state.units[target];
    if !target_unit.alive {
        return Err(CommandError::TargetDead(target_id.clone()));
    }
    check_position(target_id, target_unit.position, to)?;

    let ally = target_unit.owner_id == unit.owner_id;
    if !can_attack(unit, target_unit) {
        if ally && !unit.characteristics.can_heal {
            return Err(CommandError::FriendlyFire(target_id.clone()));
        }
        return Err(CommandError::OutOfRange {
            distance: unit.position.distance(&target_unit.position),
            range: effective_range(unit),
        });
    }
    if ally && !target_unit.is_injured() {
        return Err(CommandError::TargetUnhurt(target_id.clone()));
    }
    Ok(AttackPlan {
        actor,
        target,
        heal: ally,
    })
}

fn apply_attack(res: &mut Resolution<'_>, plan: AttackPlan) -> ActionReport {
    res.state.units[plan.actor].action_state.can_attack = false;
    if !plan.heal {
        return ActionReport::Combat(execute_combat(res, plan.actor, plan.target));
    }

    let amount = res.state.units[plan.actor].stats.attack;
    let restored = res.state.units[plan.target].heal(amount);
    let unit_id = res.state.units[plan.actor].id.clone();
    let target_id = res.state.units[plan.target].id.clone();
    if restored > 0 {
        res.emit(BattleEvent::UnitHealed {
            target_id: target_id.clone(),
            amount: restored,
        });
    }
    ActionReport::Healed {
        unit_id,
        target_id,
        amount: restored,
    }
}

pub fn validate_skill(
    state: &BattleState,
    player_id: &PlayerId,
    unit_id: &UnitId,
    skill_id: &str,
    target_position: Option<GridCoord>,
) -> Result<SkillPlan> {
    if skill_id.is_empty() {
        return Err(CommandError::Malformed("skill id is empty".into()));
    }
    let actor = validate_actor(state, player_id, unit_id)?;
    let unit = &state.units[actor];
    if unit.action_state.is_stunned {
        return Err(CommandError::Stunned(unit_id.clone()));
    }
    if !unit.action_state.can_attack {
        return Err(CommandError::AlreadyAttacked(unit_id.clone()));
    }

    let skill = unit
        .skill(skill_id)
        .ok_or_else(|| CommandError::SkillNotFound(skill_id.to_string()))?;
    skill_readiness(unit, skill)?;

    let needs_position = skill
        .primary_effect()
        .is_some_and(|e| e.target_type.needs_position());
    let position = if needs_position {
        let pos = target_position.ok_or_else(|| {
            CommandError::Malformed(format!("skill {skill_id} needs a target position"))
        })?;
        if !state.in_bounds(pos) {
            return Err(CommandError::OutOfBounds(pos));
        }
        Some(pos)
    } else {
        None
    };

    let targets = collect_targets(state, actor, skill, position);
    if targets.is_empty() {
        return Err(CommandError::NoValidTargets);
    }
    if let Some(pos) = position {
        let distance = unit.position.distance(&pos);
        if distance > skill.range {
            return Err(CommandError::OutOfRange {
                distance,
                range: skill.range,
            });
        }
    }
    Ok(SkillPlan { actor, targets })
}

pub fn validate_end_turn(state: &BattleState, player_id: &PlayerId) -> Result<()> {
    if state.player(player_id).is_none() {
        return Err(CommandError::PlayerNotFound(player_id.clone()));
    }
    if state.current_player_id() != Some(player_id) {
        return Err(CommandError::NotYourTurn(player_id.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::Player;
    use crate::battle::terrain::{Terrain, TerrainType};
    use crate::battle::unit_types::UnitType;
    use crate::battle::units::{ActionState, Unit};
    use crate::core::rng::ScriptedRng;

    fn player(id: &str) -> Player {
        Player {
            id: PlayerId::new(id),
            name: id.to_string(),
            team: id.to_string(),
            ai_controlled: false,
            is_active: false,
        }
    }

    fn unit(id: &str, owner: &str, unit_type: UnitType, x: i32, y: i32) -> Unit {
        Unit::from_template(
            UnitId::new(id),
            PlayerId::new(owner),
            unit_type,
            GridCoord::new(x, y),
            100,
            20,
        )
    }

    /// 6x6 plain field with a water tile at (3, 0)
    fn state() -> BattleState {
        let mut tiles = vec![Terrain::default(); 36];
        tiles[3] = TerrainType::Water.terrain();
        let units = vec![
            unit("knight", "p1", UnitType::Knight, 0, 0),
            unit("healer", "p1", UnitType::Healer, 1, 1),
            unit("orc", "p2", UnitType::Soldier, 1, 0),
            unit("mage", "p2", UnitType::Mage, 5, 5),
        ];
        BattleState::new(6, 6, tiles, units, vec![player("p1"), player("p2")])
    }

    fn run(state: &mut BattleState, command: Command) -> Result<CommandReport> {
        execute(state, &command, &mut ScriptedRng::never(), &RulesConfig::default())
    }

    fn p1() -> PlayerId {
        PlayerId::new("p1")
    }

    #[test]
    fn test_move_happy_path() {
        let mut state = state();
        let report = run(
            &mut state,
            Command::move_unit(
                "c1",
                p1(),
                UnitId::new("knight"),
                GridCoord::new(0, 0),
                GridCoord::new(0, 3),
            ),
        )
        .unwrap();
        assert_eq!(state.units[0].position, GridCoord::new(0, 3));
        assert!(!state.units[0].action_state.can_move);
        assert!(state.units[0].action_state.can_attack);
        match report.action {
            ActionReport::Moved { path, .. } => {
                assert_eq!(path.last(), Some(&GridCoord::new(0, 3)))
            }
            other => panic!("unexpected report {other:?}"),
        }
        assert_eq!(
            report.events,
            vec![BattleEvent::UnitMoved {
                unit_id: UnitId::new("knight"),
                x: 0,
                y: 3
            }]
        );
    }

    #[test]
    fn test_move_validation_order() {
        let mut state = state();
        let knight = UnitId::new("knight");
        let origin = GridCoord::new(0, 0);

        let move_to = |player: PlayerId, from: GridCoord, x: i32, y: i32| {
            Command::move_unit("c", player, knight.clone(), from, GridCoord::new(x, y))
        };

        let same = run(&mut state, move_to(p1(), origin, 0, 0));
        assert!(matches!(same, Err(CommandError::Malformed(_))));

        let stranger = run(&mut state, move_to(PlayerId::new("p2"), origin, 0, 2));
        assert!(matches!(stranger, Err(CommandError::NotYourUnit { .. })));

        let wrong_from = run(&mut state, move_to(p1(), GridCoord::new(2, 2), 0, 2));
        assert!(matches!(wrong_from, Err(CommandError::PositionMismatch { .. })));

        let outside = run(&mut state, move_to(p1(), origin, -1, 0));
        assert_eq!(outside, Err(CommandError::OutOfBounds(GridCoord::new(-1, 0))));

        let occupied = run(&mut state, move_to(p1(), origin, 1, 0));
        assert_eq!(occupied, Err(CommandError::TileOccupied(GridCoord::new(1, 0))));

        let water = run(&mut state, move_to(p1(), origin, 3, 0));
        assert_eq!(water, Err(CommandError::Unreachable(GridCoord::new(3, 0))));

        // nothing above mutated the knight
        assert_eq!(state.units[0].position, origin);
        assert_eq!(state.units[0].action_state, ActionState::ready());

        state.units[0].action_state.can_move = false;
        let moved = run(&mut state, move_to(p1(), origin, 0, 2));
        assert_eq!(moved, Err(CommandError::AlreadyMoved(knight.clone())));

        state.units[0].action_state.is_stunned = true;
        let stunned = run(&mut state, move_to(p1(), origin, 0, 2));
        assert_eq!(stunned, Err(CommandError::Stunned(knight.clone())));
    }

    #[test]
    fn test_unknown_and_dead_actor() {
        let mut state = state();
        let move_down = |id: &str| {
            let (from, to) = (GridCoord::new(0, 0), GridCoord::new(0, 2));
            Command::move_unit("c", p1(), UnitId::new(id), from, to)
        };
        let ghost = run(&mut state, move_down("ghost"));
        assert_eq!(ghost, Err(CommandError::UnitNotFound(UnitId::new("ghost"))));

        state.units[0].take_damage(1_000);
        let dead = run(&mut state, move_down("knight"));
        assert_eq!(dead, Err(CommandError::UnitDead(UnitId::new("knight"))));
    }

    #[test]
    fn test_attack_resolves_combat() {
        let mut state = state();
        let report = run(
            &mut state,
            Command::attack(
                "c1",
                p1(),
                UnitId::new("knight"),
                UnitId::new("orc"),
                GridCoord::new(0, 0),
                GridCoord::new(1, 0),
            ),
        )
        .unwrap();
        // 45 - 10
        assert_eq!(state.units[2].stats.hp, 65);
        assert!(!state.units[0].action_state.can_attack);
        assert!(state.units[0].action_state.can_move);
        match report.action {
            ActionReport::Combat(combat) => assert_eq!(combat.defender_damage, 35),
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_attack_rule_checks() {
        let mut state = state();
        let knight = UnitId::new("knight");
        let origin = GridCoord::new(0, 0);

        let strike = |target: &str, x: i32, y: i32| {
            let to = GridCoord::new(x, y);
            Command::attack("c", p1(), knight.clone(), UnitId::new(target), origin, to)
        };

        let ally = run(&mut state, strike("healer", 1, 1));
        assert_eq!(ally, Err(CommandError::FriendlyFire(UnitId::new("healer"))));

        let far = run(&mut state, strike("mage", 5, 5));
        assert_eq!(far, Err(CommandError::OutOfRange { distance: 10, range: 1 }));

        let stale = run(&mut state, strike("orc", 2, 0));
        assert!(matches!(stale, Err(CommandError::PositionMismatch { .. })));

        let missing = run(&mut state, strike("nobody", 2, 0));
        assert_eq!(missing, Err(CommandError::TargetNotFound(UnitId::new("nobody"))));

        let own = Command::attack("c", p1(), knight.clone(), knight, origin, origin);
        let own = run(&mut state, own);
        assert!(matches!(own, Err(CommandError::Malformed(_))));
    }

    #[test]
    fn test_attack_error_follows_can_attack() {
        let mut state = state();
        // Wounded ally well out of reach of both p1 units
        state.units[3].owner_id = p1();
        state.units[3].take_damage(10);
        let far = GridCoord::new(5, 5);
        let reach = |attacker: &str, from: GridCoord| {
            Command::attack("c", p1(), UnitId::new(attacker), UnitId::new("mage"), from, far)
        };

        let knight = run(&mut state, reach("knight", GridCoord::new(0, 0)));
        assert_eq!(knight, Err(CommandError::FriendlyFire(UnitId::new("mage"))));

        let healer = run(&mut state, reach("healer", GridCoord::new(1, 1)));
        assert_eq!(healer, Err(CommandError::OutOfRange { distance: 8, range: 1 }));

        assert!(!can_attack(&state.units[0], &state.units[3]));
        assert!(!can_attack(&state.units[1], &state.units[3]));
        assert!(can_attack(&state.units[0], &state.units[2]));
    }

    #[test]
    fn test_healer_attack_heals_ally() {
        let mut state = state();
        state.units[0].position = GridCoord::new(0, 1);
        let mend = || {
            Command::attack(
                "c",
                p1(),
                UnitId::new("healer"),
                UnitId::new("knight"),
                GridCoord::new(1, 1),
                GridCoord::new(0, 1),
            )
        };
        let full = run(&mut state, mend());
        assert_eq!(full, Err(CommandError::TargetUnhurt(UnitId::new("knight"))));

        state.units[0].take_damage(50);
        let report = run(&mut state, mend()).unwrap();
        assert_eq!(state.units[0].stats.hp, 70 + 20);
        assert_eq!(
            report.events,
            vec![BattleEvent::UnitHealed {
                target_id: UnitId::new("knight"),
                amount: 20
            }]
        );
    }

    #[test]
    fn test_skill_cast_and_checks() {
        let mut state = state();
        let healer = UnitId::new("healer");

        let unknown = run(&mut state, Command::skill("c", p1(), healer.clone(), "fireball", None));
        assert_eq!(unknown, Err(CommandError::SkillNotFound("fireball".into())));

        let cast = |skill: &str, x: i32, y: i32| {
            Command::skill("c", p1(), healer.clone(), skill, Some(GridCoord::new(x, y)))
        };

        let passive = Command::skill("c", p1(), healer.clone(), "regeneration", None);
        let passive = run(&mut state, passive);
        assert_eq!(passive, Err(CommandError::NotActiveSkill("regeneration".into())));

        let no_position = run(&mut state, Command::skill("c", p1(), healer.clone(), "heal", None));
        assert!(matches!(no_position, Err(CommandError::Malformed(_))));

        let unhurt_free_tile = run(&mut state, cast("heal", 2, 2));
        assert_eq!(unhurt_free_tile, Err(CommandError::NoValidTargets));

        state.units[0].take_damage(60);
        let report = run(&mut state, cast("heal", 0, 0)).unwrap();
        assert_eq!(state.units[0].stats.hp, 100);
        assert_eq!(state.units[1].stats.mana, Some(25));
        assert!(!state.units[1].action_state.can_attack);
        assert!(matches!(report.action, ActionReport::Skill(_)));

        let again = run(&mut state, cast("heal", 0, 0));
        assert_eq!(again, Err(CommandError::AlreadyAttacked(UnitId::new("healer"))));
    }

    #[test]
    fn test_skill_out_of_range() {
        let mut state = state();
        state.units[3].position = GridCoord::new(0, 4);
        state.units[3].owner_id = p1();
        state.units[3].take_damage(10);
        let result = run(
            &mut state,
            Command::skill("c", p1(), UnitId::new("healer"), "heal", Some(GridCoord::new(0, 4))),
        );
        assert_eq!(result, Err(CommandError::OutOfRange { distance: 4, range: 2 }));
        assert_eq!(state.units[1].stats.mana, Some(40));
    }

    #[test]
    fn test_end_turn_checks() {
        let mut state = state();
        let stranger = run(&mut state, Command::end_turn("c", PlayerId::new("p9")));
        assert_eq!(stranger, Err(CommandError::PlayerNotFound(PlayerId::new("p9"))));

        let early = run(&mut state, Command::end_turn("c", PlayerId::new("p2")));
        assert_eq!(early, Err(CommandError::NotYourTurn(PlayerId::new("p2"))));

        let report = run(&mut state, Command::end_turn("c", p1())).unwrap();
        assert_eq!(state.current_player_index, 1);
        assert!(matches!(report.action, ActionReport::TurnEnded(_)));
        assert!(!state.units[0].action_state.can_move);
    }
}
