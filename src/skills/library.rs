//! Skill catalog
//!
//! Immutable definitions keyed by id. Units receive clones at creation so
//! cooldown state is never shared.

use crate::skills::definitions::{
    EffectType, Skill, SkillEffect, SkillType, TargetType, TriggerTiming,
};

/// Every skill id the catalog knows
pub const SKILL_IDS: &[&str] = &[
    // Passive
    "berserker",
    "iron_wall",
    "critical_strike",
    "counter",
    "terrain_adapt",
    "swift",
    "regeneration",
    "vampire",
    // Active
    "heal",
    "power_strike",
    "shield_bash",
    "chain_lightning",
    "group_heal",
    "berserk",
    "fire_storm",
];

fn passive(
    id: &str,
    name: &str,
    description: &str,
    trigger: TriggerTiming,
    range: u32,
    effects: Vec<SkillEffect>,
) -> Skill {
    Skill {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        skill_type: SkillType::Passive,
        trigger,
        effects,
        range,
        cooldown: 0,
        current_cooldown: 0,
        mana_cost: 0,
    }
}

fn active(
    id: &str,
    name: &str,
    description: &str,
    range: u32,
    cooldown: u32,
    mana_cost: u32,
    effects: Vec<SkillEffect>,
) -> Skill {
    Skill {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        skill_type: SkillType::Active,
        trigger: TriggerTiming::Manual,
        effects,
        range,
        cooldown,
        current_cooldown: 0,
        mana_cost,
    }
}

/// Fresh copy of a catalog skill
pub fn skill_definition(id: &str) -> Option<Skill> {
    use EffectType::*;
    use TargetType::*;

    let skill = match id {
        "berserker" => passive(
            id,
            "Berserker",
            "Attack +30%, defense -10%",
            TriggerTiming::Always,
            0,
            vec![
                SkillEffect::new(AttackBoost, 0.3, SelfUnit),
                SkillEffect::new(DefenseBoost, -0.1, SelfUnit),
            ],
        ),
        "iron_wall" => passive(
            id,
            "Iron Wall",
            "Defense +40%, move -1",
            TriggerTiming::Always,
            0,
            vec![
                SkillEffect::new(DefenseBoost, 0.4, SelfUnit),
                SkillEffect::new(MoveBoost, -1.0, SelfUnit),
            ],
        ),
        "critical_strike" => passive(
            id,
            "Critical Strike",
            "15% chance to crit and ignore 50% of defense",
            TriggerTiming::OnAttack,
            0,
            vec![
                SkillEffect::new(CriticalHit, 2.0, Enemy).with_chance(0.15),
                SkillEffect::new(ArmorPierce, 0.5, Enemy).with_chance(0.15),
            ],
        ),
        "counter" => passive(
            id,
            "Counter",
            "Strike back when attacked in melee, recovering 20% of damage dealt",
            TriggerTiming::OnDefend,
            1,
            vec![
                SkillEffect::new(CounterAttack, 1.0, Enemy),
                SkillEffect::new(LifeSteal, 0.2, SelfUnit),
            ],
        ),
        "terrain_adapt" => passive(
            id,
            "Terrain Adaptation",
            "Move +1, terrain costs one less",
            TriggerTiming::Always,
            0,
            vec![
                SkillEffect::new(MoveBoost, 1.0, SelfUnit),
                SkillEffect::new(TerrainMaster, 1.0, SelfUnit),
            ],
        ),
        "swift" => passive(
            id,
            "Swift",
            "Move +2, always strikes first",
            TriggerTiming::Always,
            0,
            vec![
                SkillEffect::new(MoveBoost, 2.0, SelfUnit),
                SkillEffect::new(FirstStrike, 1.0, SelfUnit),
            ],
        ),
        "regeneration" => passive(
            id,
            "Regeneration",
            "Recover 10% of max HP every turn",
            TriggerTiming::OnTurnStart,
            0,
            vec![SkillEffect::new(Regeneration, 0.1, SelfUnit)],
        ),
        "vampire" => passive(
            id,
            "Vampire",
            "Attack +15%, steal 30% of damage dealt",
            TriggerTiming::OnAttack,
            0,
            vec![
                SkillEffect::new(AttackBoost, 0.15, SelfUnit),
                SkillEffect::new(LifeSteal, 0.3, SelfUnit),
            ],
        ),
        "heal" => active(
            id,
            "Heal",
            "Restore 40 HP to an ally and remove all debuffs",
            2,
            2,
            15,
            vec![
                SkillEffect::new(Heal, 40.0, Ally),
                SkillEffect::new(Cleanse, 1.0, Ally),
            ],
        ),
        "power_strike" => active(
            id,
            "Power Strike",
            "Double attack for a turn with a 50% chance to stun the target",
            1,
            3,
            20,
            vec![
                SkillEffect::new(BuffAttack, 2.0, SelfUnit).with_duration(1),
                SkillEffect::new(Stun, 1.0, Enemy)
                    .with_chance(0.5)
                    .with_duration(1),
            ],
        ),
        "shield_bash" => active(
            id,
            "Shield Bash",
            "Defense +50% and reflect 30% of damage taken for 2 turns",
            1,
            4,
            15,
            vec![
                SkillEffect::new(BuffDefense, 0.5, SelfUnit).with_duration(2),
                SkillEffect::new(ReflectDamage, 0.3, SelfUnit).with_duration(2),
            ],
        ),
        "chain_lightning" => active(
            id,
            "Chain Lightning",
            "Hit every enemy for 80% damage and slow them for 2 turns",
            2,
            4,
            25,
            vec![
                SkillEffect::new(AreaAttack, 0.8, EnemyAll),
                SkillEffect::new(Slow, 1.0, EnemyAll).with_duration(2),
            ],
        ),
        "group_heal" => active(
            id,
            "Group Heal",
            "Restore 25 HP to every ally and raise defense 20% for 2 turns",
            2,
            5,
            30,
            vec![
                SkillEffect::new(Heal, 25.0, AllyAll),
                SkillEffect::new(BuffDefense, 0.2, AllyAll).with_duration(2),
            ],
        ),
        "berserk" => active(
            id,
            "Berserk",
            "Attack +60%, defense -30% for 3 turns",
            0,
            5,
            20,
            vec![
                SkillEffect::new(BuffAttack, 0.6, SelfUnit).with_duration(3),
                SkillEffect::new(BuffDefense, -0.3, SelfUnit).with_duration(3),
            ],
        ),
        "fire_storm" => active(
            id,
            "Fire Storm",
            "Hit every enemy for 90% damage and burn them for 10 a turn over 3 turns",
            2,
            5,
            35,
            vec![
                SkillEffect::new(AreaAttack, 0.9, EnemyAll),
                SkillEffect::new(Burn, 10.0, EnemyAll).with_duration(3),
            ],
        ),
        _ => return None,
    };
    Some(skill)
}

/// Clone a list of catalog skills, skipping unknown ids
pub fn skills_for(ids: &[&str]) -> Vec<Skill> {
    ids.iter().filter_map(|id| skill_definition(id)).collect()
}
