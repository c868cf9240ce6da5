//! Elemental matchup table and affinity-scaled damage.

use crate::entities::Element;

/// How an attacker fares against a defender, for UI hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affinity {
    Favorable,
    Neutral,
    Unfavorable,
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Each base element lists exactly four relations; every other pair is 1.0.
/// `God` appears on neither side.
fn relations(attacker: Element) -> &'static [(Element, f32)] {
    use Element::*;
    match attacker {
        Fire => &[(Ice, 1.5), (Wind, 0.8), (Earth, 1.2), (Lightning, 0.9)],
        Water => &[(Fire, 1.5), (Earth, 0.8), (Ice, 1.2), (Lightning, 0.9)],
        Wind => &[(Earth, 1.5), (Fire, 1.2), (Water, 0.8), (Ice, 0.9)],
        Earth => &[(Lightning, 1.5), (Water, 1.2), (Wind, 0.8), (Fire, 0.9)],
        Light => &[(Dark, 1.5), (Fire, 1.2), (Ice, 0.8), (Earth, 0.9)],
        Dark => &[(Light, 1.5), (Water, 1.2), (Wind, 0.8), (Lightning, 0.9)],
        Ice => &[(Wind, 1.5), (Water, 1.2), (Fire, 0.8), (Lightning, 0.9)],
        Lightning => &[(Water, 1.5), (Ice, 1.2), (Earth, 0.8), (Fire, 0.9)],
        God => &[],
    }
}

// ── Lookups ───────────────────────────────────────────────────────────────────

pub fn multiplier(attacker: Element, defender: Element) -> f32 {
    relations(attacker)
        .iter()
        .find(|(target, _)| *target == defender)
        .map(|&(_, m)| m)
        .unwrap_or(1.0)
}

/// `base × multiplier`, rounded to two decimal places.
pub fn final_damage(attacker: Element, defender: Element, base: f32) -> f32 {
    (base * multiplier(attacker, defender) * 100.0).round() / 100.0
}

/// Classify by applying the table to one unit of damage: above 1.2 is
/// favorable, below 0.95 unfavorable.  A 1.2× pairing is therefore neutral.
pub fn classify(attacker: Element, defender: Element) -> Affinity {
    let damage = final_damage(attacker, defender, 1.0);
    if damage > 1.2 {
        Affinity::Favorable
    } else if damage < 0.95 {
        Affinity::Unfavorable
    } else {
        Affinity::Neutral
    }
}
