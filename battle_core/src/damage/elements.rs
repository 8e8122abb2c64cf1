//! Element wheel

use crate::types::{Effectiveness, Element};

/// Element the given element beats on the cycle Fire -> Earth -> Air -> Water -> Fire
fn beats(element: Element) -> Option<Element> {
    match element {
        Element::Fire => Some(Element::Earth),
        Element::Earth => Some(Element::Air),
        Element::Air => Some(Element::Water),
        Element::Water => Some(Element::Fire),
        Element::Light | Element::Dark | Element::Neutral => None,
    }
}

/// Matchup of an attacking element against a defending one
///
/// Light and Dark are very effective against each other; everything else
/// follows the four-element cycle.
pub fn effectiveness(attacker: Element, defender: Element) -> Effectiveness {
    match (attacker, defender) {
        (Element::Light, Element::Dark) | (Element::Dark, Element::Light) => {
            Effectiveness::VeryEffective
        }
        _ if beats(attacker) == Some(defender) => Effectiveness::Effective,
        _ if beats(defender) == Some(attacker) => Effectiveness::NotVeryEffective,
        _ => Effectiveness::Normal,
    }
}

/// Damage multiplier for a matchup
pub fn multiplier(effectiveness: Effectiveness) -> f64 {
    match effectiveness {
        Effectiveness::VeryEffective => 1.5,
        Effectiveness::Effective => 1.25,
        Effectiveness::Normal => 1.0,
        Effectiveness::NotVeryEffective => 0.8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Element::*;

    #[test]
    fn test_cycle() {
        assert_eq!(effectiveness(Fire, Earth), Effectiveness::Effective);
        assert_eq!(effectiveness(Earth, Air), Effectiveness::Effective);
        assert_eq!(effectiveness(Air, Water), Effectiveness::Effective);
        assert_eq!(effectiveness(Water, Fire), Effectiveness::Effective);

        assert_eq!(effectiveness(Earth, Fire), Effectiveness::NotVeryEffective);
        assert_eq!(effectiveness(Fire, Water), Effectiveness::NotVeryEffective);

        assert_eq!(effectiveness(Fire, Air), Effectiveness::Normal);
        assert_eq!(effectiveness(Fire, Fire), Effectiveness::Normal);
    }

    #[test]
    fn test_light_and_dark() {
        assert_eq!(effectiveness(Light, Dark), Effectiveness::VeryEffective);
        assert_eq!(effectiveness(Dark, Light), Effectiveness::VeryEffective);
        assert_eq!(effectiveness(Light, Fire), Effectiveness::Normal);
        assert_eq!(effectiveness(Neutral, Dark), Effectiveness::Normal);
    }

    #[test]
    fn test_multipliers_ordered() {
        assert!(multiplier(Effectiveness::VeryEffective) > multiplier(Effectiveness::Effective));
        assert!(multiplier(Effectiveness::NotVeryEffective) < 1.0);
    }
}
