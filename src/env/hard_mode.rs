use crate::env::CliffWalkingAction;
use crate::utils::categorical_sample;

/// Candidate executed actions for one intended action, with their weights.
pub type SubstitutionRule = [(CliffWalkingAction, f64); 3];

/// Per-action table of what actually gets executed in hard mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSubstitution {
    rules: [SubstitutionRule; CliffWalkingAction::COUNT],
}

impl ActionSubstitution {
    /// Each action may slip to either perpendicular direction, but every
    /// weight sits on the intended action.
    pub fn reference() -> Self {
        use crate::env::CliffWalkingAction::*;
        Self {
            rules: [
                [(Up, 1.0), (Right, 0.0), (Left, 0.0)],
                [(Up, 0.0), (Right, 1.0), (Down, 0.0)],
                [(Right, 0.0), (Down, 1.0), (Left, 0.0)],
                [(Up, 0.0), (Down, 0.0), (Left, 1.0)],
            ],
        }
    }

    /// Intended action kept with probability `1 - slip`, each perpendicular
    /// direction taken with `slip / 2`.
    pub fn slippery(slip: f64) -> Self {
        let keep = 1.0 - slip;
        let side = slip / 2.0;
        let mut table = Self::reference();
        for rule in table.rules.iter_mut() {
            for (_, weight) in rule.iter_mut() {
                *weight = if *weight > 0.0 { keep } else { side };
            }
        }
        table
    }

    pub fn with_rule(mut self, intended: CliffWalkingAction, rule: SubstitutionRule) -> Self {
        self.rules[intended.index()] = rule;
        self
    }

    pub fn rule(&self, intended: CliffWalkingAction) -> &SubstitutionRule {
        &self.rules[intended.index()]
    }

    /// Draws the executed action for `intended` using `random` in `[0, 1)`.
    /// A rule without any positive weight leaves the action unchanged.
    pub fn substitute(&self, intended: CliffWalkingAction, random: f64) -> CliffWalkingAction {
        let rule = self.rule(intended);
        let weights = rule.map(|(_, w)| w);
        match categorical_sample(&weights, random) {
            Some(i) => rule[i].0,
            None => intended,
        }
    }
}

impl Default for ActionSubstitution {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::CliffWalkingAction::*;

    #[test]
    fn reference_rules_never_slip() {
        let table = ActionSubstitution::reference();
        for action in CliffWalkingAction::ALL {
            for random in [0.0, 0.25, 0.5, 0.75, 0.999] {
                assert_eq!(table.substitute(action, random), action);
            }
        }
    }

    #[test]
    fn reference_candidates_exclude_the_opposite_move() {
        let table = ActionSubstitution::reference();
        let opposite = |a: CliffWalkingAction| match a {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        };
        for action in CliffWalkingAction::ALL {
            let total: f64 = table.rule(action).iter().map(|(_, w)| w).sum();
            assert_eq!(total, 1.0);
            assert!(table.rule(action).iter().all(|(a, _)| *a != opposite(action)));
        }
    }

    #[test]
    fn rules_are_independent() {
        let table = ActionSubstitution::reference()
            .with_rule(Up, [(Up, 0.0), (Right, 0.5), (Left, 0.5)]);
        assert_eq!(table.substitute(Up, 0.1), Right);
        assert_eq!(table.substitute(Up, 0.9), Left);
        assert_eq!(table.substitute(Right, 0.1), Right);
        assert_eq!(table.substitute(Down, 0.9), Down);
    }

    #[test]
    fn slippery_splits_between_perpendiculars() {
        let table = ActionSubstitution::slippery(0.2);
        assert_eq!(table.substitute(Down, 0.05), Right);
        assert_eq!(table.substitute(Down, 0.5), Down);
        assert_eq!(table.substitute(Down, 0.95), Left);
    }

    #[test]
    fn empty_rule_keeps_intended_action() {
        let table = ActionSubstitution::reference()
            .with_rule(Left, [(Up, 0.0), (Down, 0.0), (Left, 0.0)]);
        assert_eq!(table.substitute(Left, 0.3), Left);
    }
}
