//! Regression planner.
//!
//! Works backward from a goal's desired effects: an action that provides an
//! outstanding effect replaces it with the action's own not-yet-true
//! preconditions, until nothing is outstanding. Uniform-cost expansion over
//! cumulative action cost guarantees the cheapest plan for the selected
//! goal, and every tie-break is pinned to declaration order so identical
//! inputs always produce the identical plan.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::actions::{ActionPlan, AgentAction, AgentGoal};
use crate::beliefs::BeliefRegistry;

/// Finds the lowest-cost plan for the highest-priority satisfiable goal.
///
/// `preceding_goal` sorts last within its priority band so the agent does
/// not immediately repeat the goal it just finished. Returns `None` when no
/// goal is satisfiable; callers retry on a later tick.
pub fn plan(
    actions: &[AgentAction],
    goals: &[&AgentGoal],
    preceding_goal: Option<&str>,
    beliefs: &BeliefRegistry,
) -> Option<ActionPlan> {
    let mut ordered: Vec<&AgentGoal> = goals.to_vec();
    ordered.sort_by_key(|goal| {
        let repeats = preceding_goal == Some(goal.name());
        (std::cmp::Reverse(goal.priority()), repeats)
    });

    for goal in ordered {
        if let Some((chain, cost)) = search_goal(actions, goal, beliefs) {
            tracing::debug!(
                goal = goal.name(),
                cost,
                actions = chain.len(),
                "plan found"
            );
            return Some(ActionPlan::new(goal, chain, cost));
        }
    }
    None
}

/// A frontier entry. Ordered so the binary max-heap pops the cheapest node,
/// breaking cost ties by insertion sequence (FIFO).
struct OpenNode {
    cost: f32,
    seq: u64,
    /// Belief names still to satisfy, kept sorted for stable expansion and
    /// visited-state keys.
    outstanding: Vec<String>,
    /// Action names in discovery order (goal-first). This is exactly the
    /// plan's stack layout.
    chain: Vec<String>,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn search_goal(
    actions: &[AgentAction],
    goal: &AgentGoal,
    beliefs: &BeliefRegistry,
) -> Option<(Vec<String>, f32)> {
    let start: Vec<String> = sorted_unique(
        goal.desired_effects()
            .iter()
            .filter(|name| !beliefs.evaluate_or_false(name))
            .cloned(),
    );
    // Everything the goal wants already holds; nothing to plan.
    if start.is_empty() {
        return None;
    }

    let mut heap = BinaryHeap::new();
    let mut visited: HashSet<Vec<String>> = HashSet::new();
    let mut seq = 0u64;
    heap.push(OpenNode {
        cost: 0.0,
        seq,
        outstanding: start,
        chain: Vec::new(),
    });

    while let Some(node) = heap.pop() {
        if !visited.insert(node.outstanding.clone()) {
            continue;
        }
        if node.outstanding.is_empty() {
            return Some((node.chain, node.cost));
        }

        // Regress through the first outstanding belief; actions that also
        // provide other outstanding effects clear those for free.
        let target = &node.outstanding[0];
        for action in actions {
            if !action.effects().iter().any(|effect| effect == target) {
                continue;
            }
            // An action already in the chain re-introduces its own
            // preconditions; revisiting it can only cycle.
            if node.chain.iter().any(|name| name == action.name()) {
                continue;
            }

            let mut next: Vec<String> = node
                .outstanding
                .iter()
                .filter(|belief| !action.effects().contains(belief))
                .cloned()
                .collect();
            next.extend(
                action
                    .preconditions()
                    .iter()
                    .filter(|belief| !beliefs.evaluate_or_false(belief))
                    .cloned(),
            );
            let next = sorted_unique(next);
            if visited.contains(&next) {
                continue;
            }

            let mut chain = node.chain.clone();
            chain.push(action.name().to_string());
            seq += 1;
            heap.push(OpenNode {
                cost: node.cost + action.cost(),
                seq,
                outstanding: next,
                chain,
            });
        }
    }
    None
}

fn sorted_unique(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = names.into_iter().collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{AgentAction, AgentGoal};
    use crate::strategy::IdleStrategy;

    fn action(name: &str, cost: f32, pre: &[&str], eff: &[&str]) -> AgentAction {
        let mut builder = AgentAction::builder(name)
            .with_strategy(IdleStrategy::new(1.0))
            .with_cost(cost);
        for p in pre {
            builder = builder.add_precondition(*p);
        }
        for e in eff {
            builder = builder.add_effect(*e);
        }
        builder.build().unwrap()
    }

    fn goal(name: &str, priority: i32, desired: &str) -> AgentGoal {
        AgentGoal::builder(name)
            .with_priority(priority)
            .with_desired_effect(desired)
            .build()
    }

    fn registry(names: &[&str]) -> BeliefRegistry {
        let mut beliefs = BeliefRegistry::new();
        for name in names {
            beliefs.add(*name, || false).unwrap();
        }
        beliefs
    }

    #[test]
    fn chains_preconditions_in_execution_order() {
        let actions = vec![
            action("WalkToDoor", 1.0, &[], &["AtDoor"]),
            action("Rest", 1.0, &["AtDoor"], &["Rested"]),
        ];
        let beliefs = registry(&["AtDoor", "Rested"]);
        let rested = goal("GetRested", 1, "Rested");

        let mut plan = plan(&actions, &[&rested], None, &beliefs).expect("plan");

        assert_eq!(plan.total_cost(), 2.0);
        assert_eq!(plan.pop_next().as_deref(), Some("WalkToDoor"));
        assert_eq!(plan.pop_next().as_deref(), Some("Rest"));
        assert!(plan.is_empty());
    }

    #[test]
    fn picks_cheapest_route() {
        let actions = vec![
            action("ExpensiveRest", 5.0, &[], &["Rested"]),
            action("WalkToDoor", 1.0, &[], &["AtDoor"]),
            action("Rest", 1.0, &["AtDoor"], &["Rested"]),
        ];
        let beliefs = registry(&["AtDoor", "Rested"]);
        let rested = goal("GetRested", 1, "Rested");

        let plan = plan(&actions, &[&rested], None, &beliefs).expect("plan");

        assert_eq!(plan.total_cost(), 2.0);
        assert_eq!(plan.execution_order(), ["WalkToDoor", "Rest"]);
    }

    #[test]
    fn higher_priority_goal_wins() {
        let actions = vec![
            action("Wander", 1.0, &[], &["Moving"]),
            action("Chase", 1.0, &[], &["Attacking"]),
        ];
        let beliefs = registry(&["Moving", "Attacking"]);
        let wander = goal("Wander", 1, "Moving");
        let attack = goal("SeekAndDestroy", 2, "Attacking");

        let plan = plan(&actions, &[&wander, &attack], None, &beliefs).expect("plan");

        assert_eq!(plan.goal(), "SeekAndDestroy");
    }

    #[test]
    fn preceding_goal_yields_within_its_priority_band() {
        let actions = vec![
            action("Relax", 1.0, &[], &["Nothing"]),
            action("Wander", 1.0, &[], &["Moving"]),
        ];
        let beliefs = registry(&["Nothing", "Moving"]);
        let chill = goal("ChillOut", 1, "Nothing");
        let wander = goal("Wander", 1, "Moving");

        let plan = plan(&actions, &[&chill, &wander], Some("ChillOut"), &beliefs).expect("plan");

        assert_eq!(plan.goal(), "Wander");
    }

    #[test]
    fn unsatisfiable_chain_is_never_selected() {
        // "Fly" needs wings nothing provides.
        let actions = vec![action("Fly", 1.0, &["HasWings"], &["Airborne"])];
        let beliefs = registry(&["HasWings", "Airborne"]);
        let airborne = goal("GetAirborne", 1, "Airborne");

        assert!(plan(&actions, &[&airborne], None, &beliefs).is_none());
    }

    #[test]
    fn satisfied_preconditions_stop_the_regression() {
        let at_door = goal("GetRested", 1, "Rested");
        let actions = vec![
            action("WalkToDoor", 1.0, &[], &["AtDoor"]),
            action("Rest", 1.0, &["AtDoor"], &["Rested"]),
        ];
        let mut beliefs = BeliefRegistry::new();
        beliefs.add("AtDoor", || true).unwrap();
        beliefs.add("Rested", || false).unwrap();

        let plan = plan(&actions, &[&at_door], None, &beliefs).expect("plan");

        // Already at the door; only Rest is needed.
        assert_eq!(plan.execution_order(), ["Rest"]);
        assert_eq!(plan.total_cost(), 1.0);
    }

    #[test]
    fn self_cycling_action_is_excluded() {
        // Its own effect is its precondition; must not loop forever.
        let actions = vec![action("Bootstrap", 1.0, &["Done"], &["Done"])];
        let beliefs = registry(&["Done"]);
        let done = goal("FinishUp", 1, "Done");

        assert!(plan(&actions, &[&done], None, &beliefs).is_none());
    }

    #[test]
    fn already_satisfied_goal_is_skipped() {
        let actions = vec![action("Wander", 1.0, &[], &["Moving"])];
        let mut beliefs = BeliefRegistry::new();
        beliefs.add("Rested", || true).unwrap();
        beliefs.add("Moving", || false).unwrap();

        let rested = goal("GetRested", 5, "Rested");
        let wander = goal("Wander", 1, "Moving");

        let plan = plan(&actions, &[&rested, &wander], None, &beliefs).expect("plan");

        assert_eq!(plan.goal(), "Wander");
    }
}
