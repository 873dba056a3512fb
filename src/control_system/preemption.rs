use crate::signal_model::signals::{SignalPhase, TargetState};
use indexmap::IndexMap;

/// Selects the state a signal should take when an emergency vehicle
/// approaches and the caller supplied no explicit state.
///
/// Implementations must be deterministic: the same ordered aspect set always
/// produces the same target state. Returning `None` means no target state
/// could be determined and the signal must be left untouched.
pub trait PreemptionPolicy {
    fn select_target_state(
        &self,
        aspects: &IndexMap<String, SignalPhase>,
    ) -> Option<TargetState>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Fallback heuristic for preemption without caller-supplied detail: stop
/// every approach, then reopen exactly one corridor.
///
/// For a canonical four-way intersection (both `north_south` and `east_west`
/// aspects present) the north/south corridor is reopened. Any other
/// non-empty aspect set reopens the first aspect in insertion order. This is
/// a heuristic default, not a conflict analysis; it never leaves more than
/// one corridor green.
#[derive(Debug, Default, Clone, Copy)]
pub struct CorridorGreenPolicy;

const NORTH_SOUTH: &str = "north_south";
const EAST_WEST: &str = "east_west";

impl PreemptionPolicy for CorridorGreenPolicy {
    fn select_target_state(
        &self,
        aspects: &IndexMap<String, SignalPhase>,
    ) -> Option<TargetState> {
        if aspects.is_empty() {
            return None;
        }

        let mut target: TargetState = aspects
            .keys()
            .map(|aspect| (aspect.clone(), SignalPhase::Red))
            .collect();

        if aspects.contains_key(NORTH_SOUTH) && aspects.contains_key(EAST_WEST) {
            target[NORTH_SOUTH] = SignalPhase::Green;
        } else {
            // Insertion order decides which corridor gets the green.
            let first = aspects.keys().next().cloned()?;
            target[first.as_str()] = SignalPhase::Green;
        }
        Some(target)
    }

    fn name(&self) -> &'static str {
        "corridor_green"
    }
}
