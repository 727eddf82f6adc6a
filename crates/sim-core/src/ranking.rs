//! Ranking and overtake resolution.
//!
//! The field is ordered by this lap's times, ascending. Ties keep the
//! original iteration order (sorting is stable). Agents are referred to by
//! their index in the roster.
//!
//! Overtakes are attributed with a pairing heuristic: every agent whose
//! position improved is paired with whoever now occupies its previous
//! position. With three or more cars permuting in one lap this can pair an
//! agent with a car it never actually passed.

/// One attributed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overtake {
    /// Roster index of the agent that gained places.
    pub overtaker: usize,
    /// Roster index of the agent now holding the overtaker's old slot.
    pub overtaken: usize,
    pub position_before: usize,
    pub position_after: usize,
}

/// Ranking for one lap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedLap {
    /// Roster indices in finishing order (P1 first).
    pub order: Vec<usize>,
    /// New position per roster index.
    pub positions: Vec<usize>,
    /// `previous - new` per roster index (positive = places gained).
    pub position_changes: Vec<i64>,
    /// Overtakes in finishing order of the overtaker.
    pub overtakes: Vec<Overtake>,
}

/// Rank the field by lap time.
///
/// `lap_times[i]` and `previous_positions[i]` belong to roster index `i`;
/// previous positions must be a permutation of `1..=n`.
pub fn rank_lap(lap_times: &[f64], previous_positions: &[usize]) -> RankedLap {
    debug_assert_eq!(lap_times.len(), previous_positions.len());

    let mut order: Vec<usize> = (0..lap_times.len()).collect();
    order.sort_by(|&a, &b| lap_times[a].total_cmp(&lap_times[b]));

    let mut positions = vec![0; lap_times.len()];
    for (rank, &idx) in order.iter().enumerate() {
        positions[idx] = rank + 1;
    }

    let position_changes: Vec<i64> = positions
        .iter()
        .zip(previous_positions)
        .map(|(&new, &prev)| prev as i64 - new as i64)
        .collect();

    let overtakes = order
        .iter()
        .filter_map(|&idx| {
            let before = previous_positions[idx];
            let after = positions[idx];
            if after >= before {
                return None;
            }
            let overtaken = *order.get(before - 1)?;
            Some(Overtake {
                overtaker: idx,
                overtaken,
                position_before: before,
                position_after: after,
            })
        })
        .collect();

    RankedLap {
        order,
        positions,
        position_changes,
        overtakes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_lap_time() {
        let ranked = rank_lap(&[91.0, 89.5, 90.2], &[1, 2, 3]);
        assert_eq!(ranked.order, vec![1, 2, 0]);
        assert_eq!(ranked.positions, vec![3, 1, 2]);
        assert_eq!(ranked.position_changes, vec![-2, 1, 1]);
    }

    #[test]
    fn test_ties_keep_roster_order() {
        let ranked = rank_lap(&[90.0, 90.0, 89.0, 90.0], &[1, 2, 3, 4]);
        assert_eq!(ranked.order, vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_positions_are_a_permutation() {
        let times = [92.1, 88.0, 90.5, 90.5, 87.9, 101.3];
        let ranked = rank_lap(&times, &[6, 5, 4, 3, 2, 1]);
        let mut sorted = ranked.positions.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_simple_swap_emits_one_overtake() {
        let ranked = rank_lap(&[90.5, 90.0], &[1, 2]);
        assert_eq!(
            ranked.overtakes,
            vec![Overtake {
                overtaker: 1,
                overtaken: 0,
                position_before: 2,
                position_after: 1,
            }]
        );
    }

    #[test]
    fn test_no_change_no_overtakes() {
        let ranked = rank_lap(&[89.0, 90.0, 91.0], &[1, 2, 3]);
        assert!(ranked.overtakes.is_empty());
        assert!(ranked.position_changes.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_three_way_rotation_pairs_by_previous_slot() {
        // Previous order: 0, 1, 2. New order: 2, 0, 1.
        let ranked = rank_lap(&[90.0, 91.0, 89.0], &[1, 2, 3]);
        // Only agent 2 improved (3 -> 1); it is paired with agent 1, which
        // now holds P3, even though agent 2 also passed agent 0.
        assert_eq!(ranked.overtakes.len(), 1);
        assert_eq!(ranked.overtakes[0].overtaker, 2);
        assert_eq!(ranked.overtakes[0].overtaken, 1);
    }
}
