//! Ranking of candidate plans
//!
//! Candidates are ordered by a tuple of keys, best first:
//!
//! 1. direct play of a local file
//! 2. direct play or direct stream, then transcode, then no method
//! 3. local files before remote protocols
//! 4. distance between the source bitrate and the budget
//! 5. discovery order

use std::cmp::Ordering;

use crate::media::MediaProtocol;
use crate::plan::{PlayMethod, StreamPlan};

fn local_direct_play_key(plan: &StreamPlan) -> u8 {
    match (plan.play_method, plan.media_source_protocol) {
        (Some(PlayMethod::DirectPlay), MediaProtocol::File) => 0,
        _ => 1,
    }
}

fn play_method_key(plan: &StreamPlan) -> u8 {
    match plan.play_method {
        Some(PlayMethod::DirectPlay) | Some(PlayMethod::DirectStream) => 0,
        Some(PlayMethod::Transcode) => 1,
        None => 2,
    }
}

fn protocol_key(plan: &StreamPlan) -> u8 {
    match plan.media_source_protocol {
        MediaProtocol::File => 0,
        _ => 1,
    }
}

/// Distance between the source bitrate and the budget.
///
/// Zero when either is unknown.
pub fn bitrate_distance(plan: &StreamPlan, max_bitrate: Option<u64>) -> u64 {
    match (max_bitrate.filter(|b| *b > 0), plan.media_source_bitrate) {
        (Some(budget), Some(bitrate)) => bitrate.abs_diff(budget),
        _ => 0,
    }
}

/// Compare two candidates. `Less` means `a` is better.
pub fn compare_plans(
    a: (usize, &StreamPlan),
    b: (usize, &StreamPlan),
    max_bitrate: Option<u64>,
) -> Ordering {
    let (ia, pa) = a;
    let (ib, pb) = b;
    local_direct_play_key(pa)
        .cmp(&local_direct_play_key(pb))
        .then_with(|| play_method_key(pa).cmp(&play_method_key(pb)))
        .then_with(|| protocol_key(pa).cmp(&protocol_key(pb)))
        .then_with(|| bitrate_distance(pa, max_bitrate).cmp(&bitrate_distance(pb, max_bitrate)))
        .then_with(|| ia.cmp(&ib))
}

/// Sort candidates best first.
pub fn rank_plans(plans: Vec<StreamPlan>, max_bitrate: Option<u64>) -> Vec<StreamPlan> {
    let mut indexed: Vec<(usize, StreamPlan)> = plans.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, pa), (ib, pb)| compare_plans((*ia, pa), (*ib, pb), max_bitrate));
    indexed.into_iter().map(|(_, plan)| plan).collect()
}

/// The best candidate, if there is one.
pub fn select_optimal(plans: Vec<StreamPlan>, max_bitrate: Option<u64>) -> Option<StreamPlan> {
    rank_plans(plans, max_bitrate).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(id: &str, method: Option<PlayMethod>, protocol: MediaProtocol) -> StreamPlan {
        StreamPlan {
            media_source_id: id.to_string(),
            play_method: method,
            media_source_protocol: protocol,
            ..Default::default()
        }
    }

    fn ids(plans: &[StreamPlan]) -> Vec<&str> {
        plans.iter().map(|p| p.media_source_id.as_str()).collect()
    }

    #[test]
    fn test_local_direct_play_first_for_all_permutations() {
        let base = vec![
            plan("transcode", Some(PlayMethod::Transcode), MediaProtocol::File),
            plan("direct", Some(PlayMethod::DirectPlay), MediaProtocol::File),
            plan("remote", Some(PlayMethod::Transcode), MediaProtocol::Http),
        ];
        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in permutations {
            let plans: Vec<StreamPlan> = order.iter().map(|i| base[*i].clone()).collect();
            let ranked = rank_plans(plans, None);
            assert_eq!(ranked[0].media_source_id, "direct");
            assert_eq!(ranked[1].media_source_id, "transcode");
            assert_eq!(ranked[2].media_source_id, "remote");
        }
    }

    #[test]
    fn test_direct_stream_ties_with_remote_direct_play() {
        let ranked = rank_plans(
            vec![
                plan("remote-play", Some(PlayMethod::DirectPlay), MediaProtocol::Http),
                plan("local-stream", Some(PlayMethod::DirectStream), MediaProtocol::File),
                plan("none", None, MediaProtocol::File),
                plan("transcode", Some(PlayMethod::Transcode), MediaProtocol::File),
            ],
            None,
        );
        assert_eq!(
            ids(&ranked),
            vec!["local-stream", "remote-play", "transcode", "none"]
        );
    }

    #[test]
    fn test_bitrate_distance_then_order() {
        let mut a = plan("a", Some(PlayMethod::Transcode), MediaProtocol::File);
        a.media_source_bitrate = Some(20_000_000);
        let mut b = plan("b", Some(PlayMethod::Transcode), MediaProtocol::File);
        b.media_source_bitrate = Some(9_000_000);
        let c = plan("c", Some(PlayMethod::Transcode), MediaProtocol::File);

        let ranked = rank_plans(vec![a.clone(), b.clone(), c.clone()], Some(8_000_000));
        assert_eq!(ids(&ranked), vec!["c", "b", "a"]);

        let ranked = rank_plans(vec![a, b, c], None);
        assert_eq!(ids(&ranked), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_select_optimal_empty() {
        assert!(select_optimal(Vec::new(), None).is_none());
    }
}
