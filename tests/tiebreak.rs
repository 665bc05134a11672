//! Integration tests for tie detection, tiebreaker creation, and the group-stage gate.

use doubles_tournament_web::{
    check_group_stage_complete, compute_standings, create_cross_group_tiebreakers,
    create_tiebreaker_match, create_tiebreakers_for_tie, find_tied_positions, finish_group_stage_with_rng,
    generate_groups_with_rng, group_summary, is_tie_at_cutoff, teams_to_advance_per_group,
    update_match_winner, RoundType, Team, TeamStanding, Tournament, TournamentError,
    TournamentStage,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn standing(points: u32) -> TeamStanding {
    TeamStanding {
        team: Team::new(format!("{points} pts"), ["a", "b"]),
        played: 0,
        wins: points,
        points,
    }
}

fn drawn_tournament(n: usize, groups: u32) -> Tournament {
    let mut t = Tournament::new("Club Cup", n as u32, groups);
    for i in 0..n {
        t.add_team(
            format!("Team {i}"),
            [format!("P{i}a").as_str(), format!("P{i}b").as_str()],
        )
        .unwrap();
    }
    generate_groups_with_rng(&mut t, &mut StdRng::seed_from_u64(9)).unwrap();
    t
}

/// Earlier-drawn team always wins: strictly ordered points within the group.
fn play_in_order(t: &mut Tournament, group: usize) {
    let results: Vec<_> = t.groups[group]
        .matches
        .iter()
        .map(|m| (m.id, m.team_a.id.clone()))
        .collect();
    for (id, winner) in results {
        update_match_winner(t, id, &winner).unwrap();
    }
}

/// The first three teams beat each other in a circle and all beat any fourth:
/// 1 / 1 / 1 in a group of three, 2 / 2 / 2 / 0 in a group of four.
fn play_circular(t: &mut Tournament, group: usize) {
    let results: Vec<_> = t.groups[group]
        .matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let winner = if i == 1 { &m.team_b } else { &m.team_a };
            (m.id, winner.id.clone())
        })
        .collect();
    for (id, winner) in results {
        update_match_winner(t, id, &winner).unwrap();
    }
}

#[test]
fn tie_at_cutoff_examples() {
    let standings = vec![standing(3), standing(3), standing(1)];
    assert!(is_tie_at_cutoff(&standings, 1));
    assert!(!is_tie_at_cutoff(&standings, 2));
    // Everyone advances: nothing to cut.
    assert!(!is_tie_at_cutoff(&standings, 3));
}

#[test]
fn tied_positions_cover_every_cluster() {
    let standings = vec![
        standing(3),
        standing(2),
        standing(2),
        standing(1),
        standing(0),
        standing(0),
        standing(0),
    ];
    let tied = find_tied_positions(&standings);
    assert_eq!(tied.keys().copied().collect::<Vec<_>>(), vec![2, 5]);
    assert_eq!(tied[&2].len(), 2);
    assert_eq!(tied[&5].len(), 3);
}

#[test]
fn no_ties_means_no_tied_positions() {
    let standings = vec![standing(2), standing(1), standing(0)];
    assert!(find_tied_positions(&standings).is_empty());
}

#[test]
fn advance_target_prefers_eight_then_four() {
    // 2 groups of 4: ceil(8/2) = 4 fits.
    assert_eq!(teams_to_advance_per_group(8, 2), 4);
    // 2 groups of 3: 4 does not fit, ceil(4/2) = 2.
    assert_eq!(teams_to_advance_per_group(6, 2), 2);
    // 4 groups of 4: 2 each.
    assert_eq!(teams_to_advance_per_group(16, 4), 2);
    // 1 group of 3: falls back to 4, later capped by group size.
    assert_eq!(teams_to_advance_per_group(3, 1), 4);
    // Many small groups still send at least one.
    assert_eq!(teams_to_advance_per_group(16, 16), 1);
    assert_eq!(teams_to_advance_per_group(10, 0), 1);
}

#[test]
fn create_tiebreaker_appends_to_group_and_flat_list() {
    let mut t = drawn_tournament(6, 2);
    let group_id = t.groups[0].id.clone();
    let a = t.groups[0].teams[0].id.clone();
    let b = t.groups[0].teams[1].id.clone();
    let flat_before = t.matches.len();

    let id = create_tiebreaker_match(&mut t, &group_id, &a, &b, Some(2)).unwrap();

    assert_eq!(t.matches.len(), flat_before + 1);
    let tb = &t.groups[0].tiebreakers[0];
    assert_eq!(tb.id, id);
    assert_eq!(tb.round, RoundType::Tiebreaker);
    assert!(tb.is_tiebreaker);
    assert_eq!(tb.tie_breaker_position, Some(2));
    assert!(tb.winner.is_none());
    assert!(t.matches.iter().any(|m| m.id == id));
}

#[test]
fn tiebreaker_needs_teams_from_the_group() {
    let mut t = drawn_tournament(6, 2);
    let group_id = t.groups[0].id.clone();
    let inside = t.groups[0].teams[0].id.clone();
    let outside = t.groups[1].teams[0].id.clone();
    let before = t.clone();

    assert_eq!(
        create_tiebreaker_match(&mut t, &group_id, &inside, &outside, None),
        Err(TournamentError::TeamNotFound(outside.clone()))
    );
    assert_eq!(
        create_tiebreaker_match(&mut t, "group-9", &inside, &outside, None),
        Err(TournamentError::GroupNotFound("group-9".to_string()))
    );
    assert_eq!(
        create_tiebreaker_match(&mut t, &group_id, &inside, &inside, None),
        Err(TournamentError::NotEnoughTiedTeams)
    );
    assert_eq!(t, before);
}

#[test]
fn three_way_tie_gets_a_mini_round_robin() {
    let mut t = drawn_tournament(6, 2);
    play_circular(&mut t, 0);
    play_in_order(&mut t, 1);

    let standings = compute_standings(&t.groups[0]);
    let tied = find_tied_positions(&standings);
    assert_eq!(tied.len(), 1);
    let tied_ids: Vec<String> = tied[&1].iter().map(|s| s.team.id.clone()).collect();
    assert_eq!(tied_ids.len(), 3);

    let group_id = t.groups[0].id.clone();
    let created = create_tiebreakers_for_tie(&mut t, &group_id, Some(1), &tied_ids).unwrap();
    assert_eq!(created.len(), 3);
    assert_eq!(t.groups[0].tiebreakers.len(), 3);
}

#[test]
fn tie_for_a_position_needs_two_distinct_teams() {
    let mut t = drawn_tournament(6, 2);
    let group_id = t.groups[0].id.clone();
    let only = vec![t.groups[0].teams[0].id.clone(), t.groups[0].teams[0].id.clone()];
    assert_eq!(
        create_tiebreakers_for_tie(&mut t, &group_id, Some(1), &only),
        Err(TournamentError::NotEnoughTiedTeams)
    );
}

#[test]
fn gate_blocks_until_results_tiebreakers_and_cutoff_are_settled() {
    let mut t = drawn_tournament(6, 2);
    assert_eq!(
        check_group_stage_complete(&t),
        Err(TournamentError::IncompleteResults)
    );

    play_circular(&mut t, 0);
    play_in_order(&mut t, 1);
    let group_id = t.groups[0].id.clone();
    assert_eq!(
        check_group_stage_complete(&t),
        Err(TournamentError::TieAtCutoff {
            group_id: group_id.clone()
        })
    );
    // The gated transition refuses and changes nothing.
    let before = t.clone();
    assert!(finish_group_stage_with_rng(&mut t, &mut StdRng::seed_from_u64(1)).is_err());
    assert_eq!(t, before);

    let tied: Vec<String> = t.groups[0].teams.iter().map(|team| team.id.clone()).collect();
    create_tiebreakers_for_tie(&mut t, &group_id, Some(1), &tied).unwrap();
    assert_eq!(
        check_group_stage_complete(&t),
        Err(TournamentError::UnplayedTiebreakers)
    );

    // The first listed team of each tiebreaker wins: a strict 2 / 1 / 0 split on top.
    let results: Vec<_> = t.groups[0]
        .tiebreakers
        .iter()
        .map(|m| (m.id, m.team_a.id.clone()))
        .collect();
    for (id, winner) in results {
        update_match_winner(&mut t, id, &winner).unwrap();
    }
    assert_eq!(check_group_stage_complete(&t), Ok(()));

    let summary = group_summary(&t.groups[0], 2);
    assert!(!summary.tie_at_cutoff);
    assert_eq!(summary.unplayed_tiebreakers, 0);
    assert_eq!(summary.standings[0].team.id, tied[0]);

    finish_group_stage_with_rng(&mut t, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(t.stage, TournamentStage::Bracket);
    // 2 per group from 2 groups: semifinals.
    assert_eq!(t.knockout_matches.len(), 3);
}

#[test]
fn tiebreakers_only_during_group_stage() {
    let mut t = Tournament::new("Club Cup", 4, 1);
    let a = t.add_team("A", ["a1", "a2"]).unwrap();
    let b = t.add_team("B", ["b1", "b2"]).unwrap();
    assert_eq!(
        create_tiebreaker_match(&mut t, "group-1", &a, &b, None),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn level_third_places_across_groups_need_a_cross_group_tiebreaker() {
    // 3 groups of 4: top two of each go through directly, two of the three thirds fill the rest.
    let mut t = drawn_tournament(12, 3);
    for group in 0..3 {
        play_in_order(&mut t, group);
    }
    let thirds: Vec<String> = t.groups.iter().map(|g| g.teams[2].id.clone()).collect();

    match check_group_stage_complete(&t) {
        Err(TournamentError::TieAcrossGroups { mut team_ids }) => {
            let mut expected = thirds.clone();
            team_ids.sort();
            expected.sort();
            assert_eq!(team_ids, expected);
        }
        other => panic!("unexpected gate result: {other:?}"),
    }
    let before = t.clone();
    assert!(finish_group_stage_with_rng(&mut t, &mut StdRng::seed_from_u64(1)).is_err());
    assert_eq!(t, before);

    // Listed first wins each match: group 3's third beats both, group 1's beats group 2's.
    let order = [thirds[2].clone(), thirds[0].clone(), thirds[1].clone()];
    let created = create_cross_group_tiebreakers(&mut t, &order).unwrap();
    assert_eq!(created.len(), 3);
    assert!(t.groups.iter().all(|g| g.tiebreakers.is_empty()));
    assert_eq!(
        check_group_stage_complete(&t),
        Err(TournamentError::UnplayedTiebreakers)
    );

    let results: Vec<_> = created
        .iter()
        .map(|id| {
            let m = t.find_match(*id).unwrap();
            assert_eq!(m.round, RoundType::Tiebreaker);
            assert!(m.group_id.is_none());
            (m.id, m.team_a.id.clone())
        })
        .collect();
    for (id, winner) in results {
        update_match_winner(&mut t, id, &winner).unwrap();
    }
    for g in &t.groups {
        assert_eq!(compute_standings(g)[2].points, 1);
    }
    assert_eq!(check_group_stage_complete(&t), Ok(()));

    finish_group_stage_with_rng(&mut t, &mut StdRng::seed_from_u64(1)).unwrap();
    let in_bracket = |id: &str| {
        t.knockout_matches
            .iter()
            .any(|m| m.team_a.id == id || m.team_b.id == id)
    };
    assert!(in_bracket(thirds[2].as_str()));
    assert!(in_bracket(thirds[0].as_str()));
    assert!(!in_bracket(thirds[1].as_str()));
}

#[test]
fn tie_just_below_the_direct_places_blocks_a_trimmed_bracket() {
    // Group 1 ends 2 / 2 / 2 / 0: level between the second (direct) and third place.
    let mut t = drawn_tournament(12, 3);
    play_circular(&mut t, 0);
    play_in_order(&mut t, 1);
    play_in_order(&mut t, 2);
    let group_id = t.groups[0].id.clone();

    assert_eq!(
        check_group_stage_complete(&t),
        Err(TournamentError::TieAtCutoff { group_id })
    );
}

#[test]
fn cross_group_tiebreakers_need_known_teams_during_group_stage() {
    let mut t = drawn_tournament(12, 3);
    let a = t.groups[0].teams[0].id.clone();
    let b = t.groups[1].teams[0].id.clone();
    let before = t.clone();

    assert_eq!(
        create_cross_group_tiebreakers(&mut t, &[a.clone(), "ghost".to_string()]),
        Err(TournamentError::TeamNotFound("ghost".to_string()))
    );
    assert_eq!(
        create_cross_group_tiebreakers(&mut t, &[a.clone(), a.clone()]),
        Err(TournamentError::NotEnoughTiedTeams)
    );
    assert_eq!(t, before);

    let mut setup = Tournament::new("Club Cup", 4, 1);
    assert_eq!(
        create_cross_group_tiebreakers(&mut setup, &[a, b]),
        Err(TournamentError::InvalidState)
    );
}
