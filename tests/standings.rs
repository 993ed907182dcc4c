//! Standings ranking and tie-break order.

mod common;

use std::collections::HashMap;

use common::{id, participant, History};
use league_server::engine::{
    aggregate_records, compose_standings, replay_ratings, season_participants, RatingPolicy,
    INITIAL_RATING,
};

fn names(rows: &[league_server::engine::StandingRow]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn ties_on_points_and_set_diff_are_broken_by_name() {
    // Alice and Bob both 1-0 with +2; Carol and Dave both 0-1 with -2.
    let history = History::new().game(1, 3, 3, 1).game(2, 4, 3, 1).build();
    let records = aggregate_records(&history);
    let ratings = replay_ratings(&history, &RatingPolicy::default());

    let forward = vec![
        participant(2, "Bob"),
        participant(4, "Dave"),
        participant(1, "Alice"),
        participant(3, "Carol"),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let a = compose_standings(&forward, &ratings, &records);
    let b = compose_standings(&reversed, &ratings, &records);
    assert_eq!(names(&a), ["Alice", "Bob", "Carol", "Dave"]);
    assert_eq!(a, b);
}

#[test]
fn points_rank_before_set_difference() {
    // Bob: two narrow wins. Alice: one big win, one loss.
    let history = History::new()
        .game(2, 3, 3, 2)
        .game(2, 4, 3, 2)
        .game(1, 3, 9, 0)
        .game(4, 1, 3, 2)
        .build();
    let records = aggregate_records(&history);
    let players = [
        participant(1, "Alice"),
        participant(2, "Bob"),
        participant(3, "Carol"),
        participant(4, "Dave"),
    ];

    let rows = compose_standings(&players, &HashMap::new(), &records);
    assert_eq!(rows[0].name, "Bob");
    assert_eq!(rows[0].points, 4);
    assert_eq!(rows[1].name, "Alice");
    assert!(rows[1].set_diff > rows[0].set_diff);
}

#[test]
fn set_difference_breaks_equal_points() {
    let history = History::new().game(1, 3, 3, 2).game(2, 4, 3, 0).build();
    let records = aggregate_records(&history);
    let players = [
        participant(1, "Alice"),
        participant(2, "Bob"),
        participant(3, "Carol"),
        participant(4, "Dave"),
    ];

    let rows = compose_standings(&players, &HashMap::new(), &records);
    assert_eq!(names(&rows), ["Bob", "Alice", "Carol", "Dave"]);
}

#[test]
fn rows_merge_rating_and_record() {
    let history = History::new().wins(1, 2, 3).build();
    let records = aggregate_records(&history);
    let ratings = replay_ratings(&history, &RatingPolicy::default());
    let players = [participant(1, "Alice"), participant(2, "Bob")];

    let rows = compose_standings(&players, &ratings, &records);
    let alice = &rows[0];
    assert_eq!(alice.participant_id, id(1));
    assert_eq!((alice.wins, alice.losses), (3, 0));
    assert_eq!((alice.sets_won, alice.sets_lost, alice.set_diff), (9, 3, 6));
    assert_eq!(alice.points, 6);
    assert_eq!(alice.winning_streak, 3);
    assert_eq!(alice.current_rating, ratings[&id(1)].rating);
    assert!(alice.is_provisional);
}

#[test]
fn participants_without_matches_get_seed_rows() {
    let history = History::new().wins(1, 2, 1).build();
    let records = aggregate_records(&history);
    let players = [
        participant(1, "Alice"),
        participant(2, "Bob"),
        participant(3, "Zed"),
    ];

    let rows = compose_standings(&players, &HashMap::new(), &records);
    assert_eq!(rows.len(), 3);
    let zed = rows.iter().find(|r| r.name == "Zed").unwrap();
    assert_eq!((zed.wins, zed.losses, zed.points), (0, 0, 0));
    assert_eq!(zed.current_rating, INITIAL_RATING);
    assert!(zed.is_provisional);
    // 0 points, 0 diff ranks above Bob's 0 points, -2 diff.
    assert_eq!(names(&rows), ["Alice", "Zed", "Bob"]);
}

#[test]
fn season_table_lists_only_season_members() {
    let league = [
        participant(1, "Alice"),
        participant(2, "Bob"),
        participant(3, "Carol"),
        participant(4, "Dave"),
    ];
    // Alice and Bob played; Carol only has a fixture left; Dave sat out.
    let season = History::new().wins(1, 2, 2).build();
    let fixtures = [common::fixture(1, 3, 1)];

    let members = season_participants(&league, &season, &fixtures);
    let ids: Vec<_> = members.iter().map(|p| p.id).collect();
    assert_eq!(ids, [id(1), id(2), id(3)]);

    let rows = compose_standings(&members, &HashMap::new(), &aggregate_records(&season));
    // Carol's empty record ranks above Bob's losses; Dave is absent.
    assert_eq!(names(&rows), ["Alice", "Carol", "Bob"]);
}
