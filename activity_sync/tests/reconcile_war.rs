mod common;

use common::{assert_gap_complete, entry, fixed_now, member, war_member, war_snapshot};

use activity_sync::reconcile::reconcile;
use activity_sync::store::{EntryMetrics, HistoryStore, Stat};
use serde_json::json;

#[test]
fn first_war_pass_writes_real_entries() {
    let roster = vec![member("#P1", "Ann")];
    let snapshot = war_snapshot(
        "20240601",
        2,
        vec![war_member("#P1", "Ann", &[(2, 45.5)])],
    );

    let (store, report) = reconcile(HistoryStore::default(), &roster, &snapshot, 6, fixed_now());

    let e = entry(&store, "#P1", "20240601");
    assert_eq!(
        e.metrics,
        EntryMetrics::War {
            attacks_used: Stat::Count(1),
            stars_earned: Stat::Count(2),
            destruction: Stat::Amount(45.5),
        }
    );
    assert_eq!(e.attacks_missed, Some(1));
    assert!(e.participated);
    assert_eq!(store.last_updated, Some(fixed_now()));

    assert_eq!(report.members_updated, 1);
    assert_eq!(report.records_created, 1);
    insta::assert_snapshot!(
        report.to_string(),
        @"war 20240601: 1 updated, 0 placeholders, 1 new records"
    );
}

#[test]
fn reingesting_the_same_date_replaces_wholesale() {
    let roster = vec![member("#P1", "Ann")];
    let first = war_snapshot(
        "20240601",
        2,
        vec![war_member("#P1", "Ann", &[(2, 45.5)])],
    );
    let (store, _) = reconcile(HistoryStore::default(), &roster, &first, 6, fixed_now());

    // Corrected snapshot for the same war: the entry is replaced, not
    // appended, and no stale field survives.
    let corrected = war_snapshot(
        "20240601",
        2,
        vec![war_member("#P1", "Ann", &[(2, 45.5), (2, 54.5)])],
    );
    let (store, _) = reconcile(store, &roster, &corrected, 6, fixed_now());

    assert_eq!(store.records["#P1"].history.len(), 1);
    let e = entry(&store, "#P1", "20240601");
    assert_eq!(
        e.metrics,
        EntryMetrics::War {
            attacks_used: Stat::Count(2),
            stars_earned: Stat::Count(4),
            destruction: Stat::Amount(100.0),
        }
    );
    assert_eq!(e.attacks_missed, Some(0));
}

#[test]
fn reconciling_twice_is_idempotent() {
    let roster = vec![member("#P1", "Ann"), member("#P2", "Bob")];
    let snapshot = war_snapshot(
        "20240601",
        2,
        vec![war_member("#P1", "Ann", &[(3, 100.0)])],
    );

    let (once, _) = reconcile(HistoryStore::default(), &roster, &snapshot, 6, fixed_now());
    let (twice, report) = reconcile(once.clone(), &roster, &snapshot, 6, fixed_now());

    assert_eq!(once, twice);
    assert_eq!(report.placeholders_filled, 0);
}

#[test]
fn member_joining_later_gets_unpenalized_placeholders_for_old_wars() {
    // A war happens before #P4 joins.
    let early_roster = vec![member("#P1", "Ann")];
    let early = war_snapshot(
        "20240501",
        2,
        vec![war_member("#P1", "Ann", &[(1, 30.0)])],
    );
    let (store, _) = reconcile(HistoryStore::default(), &early_roster, &early, 6, fixed_now());

    // #P4 joins before the next war's pass.
    let late_roster = vec![member("#P1", "Ann"), member("#P4", "Dee")];
    let late = war_snapshot(
        "20240601",
        2,
        vec![
            war_member("#P1", "Ann", &[(2, 80.0)]),
            war_member("#P4", "Dee", &[(1, 50.0)]),
        ],
    );
    let (store, _) = reconcile(store, &late_roster, &late, 6, fixed_now());

    // The old war reads "no data", with no miss charged.
    let backfilled = entry(&store, "#P4", "20240501");
    assert_eq!(
        serde_json::to_value(backfilled).unwrap(),
        json!({
            "date": "20240501",
            "attacksUsed": "unavailable",
            "starsEarned": "unavailable",
            "destruction": "unavailable",
            "attacksMissed": 0,
            "participated": false
        })
    );
    assert_gap_complete(&store);
}

#[test]
fn departed_members_keep_their_history() {
    let roster = vec![member("#P1", "Ann"), member("#P2", "Bob")];
    let first = war_snapshot(
        "20240501",
        2,
        vec![
            war_member("#P1", "Ann", &[(2, 90.0)]),
            war_member("#P2", "Bob", &[(1, 40.0)]),
        ],
    );
    let (store, _) = reconcile(HistoryStore::default(), &roster, &first, 6, fixed_now());

    // #P2 leaves; the next war only has #P1.
    let reduced_roster = vec![member("#P1", "Ann")];
    let second = war_snapshot(
        "20240601",
        2,
        vec![war_member("#P1", "Ann", &[(3, 100.0)])],
    );
    let (store, _) = reconcile(store, &reduced_roster, &second, 6, fixed_now());

    let departed = &store.records["#P2"];
    assert_eq!(departed.history.len(), 2);
    // The real entry survives untouched...
    let old = entry(&store, "#P2", "20240501");
    assert_eq!(old.attacks_missed, Some(1));
    assert!(old.participated);
    // ...and the new date is only a placeholder.
    let filled = entry(&store, "#P2", "20240601");
    assert!(!filled.participated);
    assert_eq!(filled.attacks_missed, Some(0));
}

#[test]
fn snapshot_participant_outside_roster_still_gets_a_record() {
    // #P3 already left the roster but fought in the war.
    let roster = vec![member("#P1", "Ann")];
    let snapshot = war_snapshot(
        "20240601",
        2,
        vec![
            war_member("#P1", "Ann", &[(2, 70.0)]),
            war_member("#P3", "Cy", &[(1, 25.0)]),
        ],
    );

    let (store, report) = reconcile(HistoryStore::default(), &roster, &snapshot, 6, fixed_now());

    assert_eq!(report.records_created, 2);
    let e = entry(&store, "#P3", "20240601");
    assert!(e.participated);
    assert_gap_complete(&store);
}

#[test]
fn histories_stay_sorted_across_passes() {
    let roster = vec![member("#P1", "Ann"), member("#P2", "Bob")];

    let mut store = HistoryStore::default();
    for date in ["20240401", "20240501", "20240601"] {
        let snapshot = war_snapshot(date, 2, vec![war_member("#P1", "Ann", &[(1, 50.0)])]);
        (store, _) = reconcile(store, &roster, &snapshot, 6, fixed_now());
    }

    assert_gap_complete(&store);
    let dates: Vec<String> = store.records["#P2"]
        .history
        .iter()
        .map(|e| e.date.to_string())
        .collect();
    assert_eq!(dates, ["20240401", "20240501", "20240601"]);
}
