//! The engine running against the SQLite adapter: the same coordination
//! guarantees the in-memory stores provide must hold on the persistent
//! backend.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use engine::{
    EngineConfig, EngineError, FineGoals, LineupGate, MatchupCoordinator, PairingAssignment,
    PairingScoreEntry, ResultAggregator, Stores,
};
use events::EventBus;
use league_core::{
    DayTime, DeadlineConfig, Fixture, FixtureId, Leg, Outcome, PlayerId, Round, RoundSchedule,
    RoundStatus, TeamId,
};
use store::{create_pool, run_migrations, SqliteStores};
use uuid::Uuid;

struct Harness {
    _dir: tempfile::TempDir,
    stores: Stores,
    gate: LineupGate,
    coordinator: MatchupCoordinator,
    results: ResultAggregator,
    fixture_id: FixtureId,
    home_team: TeamId,
    away_team: TeamId,
    home_squad: Vec<PlayerId>,
    away_squad: Vec<PlayerId>,
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, h, m, 0).unwrap()
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/league.db", dir.path().display());
    let pool = create_pool(&url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let stores = SqliteStores::new(pool).stores();

    let bus = EventBus::new();
    let config = EngineConfig::default();

    let schedule = RoundSchedule::new(
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        DeadlineConfig {
            utc_offset_minutes: 0,
            home_lineup: time(18, 0),
            away_lineup: time(20, 0),
            home_substitution: None,
            away_substitution: None,
            result_entry: DayTime::new(2, time(21, 0)),
        },
    )
    .unwrap();
    let mut round = Round::new(Uuid::new_v4(), 1, Leg::First).with_schedule(schedule);
    round.status = RoundStatus::Active;
    stores.rounds.upsert(&round).await.unwrap();

    let home_team = Uuid::new_v4();
    let away_team = Uuid::new_v4();
    let fixture = Fixture::new(round.id, 1, home_team, away_team);
    let fixture_id = fixture.id;
    stores.fixtures.insert_batch(&[fixture]).await.unwrap();

    Harness {
        _dir: dir,
        gate: LineupGate::new(stores.clone(), config.clone(), bus.clone()),
        coordinator: MatchupCoordinator::new(stores.clone(), config, bus.clone()),
        results: ResultAggregator::new(stores.clone(), bus),
        stores,
        fixture_id,
        home_team,
        away_team,
        home_squad: (0..6).map(|_| Uuid::new_v4()).collect(),
        away_squad: (0..6).map(|_| Uuid::new_v4()).collect(),
    }
}

impl Harness {
    async fn submit_both_lineups(&self) {
        for (team, squad) in [
            (self.home_team, &self.home_squad),
            (self.away_team, &self.away_squad),
        ] {
            self.gate
                .submit_lineup(
                    self.fixture_id,
                    team,
                    squad[..5].to_vec(),
                    squad[5..].to_vec(),
                    at(10, 10, 0),
                )
                .await
                .unwrap();
        }
    }

    fn assignments(&self) -> Vec<PairingAssignment> {
        self.home_squad[..5]
            .iter()
            .zip(self.away_squad[..5].iter())
            .map(|(h, a)| PairingAssignment {
                home_player: *h,
                away_player: *a,
                duration_minutes: None,
            })
            .collect()
    }
}

#[tokio::test]
async fn test_creation_is_exclusive_on_sqlite() {
    let h = harness().await;
    h.submit_both_lineups().await;

    h.coordinator
        .create_matchups(h.fixture_id, h.home_team, h.assignments(), at(10, 17, 0))
        .await
        .unwrap();

    let err = h
        .coordinator
        .create_matchups(h.fixture_id, h.away_team, h.assignments(), at(10, 19, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_full_flow_persists_across_reads() {
    let h = harness().await;
    h.submit_both_lineups().await;

    h.coordinator
        .create_matchups(h.fixture_id, h.home_team, h.assignments(), at(10, 17, 0))
        .await
        .unwrap();

    // Creator edits during the late-entry window; the version advances.
    let set = h
        .coordinator
        .swap_away_players(h.fixture_id, h.home_team, 1, 2, at(10, 19, 0))
        .await
        .unwrap();
    assert_eq!(set.version, 2);

    let scores: Vec<PairingScoreEntry> = (0..5u32)
        .map(|idx| PairingScoreEntry {
            position: idx + 1,
            home_goals: if idx == 0 { 2 } else { 0 },
            away_goals: 0,
        })
        .collect();
    let result = h
        .results
        .enter_results(
            h.fixture_id,
            h.away_team,
            scores,
            FineGoals::default(),
            Some(h.home_squad[0]),
            at(11, 12, 0),
        )
        .await
        .unwrap();
    assert_eq!(result.outcome, Outcome::HomeWin);

    let fixture = h.stores.fixtures.get(h.fixture_id).await.unwrap().unwrap();
    assert!(fixture.is_completed());
    assert_eq!(fixture.home_score, Some(2));
    assert_eq!(fixture.result_entered_by, Some(h.away_team));
}
