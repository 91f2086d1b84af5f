use star_swarm::consts::SIM_DT;
use star_swarm::sim::{
    Aabb, Bullet, BulletOwner, CombatEvent, Direction, Enemy, Formation, GameState, HitCause,
    Phase, Session, TickInput, tick,
};
use star_swarm::{GameRunner, ManualClock, MemoryStore, Tuning};

fn quiet() -> Tuning {
    Tuning {
        enemy_fire_chance: 0.0,
        ..Default::default()
    }
}

fn new_session(tuning: Tuning, store: &MemoryStore) -> (Session, ManualClock) {
    let clock = ManualClock::new(5_000);
    let session = Session::new(tuning, 2024, Box::new(clock.clone()), Box::new(store.clone()));
    (session, clock)
}

#[test]
fn full_run_menu_to_game_over_to_menu() {
    let store = MemoryStore::new(0.0);
    let (mut session, clock) = new_session(quiet(), &store);
    assert_eq!(session.phase(), Phase::Menu);

    session.start().unwrap();
    let py = session.player.bounds.y;
    let px = session.player.bounds.x;
    session.formation.enemies = vec![Enemy {
        bounds: Aabb::new(px, py, 40.0, 30.0),
        speed: 0.5,
        row: 0,
        col: 0,
    }];

    for _ in 0..3 {
        clock.advance(16);
        tick(&mut session, &TickInput::default());
    }
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.state.lives, 0);
    assert!(session.state.is_over);
    // Contact never removed the enemy
    assert_eq!(session.formation.len(), 1);

    session.return_to_menu().unwrap();
    let phases: Vec<(Phase, Phase)> = session
        .phases()
        .history()
        .iter()
        .map(|t| (t.from, t.to))
        .collect();
    assert_eq!(
        phases,
        vec![
            (Phase::Menu, Phase::Playing),
            (Phase::Playing, Phase::GameOver),
            (Phase::GameOver, Phase::Menu),
        ]
    );
    // Timestamps come from the injected clock
    assert_eq!(session.phases().history()[1].timestamp_ms, 5_048);
}

#[test]
fn scenario_first_kill_scores_five() {
    let store = MemoryStore::new(0.0);
    let (mut session, _clock) = new_session(quiet(), &store);
    session.start().unwrap();

    session.formation.enemies.truncate(2);
    let target = session.formation.enemies[0].bounds;
    session.bullets.push(Bullet {
        bounds: Aabb::new(target.x + 10.0, target.y + 20.0, 4.0, 10.0),
        speed: 7.0,
        direction: Direction::Up,
        owner: BulletOwner::Player,
    });

    let report = tick(&mut session, &TickInput::default());
    assert_eq!(
        report.events,
        vec![CombatEvent::Hit {
            points: 10.0,
            row: 0,
            col: 0
        }]
    );
    assert_eq!(session.state.consecutive_hits, 1);
    assert_eq!(session.state.multiplier(), 1);
    assert_eq!(session.state.score, 5.0);
    assert_eq!(store.value(), 5.0);
}

#[test]
fn clearing_wave_respawns_in_same_tick() {
    let store = MemoryStore::new(0.0);
    let (mut session, _clock) = new_session(quiet(), &store);
    session.start().unwrap();

    session.formation.enemies.truncate(1);
    let target = session.formation.enemies[0].bounds;
    session.bullets.push(Bullet {
        bounds: Aabb::new(target.x + 10.0, target.y + 20.0, 4.0, 10.0),
        speed: 7.0,
        direction: Direction::Up,
        owner: BulletOwner::Player,
    });

    let report = tick(&mut session, &TickInput::default());
    assert!(report.level_up);
    assert_eq!(session.state.level, 2);
    assert_eq!(session.formation.len(), 50);
    assert!(session.bullets.is_empty());
    assert_eq!(session.phase(), Phase::LevelComplete);
}

#[test]
fn enemy_shot_and_contact_in_one_tick_cost_two_lives() {
    let store = MemoryStore::new(0.0);
    let (mut session, _clock) = new_session(quiet(), &store);
    session.start().unwrap();

    let player = session.player.bounds;
    session.formation = Formation {
        enemies: vec![Enemy {
            bounds: Aabb::new(player.x, player.y, 40.0, 30.0),
            speed: 0.5,
            row: 0,
            col: 0,
        }],
        direction: 1.0,
    };
    session.bullets.push(Bullet {
        bounds: Aabb::new(player.center().x, player.y, 4.0, 10.0),
        speed: 4.0,
        direction: Direction::Down,
        owner: BulletOwner::Enemy,
    });

    let report = tick(&mut session, &TickInput::default());
    assert_eq!(
        report.events,
        vec![
            CombatEvent::PlayerHit {
                cause: HitCause::EnemyBullet
            },
            CombatEvent::PlayerHit {
                cause: HitCause::EnemyContact
            },
        ]
    );
    assert_eq!(session.state.lives, 1);
}

#[test]
fn runner_plays_a_deterministic_demo() {
    fn play(seed: u64) -> (GameState, usize) {
        let clock = ManualClock::new(0);
        let session = Session::new(
            Tuning::default(),
            seed,
            Box::new(clock.clone()),
            Box::new(MemoryStore::default()),
        );
        let mut runner = GameRunner::new(session);
        runner.set_autopilot(true);
        runner.start().unwrap();
        for _ in 0..(60 * 30) {
            clock.advance(16);
            runner.frame(SIM_DT);
        }
        let enemies = runner.snapshot().enemies.len();
        (runner.session().state.clone(), enemies)
    }

    let first = play(11);
    let second = play(11);
    assert_eq!(first, second);
    assert!(first.0.score > 0.0);
    assert!(first.0.high_score >= first.0.score);
}

#[test]
fn high_score_survives_sessions() {
    let store = MemoryStore::new(0.0);
    {
        let (mut session, _clock) = new_session(quiet(), &store);
        session.start().unwrap();
        session.formation.enemies.truncate(3);
        let target = session.formation.enemies[2].bounds;
        session.bullets.push(Bullet {
            bounds: Aabb::new(target.x + 10.0, target.y + 20.0, 4.0, 10.0),
            speed: 7.0,
            direction: Direction::Up,
            owner: BulletOwner::Player,
        });
        tick(&mut session, &TickInput::default());
        assert_eq!(session.state.high_score, 5.0);
    }

    let (session, _clock) = new_session(quiet(), &store);
    assert_eq!(session.state.high_score, 5.0);
    assert_eq!(session.hud().high_score, 5.0);
}
