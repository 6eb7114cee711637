use approx::assert_relative_eq;

use duel_bot::scanner::{scan, AngleRange};
use duel_bot::solver::{hit_tolerance, solve_player, solve_player_spread};
use duel_bot::strategy::{create_strategy, strategy_ids};
use duel_core::sim::{FlightOutcome, SimulationConfig};
use duel_core::{Field, Planet, Vec2};

fn open_range_field() -> Field {
    // Zero planets: the flight is a straight line at constant speed.
    let mut field = Field::new();
    field.upsert_player(1, Vec2::new(0.0, 0.0));
    field.upsert_player(2, Vec2::new(100.0, 0.0));
    field
}

#[test]
fn straight_line_duel_is_solved_from_the_seed() {
    let config = SimulationConfig::default();
    let field = open_range_field();

    for id in strategy_ids() {
        let strategy = create_strategy(id).unwrap();
        let solution = solve_player(&config, &field, 1, 2, strategy.as_ref(), 200).unwrap();

        assert_eq!(solution.objective, 0.0, "{id}");
        assert!(solution.hit, "{id}");
        assert_eq!(solution.outcome, FlightOutcome::HitPlayer(2), "{id}");
        // The bearing seed already points straight at the target.
        assert_relative_eq!(solution.angle, 90.0, epsilon = 1e-9);
        assert_relative_eq!(solution.launch_angle, 0.0, epsilon = 1e-9);

        // The winning path really does pass within the accept tolerance.
        let target = Vec2::new(100.0, 0.0);
        let closest = solution
            .path
            .iter()
            .map(|p| p.distance(target))
            .fold(f64::INFINITY, f64::min);
        assert!(closest <= hit_tolerance(&config), "{id}: {closest}");
    }
}

#[test]
fn full_sweep_finds_only_the_expected_bearing_band() {
    let config = SimulationConfig::default();
    let mut field = Field::new();
    field.upsert_player(1, Vec2::new(500.0, 500.0));
    field.upsert_player(2, Vec2::new(600.0, 500.0));
    let origin = Vec2::new(500.0, 500.0);

    // The opponent sits at compass bearing 90, 100 units out. At energy 10
    // the hit cone around the bearing is asin(3.2 / 100) ~ 1.8 degrees.
    let found = scan(
        &config,
        &field,
        1,
        origin,
        AngleRange::full_sweep(1.0),
        10.0,
    );
    let angle = found.expect("a reachable opponent must be found");
    assert!((angle - 90.0).abs() <= 2.0, "found {angle}");

    // Nothing before the band hits...
    assert_eq!(
        scan(
            &config,
            &field,
            1,
            origin,
            AngleRange {
                start: 0.0,
                stop: angle,
                step: 1.0
            },
            10.0
        ),
        None
    );
    // ...and nothing past it does either.
    assert_eq!(
        scan(
            &config,
            &field,
            1,
            origin,
            AngleRange {
                start: 92.0,
                stop: 360.0,
                step: 1.0
            },
            10.0
        ),
        None
    );
}

#[test]
fn sweep_never_reports_the_launcher_itself() {
    let config = SimulationConfig::default();
    let mut field = Field::new();
    // Alone on the field: every angle misses.
    field.upsert_player(1, Vec2::new(500.0, 500.0));
    assert_eq!(
        scan(
            &config,
            &field,
            1,
            Vec2::new(500.0, 500.0),
            AngleRange::full_sweep(5.0),
            10.0
        ),
        None
    );
}

#[test]
fn seed_spread_never_does_worse_than_the_single_seed() {
    let config = SimulationConfig::default();
    let mut field = Field::new();
    field.upsert_player(1, Vec2::new(300.0, 500.0));
    field.upsert_player(2, Vec2::new(1300.0, 500.0));
    // A fat planet sits on the direct line; the straight seed cannot win.
    field.set_planets(vec![Planet {
        id: 0,
        position: Vec2::new(800.0, 500.0),
        radius: 80.0,
        mass: 3.0e4,
    }]);

    let strategy = create_strategy("nelder-mead").unwrap();
    let single = solve_player(&config, &field, 1, 2, strategy.as_ref(), 150).unwrap();
    let spread = solve_player_spread(&config, &field, 1, 2, strategy.as_ref(), 150, 6).unwrap();

    // The spread includes the plain bearing seed, so it can only improve.
    assert!(spread.objective <= single.objective);
    assert!(spread.objective.is_finite());
}

#[test]
fn blocked_straight_seed_is_reported_not_crashed() {
    let config = SimulationConfig::default();
    let mut field = Field::new();
    field.upsert_player(1, Vec2::new(500.0, 500.0));
    field.upsert_player(2, Vec2::new(900.0, 500.0));
    // The launcher spawns inside a planet: every flight from here ends
    // immediately with an empty path and an infinite objective.
    field.set_planets(vec![Planet {
        id: 0,
        position: Vec2::new(500.0, 500.0),
        radius: 40.0,
        mass: 1.0e4,
    }]);

    let strategy = create_strategy("compass").unwrap();
    let solution = solve_player(&config, &field, 1, 2, strategy.as_ref(), 60).unwrap();
    assert!(!solution.hit);
    assert_eq!(solution.objective, f64::INFINITY);
    assert_eq!(solution.outcome, FlightOutcome::HitPlanet(0));
    assert!(solution.path.is_empty());
}
