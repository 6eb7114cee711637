use approx::assert_relative_eq;

use super::*;
use crate::field::{Planet, Player};

fn planet(id: u32, x: f64, y: f64, radius: f64, mass: f64) -> Planet {
    Planet {
        id,
        position: Vec2::new(x, y),
        radius,
        mass,
    }
}

fn player(id: u32, x: f64, y: f64) -> Player {
    Player {
        id,
        position: Vec2::new(x, y),
    }
}

fn field_with(planets: Vec<Planet>, players: Vec<Player>) -> Field {
    let mut field = Field::new();
    field.set_planets(planets);
    for p in players {
        field.upsert_player(p.id, p.position);
    }
    field
}

#[test]
fn identical_inputs_give_identical_flights() {
    let config = SimulationConfig::default();
    let field = field_with(
        vec![planet(0, 700.0, 620.0, 40.0, 9.0e4)],
        vec![player(1, 400.0, 500.0), player(2, 1100.0, 480.0)],
    );
    let aim = Aim::from_compass(93.5, 11.25);
    let origin = Vec2::new(400.0, 500.0);

    let a = simulate(&config, &field, 1, origin, aim);
    let b = simulate(&config, &field, 1, origin, aim);
    assert_eq!(a, b);
}

#[test]
fn zero_energy_without_planets_runs_out_of_segments() {
    let config = SimulationConfig::default();
    let field = field_with(Vec::new(), vec![player(1, 400.0, 500.0)]);
    let flight = simulate(
        &config,
        &field,
        1,
        Vec2::new(400.0, 500.0),
        Aim::from_compass(0.0, 0.0),
    );

    assert_eq!(flight.outcome, FlightOutcome::OutOfSegments);
    assert_eq!(flight.path.len(), config.max_segments);
    // The missile never moves.
    assert_eq!(flight.path[0], Vec2::new(400.0, 500.0));
    assert_eq!(*flight.path.last().unwrap(), Vec2::new(400.0, 500.0));
}

#[test]
fn straight_flight_exits_the_field() {
    let config = SimulationConfig::default();
    let field = field_with(Vec::new(), vec![player(1, 1700.0, 530.0)]);
    let flight = simulate(
        &config,
        &field,
        1,
        Vec2::new(1700.0, 530.0),
        Aim::from_compass(90.0, 20.0),
    );

    assert_eq!(flight.outcome, FlightOutcome::OutOfBounds);
    // Every recorded position is still inside the tolerated rectangle.
    let last = flight.path.last().unwrap();
    assert!(last.x <= config.battlefield_w + config.margin);
}

#[test]
fn planet_between_launcher_and_target_blocks_the_straight_shot() {
    let config = SimulationConfig::default();
    let field = field_with(
        vec![planet(3, 500.0, 500.0, 50.0, 5.0e4)],
        vec![player(1, 200.0, 500.0), player(2, 800.0, 500.0)],
    );
    let flight = simulate(
        &config,
        &field,
        1,
        Vec2::new(200.0, 500.0),
        Aim::from_compass(90.0, 10.0),
    );

    assert_eq!(flight.outcome, FlightOutcome::HitPlanet(3));
}

#[test]
fn planet_surface_beats_player_behind_it() {
    // The player sits inside the planet's gravity well, just past the
    // surface along the flight line. The missile crosses the surface first
    // and must never travel on to the player.
    let config = SimulationConfig::default();
    let field = field_with(
        vec![planet(0, 300.0, 500.0, 30.0, 0.0)],
        vec![player(1, 200.0, 500.0), player(2, 280.0, 500.0)],
    );
    let flight = simulate(
        &config,
        &field,
        1,
        Vec2::new(200.0, 500.0),
        Aim::from_compass(90.0, 10.0),
    );

    assert_eq!(flight.outcome, FlightOutcome::HitPlanet(0));
}

#[test]
fn launcher_is_immune_at_spawn() {
    let config = SimulationConfig::default();
    let field = field_with(
        Vec::new(),
        vec![player(1, 500.0, 500.0), player(2, 1200.0, 500.0)],
    );
    let flight = simulate(
        &config,
        &field,
        1,
        Vec2::new(500.0, 500.0),
        Aim::from_compass(90.0, 10.0),
    );

    // The missile starts at distance zero from its launcher and still must
    // not self-hit; it flies on and takes the opponent.
    assert_eq!(flight.outcome, FlightOutcome::HitPlayer(2));
}

#[test]
fn bystander_inside_the_muzzle_zone_is_passed_through() {
    // A player parked within one unit of the launcher is cleared before
    // left_source can latch, so the missile never registers the overlap.
    // Preserved quirk of the asymmetric self-collision rule.
    let config = SimulationConfig::default();
    let field = field_with(
        Vec::new(),
        vec![
            player(1, 500.0, 500.0),
            player(2, 500.5, 500.0),
            player(3, 1200.0, 500.0),
        ],
    );
    let flight = simulate(
        &config,
        &field,
        1,
        Vec2::new(500.0, 500.0),
        Aim::from_compass(90.0, 10.0),
    );

    assert_eq!(flight.outcome, FlightOutcome::HitPlayer(3));
}

#[test]
fn returning_missile_may_hit_its_own_launcher() {
    // A heavy planet behind the launcher drags a weak shot back through the
    // launch point. Once the missile has left the source it is a valid
    // target again.
    let config = SimulationConfig::default();
    let field = field_with(
        vec![planet(0, 400.0, 500.0, 5.0, 2.0e4)],
        vec![player(1, 500.0, 500.0)],
    );
    let flight = simulate(
        &config,
        &field,
        1,
        Vec2::new(500.0, 500.0),
        Aim::from_compass(90.0, 5.0),
    );

    assert_eq!(flight.outcome, FlightOutcome::HitPlayer(1));
}

#[test]
fn missile_coincident_with_planet_center_is_an_immediate_hit() {
    // Distance zero must resolve through the radius test, never reach the
    // 1/d^2 normalization.
    let config = SimulationConfig::default();
    let field = field_with(
        vec![planet(4, 500.0, 500.0, 0.0, 1.0e6)],
        vec![player(1, 500.0, 500.0)],
    );
    let flight = simulate(
        &config,
        &field,
        1,
        Vec2::new(500.0, 500.0),
        Aim::from_compass(45.0, 10.0),
    );

    assert_eq!(flight.outcome, FlightOutcome::HitPlanet(4));
    assert!(flight.path.is_empty());
}

#[test]
fn gravity_deflects_the_flight_toward_the_planet() {
    let config = SimulationConfig::default();
    let origin = Vec2::new(400.0, 500.0);
    let aim = Aim::from_compass(90.0, 15.0);

    let empty = field_with(Vec::new(), vec![player(1, 400.0, 500.0)]);
    let straight = simulate(&config, &empty, 1, origin, aim);
    assert!(straight.path.iter().all(|p| p.y == 500.0));

    let with_planet = field_with(
        vec![planet(0, 700.0, 800.0, 20.0, 5.0e4)],
        vec![player(1, 400.0, 500.0)],
    );
    let bent = simulate(&config, &with_planet, 1, origin, aim);
    assert!(bent.path.iter().any(|p| p.y > 500.0));
}

#[test]
fn closest_approach_of_empty_path_is_infinite() {
    let flight = Flight {
        outcome: FlightOutcome::HitPlanet(0),
        path: Vec::new(),
    };
    assert_eq!(flight.closest_approach(Vec2::ZERO), f64::INFINITY);
}

#[test]
fn area_derivation_matches_the_fixed_aspect() {
    let config = SimulationConfig::from_area(2.0e6);
    assert_relative_eq!(config.battlefield_w, 1885.618, epsilon = 1e-3);
    assert_relative_eq!(config.battlefield_h, 1060.660, epsilon = 1e-3);
    assert_relative_eq!(
        config.battlefield_w * config.battlefield_h,
        2.0e6,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        config.battlefield_w / config.battlefield_h,
        16.0 / 9.0,
        epsilon = 1e-12
    );
}

#[test]
fn aim_velocity_follows_the_launch_convention() {
    // Launch angle 0 fires along +x, 90 fires up (-y).
    let right = Aim::new(0.0, 10.0).velocity();
    assert_relative_eq!(right.x, 10.0, epsilon = 1e-12);
    assert_relative_eq!(right.y, 0.0, epsilon = 1e-12);

    let up = Aim::new(90.0, 10.0).velocity();
    assert_relative_eq!(up.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(up.y, -10.0, epsilon = 1e-9);

    // Compass 90 (device "right") lands on launch 0.
    let compass_right = Aim::from_compass(90.0, 10.0);
    assert_relative_eq!(compass_right.angle, 0.0, epsilon = 1e-12);
}
