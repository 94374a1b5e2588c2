//! End-to-end behaviour of the energy balance model.
//!
//! These tests check the properties that make the model interesting:
//! - Warming then cooling along the same CO2 path does not return the planet to where it started
//! - At the same emissivity the rising and falling runs sit on different branches
//! - Fast responses follow the equilibrium, slow ones lag behind it

use approx::assert_relative_eq;
use rsebm_components::energy_balance::{EnergyBalanceComponent, EnergyBalanceParameters};
use rsebm_components::equilibrium::{
    compute_tipping_line, equilibrium_temperatures, net_radiation,
};
use rsebm_components::feedback::ForcingDirection;
use rsebm_components::parameters::TemperatureRange;
use rsebm_components::sweep::{run_sweep, SweepRequest};
use rsebm_core::constants::PhysicalConstants;
use rsebm_core::ivp::SolverOptions;
use rsebm_core::timeseries::{linspace, TemperatureSeries};

fn integrate(
    response_rate: f64,
    direction: ForcingDirection,
    initial_temperature: f64,
    horizon: f64,
    n_points: usize,
) -> TemperatureSeries {
    let component = EnergyBalanceComponent::from_parameters(
        EnergyBalanceParameters {
            response_rate,
            direction,
        },
        PhysicalConstants::default(),
    )
    .unwrap();
    let time = linspace(0.0, horizon, n_points).unwrap().to_vec();
    component.integrate(initial_temperature, &time).unwrap()
}

mod hysteresis {
    use super::*;

    /// Warm the planet with rising CO2, then cool it again from wherever it ended up.
    #[test]
    fn test_round_trip_does_not_return() {
        let rising = integrate(1.0, ForcingDirection::Rising, 237.0, 3.5, 71);
        let (_, warm) = rising.last();
        // Past t = 2.5 the cold branch no longer exists
        assert!(warm > 255.0, "rising run should leave the cold branch, got {}", warm);

        let falling = integrate(1.0, ForcingDirection::Falling, warm, 8.0, 161);
        assert_eq!(falling.first().1, warm);
        let (_, cold) = falling.last();
        assert!(cold < 240.0, "falling run should end cold, got {}", cold);
        assert!(
            (cold - 237.0).abs() > 5.0,
            "round trip returned to the start: {}",
            cold
        );
    }

    /// Both ramps pass through e = 0.5, inside the bistable band.
    #[test]
    fn test_branches_differ_at_equal_emissivity() {
        let rising = integrate(1.0, ForcingDirection::Rising, 237.0, 3.5, 71);
        let warm_start = rising.last().1;
        let falling = integrate(1.0, ForcingDirection::Falling, warm_start, 8.0, 161);

        // Rising reaches e = 0.5 at t = 1.5, falling at t = 4.0
        let (t_rising, cold_branch) = rising.iter().nth(30).unwrap();
        let (t_falling, warm_branch) = falling.iter().nth(80).unwrap();
        assert_relative_eq!(ForcingDirection::Rising.emissivity(t_rising), 0.5, epsilon = 1e-9);
        assert_relative_eq!(ForcingDirection::Falling.emissivity(t_falling), 0.5, epsilon = 1e-9);

        assert!(cold_branch < 260.0, "rising run at e=0.5: {}", cold_branch);
        assert!(warm_branch > 290.0, "falling run at e=0.5: {}", warm_branch);
        assert!(warm_branch - cold_branch > 20.0);
    }
}

mod response_rate {
    use super::*;

    #[test]
    fn test_sweep_fast_rate_tracks_equilibrium() {
        let request = SweepRequest {
            horizon: 1.0,
            n_points: 21,
            ..SweepRequest::new(vec![500.0, 1.0], ForcingDirection::Falling)
        };
        let result = run_sweep(
            &request,
            &PhysicalConstants::default(),
            &SolverOptions::default(),
        )
        .unwrap();
        assert!(result.is_complete());

        let wide = TemperatureRange::new(200.0, 500.0, 301).unwrap();
        let target = equilibrium_temperatures(
            result.forcing[result.forcing.len() - 1],
            &wide,
            &PhysicalConstants::default(),
        )
        .unwrap();
        assert_eq!(target.len(), 1);

        let fast = result.runs[0].series().unwrap().last().1;
        let slow = result.runs[1].series().unwrap().last().1;
        assert_relative_eq!(fast, target[0], max_relative = 0.01);
        assert!((slow - target[0]).abs() / target[0] > 0.01);
    }

    #[test]
    fn test_output_matches_grid() {
        for rate in [1.0, 10.0, 500.0] {
            let series = integrate(rate, ForcingDirection::Rising, 237.0, 3.5, 200);
            assert_eq!(series.len(), 200);
            assert_eq!(series.first(), (0.0, 237.0));
        }
    }
}

mod equilibria {
    use super::*;

    /// Every point on the tipping line balances the radiation budget
    #[test]
    fn test_tipping_line_is_balanced() {
        let constants = PhysicalConstants::default();
        let curve = compute_tipping_line(&TemperatureRange::default(), &constants).unwrap();
        for (e, t) in curve.iter() {
            let absorbed = constants.solar;
            assert!(
                net_radiation(t, e, &constants).abs() < 1e-9 * absorbed,
                "imbalance at T={}",
                t
            );
        }
    }
}
