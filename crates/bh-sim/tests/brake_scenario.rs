//! Integration test: 2 cm pad, stop from 25 m/s at 3 m/s², then 10 s of free cooling.
//!
//! Checks:
//! - the braking phase ends within one step of V0/u and covers roughly V0²/(2u)
//! - the surface heats while braking and the whole pad cools afterwards
//! - cooling never raises the field maximum
//! - the two-pass scheme lands closer to a fine-step reference than Laasonen

use bh_core::numeric::{max_abs_diff, max_value};
use bh_sim::{
    ControllerState, Phase, PhaseController, SchemeType, SimError, SimOptions, SimProgress,
    SimRecord, ThermalParameters, run_sim, run_sim_with_progress,
};
use bh_solver::SolverError;
use uom::si::{length::meter, time::second};

fn run(params: &ThermalParameters, scheme: SchemeType) -> SimRecord {
    let opts = SimOptions {
        scheme,
        ..Default::default()
    };
    run_sim(params, &opts).expect("brake run")
}

#[test]
fn stop_time_and_distance_match_kinematics() {
    let params = ThermalParameters::default();
    let dt = params.time_step();
    assert!((dt - 0.16).abs() < 1e-12);

    for scheme in SchemeType::ALL {
        let rec = run(&params, scheme);
        let ideal_stop = params.ideal_stop_time().unwrap().get::<second>();
        let ideal_distance = params.ideal_stop_distance().unwrap().get::<meter>();
        assert!((ideal_distance - 625.0 / 6.0).abs() < 1e-9);

        assert!(rec.stop_time_s >= ideal_stop);
        assert!(
            rec.stop_time_s - ideal_stop < dt,
            "stop_time {} not within one step of {ideal_stop}",
            rec.stop_time_s
        );
        assert_eq!(rec.braking_steps, 53);
        assert!(
            (rec.braking_distance_m - ideal_distance).abs() < 25.0 * dt,
            "distance {} vs {ideal_distance}",
            rec.braking_distance_m
        );
        assert_eq!(rec.final_state.speed_m_per_s, 0.0);
        assert_eq!(rec.cooling_steps, 63);
    }
}

/// The maximum is not monotone over the whole stop: it peaks near 71.9 °C at about
/// 4.3 s, mid-stop, and sags as the friction heat falls off with speed. The same
/// holds at the much finer dt = 1.6e-4 s (71.2 °C at 4.2 s), so only the first half
/// of the stop is required to heat monotonically.
#[test]
fn concrete_pad_heats_then_cools() {
    let params = ThermalParameters::default();
    let rec = run(&params, SchemeType::Implicit);
    assert_eq!(rec.grid.points(), 11);

    let braking: Vec<f64> = rec
        .samples
        .iter()
        .filter(|s| s.phase == Phase::Braking)
        .map(|s| max_value(&s.temperature))
        .collect();
    let cooling: Vec<f64> = rec
        .samples
        .iter()
        .filter(|s| s.phase == Phase::Cooling)
        .map(|s| max_value(&s.temperature))
        .collect();
    assert!(!braking.is_empty() && !cooling.is_empty());

    // Surface heating outpaces conduction for the first half of the stop.
    let half_stop = 0.5 * rec.stop_time_s;
    let early: Vec<f64> = rec
        .samples
        .iter()
        .filter(|s| s.phase == Phase::Braking && s.time_s <= half_stop)
        .map(|s| max_value(&s.temperature))
        .collect();
    assert!(early.len() > 10);
    for w in early.windows(2) {
        assert!(w[1] > w[0], "max temperature fell early in braking: {w:?}");
    }
    assert!(rec.peak_time_s > 0.0 && rec.peak_time_s < rec.stop_time_s);
    assert!(rec.peak_temp_c > 25.0 + 30.0);

    assert!(cooling[0] < *braking.last().unwrap());
    for w in cooling.windows(2) {
        assert!(w[1] < w[0], "max temperature rose while cooling: {w:?}");
    }

    let final_max = rec.final_max_temp_c();
    assert!(final_max > 25.0);
    assert!(final_max < rec.peak_temp_c);
}

#[test]
fn sample_times_strictly_increase_and_speed_is_clamped() {
    let params = ThermalParameters::default();
    for interval in [0.05, 0.1, 0.5, 1.0] {
        let opts = SimOptions {
            sample_interval_s: interval,
            ..Default::default()
        };
        let rec = run_sim(&params, &opts).unwrap();
        let times = rec.time_steps();
        for w in times.windows(2) {
            assert!(w[1] > w[0]);
        }
        for s in &rec.samples {
            assert_eq!(s.temperature.len(), 11);
            assert!(s.speed_m_per_s >= 0.0);
        }
        let speeds: Vec<f64> = rec.samples.iter().map(|s| s.speed_m_per_s).collect();
        for w in speeds.windows(2) {
            assert!(w[1] <= w[0]);
        }
        // Last braking step overshoots zero and is reported clamped.
        let last_braking = rec
            .samples
            .iter()
            .rev()
            .find(|s| s.phase == Phase::Braking);
        if let Some(s) = last_braking
            && (s.time_s - rec.stop_time_s).abs() < 1e-12
        {
            assert_eq!(s.speed_m_per_s, 0.0);
        }
    }
}

#[test]
fn sparse_sampling_records_one_snapshot_per_interval() {
    let params = ThermalParameters::default();
    let opts = SimOptions {
        sample_interval_s: 1.0,
        ..Default::default()
    };
    let rec = run_sim(&params, &opts).unwrap();
    let total = rec.final_state.time_s;
    // One sample at the first step, then one per whole second crossed.
    assert_eq!(rec.samples.len(), total.floor() as usize + 1);
}

#[test]
fn cooling_never_raises_the_maximum() {
    let params = ThermalParameters {
        ambient_temp_c: 15.0,
        ..Default::default()
    };
    let mut ctl = PhaseController::new(&params, SimOptions::default()).unwrap();
    while ctl.mode() == ControllerState::Braking {
        ctl.advance().unwrap();
    }
    let mut prev = ctl.state().max_temperature();
    assert!(prev > params.ambient_temp_c);
    let mut steps = 0;
    while ctl.mode() == ControllerState::Cooling {
        ctl.advance().unwrap();
        let now = ctl.state().max_temperature();
        assert!(now <= prev + 1e-12, "max rose from {prev} to {now}");
        prev = now;
        steps += 1;
    }
    assert_eq!(steps, 63);
    assert_eq!(ctl.mode(), ControllerState::Done);
}

#[test]
fn two_pass_beats_single_step_against_fine_reference() {
    let base = ThermalParameters::default();
    let reference = run(&base.clone().with_time_step(0.16 / 64.0), SchemeType::Implicit);

    let mut previous_gap = f64::INFINITY;
    for dt in [0.16, 0.08, 0.04] {
        let params = base.clone().with_time_step(dt);
        let single = run(&params, SchemeType::Implicit);
        let two = run(&params, SchemeType::TwoPass);

        let single_err = max_abs_diff(
            &single.final_state.temperature,
            &reference.final_state.temperature,
        )
        .unwrap();
        let two_err = max_abs_diff(
            &two.final_state.temperature,
            &reference.final_state.temperature,
        )
        .unwrap();
        assert!(
            two_err < single_err,
            "dt={dt}: two-pass error {two_err} not below single-step {single_err}"
        );

        let gap = max_abs_diff(&two.final_state.temperature, &single.final_state.temperature)
            .unwrap();
        assert!(gap < previous_gap, "schemes drifted apart at dt={dt}");
        previous_gap = gap;
    }
}

#[test]
fn uniform_pad_at_ambient_stays_put_without_braking() {
    let params = ThermalParameters {
        initial_speed_m_per_s: 0.0,
        initial_temp_c: 25.0,
        ambient_temp_c: 25.0,
        ..Default::default()
    };
    for scheme in SchemeType::ALL {
        let rec = run(&params, scheme);
        assert_eq!(rec.braking_steps, 0);
        assert_eq!(rec.stop_time_s, 0.0);
        assert_eq!(rec.braking_distance_m, 0.0);
        for v in &rec.final_state.temperature {
            assert!((v - 25.0).abs() < 1e-10);
        }
    }
}

#[test]
fn progress_is_reported_every_tenth_sample() {
    let params = ThermalParameters::default();
    let opts = SimOptions::default();
    let mut events = Vec::new();
    let rec = run_sim_with_progress(&params, &opts, &mut |p: &SimProgress| events.push(p.clone())).unwrap();

    assert_eq!(events.len(), rec.samples.len() / 10);
    for w in events.windows(2) {
        assert!(w[1].time_s > w[0].time_s);
        assert!(w[1].fraction_complete >= w[0].fraction_complete);
    }
    assert!(events.iter().all(|e| (0.0..=1.0).contains(&e.fraction_complete)));

    // Reporting is read-only: same answer without a callback.
    let quiet = run_sim(&params, &opts).unwrap();
    assert_eq!(quiet.final_state, rec.final_state);
}

#[test]
fn bad_configuration_is_rejected_before_stepping() {
    let params = ThermalParameters {
        diffusivity_m2_per_s: 0.0,
        ..Default::default()
    };
    let err = run_sim(&params, &SimOptions::default()).unwrap_err();
    assert!(err.to_string().contains("diffusivity_m2_per_s"));
}

#[test]
fn singular_pivot_aborts_with_phase_and_step() {
    let params = ThermalParameters {
        conductivity_w_per_m_k: 1e-300,
        ..Default::default()
    }
    .with_time_step(1e300);
    let err = run_sim(&params, &SimOptions::default()).unwrap_err();
    assert!(
        matches!(
            err,
            SimError::StepFailed {
                phase: Phase::Braking,
                step: 0,
                source: SolverError::SingularSystem { row: 10, .. },
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().contains("step 0"));
}
