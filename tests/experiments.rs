//! Every experiment kind driven through the public API

use labsim::prelude::*;
use labsim::projection::FALLBACK_MESH;

const FRAME: f32 = 1.0 / 60.0;

fn run(session: &mut Session, frames: usize) {
    for _ in 0..frames {
        session.tick(FRAME).unwrap();
    }
}

#[test]
fn every_kind_launches_and_ticks() {
    for &kind in ExperimentKind::ALL {
        let mut session = registry()
            .launch(kind, &ExperimentParams::new())
            .unwrap_or_else(|e| panic!("{} failed to launch: {}", kind, e));
        assert_eq!(session.kind(), kind);
        assert!(!session.store().is_empty(), "{} created no entities", kind);

        session.signal(ControlSignal::Start).unwrap();
        run(&mut session, 600);

        for view in session.projection().snapshot().unwrap() {
            let p = view.position;
            assert!(
                p.x.is_finite() && p.y.is_finite() && p.z.is_finite(),
                "{}: {} at {:?}",
                kind,
                view.name,
                p
            );
        }
        session.dispose();
    }
}

#[test]
fn ids_and_aliases_resolve_to_registered_kinds() {
    for id in ["pendulum", "reaction", "time_meas", "com", "equilibrium", "principle_moments"] {
        let kind: ExperimentKind = id.parse().unwrap();
        assert!(registry().is_registered(kind));
    }
    assert_eq!(
        "quantum".parse::<ExperimentKind>().err(),
        Some(LabError::UnknownKind("quantum".into()))
    );
}

#[test]
fn unregistered_kind_creates_nothing() {
    let empty = Registry::new();
    let result = empty.launch(ExperimentKind::Dna, &ExperimentParams::new());
    assert!(matches!(result, Err(LabError::UnknownKind(ref id)) if id == "dna"));
}

#[test]
fn fixed_timestep_is_independent_of_frame_pacing() {
    let settings = SessionSettings::new().with_fixed_timestep(Some(0.125));
    let mut coarse = registry()
        .instantiate_with(ExperimentKind::Pendulum, &ExperimentParams::new(), settings.clone())
        .unwrap();
    let mut fine = registry()
        .instantiate_with(ExperimentKind::Pendulum, &ExperimentParams::new(), settings)
        .unwrap();
    coarse.setup().unwrap();
    fine.setup().unwrap();

    for _ in 0..4 {
        coarse.tick(0.5).unwrap();
    }
    for _ in 0..16 {
        fine.tick(0.125).unwrap();
    }

    assert_eq!(coarse.step_count(), 16);
    assert_eq!(fine.step_count(), 16);
    assert_eq!(coarse.reading("angle"), fine.reading("angle"));
}

#[test]
fn melting_phase_matches_across_step_sizes() {
    use labsim::experiments::separation::{MeltingBoiling, Phase};

    let phase = |dt: f32, frames: usize| {
        let mut session = registry()
            .launch(ExperimentKind::MeltingBoiling, &ExperimentParams::new())
            .unwrap();
        for _ in 0..frames {
            session.tick(dt).unwrap();
        }
        session.experiment::<MeltingBoiling>().unwrap().phase
    };

    assert_eq!(phase(0.5, 19), Phase::Solid);
    assert_eq!(phase(0.05, 190), Phase::Solid);
    assert_eq!(phase(0.5, 21), Phase::Liquid);
    assert_eq!(phase(0.05, 210), Phase::Liquid);
}

#[test]
fn melting_matches_for_coarse_and_fine_steps() {
    use labsim::experiments::separation::{MeltingBoiling, Phase};

    let heat = |dt: f32, steps: usize| {
        let mut session = labsim::launch(ExperimentKind::MeltingBoiling).unwrap();
        for _ in 0..steps {
            session.tick(dt).unwrap();
        }
        let state = session.experiment::<MeltingBoiling>().unwrap();
        (state.phase, state.temperature)
    };

    // Exactly 50 degrees after 10s: not yet above the melting point
    let (coarse, coarse_temp) = heat(1.0, 10);
    let (fine, fine_temp) = heat(0.1, 100);
    assert_eq!(coarse, Phase::Solid);
    assert_eq!(coarse, fine);
    assert!((coarse_temp - fine_temp).abs() < 1e-3);

    assert_eq!(heat(1.0, 11).0, Phase::Liquid);
    assert_eq!(heat(0.1, 110).0, Phase::Liquid);
}

type Frame = Vec<(String, Color, cgmath::Matrix4<f32>, bool)>;

fn frame(session: &Session) -> Frame {
    session
        .projection()
        .snapshot()
        .unwrap()
        .into_iter()
        .map(|view| (view.name.to_string(), view.color, view.world_transform, view.enabled))
        .collect()
}

#[test]
fn completed_accumulators_freeze_their_visuals() {
    // Kind and seconds until its accumulator reaches 1 at the default rate
    let kinds = [
        (ExperimentKind::ChemistryMix, 2.0),
        (ExperimentKind::Titration, 5.0),
        (ExperimentKind::Diffusion, 10.0),
        (ExperimentKind::Evaporation, 10.0),
        (ExperimentKind::Co2Test, 10.0),
        (ExperimentKind::Indicators, 5.0),
        (ExperimentKind::Solvent, 5.0),
        (ExperimentKind::WaterFiltration, 10.0),
    ];

    for (kind, seconds) in kinds {
        let mut session = labsim::launch(kind).unwrap();
        let start = frame(&session);

        run(&mut session, (seconds * 30.0) as usize);
        let halfway = frame(&session);
        assert_ne!(halfway, start, "{} never moved", kind);

        run(&mut session, (seconds * 30.0) as usize + 60);
        let done = frame(&session);
        match session.reading("progress") {
            Some(progress) => assert_eq!(progress, 1.0, "{}", kind),
            None => assert_eq!(session.reading("undissolved"), Some(0.0)),
        }

        run(&mut session, 600);
        assert_eq!(frame(&session), done, "{} changed after completing", kind);
    }
}

#[test]
fn stopwatch_follows_host_signals() {
    let mut session = labsim::launch(ExperimentKind::TimeMeasurement).unwrap();
    run(&mut session, 60);
    assert_eq!(session.reading("elapsed"), Some(0.0));

    assert!(session.signal(ControlSignal::Start).unwrap());
    session.tick(2.0).unwrap();
    assert!(session.signal(ControlSignal::Stop).unwrap());
    session.tick(2.0).unwrap();

    assert_eq!(session.reading("elapsed"), Some(2.0));
    let hand = session.store().get("hand").unwrap();
    assert_eq!(hand.transform.rotation.z, -12.0);
}

#[test]
fn signals_ignored_by_static_kinds() {
    let mut session = labsim::launch(ExperimentKind::Filtration).unwrap();
    assert!(!session.signal(ControlSignal::Start).unwrap());
}

#[test]
fn free_fall_lands_on_the_floor() {
    let mut session = labsim::launch(ExperimentKind::FreeFall).unwrap();
    session.signal(ControlSignal::Start).unwrap();
    run(&mut session, 120);

    let ball = session.store().handle("ball").unwrap();
    assert_eq!(session.store().world_position(ball).unwrap().y, 2.0);
    let fall_time = session.reading("fall_time").unwrap();
    assert!((fall_time - 1.2771).abs() < 1e-3);
}

#[test]
fn paused_session_keeps_its_visuals() {
    let mut session = labsim::launch(ExperimentKind::SolarSystem).unwrap();
    run(&mut session, 30);
    session.set_running(false).unwrap();
    let before: Vec<_> = session
        .projection()
        .snapshot()
        .unwrap()
        .into_iter()
        .map(|view| view.world_transform)
        .collect();

    run(&mut session, 30);
    let after: Vec<_> = session
        .projection()
        .snapshot()
        .unwrap()
        .into_iter()
        .map(|view| view.world_transform)
        .collect();
    assert_eq!(before, after);
    assert_eq!(session.state(), SessionState::Paused);
}

#[test]
fn disabled_entities_are_not_instanced() {
    let mut session = labsim::launch(ExperimentKind::ChemicalReaction).unwrap();
    // Two seconds to bring the beakers together, then the second pours out
    run(&mut session, 180);

    let views = session.projection().snapshot().unwrap();
    let reactant2 = views.iter().find(|v| v.name == "reactant2").unwrap();
    assert!(!reactant2.enabled);

    let visible = views
        .iter()
        .filter(|v| v.enabled && *v.model != Model::Empty)
        .count();
    assert_eq!(session.projection().instances().unwrap().len(), visible);
}

#[test]
fn assets_fall_back_to_cube() {
    let session = labsim::launch(ExperimentKind::Titration).unwrap();
    let meshes: &[&str] = &["cube", "sphere", "cylinder", "cone", "beaker"];
    let views = session.projection().snapshot().unwrap();

    let flask = views.iter().find(|v| v.name == "beaker").unwrap();
    assert_eq!(flask.model, &Model::asset("flask"));
    assert_eq!(resolve_mesh(flask.model, meshes), MeshChoice::Fallback(FALLBACK_MESH));

    let fluid = views.iter().find(|v| v.name == "fluid").unwrap();
    assert_eq!(resolve_mesh(fluid.model, meshes), MeshChoice::Found("cube"));
}

#[test]
fn invalid_parameters_are_structured_errors() {
    let cases = [
        (ExperimentKind::Pendulum, "length", 0.0),
        (ExperimentKind::Circuit, "resistance", -5.0),
        (ExperimentKind::HookesLaw, "spring_constant", 0.0),
        (ExperimentKind::Cell, "seed", -1.0),
        (ExperimentKind::Atmosphere, "climb_rate", f32::INFINITY),
    ];
    for (kind, key, value) in cases {
        let params = ExperimentParams::new().with(key, value);
        match registry().instantiate(kind, &params) {
            Err(LabError::InvalidParameter { name, .. }) => assert_eq!(name, key),
            Err(other) => panic!("{}: unexpected error {}", kind, other),
            Ok(_) => panic!("{}: accepted {} = {}", kind, key, value),
        }
    }
}
