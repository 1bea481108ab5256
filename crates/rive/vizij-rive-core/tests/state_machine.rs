mod common;

use std::sync::Arc;

use common::{approx, deterministic_config, import_doc, import_fixture, seeded_config};
use vizij_rive_core::state_machine::{LayerStateFlags, TransitionFlags};
use vizij_rive_core::{
    Artboard, Config, CoreEvent, Features, File, Inputs, PlayerCommand, PlayerId, PropertyTarget,
    StateMachineInstance,
};
use vizij_test_fixtures::riv::{ArtboardDocument, Record, RivDocument};

const BODY: u32 = 1;

fn character() -> Artboard {
    import_fixture("state-machine")
        .artboard_instance("Character")
        .unwrap()
}

fn step(artboard: &mut Artboard, dt: f32) -> Vec<CoreEvent> {
    artboard.update(dt, &Inputs::new()).events.clone()
}

fn changes(events: &[CoreEvent]) -> Vec<(usize, usize)> {
    events
        .iter()
        .filter_map(|e| match e {
            CoreEvent::StateChanged { layer, state, .. } => Some((*layer, *state)),
            _ => None,
        })
        .collect()
}

fn x_of(artboard: &Artboard, id: u32) -> f32 {
    artboard.property(id, 13).and_then(|v| v.as_double()).unwrap()
}

fn instance(artboard: &Artboard, player: PlayerId) -> &StateMachineInstance {
    artboard.state_machine_instance(player).unwrap()
}

// ----- document builders -----

fn animation(name: &str, to: f32) -> Record {
    Record::new(31)
        .string(55, name)
        .uint(56, 10)
        .uint(57, 10)
        .uint(59, 1)
        .child(
            Record::new(25).uint(51, BODY).child(
                Record::new(26).uint(53, 13).children([
                    Record::new(30).uint(67, 0).double(70, 0.0),
                    Record::new(30).uint(67, 10).double(70, to),
                ]),
            ),
        )
}

fn transition(to: u32) -> Record {
    Record::new(65).uint(151, to)
}

/// Entry is state 0; `states` start at index 3.
fn layer_with_entry(entry: Record, states: Vec<Record>) -> Record {
    let mut all = vec![entry, Record::new(62), Record::new(64)];
    all.extend(states);
    Record::new(57).string(138, "layer").children(all)
}

fn machine_doc(body_x: f32, animations: Vec<Record>, machine: Record) -> RivDocument {
    let mut board = ArtboardDocument::new(
        Record::new(1)
            .string(4, "Board")
            .double(7, 10.0)
            .double(8, 10.0),
    )
    .object(Record::new(2).string(4, "body").uint(5, 0).double(13, body_x))
    .state_machine(machine);
    board.animations = animations;
    RivDocument::new().artboard(board)
}

// ----- fixture behavior -----

#[test]
fn entry_moves_to_first_state_on_first_advance() {
    let mut artboard = character();
    let player = artboard.play_state_machine("Motion").unwrap();
    assert_eq!(instance(&artboard, player).current_state(0), Some(0));

    let events = step(&mut artboard, 0.0);
    assert_eq!(
        events,
        vec![
            CoreEvent::PlaybackStarted {
                player,
                name: "Motion".into()
            },
            CoreEvent::StateChanged {
                player,
                layer: 0,
                state: 3,
                animation: Some("idle".into())
            },
        ]
    );
    let machine = instance(&artboard, player);
    assert_eq!(machine.current_animation_name(0), Some("idle"));
    // The gesture layer has nowhere to go from entry.
    assert_eq!(machine.current_state(1), Some(0));
}

#[test]
fn speed_blends_walk_and_run() {
    let mut artboard = character();
    let player = artboard.play_state_machine("Motion").unwrap();
    step(&mut artboard, 0.0);

    assert!(artboard.set_number(player, "speed", 0.25));
    let events = step(&mut artboard, 0.0);
    assert_eq!(changes(&events), vec![(0, 4)]);

    let layer = instance(&artboard, player).layer(0).unwrap();
    assert_eq!(layer.current().unwrap().blend_mixes(), vec![0.75, 0.25]);
    assert!(layer.is_transitioning());
    assert_eq!(layer.mix(), 0.0);

    step(&mut artboard, 0.1);
    approx(instance(&artboard, player).layer(0).unwrap().mix(), 0.5, 1e-5);
    step(&mut artboard, 0.1);
    let layer = instance(&artboard, player).layer(0).unwrap();
    approx(layer.mix(), 1.0, 1e-6);
    assert!(!layer.is_transitioning());

    assert!(artboard.set_number(player, "speed", 0.0));
    let events = step(&mut artboard, 0.0);
    assert_eq!(changes(&events), vec![(0, 3)]);
}

/// It should not leave a state while its incoming mix is still running.
#[test]
fn transitions_wait_for_the_mix() {
    let mut artboard = character();
    let player = artboard.play_state_machine("Motion").unwrap();
    step(&mut artboard, 0.0);
    artboard.set_number(player, "speed", 1.0);
    step(&mut artboard, 0.0);

    artboard.set_number(player, "speed", 0.0);
    assert!(changes(&step(&mut artboard, 0.05)).is_empty());
    assert!(changes(&step(&mut artboard, 0.1)).is_empty());
    assert_eq!(instance(&artboard, player).current_state(0), Some(4));
    assert_eq!(changes(&step(&mut artboard, 0.1)), vec![(0, 3)]);
}

#[test]
fn trigger_fires_any_state_once_then_exit_time_leaves() {
    let mut artboard = character();
    let player = artboard.play_state_machine("Motion").unwrap();
    step(&mut artboard, 0.0);

    assert!(artboard.fire_trigger(player, "wave"));
    let events = step(&mut artboard, 0.0);
    assert_eq!(changes(&events), vec![(1, 3)]);
    let machine = instance(&artboard, player);
    assert_eq!(machine.current_animation_name(1), Some("wave"));
    assert!(machine.layer(1).unwrap().waiting_for_exit());
    assert!(!machine.input(2).unwrap().fired());

    // Already in the target state, so the any-state transition is skipped.
    artboard.fire_trigger(player, "wave");
    assert!(changes(&step(&mut artboard, 0.6)).is_empty());

    let events = step(&mut artboard, 0.6);
    assert_eq!(changes(&events), vec![(1, 2)]);
    assert!(matches!(
        events.last(),
        Some(CoreEvent::StateChanged { animation: None, .. })
    ));
}

#[test]
fn input_commands() {
    let mut artboard = character();
    let player = artboard.play_state_machine("Motion").unwrap();
    step(&mut artboard, 0.0);

    let mut inputs = Inputs::new();
    inputs
        .push(PlayerCommand::SetBool {
            player,
            input: "happy".into(),
            value: false,
        })
        .push(PlayerCommand::SetNumber {
            player,
            input: "speed".into(),
            value: 2.0,
        })
        .push(PlayerCommand::SetNumber {
            player,
            input: "happy".into(),
            value: 1.0,
        })
        .push(PlayerCommand::FireTrigger {
            player,
            input: "nope".into(),
        });
    let events = artboard.update(0.0, &inputs).events.clone();
    let errors = events
        .iter()
        .filter(|e| matches!(e, CoreEvent::Error { .. }))
        .count();
    assert_eq!(errors, 2);
    assert_eq!(changes(&events), vec![(0, 4)]);

    let machine = instance(&artboard, player);
    assert_eq!(machine.get_bool("happy"), Some(false));
    assert_eq!(machine.get_number("speed"), Some(2.0));
    assert_eq!(machine.get_number("happy"), None);
}

#[test]
fn seeded_random_transitions_follow_weights() {
    let entry = Record::new(63)
        .uint(536, LayerStateFlags::RANDOM)
        .children([transition(3).uint(537, 1), transition(4).uint(537, 3)]);
    let states = vec![Record::new(61).uint(149, 0), Record::new(61).uint(149, 0)];
    let machine = Record::new(53)
        .string(55, "Pick")
        .child(layer_with_entry(entry, states));
    let file = import_doc(&machine_doc(0.0, vec![animation("a", 1.0)], machine), &Config::default());
    let mut artboard = file.artboard_instance_at(0).unwrap();
    let definition = Arc::clone(artboard.state_machine("Pick").unwrap());

    let mut pick = |seed: u64| {
        let mut machine = StateMachineInstance::new(
            Arc::clone(&definition),
            &artboard,
            Arc::clone(file.reset_pool()),
            &seeded_config(seed),
        );
        machine.advance(&mut artboard, 0.0);
        machine.current_state(0).unwrap()
    };

    let seed = deterministic_config().random_seed.unwrap();
    let first = pick(seed);
    assert_eq!(pick(seed), first);

    let mut counts = [0usize; 5];
    for seed in 0..400 {
        counts[pick(seed)] += 1;
    }
    assert!(counts[3] > 0);
    assert!(counts[4] > counts[3]);
    assert_eq!(counts[3] + counts[4], 400);
}

#[test]
fn zero_weight_is_never_picked() {
    let entry = Record::new(63)
        .uint(536, LayerStateFlags::RANDOM)
        .children([transition(3).uint(537, 0), transition(4).uint(537, 1)]);
    let states = vec![Record::new(61).uint(149, 0), Record::new(61).uint(149, 0)];
    let machine = Record::new(53)
        .string(55, "Pick")
        .child(layer_with_entry(entry, states));
    let doc = machine_doc(0.0, vec![animation("a", 1.0)], machine);
    for seed in 0..32 {
        let file = import_doc(&doc, &seeded_config(seed));
        let mut artboard = file.artboard_instance_at(0).unwrap();
        let player = artboard.play_state_machine("Pick").unwrap();
        step(&mut artboard, 0.0);
        assert_eq!(instance(&artboard, player).current_state(0), Some(4));
    }
}

/// It should stop a layer that keeps bouncing between states.
#[test]
fn state_change_limit_breaks_loops() {
    let states = vec![
        Record::new(61).uint(149, 0).child(transition(4)),
        Record::new(61).uint(149, 0).child(transition(3)),
    ];
    let entry = Record::new(63).child(transition(3));
    let machine = Record::new(53)
        .string(55, "Loop")
        .child(layer_with_entry(entry, states));
    let config = Config {
        max_state_changes: 10,
        ..Config::default()
    };
    let file = import_doc(&machine_doc(0.0, vec![animation("a", 1.0)], machine), &config);
    let mut artboard = file.artboard_instance_at(0).unwrap();
    let player = artboard.play_state_machine("Loop").unwrap();
    step(&mut artboard, 0.0);
    assert_eq!(instance(&artboard, player).state_changes().len(), 10);
}

#[test]
fn exit_time_in_milliseconds() {
    let states = vec![Record::new(61)
        .uint(149, 0)
        .child(transition(2).uint(152, TransitionFlags::ENABLE_EXIT_TIME).uint(160, 250))];
    let machine = Record::new(53)
        .string(55, "Timed")
        .child(layer_with_entry(Record::new(63).child(transition(3)), states));
    let file = import_doc(&machine_doc(0.0, vec![animation("a", 1.0)], machine), &Config::default());
    let mut artboard = file.artboard_instance_at(0).unwrap();
    let player = artboard.play_state_machine("Timed").unwrap();

    step(&mut artboard, 0.0);
    step(&mut artboard, 0.2);
    assert_eq!(instance(&artboard, player).current_state(0), Some(3));
    assert!(instance(&artboard, player).layer(0).unwrap().waiting_for_exit());
    step(&mut artboard, 0.1);
    assert_eq!(instance(&artboard, player).current_state(0), Some(2));
}

// ----- resets -----

fn reset_doc() -> RivDocument {
    let blend = Record::new(76)
        .uint(167, 0)
        .uint(536, LayerStateFlags::RESET)
        .children([
            Record::new(75).uint(165, 0).double(166, 0.0),
            Record::new(75).uint(165, 1).double(166, 1.0),
        ]);
    let machine = Record::new(53)
        .string(55, "Blend")
        .child(Record::new(56).string(138, "speed").double(140, 0.25))
        .child(layer_with_entry(Record::new(63).child(transition(3)), vec![blend]));
    machine_doc(
        7.0,
        vec![animation("walk", 100.0), animation("run", 200.0)],
        machine,
    )
}

/// It should start a reset-flagged blend from the first animation's first frame.
#[test]
fn reset_flag_restores_baseline_before_blending() {
    let file = import_doc(&reset_doc(), &Config::default());
    let mut artboard = file.artboard_instance_at(0).unwrap();
    artboard.play_state_machine("Blend").unwrap();

    step(&mut artboard, 0.0);
    approx(x_of(&artboard, BODY), 0.0, 1e-6);
    step(&mut artboard, 0.5);
    // reset to 0, walk 50 at 0.75, then run 100 at 0.25
    approx(x_of(&artboard, BODY), 53.125, 1e-4);
}

#[test]
fn resets_can_be_disabled() {
    let config = Config {
        features: Features {
            state_resets: false,
            ..Features::default()
        },
        ..Config::default()
    };
    let file = import_doc(&reset_doc(), &config);
    let mut artboard = file.artboard_instance_at(0).unwrap();
    artboard.play_state_machine("Blend").unwrap();

    step(&mut artboard, 0.0);
    approx(x_of(&artboard, BODY), 7.0, 1e-6);
    step(&mut artboard, 0.5);
    approx(x_of(&artboard, BODY), 54.4375, 1e-4);
}

#[test]
fn reset_buffers_return_to_the_pool() {
    let file: File = import_doc(&reset_doc(), &Config::default());
    assert_eq!(file.reset_pool().resources_count(), 0);
    {
        let mut artboard = file.artboard_instance_at(0).unwrap();
        artboard.play_state_machine("Blend").unwrap();
        step(&mut artboard, 0.0);
        assert_eq!(file.reset_pool().resources_count(), 0);
    }
    assert_eq!(file.reset_pool().resources_count(), 1);
}

// ----- state speed and timeline direction -----

/// One second x ramp 0 -> 100 at 10fps.
fn ramp(name: &str, loop_value: u32, speed: f32) -> Record {
    Record::new(31)
        .string(55, name)
        .uint(56, 10)
        .uint(57, 10)
        .double(58, speed)
        .uint(59, loop_value)
        .child(
            Record::new(25).uint(51, BODY).child(
                Record::new(26).uint(53, 13).children([
                    Record::new(30).uint(67, 0).double(70, 0.0),
                    Record::new(30).uint(67, 10).double(70, 100.0),
                ]),
            ),
        )
}

fn single_state(animation: Record, state: Record) -> (Artboard, PlayerId) {
    let machine = Record::new(53)
        .string(55, "Solo")
        .child(layer_with_entry(Record::new(63).child(transition(3)), vec![state]));
    let file = import_doc(&machine_doc(0.0, vec![animation], machine), &Config::default());
    let mut artboard = file.artboard_instance_at(0).unwrap();
    let player = artboard.play_state_machine("Solo").unwrap();
    step(&mut artboard, 0.0);
    (artboard, player)
}

fn state_time(artboard: &Artboard, player: PlayerId) -> f32 {
    instance(artboard, player)
        .layer(0)
        .and_then(|layer| layer.current())
        .and_then(|state| state.animation_instance())
        .map(|animation| animation.time())
        .unwrap()
}

/// It should let a machine settle once a reversed one-shot reaches frame zero.
#[test]
fn reversed_one_shot_settles() {
    let (mut artboard, player) = single_state(ramp("back", 0, -1.0), Record::new(61).uint(149, 0));
    approx(state_time(&artboard, player), 1.0, 1e-6);
    approx(x_of(&artboard, BODY), 100.0, 1e-4);

    step(&mut artboard, 0.5);
    approx(x_of(&artboard, BODY), 50.0, 1e-4);
    assert!(instance(&artboard, player).needs_advance());

    let events = step(&mut artboard, 0.75);
    approx(x_of(&artboard, BODY), 0.0, 1e-4);
    assert!(!instance(&artboard, player).needs_advance());
    assert!(events
        .iter()
        .any(|e| matches!(e, CoreEvent::PlaybackEnded { player: p, .. } if *p == player)));
}

#[test]
fn state_speed_scales_time() {
    for (speed, time) in [(1.0, 0.2), (2.0, 0.4), (0.5, 0.1)] {
        let state = Record::new(61).uint(149, 0).double(292, speed);
        let (mut artboard, player) = single_state(ramp("loop", 1, 1.0), state);
        step(&mut artboard, 0.2);
        approx(state_time(&artboard, player), time, 1e-5);
        approx(x_of(&artboard, BODY), time * 100.0, 1e-3);
    }
}

/// It should start a negative-speed state at the end and run it backward.
#[test]
fn negative_state_speed_plays_backward() {
    let state = Record::new(61).uint(149, 0).double(292, -1.0);
    let (mut artboard, player) = single_state(ramp("loop", 1, 1.0), state);
    approx(state_time(&artboard, player), 1.0, 1e-6);
    step(&mut artboard, 0.25);
    approx(state_time(&artboard, player), 0.75, 1e-5);
    approx(x_of(&artboard, BODY), 75.0, 1e-3);
    let layer = instance(&artboard, player).layer(0).unwrap();
    let animation = layer.current().unwrap().animation_instance().unwrap();
    approx(animation.total_time(), 0.25, 1e-5);

    // Both negative cancel out and start from the beginning.
    let state = Record::new(61).uint(149, 0).double(292, -1.0);
    let (artboard, player) = single_state(ramp("loop", 1, -1.0), state);
    approx(state_time(&artboard, player), 0.0, 1e-6);
}

#[test]
fn zero_state_speed_holds_and_settles_one_shots() {
    let state = Record::new(61).uint(149, 0).double(292, 0.0);
    let (mut artboard, player) = single_state(ramp("once", 0, 1.0), state);
    step(&mut artboard, 0.5);
    approx(state_time(&artboard, player), 0.0, 1e-6);
    assert!(!instance(&artboard, player).needs_advance());
}

// ----- timeline callbacks -----

fn with_callbacks(animation: Record, frames: &[u32]) -> Record {
    animation.child(
        Record::new(25).uint(51, BODY).child(
            Record::new(26)
                .uint(53, 395)
                .children(frames.iter().map(|f| Record::new(173).uint(67, *f))),
        ),
    )
}

fn callbacks(events: &[CoreEvent]) -> Vec<f32> {
    events
        .iter()
        .filter_map(|e| match e {
            CoreEvent::KeyedCallback {
                object_id: BODY,
                property_key: 395,
                elapsed_seconds,
                ..
            } => Some(*elapsed_seconds),
            _ => None,
        })
        .collect()
}

#[test]
fn state_timelines_report_callbacks() {
    let animation = with_callbacks(ramp("loop", 1, 1.0), &[0, 5]);
    let (mut artboard, _player) = single_state(animation, Record::new(61).uint(149, 0));

    let first = callbacks(&step(&mut artboard, 0.25));
    assert_eq!(first.len(), 1);
    approx(first[0], 0.25, 1e-5);

    let second = callbacks(&step(&mut artboard, 0.5));
    assert_eq!(second.len(), 1);
    approx(second[0], 0.25, 1e-5);

    // Crosses frame 0 again after wrapping.
    assert_eq!(callbacks(&step(&mut artboard, 0.5)).len(), 1);
}

#[test]
fn animation_players_report_callbacks() {
    let machine = Record::new(53).string(55, "Unused");
    let doc = machine_doc(
        0.0,
        vec![with_callbacks(ramp("loop", 1, 1.0), &[0, 5, 10])],
        machine,
    );
    let file = import_doc(&doc, &Config::default());
    let mut artboard = file.artboard_instance_at(0).unwrap();
    artboard.play_animation("loop").unwrap();
    assert_eq!(callbacks(&step(&mut artboard, 0.6)).len(), 2);
    assert_eq!(callbacks(&step(&mut artboard, 0.6)).len(), 2);
}
