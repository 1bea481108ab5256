mod common;

use common::{approx, import_fixture, DrawCall, RecordingRenderer, TestFactory};
use vizij_rive_core::{
    Artboard, BlendMode, Config, CoreEvent, CoreObject, Features, File, Inputs, Mat2D,
    PlayerCommand, PlayerId, PropertyTarget, PropertyValue,
};

const GROUP: u32 = 1;
const BOX_COLOR: u32 = 5;
const DOT: u32 = 7;
const DOT_COLOR: u32 = 10;

fn main_artboard() -> Artboard {
    import_fixture("shapes").artboard_instance("Main").unwrap()
}

fn double(artboard: &Artboard, id: u32, key: u16) -> f32 {
    artboard.property(id, key).and_then(|v| v.as_double()).unwrap()
}

fn color(artboard: &Artboard, id: u32) -> u32 {
    artboard.property(id, 37).and_then(|v| v.as_color()).unwrap()
}

fn render_color(artboard: &Artboard, id: u32) -> u32 {
    match artboard.resolve(id) {
        Some(CoreObject::SolidColor(c)) => c.render_color(),
        other => panic!("expected a solid color, got {other:?}"),
    }
}

fn world_x(artboard: &Artboard, id: u32) -> f32 {
    artboard
        .resolve(id)
        .and_then(CoreObject::transform)
        .unwrap()
        .world_transform()
        .translation()
        .x
}

fn step(artboard: &mut Artboard, dt: f32) -> Vec<CoreEvent> {
    artboard.update(dt, &Inputs::new()).events.clone()
}

fn command(artboard: &mut Artboard, cmd: PlayerCommand) -> Vec<CoreEvent> {
    let mut inputs = Inputs::new();
    inputs.push(cmd);
    artboard.update(0.0, &inputs).events.clone()
}

#[test]
fn slide_midpoint_eases_position_and_color() {
    let mut artboard = main_artboard();
    artboard.play_animation("slide").unwrap();
    step(&mut artboard, 0.5);

    approx(double(&artboard, GROUP, 13), 60.0, 1e-2);
    approx(world_x(&artboard, 2), 60.0, 1e-2);
    assert_eq!(color(&artboard, BOX_COLOR), 0xFF80_8000);
    assert_eq!(render_color(&artboard, BOX_COLOR), 0xFF80_8000);
}

#[test]
fn looping_opacity_reaches_paint() {
    let mut artboard = main_artboard();
    artboard.play_animation("pulse").unwrap();
    step(&mut artboard, 0.5);
    approx(double(&artboard, DOT, 18), 0.5, 1e-5);
    assert_eq!(render_color(&artboard, DOT_COLOR), 0x8000_00FF);

    // One full loop later the pose repeats.
    step(&mut artboard, 1.0);
    approx(double(&artboard, DOT, 18), 0.5, 1e-4);
}

#[test]
fn lifecycle_events_are_reported_in_order() {
    let mut artboard = main_artboard();
    let player = artboard.play_animation("slide").unwrap();

    let events = step(&mut artboard, 0.25);
    assert_eq!(
        events,
        vec![CoreEvent::PlaybackStarted {
            player,
            name: "slide".into()
        }]
    );

    let events = step(&mut artboard, 1.0);
    assert!(matches!(
        events.as_slice(),
        [CoreEvent::PlaybackEnded { player: p, animation_time }] if *p == player && *animation_time == 1.0
    ));
    assert!(artboard.player(player).unwrap().has_ended());
    approx(double(&artboard, GROUP, 13), 110.0, 1e-4);

    // Ended is reported once.
    assert!(step(&mut artboard, 0.1).is_empty());
}

#[test]
fn pause_resume_and_stop() {
    let mut artboard = main_artboard();
    let player = artboard.play_animation("slide").unwrap();
    step(&mut artboard, 0.0);

    let events = command(&mut artboard, PlayerCommand::Pause { player });
    assert_eq!(events, vec![CoreEvent::PlaybackPaused { player }]);
    step(&mut artboard, 0.5);
    approx(double(&artboard, GROUP, 13), 10.0, 1e-4);

    let events = command(&mut artboard, PlayerCommand::Play { player });
    assert_eq!(events, vec![CoreEvent::PlaybackResumed { player }]);

    let events = command(&mut artboard, PlayerCommand::Stop { player });
    assert_eq!(events, vec![CoreEvent::PlaybackStopped { player }]);
    assert!(artboard.players().is_empty());
}

#[test]
fn seek_and_speed_commands() {
    let mut artboard = main_artboard();
    let player = artboard.play_animation("slide").unwrap();
    command(&mut artboard, PlayerCommand::Seek { player, time: 1.0 });
    approx(double(&artboard, GROUP, 13), 110.0, 1e-4);

    command(&mut artboard, PlayerCommand::Seek { player, time: 0.0 });
    command(&mut artboard, PlayerCommand::SetSpeed { player, speed: 2.0 });
    step(&mut artboard, 0.25);
    let time = artboard.player(player).unwrap().animation().unwrap().time();
    approx(time, 0.5, 1e-5);
}

#[test]
fn bad_commands_report_errors() {
    let mut artboard = main_artboard();
    let player = artboard.play_animation("slide").unwrap();
    step(&mut artboard, 0.0);

    let events = command(&mut artboard, PlayerCommand::Play { player: PlayerId(77) });
    assert!(matches!(events.as_slice(), [CoreEvent::Error { .. }]));

    // Inputs only exist on state machine players.
    let events = command(
        &mut artboard,
        PlayerCommand::SetNumber {
            player,
            input: "speed".into(),
            value: 1.0,
        },
    );
    assert!(matches!(events.as_slice(), [CoreEvent::Error { .. }]));
    assert!(artboard.play_animation("missing").is_none());
}

#[test]
fn draw_clips_then_fills_in_object_order() {
    let artboard = main_artboard();
    let mut factory = TestFactory::default();
    let mut renderer = RecordingRenderer::default();
    artboard.draw(&mut factory, &mut renderer);

    assert_eq!(
        renderer.calls,
        vec![
            DrawCall::Save,
            DrawCall::Clip { verbs: 5 },
            DrawCall::Transform(Mat2D::IDENTITY),
            DrawCall::Path {
                verbs: 5,
                color: 0xFFFF_0000,
                blend_mode: BlendMode::SrcOver
            },
            DrawCall::Path {
                verbs: 6,
                color: 0xFF00_00FF,
                blend_mode: BlendMode::SrcOver
            },
            DrawCall::Restore,
        ]
    );
    assert_eq!(factory.paths, 3);
    assert_eq!(factory.paints, 2);
}

#[test]
fn clip_can_be_disabled() {
    let config = Config {
        features: Features {
            honor_clip: false,
            ..Features::default()
        },
        ..Config::default()
    };
    let bytes = vizij_test_fixtures::documents::bytes("shapes").unwrap();
    let file = File::import(&bytes, &config, None, None).unwrap();
    let artboard = file.artboard_instance("Main").unwrap();

    let mut renderer = RecordingRenderer::default();
    artboard.draw(&mut TestFactory::default(), &mut renderer);
    assert!(!renderer.calls.iter().any(|c| matches!(c, DrawCall::Clip { .. })));
    assert_eq!(renderer.paths().len(), 2);
}

/// It should skip shapes whose opacity has faded out.
#[test]
fn invisible_shapes_are_not_drawn() {
    let mut artboard = main_artboard();
    assert!(artboard.set_property(DOT, 18, PropertyValue::Double(0.0)));
    artboard.advance(0.0);

    let mut renderer = RecordingRenderer::default();
    artboard.draw(&mut TestFactory::default(), &mut renderer);
    let paths = renderer.paths();
    assert_eq!(paths.len(), 1);
    assert!(matches!(paths[0], DrawCall::Path { color: 0xFFFF_0000, .. }));
}
