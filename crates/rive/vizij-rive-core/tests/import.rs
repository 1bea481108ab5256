mod common;

use common::{import_fixture, TestFactory};
use vizij_rive_core::{
    AssetKind, Config, CoreObject, File, ImportError, ImportResult, InMemoryResolver, ObjectId,
    RenderImage,
};
use vizij_test_fixtures::riv::{ArtboardDocument, Record, RivDocument, Value};

fn artboard(name: &str) -> Record {
    Record::new(1)
        .string(4, name)
        .double(7, 100.0)
        .double(8, 100.0)
}

fn node(name: &str, parent: u32) -> Record {
    Record::new(2).string(4, name).uint(5, parent)
}

fn import(doc: &RivDocument) -> Result<File, ImportError> {
    File::import(&doc.encode(), &Config::default(), None, None)
}

#[test]
fn shapes_fixture_imports() {
    let file = import_fixture("shapes");
    assert_eq!(file.header().file_id, 11);
    // "Broken" parents a fill to the artboard and is dropped.
    assert_eq!(file.artboard_count(), 1);
    assert!(file.artboard("Broken").is_none());

    let main = file.default_artboard().expect("default artboard");
    assert_eq!(main.name(), "Main");
    assert!(main.is_initialized());
    assert_eq!(main.object_count(), 12);
    assert_eq!(main.find("box"), Some(ObjectId(2)));
    assert_eq!(main.find("box-color"), Some(ObjectId(5)));
    assert_eq!(main.animations().len(), 2);
    assert!(main.animation("slide").is_some());
    assert!(main.animation("pulse").is_some());
}

/// It should keep an id for objects of unknown type so later ids stay put.
#[test]
fn unknown_types_leave_an_empty_slot() {
    let file = import_fixture("shapes");
    let main = file.artboard("Main").unwrap();
    assert!(main.resolve(11).is_none());
    assert!(matches!(main.resolve(10), Some(CoreObject::SolidColor(_))));
    assert!(main.find("from-a-newer-editor").is_none());
}

#[test]
fn state_machine_fixture_imports() {
    let file = import_fixture("state-machine");
    let artboard = file.artboard("Character").unwrap();
    assert_eq!(artboard.animations().len(), 4);
    let machine = artboard.state_machine("Motion").unwrap();
    assert_eq!(machine.inputs.len(), 3);
    assert_eq!(machine.input_index("wave"), Some(2));
    assert_eq!(machine.layers.len(), 2);
    assert_eq!(machine.layers[0].name, "locomotion");
    assert_eq!(machine.layers[0].states.len(), 5);
    let idle = machine.layers[0].state(3).unwrap();
    assert_eq!(idle.animation().map(|a| a.name.as_str()), Some("idle"));
    assert_eq!(idle.transitions[0].conditions.len(), 1);
    assert!(idle.transitions[0].interpolator().is_some());
}

#[test]
fn other_major_versions_are_rejected() {
    let doc = RivDocument {
        major: 6,
        minor: 3,
        ..RivDocument::new()
    };
    let result = import(&doc);
    assert_eq!(ImportResult::from(&result), ImportResult::UnsupportedVersion);
    match result {
        Err(ImportError::UnsupportedVersion { major, minor, supported }) => {
            assert_eq!((major, minor, supported), (6, 3, 7));
        }
        other => panic!("expected version error, got {other:?}"),
    }
}

#[test]
fn bad_fingerprint_is_malformed() {
    let mut bytes = RivDocument::new().encode();
    bytes[3] = b'X';
    let result = File::import(&bytes, &Config::default(), None, None);
    assert_eq!(ImportResult::from(&result), ImportResult::Malformed);
}

#[test]
fn truncated_stream_is_malformed() {
    let bytes = vizij_test_fixtures::documents::bytes("shapes").unwrap();
    for len in [5, bytes.len() / 2, bytes.len() - 1] {
        let result = File::import(&bytes[..len], &Config::default(), None, None);
        assert!(
            matches!(result, Err(ImportError::Malformed { .. })),
            "truncated at {len}: {result:?}"
        );
    }
}

#[test]
fn empty_file_has_no_artboards() {
    let file = import(&RivDocument::new()).unwrap();
    assert_eq!(file.artboard_count(), 0);
    assert!(file.default_artboard().is_none());
    assert!(file.assets().is_empty());
}

#[test]
fn listed_unknown_keys_are_skipped() {
    let doc = RivDocument::new().artboard(
        ArtboardDocument::new(artboard("A"))
            .object(node("n", 0).double(9100, 2.0).double(13, 4.0)),
    );
    let file = import(&doc).unwrap();
    let artboard = file.artboard("A").unwrap();
    let Some(CoreObject::Node(n)) = artboard.resolve(1) else {
        panic!("expected a node");
    };
    assert_eq!(n.x, 4.0);
}

/// It should fail when a key is unknown to both the runtime and the header.
#[test]
fn unlisted_unknown_key_is_malformed() {
    let doc = RivDocument::new().artboard(
        ArtboardDocument::new(artboard("A")).object(node("n", 0).unlisted(9100, Value::Double(1.0))),
    );
    assert!(matches!(import(&doc), Err(ImportError::Malformed { .. })));
}

#[test]
fn deep_trees_are_rejected() {
    let mut tree = Record::new(31).string(55, "deep");
    for _ in 0..12 {
        tree = Record::new(25).uint(51, 0).child(tree);
    }
    let doc = RivDocument::new().artboard(ArtboardDocument::new(artboard("A")).animation(tree));
    assert!(matches!(import(&doc), Err(ImportError::Malformed { .. })));
}

#[test]
fn every_artboard_failing_is_malformed() {
    let doc = RivDocument::new()
        .artboard(ArtboardDocument::new(artboard("A")).object(node("orphan", 40)));
    assert!(matches!(import(&doc), Err(ImportError::Malformed { .. })));
}

#[test]
fn non_artboard_root_only_drops_that_artboard() {
    let doc = RivDocument::new()
        .artboard(ArtboardDocument::new(node("not-an-artboard", 0)).object(node("n", 0)))
        .artboard(ArtboardDocument::new(artboard("Kept")));
    let file = import(&doc).unwrap();
    assert_eq!(file.artboard_count(), 1);
    assert_eq!(file.default_artboard().unwrap().name(), "Kept");
}

/// It should keep animation indices stable when one animation tree is bad.
#[test]
fn bad_animation_tree_keeps_its_slot() {
    let doc = RivDocument::new().artboard(
        ArtboardDocument::new(artboard("A"))
            .animation(node("not-an-animation", 0))
            .animation(Record::new(31).string(55, "second")),
    );
    let file = import(&doc).unwrap();
    let animations = file.default_artboard().unwrap().animations();
    assert_eq!(animations.len(), 2);
    assert_eq!(animations[1].name, "second");
}

#[test]
fn embedded_image_is_decoded_and_bound() {
    let doc = RivDocument::new()
        .asset(Record::new(105).string(203, "logo.png").uint(204, 9))
        .asset(Record::new(106).bytes(212, vec![4, 2]))
        .artboard(
            ArtboardDocument::new(artboard("A"))
                .object(Record::new(100).string(4, "img").uint(5, 0).uint(206, 0)),
        );
    let mut factory = TestFactory::default();
    let file = File::import(&doc.encode(), &Config::default(), Some(&mut factory), None).unwrap();
    assert_eq!(factory.images, 1);
    assert_eq!(file.assets().len(), 1);
    let asset = &file.assets()[0];
    assert_eq!(asset.kind, AssetKind::Image);
    assert_eq!(asset.image().map(|i| i.width()), Some(4));

    let Some(CoreObject::Image(image)) = file.default_artboard().unwrap().resolve(1) else {
        panic!("expected an image");
    };
    assert_eq!(image.render_image().map(|i| i.height()), Some(2));
}

#[test]
fn missing_contents_come_from_the_resolver() {
    let doc = RivDocument::new()
        .asset(Record::new(105).string(203, "hero.png").uint(204, 3))
        .asset(Record::new(141).string(203, "Inter").uint(204, 4));
    let mut factory = TestFactory::default();
    let mut resolver = InMemoryResolver::new();
    resolver.insert("hero-3.png", vec![8, 8]);
    let file = File::import(
        &doc.encode(),
        &Config::default(),
        Some(&mut factory),
        Some(&mut resolver),
    )
    .unwrap();
    assert!(file.assets()[0].is_decoded());
    assert!(!file.assets()[1].is_decoded());
    assert_eq!(factory.images, 1);
    assert_eq!(factory.fonts, 0);
}

#[test]
fn artboard_instances_are_independent() {
    let file = import_fixture("shapes");
    let mut a = file.artboard_instance("Main").unwrap();
    let b = file.artboard_instance_at(0).unwrap();
    let player = a.play_animation("slide").unwrap();
    assert_eq!(a.players().len(), 1);
    assert!(b.players().is_empty());
    assert!(a.player(player).is_some());
    assert!(file.artboard_instance("Nope").is_none());
}

/// It should drop keyed properties whose key cannot name a property.
#[test]
fn oversized_keyed_property_keys_are_dropped() {
    let keyed = Record::new(25).uint(51, 1).children([
        Record::new(26)
            .uint(53, 65536 + 13)
            .child(Record::new(30).uint(67, 0).double(70, 9.0)),
        Record::new(26)
            .uint(53, 14)
            .child(Record::new(30).uint(67, 0).double(70, 4.0)),
    ]);
    let doc = RivDocument::new().artboard(
        ArtboardDocument::new(artboard("A"))
            .object(node("n", 0))
            .animation(Record::new(31).string(55, "wide").child(keyed)),
    );
    let file = import(&doc).unwrap();
    let animation = &file.default_artboard().unwrap().animations()[0];
    let properties = &animation.keyed_objects[0].properties;
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].key(), Some(14));
}

#[test]
fn timeline_extras_import() {
    let state_machine = Record::new(53).string(55, "M").child(
        Record::new(57).string(138, "l").children([
            Record::new(63),
            Record::new(62),
            Record::new(64),
            Record::new(61).uint(149, 0).double(292, -0.5),
        ]),
    );
    let events = Record::new(25).uint(51, 1).child(
        Record::new(26)
            .uint(53, 395)
            .children([Record::new(173).uint(67, 0), Record::new(173).uint(67, 30)]),
    );
    let doc = RivDocument::new().artboard(
        ArtboardDocument::new(artboard("A"))
            .object(node("n", 0))
            .animation(
                Record::new(31)
                    .string(55, "steps")
                    .boolean(376, true)
                    .child(events),
            )
            .state_machine(state_machine),
    );
    let file = import(&doc).unwrap();
    let board = file.default_artboard().unwrap();
    let animation = &board.animations()[0];
    assert!(animation.quantize);
    let track = &animation.keyed_objects[0].properties[0];
    assert!(track.is_callback());
    assert_eq!(track.keyframes.len(), 2);
    let state = board.state_machine("M").unwrap().layers[0].state(3).unwrap();
    assert_eq!(state.speed(), -0.5);
}
