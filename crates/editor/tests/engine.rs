//! Needs a GPU adapter: `cargo test -p editor --features gpu-tests`.
#![cfg(feature = "gpu-tests")]

use std::cell::RefCell;
use std::rc::Rc;

use editor::{EditorConfig, EditorListener, Engine, FieldEdit, Gesture, PointerButton, Selection};
use glam::{Vec2, Vec3};
use scene::{ObjectId, Primitive, SceneObject, SequentialIds};

#[derive(Debug, PartialEq)]
enum Heard {
    Selected(ObjectId),
    Unselected(ObjectId),
    Edited(ObjectId),
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Heard>>>);

impl Recorder {
    fn take(&self) -> Vec<Heard> {
        std::mem::take(&mut self.0.borrow_mut())
    }
}

impl EditorListener for Recorder {
    fn object_selected(&mut self, object: &SceneObject) {
        self.0.borrow_mut().push(Heard::Selected(object.id));
    }
    fn object_unselected(&mut self, id: ObjectId) {
        self.0.borrow_mut().push(Heard::Unselected(id));
    }
    fn object_edited(&mut self, object: &SceneObject) {
        self.0.borrow_mut().push(Heard::Edited(object.id));
    }
}

fn engine() -> (Engine, Recorder) {
    let mut engine = Engine::headless(&EditorConfig::default(), 200, 200).expect("engine");
    let recorder = Recorder::default();
    engine.set_listener(Box::new(recorder.clone()));
    engine.set_id_generator(Box::new(SequentialIds::starting_at(100)));
    (engine, recorder)
}

fn click(engine: &mut Engine, x: f32, y: f32) {
    engine.pointer_move(Vec2::new(x, y));
    engine.pointer_down(PointerButton::Primary);
    engine.render(0.0).expect("frame");
    engine.finish_pick().expect("pick was issued");
    engine.pointer_up(PointerButton::Primary);
}

#[test]
fn spawn_uses_injected_ids_at_camera_target() {
    let (mut engine, _) = engine();
    let first = engine.spawn(Primitive::Torus);
    let second = engine.spawn(Primitive::Box);
    assert_eq!((first, second), (ObjectId(100), ObjectId(101)));
    assert_eq!(engine.object(first).map(|o| o.position), Some(engine.camera().target));
}

#[test]
fn click_selects_then_empty_click_clears() {
    let (mut engine, heard) = engine();
    let target = engine.camera().target;
    let id = engine.add_object(SceneObject::new(ObjectId(7), "ball", Primitive::Sphere).with_position(target));

    click(&mut engine, 100.0, 100.0);
    assert_eq!(engine.selection(), Selection::Selected(id));
    assert_eq!(heard.take(), vec![Heard::Selected(id)]);

    click(&mut engine, 5.0, 5.0);
    assert_eq!(engine.selection(), Selection::Idle);
    assert_eq!(heard.take(), vec![Heard::Unselected(id)]);
}

#[test]
fn field_edits_reach_the_selected_object() {
    let (mut engine, heard) = engine();
    let id = engine.spawn(Primitive::Capsule);
    assert!(engine.select_object(Some(id)));
    assert!(heard.take().is_empty(), "inspector selection is silent");

    assert!(engine.apply_field_edit(FieldEdit::Material([0, 255, 0])));
    assert!(engine.apply_field_edit(FieldEdit::Position(Vec3::new(1.0, 2.0, 3.0))));
    let object = engine.object(id).expect("live");
    assert_eq!(object.color, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(object.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(heard.take(), vec![Heard::Edited(id), Heard::Edited(id)]);
}

#[test]
fn removing_the_selection_notifies_and_clears() {
    let (mut engine, heard) = engine();
    let id = engine.spawn(Primitive::Cone);
    engine.select_object(Some(id));
    assert!(engine.remove_selected());
    assert_eq!(engine.selection(), Selection::Idle);
    assert_eq!(heard.take(), vec![Heard::Unselected(id)]);
    assert!(!engine.apply_field_edit(FieldEdit::Scale(Vec3::ONE)));
}

#[test]
fn wheel_zoom_respects_configured_radius() {
    let (mut engine, _) = engine();
    for _ in 0..200 {
        engine.wheel(-1.0);
    }
    assert!((engine.camera().radius() - 50.0).abs() < 1e-3);
    for _ in 0..200 {
        engine.wheel(1.0);
    }
    assert!((engine.camera().radius() - 1.0).abs() < 1e-3);
}

#[test]
fn demo_and_spawn_share_one_id_source() {
    let (mut engine, _) = engine();
    assert_eq!(engine.load_demo(), Primitive::ALL.len());
    let spawned = engine.spawn(Primitive::Box);

    let objects = engine.objects();
    assert_eq!(objects.len(), Primitive::ALL.len() + 1);
    let ids: std::collections::HashSet<_> = objects.iter().map(|o| o.id).collect();
    assert_eq!(ids.len(), objects.len());
    assert_eq!(engine.object(ObjectId(100)).map(SceneObject::primitive), Some(Primitive::ALL[0]));
    assert_eq!(engine.object(spawned).map(SceneObject::primitive), Some(Primitive::Box));
}

#[test]
fn late_pick_result_does_not_settle_a_newer_press() {
    let (mut engine, _) = engine();
    let target = engine.camera().target;
    let id = engine.add_object(SceneObject::new(ObjectId(7), "ball", Primitive::Sphere).with_position(target));

    engine.pointer_move(Vec2::new(100.0, 100.0));
    engine.pointer_down(PointerButton::Primary);
    engine.render(0.0).expect("frame");
    engine.pointer_up(PointerButton::Primary);

    engine.pointer_move(Vec2::new(5.0, 5.0));
    engine.pointer_down(PointerButton::Primary);
    // The first press's readback lands while the second press is held.
    engine.finish_pick().expect("first pick");
    assert_eq!(engine.selection(), Selection::Selected(id));
    assert_eq!(engine.gesture(), Gesture::Resolving);

    engine.render(16.0).expect("frame");
    engine.finish_pick().expect("second pick");
    assert_eq!(engine.selection(), Selection::Idle);
    assert_eq!(engine.gesture(), Gesture::Orbiting);
}
