use glam::Vec3;
use scene::march::{self, Ray};
use scene::{HitKind, HitResult, MarchSettings, ObjectId, Primitive, SceneObject};

fn two_objects() -> Vec<SceneObject> {
    vec![
        SceneObject::new(ObjectId(10), "left", Primitive::Sphere).with_position(Vec3::new(-2.0, 1.0, 0.0)),
        SceneObject::new(ObjectId(11), "right", Primitive::Box).with_position(Vec3::new(2.0, 1.0, 0.0)),
    ]
}

#[test]
fn grid_is_never_pickable() {
    let ray = Ray::new(Vec3::new(0.0, 3.0, 3.0), Vec3::new(0.0, -1.0, -1.0));
    let settings = MarchSettings::picking();
    // The same ray does reach the grid when rendering.
    assert!(march::march(&ray, &[], None, &MarchSettings::render()).is_some());
    assert_eq!(march::pick(&ray, &[], None, &settings), HitResult::NONE);
}

#[test]
fn pick_reports_slot_of_object_under_ray() {
    let objects = two_objects();
    let settings = MarchSettings::picking();
    let at_right = Ray::new(Vec3::new(2.0, 1.0, 8.0), Vec3::NEG_Z);
    assert_eq!(march::pick(&at_right, &objects, None, &settings), HitResult::new(HitKind::Object, 1));
    let at_left = Ray::new(Vec3::new(-2.0, 1.0, 8.0), Vec3::NEG_Z);
    assert_eq!(march::pick(&at_left, &objects, None, &settings), HitResult::new(HitKind::Object, 0));
    let between = Ray::new(Vec3::new(0.0, 1.0, 8.0), Vec3::NEG_Z);
    assert_eq!(march::pick(&between, &objects, None, &settings), HitResult::NONE);
}

#[test]
fn gizmo_only_exists_for_active_object() {
    let objects = two_objects();
    let settings = MarchSettings::picking();
    // Grazes the top of the left sphere's Y handle.
    let eye = Vec3::new(-2.0, 1.0, 8.0);
    let size = scene::gizmo::gizmo_size(eye, objects[0].position);
    let handle = Vec3::new(-2.0, 1.0 + 1.1 * size, 0.0);
    let ray = Ray::new(Vec3::new(handle.x, handle.y, 8.0), Vec3::NEG_Z);

    let hit = march::pick(&ray, &objects, Some(0), &settings);
    assert!(hit.kind.is_gizmo(), "{hit:?}");
    assert_eq!(hit.index, 1);

    let other_active = march::pick(&ray, &objects, Some(1), &settings);
    assert!(!other_active.kind.is_gizmo());
}

#[test]
fn rotation_changes_silhouette() {
    let flat = SceneObject::new(ObjectId(1), "slab", Primitive::Box)
        .with_position(Vec3::new(0.0, 1.0, 0.0))
        .with_scale(Vec3::new(1.0, 0.1, 1.0));
    let tilted = flat.clone().with_rotation(Vec3::new(90.0, 0.0, 0.0));
    let settings = MarchSettings::picking();
    // Just above the flat slab, inside the tilted one.
    let ray = Ray::new(Vec3::new(0.0, 1.5, 8.0), Vec3::NEG_Z);
    assert_eq!(march::pick(&ray, &[flat], None, &settings), HitResult::NONE);
    assert_eq!(march::pick(&ray, &[tilted], None, &settings), HitResult::new(HitKind::Object, 0));
}

#[test]
fn settings_fill_missing_fields_from_render_defaults() {
    let settings: MarchSettings = serde_json::from_str(r#"{ "max_steps": 64 }"#).expect("parse");
    assert_eq!(settings.max_steps, 64);
    assert_eq!(settings.max_distance, MarchSettings::render().max_distance);
    assert_eq!(settings.surface_epsilon, MarchSettings::render().surface_epsilon);
}
