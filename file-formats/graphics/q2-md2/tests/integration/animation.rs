//! Playback through the model API

use crate::model_bytes;
use glam::Vec3;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use q2_md2::{AnimError, Animation, AnimationTable, Md2Model, PlaybackState};

fn walking_model() -> Md2Model {
    let table = AnimationTable::new(vec![Animation::new("walk", 0, 3, 2.0)]);
    Md2Model::load_with_animations(&model_bytes(4), table).unwrap()
}

#[test]
fn test_half_way_pose() {
    let mut model = walking_model();
    model.set_animation("walk").unwrap();
    model.tick(0.25);

    let state = model.state();
    assert_eq!((state.current_frame(), state.next_frame()), (0, 1));
    assert_eq!(state.interpolation(), 0.5);
    assert_eq!(model.vertex_positions(), vec![Vec3::splat(2.0); 3]);
    assert_eq!(model.vertex_normals(), vec![Vec3::Z; 3]);
}

#[test]
fn test_unknown_name_keeps_playing() {
    let mut model = walking_model();
    model.set_animation("walk").unwrap();
    model.tick(0.75);
    let before = model.state().clone();

    assert_eq!(
        model.set_animation("dance").unwrap_err(),
        AnimError::UnknownAnimation("dance".to_string())
    );
    assert_eq!(model.state(), &before);
    assert_eq!(model.state().playback(), PlaybackState::Playing(0));
}

#[test]
fn test_standard_table_on_full_model() {
    let mut model = Md2Model::load(&model_bytes(199)).unwrap();
    assert_eq!(model.animation_names().len(), 21);

    model.set_animation("run").unwrap();
    model.tick(0.35);
    assert_eq!(model.state().current_frame(), 43);
    assert_eq!(model.state().next_frame(), 44);
    assert!((model.state().interpolation() - 0.5).abs() < 1e-3);
}

#[test]
fn test_death_holds_last_frame() {
    let mut model = Md2Model::load(&model_bytes(199)).unwrap();
    model.set_animation("death_fall_back").unwrap();
    model.tick(10.0);
    assert!(model.state().is_finished());
    assert_eq!(model.state().current_frame(), 183);
    assert_eq!(model.vertex_positions()[0], Vec3::splat(367.0));
}

#[test]
fn test_partial_table_on_short_model() {
    let model = Md2Model::load(&model_bytes(46)).unwrap();
    assert_eq!(model.animation_names(), vec!["stand", "run"]);
}

proptest! {
    #[test]
    fn prop_playback_stays_in_range(
        fps in prop_oneof![Just(0.0f32), 0.5f32..60.0],
        once in any::<bool>(),
        deltas in prop::collection::vec(-1.0f32..5.0, 1..40),
    ) {
        let mut animation = Animation::new("seq", 2, 6, fps);
        if once {
            animation = animation.once();
        }
        let table = AnimationTable::new(vec![animation]);
        let mut model = Md2Model::load_with_animations(&model_bytes(8), table).unwrap();
        model.set_animation("seq").unwrap();

        for delta in deltas {
            model.tick(delta);
            let state = model.state();
            prop_assert!((0.0..1.0).contains(&state.interpolation()));
            prop_assert!((2..=6).contains(&state.current_frame()));
            prop_assert!((2..=6).contains(&state.next_frame()));
            prop_assert_eq!(model.vertex_positions().len(), 3);
        }
    }
}
