use super::*;
use crate::operations::{
    BrightnessOperation, ContrastOperation, CropOperation, FlipOperation, FramesOperation,
    RotationOperation, SaturationOperation,
};

fn stack_of(ops: Vec<Box<dyn Operation>>) -> OperationStack {
    let mut s = OperationStack::new();
    for op in ops {
        s.insert(op, None);
    }
    s
}

#[test]
fn categories_stay_grouped_regardless_of_insertion_order() {
    let s = stack_of(vec![
        Box::new(FramesOperation::default()),
        Box::new(BrightnessOperation::default()),
        Box::new(CropOperation::default()),
        Box::new(ContrastOperation::default()),
        Box::new(RotationOperation::default()),
    ]);
    assert_eq!(
        s.identifiers(),
        vec!["crop", "rotation", "brightness", "contrast", "frames"]
    );
}

#[test]
fn preferred_index_is_clamped_into_category_block() {
    let mut s = stack_of(vec![
        Box::new(CropOperation::default()),
        Box::new(BrightnessOperation::default()),
        Box::new(FramesOperation::default()),
    ]);
    s.insert(Box::new(ContrastOperation::default()), Some(0));
    assert_eq!(s.identifiers(), vec!["crop", "contrast", "brightness", "frames"]);

    s.insert(Box::new(SaturationOperation::default()), Some(99));
    assert_eq!(
        s.identifiers(),
        vec!["crop", "contrast", "brightness", "saturation", "frames"]
    );

    s.insert(Box::new(FlipOperation::default()), Some(1));
    assert_eq!(s.index_of("flip"), Some(1));
}

#[test]
fn same_identifier_replaces_in_place() {
    let mut s = stack_of(vec![
        Box::new(BrightnessOperation::default()),
        Box::new(ContrastOperation::default()),
    ]);
    let mut brighter = BrightnessOperation::default();
    brighter.set_brightness(0.3).unwrap();
    let old = s.insert(Box::new(brighter), Some(5)).unwrap();
    assert!(old.is_identity());
    assert_eq!(s.identifiers(), vec!["brightness", "contrast"]);
    assert_eq!(
        s.get_as::<BrightnessOperation>("brightness")
            .unwrap()
            .brightness(),
        0.3
    );
}

#[test]
fn remove_and_lookup() {
    let mut s = stack_of(vec![Box::new(FlipOperation::default())]);
    assert!(s.contains("flip"));
    assert!(s.remove("crop").is_none());
    assert!(s.remove("flip").is_some());
    assert!(s.is_empty());
}

#[test]
fn typed_mutable_access() {
    let mut s = stack_of(vec![Box::new(FlipOperation::default())]);
    s.get_as_mut::<FlipOperation>("flip")
        .unwrap()
        .set_horizontal(true);
    assert!(!s.get("flip").unwrap().is_identity());
    assert!(s.get_as_mut::<CropOperation>("flip").is_none());
}
