// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenarios that drive whole components through several draws.

extern crate std;

use alloc::format;
use alloc::vec::Vec;

use chartwell_core::geometry::rects_intersect;
use chartwell_core::{ContainerId, Drawable, MarkId, MarkPayload};
use kurbo::{Rect, Vec2};

use crate::gantt::{
    CONNECTOR_MARKS, Connector, ConnectorType, EditError, ItemId, TaskItem, Timeline,
};
use crate::pie::{LABEL_MARKS, Pie, PiePoint};
use crate::theme::{PieOverrides, Size, Theme, ThemeOverrides, merge};
use crate::{
    DateTimeScale, FixedTextMeasurer, GridScale, LinearScale, OrdinalScale, RadialGrid,
    TextMeasurer,
};

fn assert_close(a: f64, b: f64, what: &str) {
    assert!((a - b).abs() < 1e-9, "{what}: {a} != {b}");
}

fn pie_of<M: TextMeasurer + core::fmt::Debug>(
    values: &[Option<f64>],
    theme: &Theme,
    measurer: M,
) -> Pie<M> {
    let mut pie = Pie::with_measurer(1, theme.pie.clone(), measurer);
    pie.base_mut().set_container(Some(ContainerId(0)));
    pie.base_mut()
        .set_parent_bounds(Some(Rect::new(0.0, 0.0, 500.0, 400.0)));
    pie.set_data(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| PiePoint::new(format!("point {i}"), *v))
            .collect(),
    );
    pie
}

fn small_labels() -> FixedTextMeasurer {
    FixedTextMeasurer {
        width: 36.0,
        height: 14.0,
    }
}

#[test]
fn exploding_and_restoring_a_slice_is_a_pure_toggle() {
    let values = [Some(10.0), Some(20.0), Some(30.0), Some(40.0)];
    let mut pie = pie_of(&values, &Theme::default(), small_labels());
    pie.draw().expect("first draw");
    let before = pie.slices()[2];
    let others: Vec<_> = pie.slices().iter().map(|s| s.bounds).collect();

    assert!(pie.toggle_explode(2));
    pie.draw().expect("exploded draw");
    assert!(pie.slices()[2].exploded);
    assert_ne!(pie.slices()[2].bounds, before.bounds);
    assert_eq!(pie.slices()[0].bounds, others[0], "other slices stay put");

    assert!(!pie.toggle_explode(2));
    pie.draw().expect("restored draw");
    assert_eq!(pie.slices()[2], before);
}

#[test]
fn sweeps_cover_the_circle_without_gaps() {
    let datasets: [&[Option<f64>]; 4] = [
        &[Some(1.0)],
        &[Some(3.0), None, Some(f64::NAN), Some(7.0), Some(-2.0), Some(0.5)],
        &[Some(0.001), Some(1000.0), Some(42.0)],
        &[Some(5.0); 12],
    ];
    for (n, values) in datasets.iter().enumerate() {
        for start_angle in [0.0, 45.0, -200.0] {
            let theme = merge(
                &Theme::default(),
                &ThemeOverrides {
                    pie: PieOverrides {
                        start_angle: Some(start_angle),
                        ..PieOverrides::default()
                    },
                    ..ThemeOverrides::default()
                },
            );
            let mut pie = pie_of(values, &theme, small_labels());
            pie.draw().expect("draw");
            let slices = pie.slices();
            assert_close(slices[0].start, start_angle - 90.0, "first start");
            let total: f64 = slices.iter().map(|s| s.sweep).sum();
            assert!((total - 360.0).abs() < 1e-9, "dataset {n}: {total}");
            for pair in slices.windows(2) {
                assert_close(pair[1].start, pair[0].start + pair[0].sweep, "continuity");
            }
        }
    }
}

#[test]
fn enabled_outside_labels_never_overlap_on_a_side() {
    let theme = merge(
        &Theme::default(),
        &ThemeOverrides {
            pie: PieOverrides {
                outside_labels: Some(true),
                ..PieOverrides::default()
            },
            ..ThemeOverrides::default()
        },
    );
    let datasets: [Vec<Option<f64>>; 3] = [
        (1..=12).map(|v| Some(f64::from(v))).collect(),
        [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 90.0]
            .iter()
            .map(|&v| Some(v))
            .collect(),
        [50.0, 2.0, 2.0, 2.0, 2.0, 50.0, 2.0, 2.0, 2.0]
            .iter()
            .map(|&v| Some(v))
            .collect(),
    ];
    for values in &datasets {
        for mode3d in [false, true] {
            let mut pie = pie_of(values, &theme, small_labels());
            pie.set_mode3d(mode3d);
            pie.select(0);
            pie.draw().expect("draw");
            let boxes: Vec<(bool, Rect)> = pie
                .labels()
                .iter()
                .filter(|l| l.visible)
                .map(|l| {
                    let right = l.anchor == chartwell_core::TextAnchor::Start;
                    let x0 = if right { l.position.x } else { l.position.x - 36.0 };
                    (
                        right,
                        Rect::new(x0, l.position.y - 7.0, x0 + 36.0, l.position.y + 7.0)
                            .inset(-1e-6),
                    )
                })
                .collect();
            for (i, (side_a, a)) in boxes.iter().enumerate() {
                for (side_b, b) in &boxes[i + 1..] {
                    if side_a == side_b {
                        assert!(!rects_intersect(*a, *b), "{a:?} overlaps {b:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn hopeless_labels_are_disabled_instead_of_looping() {
    let theme = merge(
        &Theme::default(),
        &ThemeOverrides {
            pie: PieOverrides {
                outside_labels: Some(true),
                radius: Some(Size::Pixels(20.0)),
                ..PieOverrides::default()
            },
            ..ThemeOverrides::default()
        },
    );
    let values: Vec<Option<f64>> = (1..=30).map(|v| Some(f64::from(v))).collect();
    let mut pie = pie_of(
        &values,
        &theme,
        FixedTextMeasurer {
            width: 200.0,
            height: 80.0,
        },
    );
    pie.draw().expect("draw");
    let visible = pie.labels().iter().filter(|l| l.visible).count();
    assert!(visible < values.len());
    let drawn_labels = pie
        .marks()
        .iter()
        .filter(|m| m.id.0 >= MarkId::compose(1, LABEL_MARKS).0)
        .count();
    assert_eq!(drawn_labels, visible);
}

fn gantt() -> Timeline {
    let mut timeline = Timeline::new(2, Theme::default().timeline);
    timeline.base_mut().set_container(Some(ContainerId(0)));
    timeline
        .base_mut()
        .set_parent_bounds(Some(Rect::new(0.0, 0.0, 1000.0, 300.0)));
    timeline.scale_mut().set_minimum(Some(0.0));
    timeline.scale_mut().set_maximum(Some(1000.0));
    let tree = timeline.tree_mut();
    tree.add(
        None,
        TaskItem::new(ItemId(1), "spec")
            .with_dates(100.0, 200.0)
            .with_connector(Connector::new(ItemId(2), ConnectorType::FinishStart)),
    )
    .expect("add");
    tree.add(None, TaskItem::new(ItemId(2), "code").with_dates(300.0, 450.0))
        .expect("add");
    tree.add(None, TaskItem::new(ItemId(3), "ship").with_start(500.0))
        .expect("add");
    timeline.draw().expect("draw");
    timeline.scale_mut().set_range(0.0, 1000.0);
    timeline.draw().expect("draw");
    timeline
}

#[test]
fn gantt_bars_and_connectors_follow_the_window() {
    let timeline = gantt();
    let bar = timeline.bars()[0].bounds;
    assert_eq!((bar.x0, bar.width()), (100.0, 100.0));
    let milestone = timeline.bars()[2].bounds;
    assert_eq!(milestone.center().x, 500.0);
    assert_eq!(milestone.height() / 2.0, 7.0);

    assert_eq!(timeline.connector_count(), 1);
    let line = timeline
        .marks()
        .iter()
        .find(|m| m.id == MarkId::compose(2, CONNECTOR_MARKS))
        .expect("connector line");
    let MarkPayload::Path(path) = &line.payload else {
        panic!("connectors are paths");
    };
    let Some(first) = path.path.elements().first().and_then(|el| el.end_point()) else {
        panic!("empty connector");
    };
    // Ends are snapped to the pixel grid.
    assert!((first.x - bar.x1).abs() <= 1.0, "{first:?} leaves the bar end");
    assert!((first.y - bar.center().y).abs() <= 1.0, "{first:?} leaves the bar middle");
}

#[test]
fn a_drag_that_resolves_to_nan_leaves_the_task_untouched() {
    let mut timeline = gantt();
    let before = timeline.tree().get(ItemId(2)).cloned().expect("task");
    let bar = timeline.bars()[1].bounds;
    let grip = bar.center();
    timeline.pointer_down(grip);
    timeline.pointer_move(grip + Vec2::new(120.0, 0.0), 0.0);
    timeline.scale_mut().set_range(400.0, 400.0);
    assert_eq!(
        timeline.pointer_up(grip + Vec2::new(120.0, 0.0)),
        Err(EditError::InvalidTimestamp)
    );
    assert_eq!(timeline.tree().get(ItemId(2)), Some(&before));
    assert!(timeline.gesture().is_idle());

    timeline.scale_mut().set_range(0.0, 1000.0);
    assert_eq!(timeline.draw(), Ok(true));
    assert_eq!(timeline.bars()[1].bounds, bar);
}

#[test]
fn date_scale_ratios_round_trip() {
    let mut scale = DateTimeScale::new();
    scale.set_minimum(Some(1_000.0));
    scale.set_maximum(Some(90_000.0));
    scale.set_range(5_000.0, 45_000.0);
    let mut last = f64::NEG_INFINITY;
    for step in 0..=40 {
        let v = 1_000.0 + f64::from(step) * 2_225.0;
        let ratio = scale.timestamp_to_ratio(v);
        assert!(ratio >= last, "monotonic at {v}");
        last = ratio;
        assert!((scale.ratio_to_timestamp(ratio) - v).abs() < 1e-6);
    }
}

#[test]
fn second_draws_do_nothing_for_every_component() {
    let mut pie = pie_of(&[Some(1.0), Some(2.0)], &Theme::default(), small_labels());
    assert_eq!(pie.draw(), Ok(true));
    assert_eq!(pie.draw(), Ok(false));

    let mut timeline = gantt();
    assert_eq!(timeline.draw(), Ok(false));

    let mut grid = RadialGrid::new(4, Theme::default().radar_grid);
    grid.base_mut().set_container(Some(ContainerId(0)));
    grid.base_mut()
        .set_parent_bounds(Some(Rect::new(0.0, 0.0, 200.0, 200.0)));
    grid.set_x_scale(Some(OrdinalScale::new(["a", "b", "c"])));
    grid.set_y_scale(Some(GridScale::Linear(LinearScale::new(0.0, 10.0))));
    assert_eq!(grid.draw(), Ok(true));
    assert_eq!(grid.draw(), Ok(false));
}
