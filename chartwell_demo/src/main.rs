// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders every chartwell component to SVG and collects them in an HTML report.
//!
//! Usage: `chartwell_demo [THEME_OVERRIDES.json]`. Set `RUST_LOG=debug` to follow signals,
//! commits and degraded layouts.

mod svg;

use std::error::Error;

use chartwell_charts::gantt::{Connector, ConnectorType, ItemId, TaskItem, Timeline};
use chartwell_charts::pie::{Pie, PiePoint};
use chartwell_charts::{
    GridLayout, GridScale, LinearScale, MS_IN_DAY, OrdinalScale, RadarGridTheme, RadialGrid,
    Theme, ThemeOverrides, merge,
};
use chartwell_core::{ContainerId, Drawable, Scene};
use kurbo::{Rect, Vec2};
use tracing_subscriber::EnvFilter;

const VIEW: Rect = Rect::new(0.0, 0.0, 480.0, 320.0);

struct Section {
    title: &'static str,
    svg: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let theme = load_theme(std::env::args().nth(1))?;

    let sections = vec![
        radar_demo(&theme)?,
        gantt_demo(&theme)?,
        pie_demo(&theme)?,
        donut_demo(&theme)?,
        pie3d_demo(&theme)?,
    ];

    let mut html = String::from(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>chartwell demo</title></head><body>\n",
    );
    for section in &sections {
        html.push_str(&format!("<h2>{}</h2>\n{}\n", section.title, section.svg));
    }
    html.push_str("</body></html>\n");
    std::fs::write("chartwell_demo.html", html)?;
    tracing::info!(sections = sections.len(), "wrote chartwell_demo.html");
    Ok(())
}

fn load_theme(path: Option<String>) -> Result<Theme, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(Theme::default());
    };
    let text = std::fs::read_to_string(&path)?;
    let overrides: ThemeOverrides = serde_json::from_str(&text)?;
    tracing::info!(%path, "applying theme overrides");
    Ok(merge(&Theme::default(), &overrides))
}

/// Diffs `drawable`'s marks into a fresh scene and renders them.
fn render(title: &'static str, drawable: &impl Drawable) -> Section {
    let mut scene = Scene::new();
    let diffs = scene.tick(drawable.marks().iter().cloned());
    let mut svg = svg::SvgScene::default();
    svg.apply_diffs(&diffs);
    tracing::debug!(title, marks = svg.len(), "rendered");
    Section {
        title,
        svg: svg.to_svg_string(VIEW),
    }
}

fn radar_demo(theme: &Theme) -> Result<Section, Box<dyn Error>> {
    let mut grid = RadialGrid::new(
        1,
        RadarGridTheme {
            layout: GridLayout::Circuit,
            ..theme.radar_grid
        },
    );
    grid.base_mut().set_container(Some(ContainerId(0)));
    grid.base_mut().set_parent_bounds(Some(VIEW.inset(-20.0)));
    grid.set_x_scale(Some(OrdinalScale::new([
        "speed", "range", "cost", "comfort", "safety", "style",
    ])));
    grid.set_y_scale(Some(GridScale::Linear(LinearScale::new(0.0, 100.0))));
    grid.draw()?;
    Ok(render("Radar grid", &grid))
}

fn gantt_demo(theme: &Theme) -> Result<Section, Box<dyn Error>> {
    let day = MS_IN_DAY;
    let start = 1_735_689_600_000.0;
    let mut timeline = Timeline::new(2, theme.timeline.clone());
    timeline.base_mut().set_container(Some(ContainerId(0)));
    timeline.base_mut().set_parent_bounds(Some(VIEW));

    let tree = timeline.tree_mut();
    tree.add(None, TaskItem::new(ItemId(1), "Release"))?;
    tree.add(
        Some(ItemId(1)),
        TaskItem::new(ItemId(2), "Design")
            .with_dates(start, start + 4.0 * day)
            .with_progress(1.0)
            .with_connector(Connector::new(ItemId(3), ConnectorType::FinishStart)),
    )?;
    tree.add(
        Some(ItemId(1)),
        TaskItem::new(ItemId(3), "Build")
            .with_dates(start + 5.0 * day, start + 12.0 * day)
            .with_baseline(start + 4.0 * day, start + 10.0 * day)
            .with_progress(0.4)
            .with_connector(Connector::new(ItemId(4), ConnectorType::FinishStart)),
    )?;
    tree.add(
        Some(ItemId(1)),
        TaskItem::new(ItemId(4), "Launch").with_start(start + 14.0 * day),
    )?;

    timeline.draw()?;
    timeline.scale_mut().fit_all();
    timeline.draw()?;

    // Drag "Build" one bar-width to the right, as a pointer would.
    if let Some(bar) = timeline.bars().iter().find(|b| b.item == ItemId(3)).copied() {
        let grip = bar.bounds.center();
        timeline.pointer_down(grip);
        timeline.pointer_move(grip + Vec2::new(30.0, 0.0), 0.0);
        match timeline.pointer_up(grip + Vec2::new(30.0, 0.0)) {
            Ok(outcome) => tracing::info!(?outcome, "drag committed"),
            Err(error) => tracing::warn!(%error, "drag abandoned"),
        }
        timeline.draw()?;
    }
    Ok(render("Gantt timeline", &timeline))
}

fn points(values: &[(&str, f64)]) -> Vec<PiePoint> {
    values
        .iter()
        .map(|&(name, value)| PiePoint::new(name, value))
        .collect()
}

fn sales() -> Vec<PiePoint> {
    points(&[
        ("Coffee", 42.0),
        ("Tea", 18.0),
        ("Juice", 9.0),
        ("Water", 25.0),
        ("Soda", 6.0),
    ])
}

fn pie_demo(theme: &Theme) -> Result<Section, Box<dyn Error>> {
    let mut pie = Pie::new(3, theme.pie.clone());
    pie.base_mut().set_container(Some(ContainerId(0)));
    pie.base_mut().set_parent_bounds(Some(VIEW));
    pie.set_data(sales());
    pie.draw()?;
    pie.toggle_explode(0);
    pie.draw()?;
    Ok(render("Pie, first slice exploded", &pie))
}

fn donut_demo(theme: &Theme) -> Result<Section, Box<dyn Error>> {
    let mut pie_theme = theme.pie.clone();
    pie_theme.inner_radius = chartwell_charts::Size::Percent(50.0);
    pie_theme.outside_labels = true;
    let mut pie = Pie::new(4, pie_theme);
    pie.base_mut().set_container(Some(ContainerId(0)));
    pie.base_mut().set_parent_bounds(Some(VIEW));
    pie.set_data(points(&[
        ("Rent", 40.0),
        ("Food", 22.0),
        ("Transport", 3.0),
        ("Phone", 1.5),
        ("Internet", 1.5),
        ("Gym", 2.0),
        ("Books", 1.0),
        ("Savings", 29.0),
    ]));
    pie.draw()?;
    if pie.labels_degraded() {
        tracing::warn!("donut labels were partially dropped");
    }
    Ok(render("Donut with outside labels", &pie))
}

fn pie3d_demo(theme: &Theme) -> Result<Section, Box<dyn Error>> {
    let mut pie = Pie::new(5, theme.pie.clone());
    pie.set_theme3d(theme.pie3d);
    pie.set_mode3d(true);
    pie.base_mut().set_container(Some(ContainerId(0)));
    pie.base_mut().set_parent_bounds(Some(VIEW));
    pie.set_data(sales());
    pie.select(1);
    pie.draw()?;
    Ok(render("3D pie", &pie))
}
