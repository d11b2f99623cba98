// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a diffed mark set.

use std::collections::HashMap;
use std::fmt::Write as _;

use chartwell_core::{MarkDiff, MarkId, MarkPayload, TextAnchor, TextBaseline};
use kurbo::Rect;
use peniko::Brush;

/// Marks kept alive across diffs, keyed by id.
#[derive(Debug, Default)]
pub(crate) struct SvgScene {
    marks: HashMap<MarkId, (i32, MarkPayload)>,
}

impl SvgScene {
    pub(crate) fn apply_diffs(&mut self, diffs: &[MarkDiff]) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter {
                    id, z_index, new, ..
                } => {
                    self.marks.insert(*id, (*z_index, (**new).clone()));
                }
                MarkDiff::Update {
                    id,
                    new_z_index,
                    new,
                    ..
                } => {
                    self.marks.insert(*id, (*new_z_index, (**new).clone()));
                }
                MarkDiff::Exit { id, .. } => {
                    self.marks.remove(id);
                }
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.marks.len()
    }

    /// Renders every mark in `(z_index, id)` order inside `view_box`.
    pub(crate) fn to_svg_string(&self, view_box: Rect) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        );

        let mut ordered: Vec<(&MarkId, &(i32, MarkPayload))> = self.marks.iter().collect();
        ordered.sort_by_key(|(id, (z, _))| (*z, id.0));

        for (_, (_, payload)) in ordered {
            match payload {
                MarkPayload::Rect(r) => {
                    let _ = write!(
                        out,
                        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                        r.rect.x0,
                        r.rect.y0,
                        r.rect.width(),
                        r.rect.height(),
                    );
                    write_paint_attr(&mut out, "fill", &r.fill);
                    out.push_str("/>\n");
                }
                MarkPayload::Text(t) => {
                    let baseline = match t.baseline {
                        TextBaseline::Middle => "middle",
                        TextBaseline::Alphabetic => "alphabetic",
                        TextBaseline::Hanging => "hanging",
                        TextBaseline::Ideographic => "ideographic",
                    };
                    let anchor = match t.anchor {
                        TextAnchor::Start => "start",
                        TextAnchor::Middle => "middle",
                        TextAnchor::End => "end",
                    };
                    let _ = write!(
                        out,
                        r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{baseline}" text-anchor="{anchor}""#,
                        t.pos.x, t.pos.y, t.font_size
                    );
                    if t.angle != 0.0 {
                        let _ = write!(
                            out,
                            r#" transform="rotate({} {} {})""#,
                            t.angle, t.pos.x, t.pos.y
                        );
                    }
                    write_paint_attr(&mut out, "fill", &t.fill);
                    let _ = writeln!(out, ">{}</text>", escape_xml(&t.text));
                }
                MarkPayload::Path(p) => {
                    let _ = write!(out, r#"<path d="{}""#, p.path.to_svg());
                    write_paint_attr(&mut out, "fill", &p.fill);
                    if p.stroke_width > 0.0 {
                        write_paint_attr(&mut out, "stroke", &p.stroke);
                        let _ = write!(out, r#" stroke-width="{}""#, p.stroke_width);
                    }
                    out.push_str("/>\n");
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            if rgba.a == 0 {
                return ("none".to_string(), None);
            }
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = (rgba.a != 255).then(|| f64::from(rgba.a) / 255.0);
            (fill, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
