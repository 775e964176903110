//! SVG markup backend
//!
//! Retained backend that records each element as an SVG `<path>` and wraps
//! the collected markup in an `<svg>` document on [`SvgBackend::finish`].
//! Gradient paints become `<defs>` entries referenced by `url(#id)`, with
//! the texture's current affine matrix as `gradientTransform`.
//!
//! Coordinates are emitted with 3-decimal precision, origin-centered; the
//! viewBox places (0, 0) mid-document to match the projection.

use plano_core::render::RenderBackend;
use plano_core::texture::{Gradient, Texture};
use plano_core::{PaintRef, Vector};

/// Records draw ops as SVG markup.
#[derive(Debug, Default)]
pub struct SvgBackend {
    width: f64,
    height: f64,
    path_data: String,
    stroke_attrs: Option<(String, f64)>,
    fill_attr: Option<String>,
    elements: Vec<String>,
    defs: Vec<String>,
    gradient_count: usize,
}

impl SvgBackend {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ..Default::default() }
    }

    /// Elements recorded so far, one `<path>` string each.
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn clear(&mut self) {
        self.path_data.clear();
        self.stroke_attrs = None;
        self.fill_attr = None;
        self.elements.clear();
        self.defs.clear();
        self.gradient_count = 0;
    }

    /// Wrap everything recorded so far in an `<svg>` document.
    pub fn finish(&self) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
             viewBox=\"{} {} {} {}\">",
            fmt(self.width),
            fmt(self.height),
            fmt(-self.width / 2.0),
            fmt(-self.height / 2.0),
            fmt(self.width),
            fmt(self.height),
        );
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            for def in &self.defs {
                svg.push_str(def);
            }
            svg.push_str("</defs>");
        }
        for element in &self.elements {
            svg.push_str(element);
        }
        svg.push_str("</svg>");
        tracing::debug!(elements = self.elements.len(), defs = self.defs.len(), "svg assembled");
        svg
    }

    /// Resolve a paint to an attribute value, registering gradient defs.
    fn paint_attr(&mut self, paint: &PaintRef<'_>) -> String {
        match paint {
            PaintRef::Color(color) => (*color).to_string(),
            PaintRef::Texture(texture) => {
                let id = format!("plano-gradient-{}", self.gradient_count);
                self.gradient_count += 1;
                self.defs.push(gradient_def(&id, texture));
                format!("url(#{id})")
            }
        }
    }
}

impl RenderBackend for SvgBackend {
    fn begin_path(&mut self) {
        self.path_data.clear();
        self.stroke_attrs = None;
        self.fill_attr = None;
    }

    fn move_to(&mut self, point: Vector) {
        self.path_data.push_str(&format!("M{},{}", fmt(point.x), fmt(point.y)));
    }

    fn line_to(&mut self, point: Vector) {
        self.path_data.push_str(&format!("L{},{}", fmt(point.x), fmt(point.y)));
    }

    fn curve_to(&mut self, cp0: Vector, cp1: Vector, end: Vector) {
        self.path_data.push_str(&format!(
            "C{},{} {},{} {},{}",
            fmt(cp0.x),
            fmt(cp0.y),
            fmt(cp1.x),
            fmt(cp1.y),
            fmt(end.x),
            fmt(end.y),
        ));
    }

    fn close_path(&mut self) {
        self.path_data.push('Z');
    }

    fn stroke(&mut self, enabled: bool, paint: PaintRef<'_>, width: f64) {
        if enabled && width > 0.0 {
            let attr = self.paint_attr(&paint);
            self.stroke_attrs = Some((attr, width));
        }
    }

    fn fill(&mut self, enabled: bool, paint: PaintRef<'_>) {
        if enabled {
            let attr = self.paint_attr(&paint);
            self.fill_attr = Some(attr);
        }
    }

    fn end_element(&mut self) {
        let mut element = format!("<path d=\"{}\"", self.path_data);
        match &self.fill_attr {
            Some(attr) => element.push_str(&format!(" fill=\"{attr}\"")),
            None => element.push_str(" fill=\"none\""),
        }
        if let Some((attr, width)) = &self.stroke_attrs {
            element.push_str(&format!(
                " stroke=\"{attr}\" stroke-width=\"{}\" \
                 stroke-linecap=\"round\" stroke-linejoin=\"round\"",
                fmt(*width),
            ));
        }
        element.push_str("/>");
        self.elements.push(element);
        self.path_data.clear();
        self.stroke_attrs = None;
        self.fill_attr = None;
    }
}

fn gradient_def(id: &str, texture: &Texture) -> String {
    let m = texture.matrix();
    let transform = format!(
        "matrix({} {} {} {} {} {})",
        fmt(m[0]),
        fmt(m[1]),
        fmt(m[2]),
        fmt(m[3]),
        fmt(m[4]),
        fmt(m[5]),
    );
    let mut stops = String::new();
    for stop in &texture.color_stops {
        stops.push_str(&format!(
            "<stop offset=\"{}\" stop-color=\"{}\"/>",
            fmt(stop.offset),
            stop.color,
        ));
    }
    match texture.gradient {
        Gradient::Linear { x1, y1, x2, y2 } => format!(
            "<linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" \
             gradientTransform=\"{transform}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">\
             {stops}</linearGradient>",
            fmt(x1),
            fmt(y1),
            fmt(x2),
            fmt(y2),
        ),
        Gradient::Radial { fx, fy, fr, cx, cy, r } => format!(
            "<radialGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" \
             gradientTransform=\"{transform}\" fx=\"{}\" fy=\"{}\" fr=\"{}\" \
             cx=\"{}\" cy=\"{}\" r=\"{}\">{stops}</radialGradient>",
            fmt(fx),
            fmt(fy),
            fmt(fr),
            fmt(cx),
            fmt(cy),
            fmt(r),
        ),
    }
}

/// 3-decimal rounding, shortest decimal form.
fn fmt(value: f64) -> String {
    let rounded = plano_core::math::round3(value);
    // -0 would leak a sign into the markup
    if rounded == 0.0 { "0".to_string() } else { format!("{rounded}") }
}

#[cfg(test)]
mod tests {
    use plano_core::texture::{ColorStop, Gradient, TextureOptions};
    use plano_core::{EllipseOptions, Paint, Placement, RectOptions, Scene, Style, Vector};

    use super::*;

    #[test]
    fn stroked_rect_becomes_one_path() {
        let mut scene = Scene::new();
        let rect = scene
            .add_rect(None, RectOptions { width: 2.0, height: 2.0, ..Default::default() })
            .unwrap();
        scene.update_graph(rect).unwrap();

        let mut backend = SvgBackend::new(64.0, 64.0);
        scene.render_graph(rect, &mut backend).unwrap();

        assert_eq!(backend.elements().len(), 1);
        let path = &backend.elements()[0];
        assert!(path.starts_with("<path d=\"M-1,-1"), "unexpected markup: {path}");
        assert!(path.contains('Z'));
        assert!(path.contains("fill=\"none\""));
        assert!(path.contains("stroke=\"#333\" stroke-width=\"1\""));
        assert!(path.contains("stroke-linecap=\"round\""));
    }

    #[test]
    fn filled_unstroked_ellipse_omits_stroke() {
        let mut scene = Scene::new();
        let ellipse = scene
            .add_ellipse(
                None,
                EllipseOptions {
                    diameter: 2.0,
                    style: Style {
                        stroke: 0.0,
                        fill: true,
                        color: Paint::from("#e62"),
                        closed: false,
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .unwrap();
        scene.update_graph(ellipse).unwrap();

        let mut backend = SvgBackend::new(64.0, 64.0);
        scene.render_graph(ellipse, &mut backend).unwrap();

        let path = &backend.elements()[0];
        assert!(path.contains("fill=\"#e62\""));
        assert!(!path.contains("stroke="));
    }

    #[test]
    fn coordinates_round_to_three_decimals() {
        let mut scene = Scene::new();
        let rect = scene
            .add_rect(
                None,
                RectOptions {
                    width: 2.0,
                    height: 2.0,
                    place: Placement::at(Vector::new(1.0 / 3.0, 0.0, 0.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        scene.update_graph(rect).unwrap();

        let mut backend = SvgBackend::new(64.0, 64.0);
        scene.render_graph(rect, &mut backend).unwrap();
        // -1 + 1/3 = -0.666...
        assert!(backend.elements()[0].contains("M-0.667,-1"));
    }

    #[test]
    fn gradient_fill_lands_in_defs() {
        let mut scene = Scene::new();
        let texture = scene.add_texture(TextureOptions {
            gradient: Gradient::Linear { x1: 0.0, y1: 0.0, x2: 2.0, y2: 0.0 },
            color_stops: vec![ColorStop::new(0.0, "#e62"), ColorStop::new(1.0, "#636")],
            src: None,
            dst: None,
        });
        let ellipse = scene
            .add_ellipse(
                None,
                EllipseOptions {
                    diameter: 2.0,
                    style: Style {
                        stroke: 0.0,
                        fill: true,
                        color: Paint::Texture(texture),
                        closed: false,
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .unwrap();
        scene.update_graph(ellipse).unwrap();

        let mut backend = SvgBackend::new(64.0, 64.0);
        scene.render_graph(ellipse, &mut backend).unwrap();
        let svg = backend.finish();

        assert!(svg.contains("<defs><linearGradient id=\"plano-gradient-0\""));
        assert!(svg.contains("gradientTransform=\"matrix(1 0 0 1 0 0)\""));
        assert!(svg.contains("stop-color=\"#636\""));
        assert!(svg.contains("fill=\"url(#plano-gradient-0)\""));
    }

    #[test]
    fn finish_wraps_a_centered_viewbox() {
        let backend = SvgBackend::new(240.0, 180.0);
        let svg = backend.finish();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("viewBox=\"-120 -90 240 180\""));
        assert!(svg.ends_with("</svg>"));
    }
}
