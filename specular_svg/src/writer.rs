use std::{fmt::Write as _, fs, io, path::Path};

use specular::{Bounds, Float, Vector};
use specular_layouts::Scene;

use crate::{Page, Style};

/// Maps scene coordinates onto the page: uniform scale into the margined
/// area, centered on both axes.
struct Fit {
    scale: Float,
    offset: Vector<2>,
}

impl Fit {
    fn new(page: &Page, bounds: &Bounds) -> Self {
        let scale =
            (page.inner_width_px() / bounds.width()).min(page.inner_height_px() / bounds.height());
        let fitted = Vector::<2>::new(bounds.width(), bounds.height()) * scale;
        let inner = Vector::<2>::new(page.inner_width_px(), page.inner_height_px());
        let margin = Vector::<2>::new(page.margin_px(), page.margin_px());
        Self {
            scale,
            offset: margin + (inner - fitted) * 0.5 - bounds.min * scale,
        }
    }

    fn apply(&self, p: &Vector<2>) -> Vector<2> {
        p * self.scale + self.offset
    }
}

/// Render a scene as a standalone SVG document.
///
/// `beams` are the traced polylines, one per entry ray; scenes that carry
/// a committed beam pass it here unchanged. Draw order is fill, border,
/// mirrors, then beams, so the laser always plots on top.
#[must_use]
pub fn render(page: &Page, style: &Style, scene: &Scene, beams: &[Vec<Vector<2>>]) -> String {
    let fit = Fit::new(page, &scene.bounds);
    let mut svg = String::new();

    let (w, h) = (page.width_px(), page.height_px());
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}px" height="{h:.2}px" viewBox="0 0 {w:.2} {h:.2}">"#
    );
    svg.push('\n');

    if let Some(fill) = &style.fill {
        for beam in beams {
            let _ = write!(
                svg,
                r#"<polygon points="{}" fill="{fill}" stroke="none"/>"#,
                points_attr(beam, &fit)
            );
            svg.push('\n');
        }
    }

    let _ = write!(
        svg,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{}" stroke-width="{}"/>"#,
        page.margin_px(),
        page.margin_px(),
        page.inner_width_px(),
        page.inner_height_px(),
        style.border_color,
        style.border_weight,
    );
    svg.push('\n');

    for mirror in &scene.mirrors {
        let [a, b] = mirror.endpoints();
        let (a, b) = (fit.apply(&a), fit.apply(&b));
        let _ = write!(
            svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}" stroke-linecap="round"/>"#,
            a.x, a.y, b.x, b.y, style.mirror_color, style.mirror_weight,
        );
        svg.push('\n');
    }

    for beam in beams {
        let _ = write!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
            points_attr(beam, &fit),
            style.laser_color,
            style.laser_weight,
        );
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

fn points_attr(points: &[Vector<2>], fit: &Fit) -> String {
    let mut attr = String::new();
    for p in points {
        let p = fit.apply(p);
        if !attr.is_empty() {
            attr.push(' ');
        }
        let _ = write!(attr, "{:.2},{:.2}", p.x, p.y);
    }
    attr
}

pub fn write_file(path: impl AsRef<Path>, svg: &str) -> io::Result<()> {
    fs::write(path, svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use specular_layouts::Solo;

    fn scene_and_beam() -> (Scene, Vec<Vec<Vector<2>>>) {
        let scene = Scene::solo(Bounds::from_size(800.0, 600.0), &Solo::default());
        let beam = vec![vec![
            Vector::<2>::new(0.0, 300.0),
            Vector::<2>::new(400.0, 300.0),
            Vector::<2>::new(400.0, 600.0),
        ]];
        (scene, beam)
    }

    #[test]
    fn document_has_the_page_pixel_size() {
        let (scene, beam) = scene_and_beam();
        let svg = render(&Page::a3_export(), &Style::default(), &scene, &beam);
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"width="1587.39px""#));
        assert!(svg.contains(r#"height="1122.51px""#));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn one_line_per_mirror_and_one_polyline_per_beam() {
        let (scene, beam) = scene_and_beam();
        let svg = render(&Page::a3_preview(), &Style::default(), &scene, &beam);
        assert_eq!(svg.matches("<line ").count(), scene.mirrors.len());
        assert_eq!(svg.matches("<polyline ").count(), 1);
        assert_eq!(svg.matches("<rect ").count(), 1);
        assert!(!svg.contains("<polygon "));
    }

    #[test]
    fn fill_adds_a_polygon_under_the_beam() {
        let (scene, beam) = scene_and_beam();
        let style = Style {
            fill: Some("#f3e9d2".to_owned()),
            ..Style::default()
        };
        let svg = render(&Page::a3_preview(), &style, &scene, &beam);
        assert_eq!(svg.matches("<polygon ").count(), 1);
        assert!(svg.find("<polygon").unwrap() < svg.find("<polyline").unwrap());
    }

    #[test]
    fn scene_coordinates_land_inside_the_margins() {
        let (scene, beam) = scene_and_beam();
        let page = Page::a3_preview();
        let fit = Fit::new(&page, &scene.bounds);
        for p in &beam[0] {
            let q = fit.apply(p);
            assert!(q.x >= page.margin_px() - 1e-9 && q.x <= page.width_px() - page.margin_px() + 1e-9);
            assert!(q.y >= page.margin_px() - 1e-9 && q.y <= page.height_px() - page.margin_px() + 1e-9);
        }
    }
}
