//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in logical screen units.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    gradient_rect(out, x, y, w, h, color, color);
}

/// Rectangle shaded from `top` to `bottom`
pub fn gradient_rect(
    out: &mut Vec<Vertex>,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    top: [f32; 4],
    bottom: [f32; 4],
) {
    let (x1, y1) = (x + w, y + h);
    out.push(Vertex::new(x, y, top));
    out.push(Vertex::new(x1, y, top));
    out.push(Vertex::new(x, y1, bottom));

    out.push(Vertex::new(x1, y, top));
    out.push(Vertex::new(x1, y1, bottom));
    out.push(Vertex::new(x, y1, bottom));
}

pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Ring (hollow circle) fading from `inner_color` to `outer_color`
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    inner_color: [f32; 4],
    outer_color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let (s1, c1) = theta1.sin_cos();
        let (s2, c2) = theta2.sin_cos();
        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        // Two triangles per segment
        out.push(Vertex::new(inner1.x, inner1.y, inner_color));
        out.push(Vertex::new(outer1.x, outer1.y, outer_color));
        out.push(Vertex::new(inner2.x, inner2.y, inner_color));

        out.push(Vertex::new(inner2.x, inner2.y, inner_color));
        out.push(Vertex::new(outer1.x, outer1.y, outer_color));
        out.push(Vertex::new(outer2.x, outer2.y, outer_color));
    }
}

/// Tapered ribbon through `points` (oldest first), fading toward the tail
pub fn trail(out: &mut Vec<Vertex>, points: &[Vec2], width: f32, color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }

    let n = points.len() as f32;
    for i in 0..points.len() - 1 {
        let p1 = points[i];
        let p2 = points[i + 1];

        // Tail (index 0) is thin and transparent, head is full
        let t1 = (i + 1) as f32 / n;
        let t2 = (i + 2) as f32 / n;
        let color1 = [color[0], color[1], color[2], color[3] * t1];
        let color2 = [color[0], color[1], color[2], color[3] * t2];
        let w1 = width * 0.5 * t1;
        let w2 = width * 0.5 * t2;

        let dir = (p2 - p1).normalize_or_zero();
        if dir == Vec2::ZERO {
            continue;
        }
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x);

        let v1a = p1 + perp * w1;
        let v1b = p1 - perp * w1;
        let v2a = p2 + perp * w2;
        let v2b = p2 - perp * w2;

        out.push(Vertex::new(v1a.x, v1a.y, color1));
        out.push(Vertex::new(v1b.x, v1b.y, color1));
        out.push(Vertex::new(v2a.x, v2a.y, color2));

        out.push(Vertex::new(v2a.x, v2a.y, color2));
        out.push(Vertex::new(v1b.x, v1b.y, color1));
        out.push(Vertex::new(v2b.x, v2b.y, color2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let mut out = Vec::new();
        rect(&mut out, 10.0, 20.0, 30.0, 40.0, [1.0; 4]);
        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_circle_segment_floor() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 5.0, [1.0; 4], 1);
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn test_trail_skips_degenerate() {
        let mut out = Vec::new();
        trail(&mut out, &[Vec2::ZERO], 4.0, [1.0; 4]);
        assert!(out.is_empty());
        // Stationary points produce no slivers
        trail(&mut out, &[Vec2::ONE, Vec2::ONE, Vec2::ONE], 4.0, [1.0; 4]);
        assert!(out.is_empty());
        trail(&mut out, &[Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)], 4.0, [1.0; 4]);
        assert_eq!(out.len(), 12);
    }
}
