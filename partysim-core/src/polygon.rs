//! Closed 2D outlines handed to renderers as point lists

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    points: Vec<Vec2>,
    color: Vec3,
    /// Interior obstacle (drawn from inside) rather than an outer boundary
    is_inner: bool,
}

impl Polygon2D {
    /// Axis-aligned box with its lower-left corner at `position`
    pub fn build_box(color: Vec3, position: Vec2, width: f32, height: f32, is_inner: bool) -> Self {
        Self {
            points: vec![
                position,
                position + Vec2::new(width, 0.0),
                position + Vec2::new(width, height),
                position + Vec2::new(0.0, height),
            ],
            color,
            is_inner,
        }
    }

    /// Regular polygon with `segments` vertices approximating a circle
    pub fn build_circle(color: Vec3, center: Vec2, radius: f32, segments: usize, is_inner: bool) -> Self {
        let points = (0..segments)
            .map(|i| {
                let angle = TAU / segments as f32 * i as f32;
                center + Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self {
            points,
            color,
            is_inner,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn is_inner(&self) -> bool {
        self.is_inner
    }
}
