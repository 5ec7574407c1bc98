//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.05, 0.06, 0.16, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.18, 0.10, 0.28, 1.0];
    pub const STREAK: [f32; 4] = [0.7, 0.8, 1.0, 0.35];
    pub const GROUND: [f32; 4] = [0.22, 0.16, 0.12, 1.0];
    pub const GROUND_TOP: [f32; 4] = [0.30, 0.75, 0.35, 1.0];
    pub const BLOCK: [f32; 4] = [0.45, 0.40, 0.62, 1.0];
    pub const BLOCK_EDGE: [f32; 4] = [0.65, 0.60, 0.85, 1.0];
    pub const SPIKE: [f32; 4] = [0.85, 0.85, 0.90, 1.0];
    pub const FLAG_POLE: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
    pub const FLAG: [f32; 4] = [1.0, 0.3, 0.35, 1.0];
    pub const ORB: [f32; 4] = [1.0, 0.85, 0.3, 1.0];
    pub const ORB_GLOW: [f32; 4] = [1.0, 0.8, 0.2, 0.25];
    pub const ENEMY_TRICK: [f32; 4] = [0.95, 0.35, 0.55, 1.0];
    pub const ENEMY_HYPER: [f32; 4] = [0.35, 0.85, 0.95, 1.0];
    pub const PLAYER: [f32; 4] = [0.95, 0.95, 1.0, 1.0];
    pub const PLAYER_FLY: [f32; 4] = [0.6, 1.0, 0.8, 1.0];
    pub const TRAIL: [f32; 4] = [0.6, 0.8, 1.0, 0.6];
    pub const HUD_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
    pub const HUD_PIP: [f32; 4] = [1.0, 0.85, 0.3, 1.0];
    pub const HUD_PIP_EMPTY: [f32; 4] = [0.4, 0.4, 0.45, 0.8];
    pub const FLIGHT_BAR: [f32; 4] = [0.4, 1.0, 0.7, 0.9];
    pub const DEAD_TINT: [f32; 4] = [0.6, 0.0, 0.0, 0.35];
    pub const WON_TINT: [f32; 4] = [1.0, 0.9, 0.4, 0.25];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

    /// Same color with alpha scaled by `a`
    pub fn with_alpha(color: [f32; 4], a: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * a]
    }
}
