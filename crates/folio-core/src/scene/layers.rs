//! Particle layer table and geometry generation for the starfield.

use crate::constants::{
    NEBULA_OPACITY_DARK, NEBULA_OPACITY_LIGHT, NEBULA_POINT_SIZE, NEBULA_PULSE_AMPLITUDE,
    NEBULA_PULSE_TIME_SCALE, STAR_OPACITY, STAR_POINT_SIZE,
};
use crate::theme::Theme;
use rand::prelude::*;
use std::f32::consts::PI;

/// Per-point vertex data uploaded once per layer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Stars,
    Nebula,
}

/// Spatial distribution of a layer's points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayerShape {
    /// Uniform box: `extent` wide and tall, `depth` deep, centred on origin.
    Field { extent: f32, depth: f32 },
    /// Cloud around `center` with radii in `[0.3, 1.0] * radius`.
    Shell { center: [f32; 3], radius: f32 },
}

/// 0xRRGGBB per theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeColors {
    pub dark: u32,
    pub light: u32,
}

impl ThemeColors {
    pub fn rgb(&self, theme: Theme) -> [f32; 3] {
        let hex = if theme.is_dark() { self.dark } else { self.light };
        hex_to_rgb(hex)
    }
}

#[inline]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// Point-sprite material as handed to the render backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMaterial {
    pub color: [f32; 3],
    pub opacity: f32,
    pub point_size: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub name: &'static str,
    pub kind: LayerKind,
    pub point_count: usize,
    pub shape: LayerShape,
    /// Stars get a per-point size in `[0.5, 0.5 + max_size)`; nebulae use 1.0.
    pub max_size: f32,
    pub colors: ThemeColors,
    /// Radians added per frame in idle mode.
    pub rotation_speed: f32,
    /// Multiplier on `progress * 2π` in scroll-driven mode; 0 holds the layer still.
    pub scroll_factor: f32,
    /// Relative frequency of the opacity pulse; 0 disables pulsing.
    pub pulse_rate: f32,
}

pub const DEFAULT_LAYERS: [LayerSpec; 6] = [
    LayerSpec {
        name: "near-stars",
        kind: LayerKind::Stars,
        point_count: 3000,
        shape: LayerShape::Field { extent: 300.0, depth: 150.0 },
        max_size: 1.5,
        colors: ThemeColors { dark: 0xFFFFFF, light: 0x555555 },
        rotation_speed: 0.0003,
        scroll_factor: 0.1,
        pulse_rate: 0.0,
    },
    LayerSpec {
        name: "mid-stars",
        kind: LayerKind::Stars,
        point_count: 5000,
        shape: LayerShape::Field { extent: 300.0, depth: 300.0 },
        max_size: 1.0,
        colors: ThemeColors { dark: 0xCCCCFF, light: 0x444444 },
        rotation_speed: 0.0002,
        scroll_factor: 0.05,
        pulse_rate: 0.0,
    },
    LayerSpec {
        name: "far-stars",
        kind: LayerKind::Stars,
        point_count: 8000,
        shape: LayerShape::Field { extent: 300.0, depth: 500.0 },
        max_size: 0.8,
        colors: ThemeColors { dark: 0xAABBFF, light: 0x333333 },
        rotation_speed: 0.0001,
        scroll_factor: 0.02,
        pulse_rate: 0.0,
    },
    LayerSpec {
        name: "nebula-violet",
        kind: LayerKind::Nebula,
        point_count: 1000,
        shape: LayerShape::Shell { center: [50.0, 20.0, -100.0], radius: 30.0 },
        max_size: 0.0,
        colors: ThemeColors { dark: 0x8844FF, light: 0x6633AA },
        rotation_speed: 0.0002,
        scroll_factor: 0.0,
        pulse_rate: 0.7,
    },
    LayerSpec {
        name: "nebula-rose",
        kind: LayerKind::Nebula,
        point_count: 1000,
        shape: LayerShape::Shell { center: [-70.0, -40.0, -150.0], radius: 40.0 },
        max_size: 0.0,
        colors: ThemeColors { dark: 0xFF4488, light: 0xAA3366 },
        rotation_speed: 0.0001,
        scroll_factor: 0.0,
        pulse_rate: 1.3,
    },
    LayerSpec {
        name: "nebula-azure",
        kind: LayerKind::Nebula,
        point_count: 1000,
        shape: LayerShape::Shell { center: [0.0, -100.0, -200.0], radius: 50.0 },
        max_size: 0.0,
        colors: ThemeColors { dark: 0x44BBFF, light: 0x3388AA },
        rotation_speed: 0.0003,
        scroll_factor: 0.0,
        pulse_rate: 1.0,
    },
];

impl LayerSpec {
    pub fn base_opacity(&self, theme: Theme) -> f32 {
        match self.kind {
            LayerKind::Stars => STAR_OPACITY,
            LayerKind::Nebula if theme.is_dark() => NEBULA_OPACITY_DARK,
            LayerKind::Nebula => NEBULA_OPACITY_LIGHT,
        }
    }

    /// Opacity at host time `time_ms`; only pulsing layers vary.
    pub fn pulsed_opacity(&self, theme: Theme, time_ms: f64) -> f32 {
        let base = self.base_opacity(theme);
        if self.pulse_rate == 0.0 {
            return base;
        }
        let t = time_ms * NEBULA_PULSE_TIME_SCALE * self.pulse_rate as f64;
        base + t.sin() as f32 * NEBULA_PULSE_AMPLITUDE
    }

    pub fn material(&self, theme: Theme) -> PointMaterial {
        PointMaterial {
            color: self.colors.rgb(theme),
            opacity: self.base_opacity(theme),
            point_size: match self.kind {
                LayerKind::Stars => STAR_POINT_SIZE,
                LayerKind::Nebula => NEBULA_POINT_SIZE,
            },
        }
    }

    pub fn generate(&self, rng: &mut StdRng) -> Vec<PointVertex> {
        let mut points = Vec::with_capacity(self.point_count);
        for _ in 0..self.point_count {
            let position = match self.shape {
                LayerShape::Field { extent, depth } => [
                    (rng.gen::<f32>() - 0.5) * extent,
                    (rng.gen::<f32>() - 0.5) * extent,
                    (rng.gen::<f32>() - 0.5) * depth,
                ],
                LayerShape::Shell { center, radius } => {
                    let r = radius * (0.3 + 0.7 * rng.gen::<f32>());
                    let theta = rng.gen::<f32>() * PI * 2.0;
                    let phi = rng.gen::<f32>() * PI;
                    [
                        center[0] + r * phi.sin() * theta.cos(),
                        center[1] + r * phi.sin() * theta.sin(),
                        center[2] + r * phi.cos(),
                    ]
                }
            };
            let size = match self.kind {
                LayerKind::Stars => rng.gen::<f32>() * self.max_size + 0.5,
                LayerKind::Nebula => 1.0,
            };
            points.push(PointVertex { position, size });
        }
        points
    }
}

/// Per-layer RNG derived from a base seed so layers stay independent.
pub fn layer_rng(seed: u64, layer_index: usize) -> StdRng {
    let mix = seed ^ (layer_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(mix)
}
