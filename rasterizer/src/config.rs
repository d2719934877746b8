//! Render-time tuning knobs, loadable from a TOML file.
//!
//! The teacher's `tri_mesh.rs`/`model.rs`/`viewer/main.rs` all import a
//! `math_lib_3d::config::Config` that was never checked in; this module
//! supplies the missing piece rather than leaving the dangling import,
//! following the corpus's `serde`-derived config pattern instead of a
//! hand-rolled parser.

use serde::{Deserialize, Serialize};

/// Which screen-space winding order (if any) to discard before shading.
/// Variant names and default follow `renderer.rs`'s `BackfaceMode`; unlike
/// the teacher, the default here is `Disable` — the reference scenarios
/// this crate is checked against assume both faces are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackfaceMode {
    /// Cull triangles whose screen-space vertex order is counterclockwise.
    Ccw,
    /// Cull triangles whose screen-space vertex order is clockwise.
    Cw,
    /// Render all faces regardless of screen-space vertex order.
    Disable,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Bytes reserved for the per-frame scratch arena. Spec's reference
    /// size is 250 KiB; default here matches it.
    pub arena_bytes: usize,
    /// Fallback resolution for demo scenes that don't specify a camera.
    pub default_resolution: (u32, u32),
    pub default_z_near: f32,
    pub default_z_far: f32,
    /// Which winding order the frame driver discards before shading.
    /// Disabled by default: spec.md's reference outputs assume no culling.
    pub backface_mode: BackfaceMode,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            arena_bytes: 250 * 1024,
            default_resolution: (120, 120),
            default_z_near: 0.01,
            default_z_far: 10.0,
            backface_mode: BackfaceMode::Disable,
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(s: &str) -> Result<RenderConfig, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let cfg = RenderConfig::default();
        let s = cfg.to_toml_string().unwrap();
        let parsed = RenderConfig::from_toml_str(&s).unwrap();
        assert_eq!(parsed.arena_bytes, cfg.arena_bytes);
        assert_eq!(parsed.default_resolution, cfg.default_resolution);
    }

    #[test]
    fn partial_toml_uses_field_defaults_where_specified() {
        let cfg = RenderConfig::from_toml_str(
            "arena_bytes = 65536\ndefault_resolution = [64, 64]\ndefault_z_near = 0.1\ndefault_z_far = 50.0\nbackface_mode = \"Disable\"\n",
        )
        .unwrap();
        assert_eq!(cfg.arena_bytes, 65536);
        assert_eq!(cfg.default_resolution, (64, 64));
    }
}
