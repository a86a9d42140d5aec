//! Procedural spiral galaxy generation.
//!
//! The generator is a pure function from [`GalaxyParams`] to a [`PointCloud`]:
//! two parallel flat `f32` buffers holding point positions and colors. All
//! randomness comes from an injected [`Rng`], so callers that need
//! reproducible output can seed their own source (or use
//! [`generate_seeded`]).
//!
//! ```
//! use galaxygen::galaxy::{generate_seeded, GalaxyParams};
//!
//! let params = GalaxyParams { count: 1_000, ..Default::default() };
//! let cloud = generate_seeded(&params, 42).unwrap();
//!
//! assert_eq!(cloud.positions.len(), 3 * 1_000);
//! assert_eq!(cloud.colors.len(), 3 * 1_000);
//! ```

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::InvalidParameterError;

/// Convert a packed `0xRRGGBB` value to an RGB color with channels in `[0, 1]`.
pub fn hex_color(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Parameters controlling the shape and coloring of a generated galaxy.
///
/// The struct is plain data owned by the caller; [`generate`] never mutates
/// it and keeps no reference to it. Defaults match the classic tweak-panel
/// starting point: a two-armed orange-to-blue spiral.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyParams {
    /// Number of points to generate. Must be at least 1.
    pub count: u32,
    /// Rendered point size in world units. Not used by the generator math.
    pub size: f32,
    /// Maximum galaxy radius. Must be finite and positive.
    pub radius: f32,
    /// Number of spiral arms. Points are assigned round-robin by index.
    pub branches: u32,
    /// Radians of spiral twist per unit radius.
    pub spin: f32,
    /// Magnitude of positional jitter.
    pub randomness: f32,
    /// Jitter falloff exponent. Values above 1 concentrate jitter near the
    /// arm core, leaving sparse outliers.
    pub randomness_power: f32,
    /// Color at the galactic center.
    pub inside_color: Vec3,
    /// Color at the outer radius.
    pub outside_color: Vec3,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.02,
            radius: 5.0,
            branches: 2,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: hex_color(0xff6030),
            outside_color: hex_color(0x1b3984),
        }
    }
}

impl GalaxyParams {
    /// Check the parameters that [`generate`] cannot work with.
    ///
    /// The viewer's panel clamps its widgets to valid ranges, so for UI-driven
    /// callers this never fails; programmatic callers get a synchronous error
    /// instead of a modulo-by-zero or NaN-filled buffers.
    pub fn validate(&self) -> Result<(), InvalidParameterError> {
        if self.count == 0 {
            return Err(InvalidParameterError::Count(self.count));
        }
        if self.branches == 0 {
            return Err(InvalidParameterError::Branches(self.branches));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(InvalidParameterError::Radius(self.radius));
        }
        Ok(())
    }
}

/// A generated galaxy: parallel position and color buffers.
///
/// Both buffers have length exactly `3 * count` and are index-correlated:
/// `positions[3*i..3*i+3]` is the xyz of point `i`, `colors[3*i..3*i+3]` its
/// rgb with channels in `[0, 1]`. The pair is always produced together, so a
/// renderer can never pair fresh positions with stale colors.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    /// Flat xyz triples.
    pub positions: Vec<f32>,
    /// Flat rgb triples.
    pub colors: Vec<f32>,
}

impl PointCloud {
    /// Number of points in the cloud.
    pub fn point_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Position of point `i` as `[x, y, z]`.
    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.positions[3 * i],
            self.positions[3 * i + 1],
            self.positions[3 * i + 2],
        ]
    }

    /// Color of point `i` as `[r, g, b]`.
    pub fn color(&self, i: usize) -> [f32; 3] {
        [self.colors[3 * i], self.colors[3 * i + 1], self.colors[3 * i + 2]]
    }
}

/// Generate a galaxy point cloud.
///
/// Each point draws its radial distance, then one magnitude + sign jitter
/// pair per axis, in a fixed order (seven draws per point). Keeping the draw
/// order stable is what makes seeded output reproducible across runs.
pub fn generate<R: Rng + ?Sized>(
    params: &GalaxyParams,
    rng: &mut R,
) -> Result<PointCloud, InvalidParameterError> {
    params.validate()?;

    let count = params.count as usize;
    let mut positions = Vec::with_capacity(3 * count);
    let mut colors = Vec::with_capacity(3 * count);

    for i in 0..params.count {
        let r = rng.gen::<f32>() * params.radius;
        let spin_angle = r * params.spin;
        let branch_angle = (i % params.branches) as f32 / params.branches as f32 * TAU;

        let jx = jitter(params, rng);
        let jy = jitter(params, rng);
        let jz = jitter(params, rng);

        let angle = branch_angle + spin_angle;
        positions.push(angle.cos() * r + jx);
        // No base spiral component vertically, only scatter.
        positions.push(jy);
        positions.push(angle.sin() * r + jz);

        let color = color_at(params, r);
        colors.push(color.x);
        colors.push(color.y);
        colors.push(color.z);
    }

    Ok(PointCloud { positions, colors })
}

/// Generate with a [`SmallRng`] seeded from `seed`.
///
/// Identical parameters and seed produce bit-identical buffers.
pub fn generate_seeded(
    params: &GalaxyParams,
    seed: u64,
) -> Result<PointCloud, InvalidParameterError> {
    generate(params, &mut SmallRng::seed_from_u64(seed))
}

/// One signed jitter sample: a power-shaped magnitude draw followed by an
/// independent sign draw. Each axis gets its own pair; sharing either across
/// axes changes the statistical shape of the scatter.
fn jitter<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> f32 {
    let magnitude = rng.gen::<f32>().powf(params.randomness_power) * params.randomness;
    if rng.gen::<f32>() < 0.5 {
        -magnitude
    } else {
        magnitude
    }
}

/// Color for a point at radial distance `r`: a component-wise lerp from
/// inside to outside color. A zero radius maps to the inside color so the
/// degenerate quotient can never reach the mix as NaN.
fn color_at(params: &GalaxyParams, r: f32) -> Vec3 {
    let t = if params.radius > 0.0 {
        (r / params.radius).clamp(0.0, 1.0)
    } else {
        0.0
    };
    params.inside_color.lerp(params.outside_color, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0xffffff), Vec3::ONE);
        assert_eq!(hex_color(0x000000), Vec3::ZERO);

        let c = hex_color(0xff6030);
        assert!((c.x - 1.0).abs() < 0.001);
        assert!((c.y - 96.0 / 255.0).abs() < 0.001);
        assert!((c.z - 48.0 / 255.0).abs() < 0.001);
    }

    #[test]
    fn test_color_endpoints() {
        let params = GalaxyParams::default();
        assert!((color_at(&params, 0.0) - params.inside_color).length() < 1e-6);
        assert!((color_at(&params, params.radius) - params.outside_color).length() < 1e-6);

        let mid = color_at(&params, params.radius / 2.0);
        let expected = (params.inside_color + params.outside_color) / 2.0;
        assert!((mid - expected).length() < 1e-5);
    }

    #[test]
    fn test_validation() {
        let ok = GalaxyParams::default();
        assert!(ok.validate().is_ok());

        let no_points = GalaxyParams { count: 0, ..ok.clone() };
        assert_eq!(
            no_points.validate(),
            Err(InvalidParameterError::Count(0))
        );

        let no_branches = GalaxyParams { branches: 0, ..ok.clone() };
        assert_eq!(
            no_branches.validate(),
            Err(InvalidParameterError::Branches(0))
        );

        for radius in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let bad = GalaxyParams { radius, ..ok.clone() };
            assert!(matches!(
                bad.validate(),
                Err(InvalidParameterError::Radius(_))
            ));
        }
    }

    #[test]
    fn test_buffer_lengths() {
        for count in [1u32, 7, 100, 5_000] {
            let params = GalaxyParams { count, ..Default::default() };
            let cloud = generate_seeded(&params, 7).unwrap();
            assert_eq!(cloud.positions.len(), 3 * count as usize);
            assert_eq!(cloud.colors.len(), 3 * count as usize);
            assert_eq!(cloud.point_count(), count as usize);
        }
    }

    #[test]
    fn test_two_branch_rays() {
        // With jitter and spin off, every point sits exactly on one of two
        // antipodal rays: even indices at angle 0, odd indices at angle pi.
        let params = GalaxyParams {
            count: 4,
            branches: 2,
            radius: 1.0,
            spin: 0.0,
            randomness: 0.0,
            randomness_power: 1.0,
            inside_color: hex_color(0xffffff),
            outside_color: hex_color(0x000000),
            ..Default::default()
        };
        let cloud = generate_seeded(&params, 1).unwrap();

        for i in 0..4 {
            let [x, y, z] = cloud.position(i);
            assert_eq!(y, 0.0);
            assert!(z.abs() < 1e-6);
            if i % 2 == 0 {
                assert!(x >= 0.0, "point {i} expected on the +x ray, got x={x}");
            } else {
                assert!(x <= 0.0, "point {i} expected on the -x ray, got x={x}");
            }

            // White-to-black gradient stays gray everywhere.
            let [cr, cg, cb] = cloud.color(i);
            assert!((cr - cg).abs() < 1e-6);
            assert!((cg - cb).abs() < 1e-6);
        }
    }

    #[test]
    fn test_seeded_determinism() {
        let params = GalaxyParams { count: 2_000, ..Default::default() };
        let a = generate_seeded(&params, 42).unwrap();
        let b = generate_seeded(&params, 42).unwrap();
        assert_eq!(a, b);

        let c = generate_seeded(&params, 43).unwrap();
        assert_ne!(a, c);
    }
}
