//! Parametric surfaces that can be swept into point clouds
use derive_setters::Setters;
use nalgebra::{Matrix3, Point3, Rotation3};
use std::f32::consts::TAU;

/// One parameter range walked at a fixed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub start: f32,
    pub end: f32,
    pub step: f32,
    /// Whether `end` itself is sampled when the steps land on it
    pub inclusive: bool,
}

impl Sweep {
    pub fn new(start: f32, end: f32, step: f32) -> Self {
        Self {
            start,
            end,
            step,
            inclusive: false,
        }
    }
    pub fn inclusive(start: f32, end: f32, step: f32) -> Self {
        Self {
            start,
            end,
            step,
            inclusive: true,
        }
    }
    /// Parameter values of the sweep.
    /// Computed from the index rather than accumulated, so long sweeps don't drift.
    /// Yields nothing when the step can't make progress.
    pub fn values(&self) -> impl Iterator<Item = f32> {
        let Sweep {
            start,
            end,
            step,
            inclusive,
        } = *self;
        let progresses = step > 0.0;
        (0u32..)
            .map(move |i| start + i as f32 * step)
            .take_while(move |&t| progresses && if inclusive { t <= end } else { t < end })
    }
}

/// Sines and cosines of the two rotation angles, computed once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trig {
    pub sin_a: f32,
    pub cos_a: f32,
    pub sin_b: f32,
    pub cos_b: f32,
}

impl Trig {
    /// Angles are taken as `f64` so that large accumulated angles keep their precision
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            sin_a: a.sin() as f32,
            cos_a: a.cos() as f32,
            sin_b: b.sin() as f32,
            cos_b: b.cos() as f32,
        }
    }
    /// Rotation by `A` about the x axis
    pub fn about_x_by_a(&self) -> Rotation3<f32> {
        let (s, c) = (self.sin_a, self.cos_a);
        #[rustfmt::skip]
        let m = Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, c, -s,
            0.0, s, c,
        );
        Rotation3::from_matrix_unchecked(m)
    }
    /// Rotation by `B` about the y axis
    pub fn about_y_by_b(&self) -> Rotation3<f32> {
        let (s, c) = (self.sin_b, self.cos_b);
        #[rustfmt::skip]
        let m = Matrix3::new(
            c, 0.0, s,
            0.0, 1.0, 0.0,
            -s, 0.0, c,
        );
        Rotation3::from_matrix_unchecked(m)
    }
    /// Rotation by `B` about the z axis
    pub fn about_z_by_b(&self) -> Rotation3<f32> {
        let (s, c) = (self.sin_b, self.cos_b);
        #[rustfmt::skip]
        let m = Matrix3::new(
            c, -s, 0.0,
            s, c, 0.0,
            0.0, 0.0, 1.0,
        );
        Rotation3::from_matrix_unchecked(m)
    }
}

/// A surface that can be rasterized by sweeping its two parameters
pub trait Surface {
    /// Ranges of `u` (outer loop) and `v` (inner loop)
    fn sweep(&self) -> (Sweep, Sweep);
    /// Point in object space
    fn position(&self, u: f32, v: f32) -> Point3<f32>;
    /// How directly the surface at `(u, v)` faces the light once rotated.
    /// Unbounded, callers clamp after scaling.
    fn luminance(&self, u: f32, v: f32, trig: &Trig) -> f32;
    /// Position and luminance together, so implementors can share the trig of `u` and `v`
    fn sample(&self, u: f32, v: f32, trig: &Trig) -> (Point3<f32>, f32) {
        (self.position(u, v), self.luminance(u, v, trig))
    }
    /// Object space to camera space. Order of the two rotations differs between surfaces.
    fn rotation(&self, trig: &Trig) -> Rotation3<f32>;
    /// Upper bound on the distance of any surface point from the origin
    fn bounding_radius(&self) -> f32;
}

/// Torus around the y axis.
/// `u` goes around the tube cross-section, `v` goes around the ring.
#[derive(Debug, Clone, Copy, PartialEq, Setters)]
pub struct Torus {
    /// Radius of the tube
    pub r1: f32,
    /// Distance from the centre of the ring to the centre of the tube
    pub r2: f32,
    pub theta_step: f32,
    pub phi_step: f32,
}

/// Trig of both torus angles, shared by position and luminance
#[derive(Clone, Copy)]
struct TubeAngles {
    sin_theta: f32,
    cos_theta: f32,
    sin_phi: f32,
    cos_phi: f32,
}

impl TubeAngles {
    fn new(theta: f32, phi: f32) -> Self {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        Self {
            sin_theta,
            cos_theta,
            sin_phi,
            cos_phi,
        }
    }
}

impl Torus {
    fn point_at(&self, t: &TubeAngles) -> Point3<f32> {
        // Point on the cross-section circle, then swung around the y axis
        let circle_x = self.r2 + self.r1 * t.cos_theta;
        let circle_y = self.r1 * t.sin_theta;
        Point3::new(circle_x * t.cos_phi, circle_y, circle_x * t.sin_phi)
    }
    fn luminance_at(&self, t: &TubeAngles, trig: &Trig) -> f32 {
        let TubeAngles {
            sin_theta,
            cos_theta,
            sin_phi,
            cos_phi,
        } = *t;
        let Trig {
            sin_a,
            cos_a,
            sin_b,
            cos_b,
        } = *trig;
        cos_phi * cos_theta * sin_b - cos_a * cos_theta * sin_phi - sin_a * sin_theta
            + cos_b * (cos_a * sin_theta - cos_theta * sin_a * sin_phi)
    }
}

impl Surface for Torus {
    fn sweep(&self) -> (Sweep, Sweep) {
        (
            Sweep::new(0.0, TAU, self.theta_step),
            Sweep::new(0.0, TAU, self.phi_step),
        )
    }
    fn position(&self, theta: f32, phi: f32) -> Point3<f32> {
        self.point_at(&TubeAngles::new(theta, phi))
    }
    fn luminance(&self, theta: f32, phi: f32, trig: &Trig) -> f32 {
        self.luminance_at(&TubeAngles::new(theta, phi), trig)
    }
    fn sample(&self, theta: f32, phi: f32, trig: &Trig) -> (Point3<f32>, f32) {
        let t = TubeAngles::new(theta, phi);
        (self.point_at(&t), self.luminance_at(&t, trig))
    }
    fn rotation(&self, trig: &Trig) -> Rotation3<f32> {
        trig.about_z_by_b() * trig.about_x_by_a()
    }
    fn bounding_radius(&self) -> f32 {
        self.r1.abs() + self.r2.abs()
    }
}

impl Default for Torus {
    fn default() -> Self {
        Self {
            r1: 1.0,
            r2: 2.0,
            theta_step: 0.07,
            phi_step: 0.02,
        }
    }
}

/// Möbius strip of unit centre radius lying in the xy plane, scaled by `scale`.
/// `u` goes around the strip, `v` goes across its width in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Setters)]
pub struct MobiusStrip {
    pub scale: f32,
    pub u_step: f32,
    pub v_step: f32,
}

/// Trig of `u` and `u / 2`, shared by position and luminance
#[derive(Clone, Copy)]
struct StripAngles {
    sin_u: f32,
    cos_u: f32,
    sin_half: f32,
    cos_half: f32,
}

impl StripAngles {
    fn new(u: f32) -> Self {
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_half, cos_half) = (u / 2.0).sin_cos();
        Self {
            sin_u,
            cos_u,
            sin_half,
            cos_half,
        }
    }
}

impl MobiusStrip {
    fn point_at(&self, s: &StripAngles, v: f32) -> Point3<f32> {
        let radius = 1.0 + (v / 2.0) * s.cos_half;
        Point3::new(
            self.scale * radius * s.cos_u,
            self.scale * radius * s.sin_u,
            self.scale * (v / 2.0) * s.sin_half,
        )
    }
    fn luminance_at(&self, s: &StripAngles, trig: &Trig) -> f32 {
        let StripAngles {
            sin_u,
            sin_half,
            cos_half,
            ..
        } = *s;
        let Trig {
            sin_a,
            cos_a,
            cos_b,
            ..
        } = *trig;
        sin_half * cos_half - sin_a * sin_u + cos_b * (cos_a * sin_half - cos_half * sin_a)
    }
}

impl Surface for MobiusStrip {
    fn sweep(&self) -> (Sweep, Sweep) {
        (
            Sweep::new(0.0, TAU, self.u_step),
            Sweep::inclusive(-1.0, 1.0, self.v_step),
        )
    }
    fn position(&self, u: f32, v: f32) -> Point3<f32> {
        self.point_at(&StripAngles::new(u), v)
    }
    fn luminance(&self, u: f32, _v: f32, trig: &Trig) -> f32 {
        self.luminance_at(&StripAngles::new(u), trig)
    }
    fn sample(&self, u: f32, v: f32, trig: &Trig) -> (Point3<f32>, f32) {
        let s = StripAngles::new(u);
        (self.point_at(&s, v), self.luminance_at(&s, trig))
    }
    fn rotation(&self, trig: &Trig) -> Rotation3<f32> {
        trig.about_x_by_a() * trig.about_y_by_b()
    }
    fn bounding_radius(&self) -> f32 {
        // |p|^2 = s^2 (1 + v cos(u/2) + v^2 / 4) <= s^2 (1 + |v| / 2)^2
        self.scale.abs() * 1.5
    }
}

impl Default for MobiusStrip {
    fn default() -> Self {
        Self {
            scale: 1.5,
            u_step: 0.07,
            v_step: 0.04,
        }
    }
}

/// Either of the built-in surfaces, picked at runtime from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Torus(Torus),
    Mobius(MobiusStrip),
}

impl Surface for Shape {
    fn sweep(&self) -> (Sweep, Sweep) {
        match self {
            Self::Torus(s) => s.sweep(),
            Self::Mobius(s) => s.sweep(),
        }
    }
    fn position(&self, u: f32, v: f32) -> Point3<f32> {
        match self {
            Self::Torus(s) => s.position(u, v),
            Self::Mobius(s) => s.position(u, v),
        }
    }
    fn luminance(&self, u: f32, v: f32, trig: &Trig) -> f32 {
        match self {
            Self::Torus(s) => s.luminance(u, v, trig),
            Self::Mobius(s) => s.luminance(u, v, trig),
        }
    }
    fn sample(&self, u: f32, v: f32, trig: &Trig) -> (Point3<f32>, f32) {
        match self {
            Self::Torus(s) => s.sample(u, v, trig),
            Self::Mobius(s) => s.sample(u, v, trig),
        }
    }
    fn rotation(&self, trig: &Trig) -> Rotation3<f32> {
        match self {
            Self::Torus(s) => s.rotation(trig),
            Self::Mobius(s) => s.rotation(trig),
        }
    }
    fn bounding_radius(&self) -> f32 {
        match self {
            Self::Torus(s) => s.bounding_radius(),
            Self::Mobius(s) => s.bounding_radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= TOL
    }

    #[test]
    fn test_sweep_values() {
        let open: Vec<f32> = Sweep::new(0.0, 1.0, 0.25).values().collect();
        assert_eq!(open, vec![0.0, 0.25, 0.5, 0.75]);
        let closed: Vec<f32> = Sweep::inclusive(-1.0, 1.0, 0.5).values().collect();
        assert_eq!(closed, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_sweep_without_progress_is_empty() {
        assert_eq!(Sweep::new(0.0, 1.0, 0.0).values().count(), 0);
        assert_eq!(Sweep::new(0.0, 1.0, -0.1).values().count(), 0);
        assert_eq!(Sweep::new(0.0, 1.0, f32::NAN).values().count(), 0);
    }

    #[test]
    fn test_default_sample_counts() {
        let (theta, phi) = Torus::default().sweep();
        assert_eq!(theta.values().count(), 90);
        assert_eq!(phi.values().count(), 315);
        let (u, v) = MobiusStrip::default().sweep();
        assert_eq!(u.values().count(), 90);
        assert!((50..=51).contains(&v.values().count()));
    }

    #[test]
    fn test_zero_angles_give_identity() {
        let trig = Trig::new(0.0, 0.0);
        let p = Point3::new(1.0f32, -2.0, 3.0);
        for rotation in [
            Torus::default().rotation(&trig),
            MobiusStrip::default().rotation(&trig),
        ] {
            let q = rotation * p;
            assert!(close(q.x, p.x) && close(q.y, p.y) && close(q.z, p.z));
        }
    }

    #[test]
    fn test_torus_rotation_matches_closed_form() {
        let torus = Torus::default();
        let trig = Trig::new(0.7, -1.3);
        let Trig {
            sin_a,
            cos_a,
            sin_b,
            cos_b,
        } = trig;
        let (theta, phi) = (0.4f32, 2.1f32);
        let circle_x = 2.0 + theta.cos();
        let circle_y = theta.sin();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let x = circle_x * (cos_b * cos_phi + sin_a * sin_b * sin_phi) - circle_y * cos_a * sin_b;
        let y = circle_x * (sin_b * cos_phi - sin_a * cos_b * sin_phi) + circle_y * cos_a * cos_b;
        let z = cos_a * circle_x * sin_phi + circle_y * sin_a;

        let q = torus.rotation(&trig) * torus.position(theta, phi);
        assert!(close(q.x, x), "{} != {}", q.x, x);
        assert!(close(q.y, y), "{} != {}", q.y, y);
        assert!(close(q.z, z), "{} != {}", q.z, z);
    }

    #[test]
    fn test_mobius_rotation_matches_closed_form() {
        let strip = MobiusStrip::default();
        let trig = Trig::new(2.2, 0.9);
        let p = strip.position(1.1, -0.6);
        let x = p.x * trig.cos_b + p.z * trig.sin_b;
        let z = -p.x * trig.sin_b + p.z * trig.cos_b;
        let y = p.y * trig.cos_a - z * trig.sin_a;
        let z = p.y * trig.sin_a + z * trig.cos_a;

        let q = strip.rotation(&trig) * p;
        assert!(close(q.x, x) && close(q.y, y) && close(q.z, z));
    }

    #[test]
    fn test_rotation_order_matters() {
        let trig = Trig::new(1.0, 1.0);
        let p = Point3::new(1.0f32, 0.5, -0.25);
        let torus_order = trig.about_z_by_b() * trig.about_x_by_a() * p;
        let reversed = trig.about_x_by_a() * trig.about_z_by_b() * p;
        assert!(!close(torus_order.x, reversed.x) || !close(torus_order.y, reversed.y));
    }

    #[test]
    fn test_torus_positions() {
        let torus = Torus::default();
        let p = torus.position(0.0, 0.0);
        assert!(close(p.x, 3.0) && close(p.y, 0.0) && close(p.z, 0.0));
        let p = torus.position(std::f32::consts::PI, 0.0);
        assert!(close(p.x, 1.0));
        let p = torus.position(std::f32::consts::FRAC_PI_2, 0.0);
        assert!(close(p.y, 1.0));
    }

    #[test]
    fn test_points_within_bounding_radius() {
        let shapes = [
            Shape::Torus(Torus::default()),
            Shape::Mobius(MobiusStrip::default()),
        ];
        for shape in shapes {
            let (us, vs) = shape.sweep();
            let radius = shape.bounding_radius();
            for u in us.values() {
                for v in vs.values() {
                    let p = shape.position(u, v);
                    assert!(p.coords.norm() <= radius + TOL);
                }
            }
        }
    }

    #[test]
    fn test_luminance_without_rotation() {
        let trig = Trig::new(0.0, 0.0);
        let torus = Torus::default();
        // Reduces to sin(theta) - cos(theta) sin(phi)
        let (theta, phi) = (0.3f32, 1.2f32);
        let expected = theta.sin() - theta.cos() * phi.sin();
        assert!(close(torus.luminance(theta, phi, &trig), expected));

        let strip = MobiusStrip::default();
        // Reduces to sin(u/2) cos(u/2) + sin(u/2), independent of v
        let u = 1.7f32;
        let expected = (u / 2.0).sin() * (u / 2.0).cos() + (u / 2.0).sin();
        assert!(close(strip.luminance(u, -1.0, &trig), expected));
        assert!(close(strip.luminance(u, 1.0, &trig), expected));
    }

    #[test]
    fn test_luminance_with_rotation_matches_closed_form() {
        let trig = Trig::new(0.7, -1.3);
        let (sa, ca) = (0.7f64.sin() as f32, 0.7f64.cos() as f32);
        let (sb, cb) = ((-1.3f64).sin() as f32, (-1.3f64).cos() as f32);

        let (theta, phi) = (0.4f32, 2.1f32);
        let (st, ct) = (theta.sin(), theta.cos());
        let (sp, cp) = (phi.sin(), phi.cos());
        let expected = cp * ct * sb - ca * ct * sp - sa * st + cb * (ca * st - ct * sa * sp);
        let torus = Torus::default().luminance(theta, phi, &trig);
        assert!(close(torus, expected), "{torus} != {expected}");

        let u = 2.6f32;
        let (sh, ch) = ((u / 2.0).sin(), (u / 2.0).cos());
        let expected = sh * ch - sa * u.sin() + cb * (ca * sh - ch * sa);
        let strip = MobiusStrip::default().luminance(u, 0.3, &trig);
        assert!(close(strip, expected), "{strip} != {expected}");
    }

    #[test]
    fn test_rotation_changes_luminance() {
        // Terms that vanish at zero rotation must contribute once rotated
        let still = Trig::new(0.0, 0.0);
        let tilted_a = Trig::new(0.9, 0.0);
        let tilted_b = Trig::new(0.0, 0.9);
        let torus = Torus::default();
        let base = torus.luminance(0.4, 2.1, &still);
        assert!(!close(torus.luminance(0.4, 2.1, &tilted_a), base));
        assert!(!close(torus.luminance(0.4, 2.1, &tilted_b), base));
        let strip = MobiusStrip::default();
        let base = strip.luminance(2.6, 0.0, &still);
        assert!(!close(strip.luminance(2.6, 0.0, &tilted_a), base));
    }

    #[test]
    fn test_sample_matches_position_and_luminance() {
        let trig = Trig::new(1.1, -0.4);
        let shapes = [
            Shape::Torus(Torus::default()),
            Shape::Mobius(MobiusStrip::default()),
        ];
        for shape in shapes {
            for (u, v) in [(0.0, 0.0), (0.4, -0.6), (3.5, 0.9), (6.2, 1.0)] {
                let (point, luminance) = shape.sample(u, v, &trig);
                assert_eq!(point, shape.position(u, v));
                assert_eq!(luminance, shape.luminance(u, v, &trig));
            }
        }
    }

    #[test]
    fn test_shape_delegates() {
        let trig = Trig::new(0.3, 0.6);
        let torus = Torus::default();
        let shape = Shape::Torus(torus);
        assert_eq!(shape.position(0.5, 0.5), torus.position(0.5, 0.5));
        assert_eq!(shape.luminance(0.5, 0.5, &trig), torus.luminance(0.5, 0.5, &trig));
        assert_eq!(shape.bounding_radius(), 3.0);
        assert_eq!(Shape::Mobius(MobiusStrip::default()).bounding_radius(), 2.25);
    }
}
