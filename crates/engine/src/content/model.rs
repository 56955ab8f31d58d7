use std::collections::BTreeMap;

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshRef {
    Sphere,
    Dome,
    Cube,
    Cylinder,
    Cone,
    Plane,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

/// A partial transform: only the properties a part or path actually
/// declares. Absent properties contribute identity when composed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathTransform {
    pub pos: Option<Vec3>,
    pub rot: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub offset: Option<Vec3>,
}

impl PathTransform {
    pub const fn empty() -> Self {
        Self {
            pos: None,
            rot: None,
            scale: None,
            offset: None,
        }
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn with_rot(mut self, rot: Vec3) -> Self {
        self.rot = Some(rot);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Cubic-Bézier curve over partial transforms. The four control points
/// must declare the same property set; the library validates this on
/// insert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPath {
    pub start: PathTransform,
    pub control1: PathTransform,
    pub control2: PathTransform,
    pub end: PathTransform,
}

impl CubicPath {
    /// Blend the control points at `t`, clamped to `[0, 1]`. The output
    /// carries exactly the properties `start` declares.
    pub fn blend(&self, t: f32) -> PathTransform {
        let t = t.clamp(0.0, 1.0);
        let inv = 1.0 - t;
        let a = inv * inv * inv;
        let b = 3.0 * t * inv * inv;
        let c = 3.0 * t * t * inv;
        let d = t * t * t;

        PathTransform {
            pos: blend_property(
                [a, b, c, d],
                self.start.pos,
                self.control1.pos,
                self.control2.pos,
                self.end.pos,
            ),
            rot: blend_property(
                [a, b, c, d],
                self.start.rot,
                self.control1.rot,
                self.control2.rot,
                self.end.rot,
            ),
            scale: blend_property(
                [a, b, c, d],
                self.start.scale,
                self.control1.scale,
                self.control2.scale,
                self.end.scale,
            ),
            offset: blend_property(
                [a, b, c, d],
                self.start.offset,
                self.control1.offset,
                self.control2.offset,
                self.end.offset,
            ),
        }
    }
}

fn blend_property(
    weights: [f32; 4],
    start: Option<Vec3>,
    control1: Option<Vec3>,
    control2: Option<Vec3>,
    end: Option<Vec3>,
) -> Option<Vec3> {
    let start = start?;
    let control1 = control1?;
    let control2 = control2?;
    let end = end?;
    Some(start * weights[0] + control1 * weights[1] + control2 * weights[2] + end * weights[3])
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDef {
    pub duration_ms: f32,
    pub looped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    Carry,
    Pile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartDef {
    pub mesh: Option<MeshRef>,
    pub color: Color,
    pub transform: PathTransform,
    pub paths: BTreeMap<String, CubicPath>,
    pub attach: Option<Attach>,
}

impl PartDef {
    pub fn mesh(mesh: MeshRef, color: Color) -> Self {
        Self {
            mesh: Some(mesh),
            color,
            transform: PathTransform::empty(),
            paths: BTreeMap::new(),
            attach: None,
        }
    }

    /// A meshless part, used for attachment slots and animation anchors.
    pub fn anchor() -> Self {
        Self {
            mesh: None,
            color: Color::default(),
            transform: PathTransform::empty(),
            paths: BTreeMap::new(),
            attach: None,
        }
    }

    pub fn with_transform(mut self, transform: PathTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_path(mut self, animation: impl Into<String>, path: CubicPath) -> Self {
        self.paths.insert(animation.into(), path);
        self
    }

    pub fn with_attach(mut self, attach: Attach) -> Self {
        self.attach = Some(attach);
        self
    }
}

/// A model definition: half-extent bounds, an animation map, and named
/// parts in author order. Part order fixes draw-command emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    pub name: String,
    pub bounds: Vec3,
    pub animations: BTreeMap<String, AnimationDef>,
    pub parts: Vec<(String, PartDef)>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>, bounds: Vec3) -> Self {
        Self {
            name: name.into(),
            bounds,
            animations: BTreeMap::new(),
            parts: Vec::new(),
        }
    }

    pub fn with_animation(mut self, name: impl Into<String>, duration_ms: f32, looped: bool) -> Self {
        self.animations.insert(
            name.into(),
            AnimationDef {
                duration_ms,
                looped,
            },
        );
        self
    }

    pub fn with_part(mut self, name: impl Into<String>, part: PartDef) -> Self {
        self.parts.push((name.into(), part));
        self
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationDef> {
        self.animations.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    fn dip_path(low: Vec3) -> CubicPath {
        CubicPath {
            start: PathTransform::empty().with_pos(Vec3::ZERO),
            control1: PathTransform::empty().with_pos(low),
            control2: PathTransform::empty().with_pos(low),
            end: PathTransform::empty().with_pos(Vec3::ZERO),
        }
    }

    #[test]
    fn blend_at_zero_matches_start_and_at_one_matches_end() {
        let path = CubicPath {
            start: PathTransform::empty().with_pos(Vec3::new(1.0, 2.0, 3.0)),
            control1: PathTransform::empty().with_pos(Vec3::new(0.0, 5.0, 0.0)),
            control2: PathTransform::empty().with_pos(Vec3::new(0.0, -5.0, 0.0)),
            end: PathTransform::empty().with_pos(Vec3::new(4.0, 5.0, 6.0)),
        };
        let at_start = path.blend(0.0).pos.expect("start pos");
        let at_end = path.blend(1.0).pos.expect("end pos");
        assert_vec3_close(at_start, Vec3::new(1.0, 2.0, 3.0));
        assert_vec3_close(at_end, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn blend_midpoint_follows_the_cubic_basis() {
        let path = dip_path(Vec3::new(0.0, -0.5, 0.0));
        let mid = path.blend(0.5).pos.expect("mid pos");
        assert_vec3_close(mid, Vec3::new(0.0, -0.375, 0.0));
    }

    #[test]
    fn blend_is_continuous_across_small_steps() {
        let path = dip_path(Vec3::new(0.0, -0.5, 0.0));
        let mut previous = path.blend(0.0).pos.expect("pos");
        let steps = 200;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let current = path.blend(t).pos.expect("pos");
            assert!(
                (current - previous).length() < 0.02,
                "jump at t={t}: {previous} -> {current}"
            );
            previous = current;
        }
    }

    #[test]
    fn blend_clamps_parameter_outside_unit_range() {
        let path = dip_path(Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(path.blend(-1.0), path.blend(0.0));
        assert_eq!(path.blend(2.0), path.blend(1.0));
    }

    #[test]
    fn blend_output_carries_only_properties_start_declares() {
        let path = CubicPath {
            start: PathTransform::empty().with_pos(Vec3::ZERO),
            control1: PathTransform::empty()
                .with_pos(Vec3::ONE)
                .with_rot(Vec3::ONE),
            control2: PathTransform::empty()
                .with_pos(Vec3::ONE)
                .with_rot(Vec3::ONE),
            end: PathTransform::empty().with_pos(Vec3::ZERO).with_rot(Vec3::ONE),
        };
        let blended = path.blend(0.5);
        assert!(blended.pos.is_some());
        assert!(blended.rot.is_none());
        assert!(blended.scale.is_none());
    }
}
