fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    (a.x - b.x).hypot(a.z - b.z)
}

/// Shortest signed turn from `current` to `desired`, in [-PI, PI).
fn delta_angle(current: f32, desired: f32) -> f32 {
    (desired - current + PI).rem_euclid(TAU) - PI
}

/// Soft saturation used for both turn and walk speed ramps.
fn tanh_ramp(x: f32) -> f32 {
    (RAMP_SHARPNESS * x).tanh()
}

/// Nearest entity (ground-plane distance) accepted by `filter`, excluding
/// `origin` itself. Ties keep the earlier arena entry.
fn closest_to<F>(origin: &Entity, world: &SceneWorld, filter: F) -> Option<EntityId>
where
    F: Fn(&Entity) -> bool,
{
    let mut closest = None;
    let mut closest_distance = f32::INFINITY;
    for candidate in world.entities() {
        if candidate.id == origin.id || !filter(candidate) {
            continue;
        }
        let distance = planar_distance(origin.position, candidate.position);
        if distance < closest_distance {
            closest = Some(candidate.id);
            closest_distance = distance;
        }
    }
    closest
}
