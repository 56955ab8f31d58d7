fn build_model_library() -> Result<ModelLibrary, ModelError> {
    let mut library = ModelLibrary::new();
    library.insert(worker_model())?;
    library.insert(tree_model())?;
    library.insert(stockpile_model())?;
    library.insert(bush_model())?;
    library.insert(rock_model())?;
    library.insert(ground_model())?;
    library.insert(berry_model())?;
    library.insert(stone_model())?;
    library.insert(wood_model())?;
    Ok(library)
}

fn worker_model() -> ModelDef {
    let skin = Color::rgb(0.7, 0.6, 0.5);
    ModelDef::new(WORKER_KIND, Vec3::new(0.5, 1.0, 0.5))
        .with_animation(WALK_ANIMATION, 1000.0, true)
        .with_animation(CARRY_ANIMATION, 1000.0, true)
        .with_animation(IDLE_ANIMATION, 2000.0, true)
        .with_animation(GATHER_ANIMATION, 1000.0, false)
        .with_animation(SWING_ANIMATION, 1000.0, false)
        .with_part(
            "Head",
            PartDef::mesh(MeshRef::Sphere, skin)
                .with_transform(
                    PathTransform::empty()
                        .with_pos(Vec3::new(0.0, 1.2, 0.0))
                        .with_scale(Vec3::splat(0.3)),
                )
                .with_path(WALK_ANIMATION, vertical_dip(-0.25))
                .with_path(CARRY_ANIMATION, vertical_dip(-0.25))
                .with_path(IDLE_ANIMATION, vertical_dip(-0.05)),
        )
        .with_part(
            "Body",
            PartDef::mesh(MeshRef::Dome, Color::rgb(0.1, 0.2, 0.4))
                .with_transform(PathTransform::empty().with_scale(Vec3::new(0.5, 1.0, 0.5)))
                .with_path(WALK_ANIMATION, body_squash())
                .with_path(CARRY_ANIMATION, body_squash()),
        )
        .with_part(
            "LeftHand",
            PartDef::mesh(MeshRef::Sphere, skin)
                .with_transform(
                    PathTransform::empty()
                        .with_pos(Vec3::new(0.5, 0.4, 0.4))
                        .with_scale(Vec3::splat(0.1)),
                )
                .with_path(WALK_ANIMATION, vertical_dip(-0.25))
                .with_path(CARRY_ANIMATION, vertical_dip(-0.25))
                .with_path(GATHER_ANIMATION, gather_reach()),
        )
        .with_part(
            "RightHand",
            PartDef::mesh(MeshRef::Sphere, skin)
                .with_transform(
                    PathTransform::empty()
                        .with_pos(Vec3::new(0.5, 0.4, -0.4))
                        .with_scale(Vec3::splat(0.1)),
                )
                .with_path(WALK_ANIMATION, vertical_dip(-0.25))
                .with_path(CARRY_ANIMATION, vertical_dip(-0.25))
                .with_path(GATHER_ANIMATION, gather_reach())
                .with_path(SWING_ANIMATION, swing_arc()),
        )
        .with_part(
            "Carry",
            PartDef::anchor()
                .with_transform(PathTransform::empty().with_pos(Vec3::new(0.5, 0.5, 0.0)))
                .with_attach(Attach::Carry)
                .with_path(WALK_ANIMATION, vertical_dip(-0.25))
                .with_path(CARRY_ANIMATION, vertical_dip(-0.25)),
        )
}

fn tree_model() -> ModelDef {
    ModelDef::new(TREE_KIND, Vec3::new(0.4, 2.0, 0.4))
        .with_animation(IMPACT_ANIMATION, 500.0, false)
        .with_animation(FELL_ANIMATION, 2000.0, false)
        .with_animation(SINK_ANIMATION, 2000.0, false)
        .with_part(
            "Trunk",
            PartDef::mesh(MeshRef::Cylinder, Color::rgb(0.5, 0.2, 0.0))
                .with_transform(PathTransform::empty().with_scale(Vec3::new(0.4, 0.75, 0.4)))
                .with_path(IMPACT_ANIMATION, impact_wiggle())
                .with_path(
                    FELL_ANIMATION,
                    fell_topple(Vec3::new(1.0, 0.0, 0.0)),
                )
                .with_path(SINK_ANIMATION, sink_drop(-4.0)),
        )
        .with_part(
            "Leaves",
            PartDef::mesh(MeshRef::Cone, Color::rgb(0.1, 0.5, 0.1))
                .with_transform(
                    PathTransform::empty()
                        .with_pos(Vec3::new(0.0, 0.75, 0.0))
                        .with_scale(Vec3::new(1.25, 2.5, 1.25)),
                )
                .with_path(IMPACT_ANIMATION, impact_wiggle())
                // Shares the trunk's world-space hinge at the base edge.
                .with_path(
                    FELL_ANIMATION,
                    fell_topple(Vec3::new(0.32, -0.3, 0.0)),
                )
                .with_path(SINK_ANIMATION, sink_drop(-1.2)),
        )
}

fn stockpile_model() -> ModelDef {
    ModelDef::new(STOCKPILE_KIND, Vec3::new(0.5, 0.05, 0.5))
        .with_part(
            "Base",
            PartDef::mesh(MeshRef::Cube, Color::rgb(0.7, 0.7, 0.7)).with_transform(
                PathTransform::empty()
                    .with_pos(Vec3::new(0.0, 0.05, 0.0))
                    .with_scale(Vec3::new(0.5, 0.05, 0.5)),
            ),
        )
        .with_part(
            "Pile",
            PartDef::anchor()
                .with_transform(PathTransform::empty().with_pos(Vec3::new(0.0, 0.1, 0.0)))
                .with_attach(Attach::Pile),
        )
}

fn bush_model() -> ModelDef {
    ModelDef::new(BUSH_KIND, Vec3::new(0.6, 0.5, 0.6)).with_part(
        "Leaves",
        PartDef::mesh(MeshRef::Dome, Color::rgb(0.2, 0.5, 0.2))
            .with_transform(PathTransform::empty().with_scale(Vec3::new(0.6, 0.5, 0.6))),
    )
}

fn rock_model() -> ModelDef {
    ModelDef::new(ROCK_KIND, Vec3::new(0.6, 0.4, 0.6)).with_part(
        "Boulder",
        PartDef::mesh(MeshRef::Dome, Color::rgb(0.4, 0.4, 0.4))
            .with_transform(PathTransform::empty().with_scale(Vec3::new(0.6, 0.4, 0.6))),
    )
}

fn ground_model() -> ModelDef {
    ModelDef::new(GROUND_KIND, Vec3::new(10.0, 0.0, 10.0)).with_part(
        "Grass",
        PartDef::mesh(MeshRef::Plane, Color::rgb(0.0, 0.6, 0.0))
            .with_transform(PathTransform::empty().with_rot(Vec3::new(FRAC_PI_2, 0.0, 0.0))),
    )
}

fn berry_model() -> ModelDef {
    ModelDef::new(ResourceKind::Berry.as_str(), Vec3::new(0.1, 0.1, 0.1)).with_part(
        "Fruit",
        PartDef::mesh(MeshRef::Sphere, Color::rgb(0.8, 0.1, 0.1)).with_transform(
            PathTransform::empty()
                .with_pos(Vec3::new(0.0, 0.1, 0.0))
                .with_scale(Vec3::splat(0.1)),
        ),
    )
}

fn stone_model() -> ModelDef {
    ModelDef::new(ResourceKind::Stone.as_str(), Vec3::new(0.1, 0.2, 0.3)).with_part(
        "Block",
        PartDef::mesh(MeshRef::Cube, Color::rgb(0.4, 0.4, 0.4)).with_transform(
            PathTransform::empty()
                .with_pos(Vec3::new(0.0, 0.2, 0.0))
                .with_scale(Vec3::new(0.1, 0.2, 0.3)),
        ),
    )
}

fn wood_model() -> ModelDef {
    ModelDef::new(ResourceKind::Wood.as_str(), Vec3::new(0.1, 0.05, 0.5)).with_part(
        "Plank",
        PartDef::mesh(MeshRef::Cube, Color::rgb(0.5, 0.2, 0.0)).with_transform(
            PathTransform::empty()
                .with_pos(Vec3::new(0.0, 0.05, 0.0))
                .with_scale(Vec3::new(0.1, 0.05, 0.5)),
        ),
    )
}

/// Down-and-back hop used by the walk and carry cycles.
fn vertical_dip(depth: f32) -> CubicPath {
    let rest = PathTransform::empty().with_pos(Vec3::ZERO);
    let low = PathTransform::empty().with_pos(Vec3::new(0.0, depth, 0.0));
    CubicPath {
        start: rest,
        control1: low,
        control2: low,
        end: rest,
    }
}

fn body_squash() -> CubicPath {
    let rest = PathTransform::empty().with_scale(Vec3::ONE);
    let squashed = PathTransform::empty().with_scale(Vec3::new(1.0, 0.75, 1.0));
    CubicPath {
        start: rest,
        control1: squashed,
        control2: squashed,
        end: rest,
    }
}

fn gather_reach() -> CubicPath {
    let rest = PathTransform::empty().with_pos(Vec3::ZERO);
    let reach = PathTransform::empty().with_pos(Vec3::new(0.3, -0.4, 0.0));
    CubicPath {
        start: rest,
        control1: reach,
        control2: reach,
        end: rest,
    }
}

fn swing_arc() -> CubicPath {
    let rest = PathTransform::empty().with_rot(Vec3::ZERO);
    CubicPath {
        start: rest,
        control1: PathTransform::empty().with_rot(Vec3::new(0.0, 0.0, 1.2)),
        control2: PathTransform::empty().with_rot(Vec3::new(0.0, 0.0, -2.0)),
        end: rest,
    }
}

fn impact_wiggle() -> CubicPath {
    let rest = PathTransform::empty().with_rot(Vec3::ZERO);
    CubicPath {
        start: rest,
        control1: PathTransform::empty().with_rot(Vec3::new(0.0, 0.0, -0.1)),
        control2: PathTransform::empty().with_rot(Vec3::new(0.0, 0.0, 0.05)),
        end: rest,
    }
}

/// Topple about the part-local pivot, ending just past horizontal.
fn fell_topple(pivot: Vec3) -> CubicPath {
    let hinge = PathTransform::empty().with_pos(pivot).with_offset(-pivot);
    CubicPath {
        start: hinge.with_rot(Vec3::ZERO),
        control1: hinge.with_rot(Vec3::new(0.0, 0.0, -0.3)),
        control2: hinge.with_rot(Vec3::new(0.0, 0.0, -1.8)),
        end: hinge.with_rot(Vec3::new(0.0, 0.0, -1.8)),
    }
}

fn sink_drop(depth: f32) -> CubicPath {
    let surface = PathTransform::empty().with_pos(Vec3::ZERO);
    let sunken = PathTransform::empty().with_pos(Vec3::new(0.0, depth, 0.0));
    CubicPath {
        start: surface,
        control1: surface,
        control2: sunken,
        end: sunken,
    }
}
