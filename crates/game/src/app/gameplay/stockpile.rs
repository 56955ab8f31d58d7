/// Grid footprint used when packing a raw good onto a stockpile, as
/// (columns, rows) per layer.
fn stockpile_layout(resource: ResourceKind) -> (usize, usize) {
    match resource {
        ResourceKind::Berry => (2, 2),
        ResourceKind::Stone => (2, 1),
        ResourceKind::Wood => (3, 1),
    }
}

/// Pack an item into the next free grid slot of a stockpile's pile. Layers
/// fill bottom-up and odd layers cross-hatch a quarter turn. Returns the
/// item unchanged when the pile is full or the item is not a raw good.
fn add_item_to_stockpile(
    stockpile: &mut Entity,
    mut item: Entity,
    stockpile_bounds: Vec3,
    item_bounds: Vec3,
    rng: &mut StdRng,
) -> Option<Entity> {
    if stockpile.pile.len() >= STOCKPILE_MAX_ITEMS {
        return Some(item);
    }
    let Some(resource) = ResourceKind::from_name(&item.kind) else {
        return Some(item);
    };

    let (cols, rows) = stockpile_layout(resource);
    let per_layer = cols * rows;
    let slot = stockpile.pile.len();
    let layer = slot / per_layer;
    let within = slot % per_layer;
    let col = within % cols;
    let row = within / cols;

    let horizontal_space = stockpile_bounds.x / cols as f32;
    let vertical_space = stockpile_bounds.z / rows as f32;
    let along_cols = (col as f32 * 2.0 - (cols as f32 - 1.0)) * horizontal_space;
    let along_rows = (row as f32 * 2.0 - (rows as f32 - 1.0)) * vertical_space;
    let height = layer as f32 * item_bounds.y * 2.0;

    if layer % 2 == 0 {
        item.position = Vec3::new(along_cols, height, along_rows);
        item.rotation = Vec3::ZERO;
    } else {
        item.position = Vec3::new(along_rows, height, along_cols);
        item.rotation = Vec3::new(0.0, FRAC_PI_2, 0.0);
    }
    item.rotation.y += (rng.gen::<f32>() - 0.5) * PILE_YAW_JITTER_RANGE;

    stockpile.pile.push(item);
    None
}
