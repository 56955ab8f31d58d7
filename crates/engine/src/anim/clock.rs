use crate::content::ModelDef;

/// What happens to a non-looped clock once it runs past its duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverrunPolicy {
    #[default]
    HoldLastFrame,
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClock {
    pub name: String,
    pub time_ms: f32,
}

impl AnimationClock {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_ms: 0.0,
        }
    }
}

/// Advance a clock against its model's animation map. A name the model
/// does not define is left untouched rather than treated as an error.
pub fn advance_clock(
    clock: &mut Option<AnimationClock>,
    dt_ms: f32,
    model: &ModelDef,
    policy: OverrunPolicy,
) {
    let Some(active) = clock.as_mut() else {
        return;
    };
    active.time_ms += dt_ms;

    let Some(animation) = model.animation(&active.name) else {
        return;
    };
    if animation.looped {
        active.time_ms %= animation.duration_ms;
    } else if active.time_ms > animation.duration_ms {
        match policy {
            OverrunPolicy::HoldLastFrame => active.time_ms = animation.duration_ms,
            OverrunPolicy::Clear => *clock = None,
        }
    }
}
