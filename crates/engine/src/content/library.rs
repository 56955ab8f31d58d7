use std::collections::BTreeMap;

use thiserror::Error;

use super::model::{ModelDef, PathTransform};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model '{model}' is already registered")]
    DuplicateModel { model: String },
    #[error("model '{model}' not found")]
    ModelNotFound { model: String },
    #[error("model '{model}' animation '{animation}' has non-positive duration {duration_ms}")]
    NonPositiveDuration {
        model: String,
        animation: String,
        duration_ms: f32,
    },
    #[error("model '{model}' part '{part}' has a path for unknown animation '{animation}'")]
    UnknownPathAnimation {
        model: String,
        part: String,
        animation: String,
    },
    #[error(
        "model '{model}' part '{part}' path '{animation}': \
         {control} does not declare the same properties as start"
    )]
    MismatchedControlPoint {
        model: String,
        part: String,
        animation: String,
        control: &'static str,
    },
}

/// Validated registry of model definitions, keyed by model name.
#[derive(Debug, Default)]
pub struct ModelLibrary {
    models: BTreeMap<String, ModelDef>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: ModelDef) -> Result<(), ModelError> {
        if self.models.contains_key(&model.name) {
            return Err(ModelError::DuplicateModel { model: model.name });
        }
        validate_model(&model)?;
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ModelDef, ModelError> {
        self.models.get(name).ok_or_else(|| ModelError::ModelNotFound {
            model: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn validate_model(model: &ModelDef) -> Result<(), ModelError> {
    for (animation_name, animation) in &model.animations {
        if animation.duration_ms <= 0.0 {
            return Err(ModelError::NonPositiveDuration {
                model: model.name.clone(),
                animation: animation_name.clone(),
                duration_ms: animation.duration_ms,
            });
        }
    }

    for (part_name, part) in &model.parts {
        for (animation_name, path) in &part.paths {
            if !model.animations.contains_key(animation_name) {
                return Err(ModelError::UnknownPathAnimation {
                    model: model.name.clone(),
                    part: part_name.clone(),
                    animation: animation_name.clone(),
                });
            }
            let expected = property_mask(&path.start);
            for (control, point) in [
                ("control1", &path.control1),
                ("control2", &path.control2),
                ("end", &path.end),
            ] {
                if property_mask(point) != expected {
                    return Err(ModelError::MismatchedControlPoint {
                        model: model.name.clone(),
                        part: part_name.clone(),
                        animation: animation_name.clone(),
                        control,
                    });
                }
            }
        }
    }

    Ok(())
}

fn property_mask(transform: &PathTransform) -> [bool; 4] {
    [
        transform.pos.is_some(),
        transform.rot.is_some(),
        transform.scale.is_some(),
        transform.offset.is_some(),
    ]
}
