//! Feature Vector - Core data structure for ML input
//!
//! `FeatureFrame` is what the builder produces, in builder layout.
//! `FeatureVector` is what the model consumes, in schema order, stamped with
//! the schema's layout hash.

use serde::{Deserialize, Serialize};

use super::layout::{
    builder_index, column_kind, validate_layout, FeatureSchema, LayoutMismatchError,
    BUILDER_FEATURE_COUNT, BUILDER_LAYOUT,
};

// ============================================================================
// FEATURE FRAME (builder output)
// ============================================================================

/// Named features produced by the builder. A slot left `None` was not
/// produced for the active profile.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    values: [Option<f64>; BUILDER_FEATURE_COUNT],
}

impl FeatureFrame {
    pub fn new() -> Self {
        Self { values: [None; BUILDER_FEATURE_COUNT] }
    }

    /// Set feature by name
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match builder_index(name) {
            Some(index) => {
                self.values[index] = Some(value);
                true
            }
            None => {
                log::warn!("Feature '{}' is not in the builder layout", name);
                false
            }
        }
    }

    /// Set an indicator feature
    pub fn set_flag(&mut self, name: &str, flag: bool) -> bool {
        self.set(name, if flag { 1.0 } else { 0.0 })
    }

    /// Set a feature the builder layout is known to contain
    pub fn put(&mut self, name: &'static str, value: f64) {
        let stored = self.set(name, value);
        debug_assert!(stored, "'{}' is not in the builder layout", name);
    }

    pub fn put_flag(&mut self, name: &'static str, flag: bool) {
        self.put(name, if flag { 1.0 } else { 0.0 });
    }

    /// Get feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        builder_index(name).and_then(|i| self.values[i])
    }

    /// Names of the features that were produced, in builder order
    pub fn produced(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        BUILDER_LAYOUT
            .iter()
            .zip(self.values.iter())
            .filter_map(|(def, value)| value.map(|v| (def.name, v)))
    }
}

impl Default for FeatureFrame {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// MISSING FEATURE POLICY
// ============================================================================

/// What to do with a declared feature the builder did not produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFeaturePolicy {
    /// Fill with 0
    #[default]
    FillZero,
    /// Fill with NaN so a downstream imputer can replace it
    MarkMissing,
    /// Reject the vector
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error("model expects features the builder did not produce: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),
}

// ============================================================================
// FEATURE VECTOR (model input)
// ============================================================================

/// Schema-ordered feature values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    /// CRC32 hash of the schema this vector was built for
    pub layout_hash: u32,
    /// Values in schema order
    pub values: Vec<f64>,
    /// Schema positions that were not produced by the builder
    pub defaulted: Vec<usize>,
}

impl FeatureVector {
    /// Project a frame onto the model's declared order
    pub fn reindex(
        frame: &FeatureFrame,
        schema: &FeatureSchema,
        policy: MissingFeaturePolicy,
    ) -> Result<Self, FeatureError> {
        let mut values = Vec::with_capacity(schema.len());
        let mut defaulted = Vec::new();
        let mut missing = Vec::new();

        for (index, name) in schema.names().iter().enumerate() {
            match frame.get(name) {
                Some(value) => values.push(value),
                None => {
                    defaulted.push(index);
                    match policy {
                        MissingFeaturePolicy::FillZero => values.push(0.0),
                        MissingFeaturePolicy::MarkMissing => values.push(f64::NAN),
                        MissingFeaturePolicy::Strict => missing.push(name.clone()),
                    }
                }
            }
        }

        if !missing.is_empty() {
            return Err(FeatureError::MissingFeatures(missing));
        }

        if log::log_enabled!(log::Level::Debug) {
            let dropped: Vec<&str> = frame
                .produced()
                .map(|(name, _)| name)
                .filter(|name| schema.index_of(name).is_none())
                .collect();
            if !dropped.is_empty() {
                log::debug!("Dropped features not declared by model: {:?}", dropped);
            }
            if !defaulted.is_empty() {
                let names: Vec<&str> = defaulted.iter().map(|&i| schema.names()[i].as_str()).collect();
                log::debug!("Defaulted features ({:?}): {:?}", policy, names);
            }
        }

        Ok(Self {
            layout_hash: schema.hash(),
            values,
            defaulted,
        })
    }

    /// Truncate integer columns toward zero
    pub fn enforce_kinds(&mut self, schema: &FeatureSchema) {
        for (value, name) in self.values.iter_mut().zip(schema.names()) {
            *value = column_kind(name).coerce(*value);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by name
    pub fn get_by_name(&self, schema: &FeatureSchema, name: &str) -> Option<f64> {
        schema.index_of(name).and_then(|i| self.values.get(i).copied())
    }

    /// Any cell still NaN
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }

    /// Validate that this vector is compatible with a schema
    pub fn validate(&self, schema: &FeatureSchema) -> Result<(), LayoutMismatchError> {
        validate_layout(schema, self.layout_hash)?;
        if self.values.len() != schema.len() {
            return Err(LayoutMismatchError {
                expected_hash: schema.hash(),
                actual_hash: self.layout_hash,
            });
        }
        Ok(())
    }

    /// Values narrowed for the f32 tensor the exported graph takes
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self, schema: &FeatureSchema) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": self.layout_hash,
            "named_values": schema.names().iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), serde_json::json!(value)))
                .collect::<serde_json::Map<_, _>>(),
            "defaulted": self.defaulted.iter()
                .map(|&i| schema.names()[i].clone())
                .collect::<Vec<_>>(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
