use crate::param::ParamValue;

use super::{Model, ModelError};

/// Parameter overrides applied when building a [`Model`].
///
/// # Example
///
/// ```
/// use twine_scip::{ModelConfig, ParamValue};
///
/// let model = ModelConfig::default()
///     .with_param("limits/time", 60.0)
///     .with_param("display/verblevel", 0)
///     .build()
///     .unwrap();
///
/// assert_eq!(model.get_param("display/verblevel").unwrap(), ParamValue::Int(0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelConfig {
    /// Parameter values, applied in order.
    pub params: Vec<(String, ParamValue)>,

    /// Turn off presolving.
    pub disable_presolve: bool,

    /// Turn off cutting plane separation.
    pub disable_cuts: bool,
}

impl ModelConfig {
    /// Adds a parameter override.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Creates a model with this configuration applied.
    ///
    /// The switches are applied first, so explicit parameters take precedence.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] raised while applying the overrides.
    pub fn build(&self) -> Result<Model, ModelError> {
        let model = Model::new();
        if self.disable_presolve {
            model.disable_presolve()?;
        }
        if self.disable_cuts {
            model.disable_cuts()?;
        }
        model.set_params(self.params.iter().map(|(name, value)| (name, value.clone())))?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::param::ParamError;

    #[test]
    fn default_builds_default_model() {
        let model = ModelConfig::default().build().unwrap();
        assert_eq!(
            model.get_param("presolving/maxrounds").unwrap(),
            ParamValue::Int(-1)
        );
    }

    #[test]
    fn explicit_params_override_switches() {
        let config = ModelConfig {
            disable_presolve: true,
            ..ModelConfig::default()
        }
        .with_param("presolving/maxrounds", 3);

        let model = config.build().unwrap();
        assert_eq!(
            model.get_param("presolving/maxrounds").unwrap(),
            ParamValue::Int(3)
        );
        assert_eq!(
            model.get_param("presolving/maxrestarts").unwrap(),
            ParamValue::Int(0)
        );
    }

    #[test]
    fn invalid_override_fails_build() {
        let error = ModelConfig::default()
            .with_param("branching/preferbinary", 1)
            .build()
            .unwrap_err();
        assert!(matches!(
            error,
            ModelError::Param(ParamError::TypeMismatch { .. })
        ));
    }
}
