//! Configuration for the analyses.
//!
//! Every analysis takes a plain configuration struct with a `Default` and a few named
//! presets. [`AnalysisConfig`] bundles them for [`Pipeline`](crate::analysis::Pipeline).

/// Worklist step limit of [`AnalysisConfig::debugging`].
pub const DEBUG_STEP_LIMIT: usize = 1_000_000;

/// Configuration for SSA conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SsaConfig {
    /// Treat reads with no reaching definition as free variables (global bindings)
    /// instead of failing with [`Error::UnresolvedName`](crate::Error::UnresolvedName).
    /// Free reads stay bare symbols, and phi operands without a reaching definition
    /// become bare symbols too.
    pub allow_free_variables: bool,

    /// Run [`verify_ssa`](crate::analysis::ssa::verify_ssa) on the result of every
    /// conversion.
    pub verify: bool,
}

impl Default for SsaConfig {
    fn default() -> Self {
        Self {
            allow_free_variables: false,
            verify: true,
        }
    }
}

impl SsaConfig {
    /// Every read must be reached by a definition. Results are verified.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Reads without a reaching definition refer to global bindings.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            allow_free_variables: true,
            verify: true,
        }
    }
}

/// Configuration for constant propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationConfig {
    /// Upper bound on worklist steps before giving up with
    /// [`Error::IterationLimit`](crate::Error::IterationLimit). `None` runs to the
    /// fixpoint, which always exists.
    pub max_steps: Option<usize>,

    /// Keep a log of every lattice value change, available through
    /// [`ConstantMap::transitions`](crate::analysis::ConstantMap::transitions)
    pub record_transitions: bool,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            record_transitions: false,
        }
    }
}

/// Configuration of a full [`Pipeline`](crate::analysis::Pipeline) run.
///
/// # Examples
///
/// ```rust
/// use ssalyze::config::AnalysisConfig;
///
/// let config = AnalysisConfig::lenient();
/// assert!(config.ssa.allow_free_variables);
/// assert!(!config.propagation.record_transitions);
/// assert_eq!(config.propagation.max_steps, None);
///
/// assert_eq!(AnalysisConfig::default(), AnalysisConfig::strict());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisConfig {
    /// SSA conversion settings
    pub ssa: SsaConfig,
    /// Constant propagation settings
    pub propagation: PropagationConfig,
}

impl AnalysisConfig {
    /// Undefined reads are errors and every SSA result is verified.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Undefined reads are treated as globals, for analyzing code fragments that use
    /// names bound elsewhere.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            ssa: SsaConfig::lenient(),
            propagation: PropagationConfig::default(),
        }
    }

    /// Strict, records every lattice transition of the propagation, and stops a
    /// propagation that runs past [`DEBUG_STEP_LIMIT`] steps.
    #[must_use]
    pub fn debugging() -> Self {
        Self {
            ssa: SsaConfig::strict(),
            propagation: PropagationConfig {
                max_steps: Some(DEBUG_STEP_LIMIT),
                record_transitions: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_limit_presets() {
        assert_eq!(PropagationConfig::default().max_steps, None);
        assert_eq!(AnalysisConfig::strict().propagation.max_steps, None);
        assert_eq!(AnalysisConfig::lenient().propagation.max_steps, None);

        let debugging = AnalysisConfig::debugging();
        assert_eq!(debugging.propagation.max_steps, Some(DEBUG_STEP_LIMIT));
        assert!(debugging.propagation.record_transitions);
        assert!(!debugging.ssa.allow_free_variables);
    }
}
