/// Invalid classifier tuning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierConfigError {
    #[error("tier thresholds must satisfy 0 <= simple_max < complex_min <= 1 (got {simple_max}, {complex_min})")]
    InvalidThresholds { simple_max: f64, complex_min: f64 },

    #[error("weight for dimension {dimension} is not a finite number")]
    NonFiniteWeight { dimension: &'static str },
}
