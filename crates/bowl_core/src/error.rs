use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("action has {found} components, expected {expected}")]
    ActionDimension { expected: usize, found: usize },

    #[error("degenerate delivery: non-positive speed {speed_mps} m/s")]
    DegenerateDelivery { speed_mps: f32 },

    #[error("step called before reset")]
    NotStarted,
}

pub type Result<T> = std::result::Result<T, EnvError>;
