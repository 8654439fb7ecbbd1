use std::fmt;

/// Errors in engine or state-table configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A state profile that does not resolve to exactly one tax path
    MalformedStateProfile { state: String, reason: String },
    /// A federal bracket schedule violates ordering or rate bounds
    InvalidBrackets(String),
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// Historical return series is empty and cannot be sampled
    EmptyHistoricalData,
    NoTrajectories,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MalformedStateProfile { state, reason } => {
                write!(f, "malformed tax profile for {state}: {reason}")
            }
            ConfigError::InvalidBrackets(reason) => write!(f, "invalid tax brackets: {reason}"),
            ConfigError::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "invalid {name} ({value}): {reason}"),
            ConfigError::EmptyHistoricalData => write!(f, "historical return series is empty"),
            ConfigError::NoTrajectories => {
                write!(f, "trajectories must be at least 1 for the survival simulation")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors turning a profile input into a frozen [`crate::model::RetirementProfile`]
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A monetary field is negative, NaN or infinite
    InvalidAmount { field: &'static str, value: f64 },
    InvalidAge(u32),
    UnknownState(String),
    /// The emergency expense is larger than cash and stocks combined
    EmergencyExceedsPortfolio { expense: f64, available: f64 },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::InvalidAmount { field, value } => {
                write!(f, "{field} must be a non-negative number, got {value}")
            }
            ProfileError::InvalidAge(age) => write!(f, "age {age} is outside 1-120"),
            ProfileError::UnknownState(name) => write!(
                f,
                "unknown state {name:?}; add a custom_state block with its flat rate"
            ),
            ProfileError::EmergencyExceedsPortfolio { expense, available } => write!(
                f,
                "emergency expense {expense:.2} exceeds available balances {available:.2}"
            ),
        }
    }
}

impl std::error::Error for ProfileError {}

/// Errors that stop a simulation before any trajectory runs
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    /// Zero trajectories requested
    NoTrajectories,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "{e}"),
            SimulationError::NoTrajectories => write!(f, "trajectory count must be positive"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::NoTrajectories => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::Config(err)
    }
}

/// Any failure of a full analysis run
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    Profile(ProfileError),
    Simulation(SimulationError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Profile(e) => write!(f, "profile error: {e}"),
            AnalysisError::Simulation(e) => write!(f, "simulation error: {e}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Profile(e) => Some(e),
            AnalysisError::Simulation(e) => Some(e),
        }
    }
}

impl From<ProfileError> for AnalysisError {
    fn from(err: ProfileError) -> Self {
        AnalysisError::Profile(err)
    }
}

impl From<SimulationError> for AnalysisError {
    fn from(err: SimulationError) -> Self {
        AnalysisError::Simulation(err)
    }
}
