use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] geotick_core::ValidationError),

    #[error(transparent)]
    Selection(#[from] geotick_dashboard::SelectionError),

    #[error(transparent)]
    Catalog(#[from] geotick_core::CatalogError),

    #[error(transparent)]
    Snapshot(#[from] geotick_dashboard::SnapshotError),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Selection(_) => 2,
            Self::Catalog(_) => 3,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Snapshot(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
