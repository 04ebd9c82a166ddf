use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("password too short (minimum {0} characters)")]
    WeakCredential(usize),

    #[error("forward source is the same as destination: {0}")]
    SelfForward(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown export format: {0}")]
    UnknownExport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdminError {
    /// Process exit status for this error (sysexits.h values)
    pub fn exit_code(&self) -> u8 {
        match self {
            // EX_USAGE
            Self::UnknownExport(_) => 64,
            // EX_DATAERR
            Self::InvalidAddress(_) | Self::WeakCredential(_) | Self::SelfForward(_) => 65,
            // EX_NOUSER
            Self::NotFound(_) => 67,
            // EX_SOFTWARE
            Self::OperationFailed(_) => 70,
            // EX_IOERR
            Self::Database(_) | Self::Io(_) => 74,
            // EX_CONFIG
            Self::Config(_) => 78,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
