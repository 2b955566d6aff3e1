/// Convenience result type used across thumbkit.
pub type ThumbkitResult<T> = Result<T, ThumbkitError>;

/// Where a load request originated; selects the user-facing failure message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Bytes picked from the local filesystem.
    Upload,
    /// Remote video thumbnail.
    Remote,
}

/// Top-level error taxonomy used by thumbnail APIs.
#[derive(thiserror::Error, Debug)]
pub enum ThumbkitError {
    /// Invalid user input (bad URL, missing file, out-of-range settings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Fetching or decoding a background image failed.
    #[error("load error: {message}")]
    Load {
        /// Source kind of the failed load.
        origin: LoadOrigin,
        /// Lower-level failure description.
        message: String,
    },

    /// Errors while compiling or rasterizing a scene.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding or writing an exported file.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbkitError {
    /// Build a [`ThumbkitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ThumbkitError::Load`] value.
    pub fn load(origin: LoadOrigin, msg: impl Into<String>) -> Self {
        Self::Load {
            origin,
            message: msg.into(),
        }
    }

    /// Build a [`ThumbkitError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ThumbkitError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`ThumbkitError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Message suitable for showing to the person driving the UI or CLI.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Load {
                origin: LoadOrigin::Upload,
                ..
            } => "Unable to process that image.".to_string(),
            Self::Load {
                origin: LoadOrigin::Remote,
                ..
            } => "Thumbnail could not be loaded. Try a different video URL.".to_string(),
            Self::Export(_) => {
                "Could not export image. Try uploading a local image instead.".to_string()
            }
            Self::Render(msg) | Self::Serde(msg) => msg.clone(),
            Self::Other(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
