//! Exit codes for the ldar-core CLI.
//!
//! Ranges:
//! - 0: success
//! - 10-19: user/environment errors (fix the input and rerun)
//! - 20-29: internal or I/O errors

use crate::error::{Error, ErrorCategory};

/// Process exit codes. Stable for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Clean = 0,

    /// Invalid arguments
    ArgsError = 10,
    /// Program file missing, malformed or semantically invalid
    ConfigError = 11,
    /// Fit or parameter error
    FitError = 12,
    /// Weather data could not be provisioned
    WeatherError = 13,

    /// Internal error (bug - please report)
    InternalError = 20,
    /// I/O error
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// User/environment error (10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Internal error (20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::FitError => "ERR_FIT",
            ExitCode::WeatherError => "ERR_WEATHER",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Map an engine error onto an exit code.
    pub fn for_error(err: &Error) -> Self {
        match err {
            Error::InvalidArgument(_) => ExitCode::ArgsError,
            Error::Json(_) => ExitCode::InternalError,
            _ => match err.category() {
                ErrorCategory::Config => ExitCode::ConfigError,
                ErrorCategory::Fit | ErrorCategory::Sampling => ExitCode::FitError,
                ErrorCategory::Io => ExitCode::IoError,
                ErrorCategory::Network => ExitCode::WeatherError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_consistent() {
        assert!(ExitCode::Clean.is_success());
        for code in [
            ExitCode::ArgsError,
            ExitCode::ConfigError,
            ExitCode::FitError,
            ExitCode::WeatherError,
        ] {
            assert!(code.is_user_error(), "{}", code);
        }
        assert!(ExitCode::IoError.is_internal_error());
    }

    #[test]
    fn errors_map_by_category() {
        let err = Error::UnknownFamily { name: "x".into() };
        assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
        let err = Error::Weather("denied".into());
        assert_eq!(ExitCode::for_error(&err), ExitCode::WeatherError);
        let err = Error::InvalidArgument("bad".into());
        assert_eq!(ExitCode::for_error(&err).as_i32(), 10);
    }
}
