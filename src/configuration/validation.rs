//! Configuration validation logic

use super::Configuration;
use crate::errors::LoghoundError;

impl Configuration {
    /// Validate the detection policy constants.
    pub fn validate_detection(&self) -> Result<(), LoghoundError> {
        if self.detection.login_threshold == 0 {
            return Err(LoghoundError::ConfigError {
                message: "Login threshold must be at least 1".to_string(),
            });
        }
        if self.detection.min_transfer_count < 2 {
            return Err(LoghoundError::ConfigError {
                message: "Minimum transfer count must be at least 2 (clustering needs a pair)"
                    .to_string(),
            });
        }
        if self.detection.window_secs == 0 {
            return Err(LoghoundError::ConfigError {
                message: "Time window must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Validate output configuration.
    pub fn validate_output(&self) -> Result<(), LoghoundError> {
        if self.output.verbose && self.output.quiet {
            return Err(LoghoundError::ConfigError {
                message: "Cannot specify both verbose and quiet modes".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::configuration::Configuration;

    #[test]
    fn should_reject_zero_threshold() {
        let mut config = Configuration::default();
        config.detection.login_threshold = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_transfer_minimum_below_two() {
        let mut config = Configuration::default();
        config.detection.min_transfer_count = 1;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn should_reject_zero_window() {
        let mut config = Configuration::default();
        config.detection.window_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_verbose_and_quiet_together() {
        let mut config = Configuration::default();
        config.output.verbose = true;
        config.output.quiet = true;

        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Configuration::default().validate().is_ok());
    }
}
