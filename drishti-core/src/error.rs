use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Device initialization error: {0}")]
    DeviceInit(String),

    #[error("Device error: {0}")]
    Device(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Channel error: {0}")]
    Channel(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Fatal errors abort startup; everything else degrades at runtime.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::DeviceInit(_) | Error::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DeviceInit("camera missing".to_string());
        assert!(err.to_string().contains("Device initialization error"));
        assert!(err.to_string().contains("camera missing"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such device");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_fatality() {
        assert!(Error::DeviceInit("x".to_string()).is_fatal());
        assert!(Error::Configuration("x".to_string()).is_fatal());
        assert!(!Error::Device("x".to_string()).is_fatal());
        assert!(!Error::Network("x".to_string()).is_fatal());
    }
}
