use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SrimResult<T> = Result<T, SrimError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrimErrorCategory {
    /// A required header, marker or table line is absent.
    MissingSection,
    /// The file was written in a simulation mode that cannot carry the data.
    UnsupportedMode,
    /// A collision-log or event record does not have the expected shape.
    MalformedRecord,
    ResourceNotFound,
    InputValidation,
    IoSystem,
}

impl SrimErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidation => 2,
            Self::ResourceNotFound => 3,
            Self::IoSystem => 4,
            Self::MissingSection => 5,
            Self::MalformedRecord => 6,
            Self::UnsupportedMode => 7,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingSection => "MissingSection",
            Self::UnsupportedMode => "UnsupportedMode",
            Self::MalformedRecord => "MalformedRecord",
            Self::ResourceNotFound => "ResourceNotFound",
            Self::InputValidation => "InputValidation",
            Self::IoSystem => "IoSystem",
        }
    }
}

impl Display for SrimErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrimError {
    category: SrimErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl SrimError {
    pub fn new(
        category: SrimErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn missing_section(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SrimErrorCategory::MissingSection, placeholder, message)
    }

    pub fn unsupported_mode(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SrimErrorCategory::UnsupportedMode, placeholder, message)
    }

    pub fn malformed_record(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SrimErrorCategory::MalformedRecord, placeholder, message)
    }

    pub fn resource_not_found(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SrimErrorCategory::ResourceNotFound, placeholder, message)
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SrimErrorCategory::InputValidation, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SrimErrorCategory::IoSystem, placeholder, message)
    }

    /// Maps an I/O failure on `path`, keeping not-found distinct from other errors.
    pub fn from_io(
        placeholder: &'static str,
        path: &std::path::Path,
        source: &std::io::Error,
    ) -> Self {
        let message = format!("failed to read '{}': {}", path.display(), source);
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::resource_not_found(placeholder, message)
        } else {
            Self::io_system(placeholder, message)
        }
    }

    pub const fn category(&self) -> SrimErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn is_unsupported_mode(&self) -> bool {
        self.category == SrimErrorCategory::UnsupportedMode
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for SrimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for SrimError {}

#[cfg(test)]
mod tests {
    use super::{SrimError, SrimErrorCategory};
    use std::io;
    use std::path::Path;

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (SrimErrorCategory::InputValidation, 2),
            (SrimErrorCategory::ResourceNotFound, 3),
            (SrimErrorCategory::IoSystem, 4),
            (SrimErrorCategory::MissingSection, 5),
            (SrimErrorCategory::MalformedRecord, 6),
            (SrimErrorCategory::UnsupportedMode, 7),
        ];

        for (category, exit_code) in cases {
            assert_eq!(category.exit_code(), exit_code);
        }
    }

    #[test]
    fn error_renders_diagnostic_lines() {
        let error = SrimError::missing_section("PARSE.ION_HEADER", "unable to extract ion");

        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [PARSE.ION_HEADER] unable to extract ion"
        );
        assert_eq!(error.fatal_exit_line(), "FATAL EXIT CODE: 5");
        assert_eq!(
            error.to_string(),
            "MissingSection [PARSE.ION_HEADER] unable to extract ion"
        );
    }

    #[test]
    fn io_not_found_maps_to_resource_not_found() {
        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");

        let missing = SrimError::from_io("IO.READ", Path::new("IONIZ.txt"), &missing);
        let denied = SrimError::from_io("IO.READ", Path::new("IONIZ.txt"), &denied);

        assert_eq!(missing.category(), SrimErrorCategory::ResourceNotFound);
        assert_eq!(denied.category(), SrimErrorCategory::IoSystem);
    }
}
