//! Utils for config validations.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Custom validation for ASCII string.
pub fn validate_ascii(name: &impl ToString) -> Result<(), ValidationError> {
    if !name.to_string().is_ascii() {
        return Err(ValidationError::new("The value is not ASCII"));
    }
    Ok(())
}

/// Custom validation for file or directory path existence.
pub fn validate_file_exists(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        let mut error = ValidationError::new("file or directory not found");
        error.message = Some(format!("{} does not exist", path.display()).into());
        return Err(error);
    }
    Ok(())
}

/// Struct for parsing a validation error.
#[derive(Debug)]
pub struct ParsedValidationError {
    /// The path of the field that failed validation.
    pub path: String,
    /// The error code.
    pub code: String,
    /// The error message.
    pub message: Option<String>,
    /// The parameters of the error.
    pub params: String,
}

/// A vector of parsing validation errors.
#[derive(Debug)]
pub struct ParsedValidationErrors(pub Vec<ParsedValidationError>);

impl From<ValidationErrors> for ParsedValidationErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut parsed_errors: ParsedValidationErrors = ParsedValidationErrors(vec![]);
        parse_validation_error(&errors, "".to_string(), &mut parsed_errors);
        parsed_errors
    }
}

impl Display for ParsedValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for error in &self.0 {
            write!(f, "Config param {} is invalid: {}", error.path, error.code)?;
            if let Some(message) = &error.message {
                write!(f, " ({message})")?;
            }
            if !error.params.is_empty() {
                write!(f, " [{}]", error.params)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParsedValidationErrors {}

// This function gets an ValidationError object and parses it recursively to a ParsedValidationError
// object.
fn parse_validation_error(
    errors: &ValidationErrors,
    current_path: String,
    parsed_errors: &mut ParsedValidationErrors,
) {
    for (field, error) in errors.errors().iter() {
        let new_path = if current_path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", current_path, field)
        };

        match error {
            ValidationErrorsKind::Struct(errors) => {
                parse_validation_error(errors, new_path, parsed_errors);
            }
            ValidationErrorsKind::List(errors) => {
                for (index, error) in errors.iter() {
                    parse_validation_error(error, format!("{}[{}]", new_path, index), parsed_errors);
                }
            }
            ValidationErrorsKind::Field(errors) => {
                for error in errors {
                    let parsed_error = ParsedValidationError {
                        path: new_path.to_owned(),
                        code: error.code.to_string(),
                        message: error.message.as_ref().map(|cow_string| cow_string.to_string()),
                        params: error
                            .params
                            .iter()
                            .filter(|(key, _)| *key != "value")
                            .map(|(_, v)| v.to_string().replace('\"', ""))
                            .collect::<Vec<String>>()
                            .join(", "),
                    };
                    parsed_errors.0.push(parsed_error);
                }
            }
        }
    }
}
