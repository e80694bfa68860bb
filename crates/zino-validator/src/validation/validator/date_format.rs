use super::Validator;
use crate::{datetime::DateFormat, error::Error};

/// A validator for dates written in a specific [`DateFormat`].
#[derive(Debug, Clone, Copy)]
pub struct DateFormatValidator<'a>(pub &'a DateFormat);

impl Validator<str> for DateFormatValidator<'_> {
    type Error = Error;

    #[inline]
    fn validate(&self, data: &str) -> Result<(), Self::Error> {
        self.0.parse(data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DateFormatValidator, Validator};
    use crate::datetime::DateFormat;

    #[test]
    fn it_validates_date_formats() {
        let format = DateFormat::new("d.m.Y").unwrap();
        let validator = DateFormatValidator(&format);
        assert!(validator.validate("24.12.2023").is_ok());
        assert!(validator.validate("2023-12-24").is_err());
        assert!(validator.validate("24.12.2023 ").is_err());
        assert!(validator.validate("24.12. 2023").is_err());
    }
}
