use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The elimination format of a bracket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Format {
    SingleElimination,
    DoubleElimination,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleElimination => "single_elimination",
            Self::DoubleElimination => "double_elimination",
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" | "single_elimination" => Ok(Self::SingleElimination),
            "double" | "double_elimination" => Ok(Self::DoubleElimination),
            s => Err(Error::UnsupportedFormat(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("single".parse(), Ok(Format::SingleElimination));
        assert_eq!("double_elimination".parse(), Ok(Format::DoubleElimination));
        assert_eq!(
            "swiss".parse::<Format>(),
            Err(Error::UnsupportedFormat(String::from("swiss")))
        );

        for format in [Format::SingleElimination, Format::DoubleElimination] {
            assert_eq!(format.to_string().parse(), Ok(format));
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_format() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(
            &Format::DoubleElimination,
            &[Token::UnitVariant {
                name: "Format",
                variant: "double_elimination",
            }],
        );
    }
}
