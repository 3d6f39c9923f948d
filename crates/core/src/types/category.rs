//! Product categories and sub-categories.
//!
//! Both serialize as their display names ("Perfumes", "Twinkle Blends"), which
//! is also how they are stored in the database and carried in query strings.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("unknown sub-category: {0}")]
    UnknownSubCategory(String),
}

/// Top-level product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Perfumes,
    Accessories,
}

impl Category {
    pub const ALL: [Self; 2] = [Self::Perfumes, Self::Accessories];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Perfumes => "Perfumes",
            Self::Accessories => "Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategoryError::UnknownCategory(s.to_owned()))
    }
}

/// Secondary grouping inside a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubCategory {
    #[serde(rename = "Twinkle Blends")]
    TwinkleBlends,
    #[serde(rename = "Designer Brands")]
    DesignerBrands,
    #[default]
    #[serde(rename = "None")]
    Unspecified,
}

impl SubCategory {
    pub const ALL: [Self; 3] = [Self::TwinkleBlends, Self::DesignerBrands, Self::Unspecified];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwinkleBlends => "Twinkle Blends",
            Self::DesignerBrands => "Designer Brands",
            Self::Unspecified => "None",
        }
    }

    /// Whether the sub-category is worth showing next to the category.
    #[must_use]
    pub const fn is_specified(self) -> bool {
        !matches!(self, Self::Unspecified)
    }
}

impl fmt::Display for SubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategoryError::UnknownSubCategory(s.to_owned()))
    }
}

#[cfg(feature = "postgres")]
macro_rules! text_column {
    ($name:ident) => {
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(s.parse::<Self>()?)
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

#[cfg(feature = "postgres")]
text_column!(Category);
#[cfg(feature = "postgres")]
text_column!(SubCategory);
