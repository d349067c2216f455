use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_data_types {
    ($($sql_name: literal $variant: ident),+ $(,)?) => {
        /// Logical type carried by a [`Value`](crate::values::Value) or a
        /// [`Bind`](crate::query::Bind).
        ///
        /// Engines use it to pick the correct encoding for a string rendered value
        /// without inspecting the content.
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
        pub enum DataType {
            $(
                #[doc = "The `"]
                #[doc = $sql_name]
                #[doc = "` SQL type."]
                $variant,
            )+
        }

        impl DataType {
            /// Every data type, in declaration order.
            pub const ALL: &'static [DataType] = &[$(DataType::$variant),+];

            /// The ANSI name of this type.
            pub const fn sql_name(self) -> &'static str {
                match self {
                    $(DataType::$variant => $sql_name,)+
                }
            }
        }

        impl FromStr for DataType {
            type Err = UnknownDataType;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($sql_name) {
                        return Ok(DataType::$variant);
                    }
                )+
                Err(UnknownDataType(s.to_owned()))
            }
        }
    };
}

define_data_types! {
    "TEXT" Text,
    "VARCHAR" Varchar,
    "INTEGER" Integer,
    "DOUBLE" Double,
    "NUMERIC" Numeric,
    "BOOLEAN" Boolean,
    "DATE" Date,
}

impl DataType {
    /// Is this a free-form text type?
    pub const fn is_text(self) -> bool {
        matches!(self, DataType::Text | DataType::Varchar)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Returned when parsing a name that isn't a [`DataType`].
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unknown data type `{0}`")]
pub struct UnknownDataType(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sql_names_case_insensitively() {
        for ty in DataType::ALL {
            assert_eq!(ty.sql_name().parse::<DataType>(), Ok(*ty));
            assert_eq!(ty.sql_name().to_lowercase().parse::<DataType>(), Ok(*ty));
        }

        assert_eq!(
            "BLOB".parse::<DataType>(),
            Err(UnknownDataType("BLOB".into()))
        );
    }

    #[test]
    fn text_types() {
        let text: Vec<_> = DataType::ALL.iter().filter(|t| t.is_text()).collect();
        assert_eq!(text, [&DataType::Text, &DataType::Varchar]);
    }
}
