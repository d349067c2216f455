use chrono::NaiveDateTime;
use seam_core::error::{Error, QueryResult};
use seam_core::values::DATE_FORMAT;
use seam_core::DataType;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Converts a string rendered datum of type `data_type` to its stored form.
///
/// Booleans are stored as `True`/`False` whatever their input spelling and dates
/// are re-rendered zero padded; every other type is stored as given once it is
/// known to parse.
pub(crate) fn encode(data: &str, data_type: DataType) -> QueryResult<String> {
    let valid = match data_type {
        DataType::Text | DataType::Varchar => true,
        DataType::Integer => data.parse::<i64>().is_ok(),
        DataType::Double | DataType::Numeric => data.parse::<f64>().is_ok(),
        DataType::Boolean => {
            return match data.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok("True".to_owned()),
                "false" | "0" => Ok("False".to_owned()),
                _ => Err(invalid(data, data_type)),
            }
        }
        DataType::Date => {
            return NaiveDateTime::parse_from_str(data, DATE_FORMAT)
                .map(|date| date.format(DATE_FORMAT).to_string())
                .map_err(|_| invalid(data, data_type))
        }
    };

    if valid {
        Ok(data.to_owned())
    } else {
        Err(invalid(data, data_type))
    }
}

fn invalid(data: &str, data_type: DataType) -> Error {
    Error::serialization_failure(format!("`{}` is not a valid {} value", data, data_type))
}

/// Doubles single quotes so `data` can sit inside a string literal.
pub(crate) fn escape(data: &str) -> Cow<'_, str> {
    if data.contains('\'') {
        Cow::Owned(data.replace('\'', "''"))
    } else {
        Cow::Borrowed(data)
    }
}

/// Orders two stored cells: numerically when both are numbers, by text otherwise.
pub(crate) fn compare(left: &str, right: &str) -> Ordering {
    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r).unwrap_or_else(|| left.cmp(right)),
        _ => left.cmp(right),
    }
}

/// SQL `LIKE`: `%` matches any run of characters, `_` exactly one.
pub(crate) fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // matches[j]: does text[..i] match pattern[..j]
    let mut matches = vec![false; pattern.len() + 1];
    matches[0] = true;
    for j in 1..=pattern.len() {
        matches[j] = matches[j - 1] && pattern[j - 1] == '%';
    }

    for c in &text {
        let mut diagonal = matches[0];
        matches[0] = false;
        for j in 1..=pattern.len() {
            let above = matches[j];
            matches[j] = match pattern[j - 1] {
                '%' => matches[j - 1] || above,
                '_' => diagonal,
                p => diagonal && p == *c,
            };
            diagonal = above;
        }
    }

    matches[pattern.len()]
}
