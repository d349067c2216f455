use crate::types::DataType;
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// `chrono` format of a rendered [`DataType::Date`] value.
///
/// Every engine must accept and return dates exactly in this form so they compare
/// equal string for string.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One typed scalar within a [`Row`] being written.
///
/// The datum is always rendered as a string; the [`DataType`] tells the engine how
/// to encode it. Values are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    data: String,
    data_type: DataType,
    column: Option<String>,
}

impl Value {
    pub fn integer(number: i64) -> Self {
        Self::new(number.to_string(), DataType::Integer)
    }

    pub fn double(number: f64) -> Self {
        Self::new(number.to_string(), DataType::Double)
    }

    /// Booleans render as `True` or `False`.
    pub fn boolean(value: bool) -> Self {
        let data = if value { "True" } else { "False" };
        Self::new(data.to_owned(), DataType::Boolean)
    }

    /// A date value, normalized to `YYYY-MM-DD HH:MM:SS`.
    ///
    /// The fields are read in the local representation of `date`: for a
    /// `DateTime<Tz>` that is the wall clock of `Tz`.
    pub fn date<D>(date: &D) -> Self
    where
        D: Datelike + Timelike,
    {
        let data = format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            date.year(),
            date.month(),
            date.day(),
            date.hour(),
            date.minute(),
            date.second()
        );

        Self::new(data, DataType::Date)
    }

    /// A date on the local wall clock.
    pub fn local_date(date: &DateTime<Local>) -> Self {
        Self::date(date)
    }

    /// A value whose content is already rendered, tagged with `data_type`.
    pub fn text(text: impl Into<String>, data_type: DataType) -> Self {
        Self::new(text.into(), data_type)
    }

    /// Same as [`Value::text`], for callers holding text that may be absent.
    ///
    /// # Panics
    ///
    /// If `text` is `None`. A value never carries a null datum, whatever its type.
    #[track_caller]
    pub fn from_nullable_text<S>(text: Option<S>, data_type: DataType) -> Self
    where
        S: Into<String>,
    {
        match text {
            Some(text) => Self::text(text, data_type),
            None => panic!("text can't be null (value of type {})", data_type),
        }
    }

    fn new(data: String, data_type: DataType) -> Self {
        Self {
            data,
            data_type,
            column: None,
        }
    }

    /// Sets the destination column of this value.
    ///
    /// Values without a column are inserted positionally.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }
}

/// The lowercase `false` boolean. Engines normalize it on write.
impl Default for Value {
    fn default() -> Self {
        Self::new("false".to_owned(), DataType::Boolean)
    }
}

macro_rules! delegate_to_value {
    ($($($rust_ty: ty),+ => $ctor: ident);+ $(;)?) => {$(
        $(impl From<$rust_ty> for Value {
            fn from(value: $rust_ty) -> Self {
                Value::$ctor(value.into())
            }
        })+
    )+};
}

delegate_to_value! {
    i8, i16, i32, i64, u8, u16, u32 => integer;
    f32, f64 => double;
    bool => boolean;
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::text(text, DataType::Text)
    }
}

impl From<&'_ str> for Value {
    fn from(text: &str) -> Self {
        Value::text(text, DataType::Text)
    }
}

impl From<chrono::NaiveDateTime> for Value {
    fn from(date: chrono::NaiveDateTime) -> Self {
        Value::date(&date)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(date: DateTime<Tz>) -> Self {
        Value::date(&date)
    }
}

/// One record to be inserted: an ordered sequence of [`Value`]s.
///
/// The model imposes no minimum length nor any column count; the engine enforces
/// its own schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// Builder version of [`Row::push`].
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'r> IntoIterator for &'r Row {
    type Item = &'r Value;
    type IntoIter = std::slice::Iter<'r, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Build a [`Row`] from expressions convertible into [`Value`].
///
/// ```
/// # use seam_core::{row, values::Value};
/// let row = row![1, "alice", Value::boolean(true).with_column("admin")];
/// assert_eq!(row.len(), 3);
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::values::Row::new()
    };
    ($($value: expr),+ $(,)?) => {
        $crate::values::Row::from(vec![$($crate::values::Value::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .unwrap()
    }

    #[test]
    fn dates_are_zero_padded() {
        let value = Value::date(&datetime(2024, 3, 5, 9, 7, 3));

        assert_eq!(value.data(), "2024-03-05 09:07:03");
        assert_eq!(value.data_type(), DataType::Date);
    }

    #[test]
    fn date_rendering_matches_the_chrono_format() {
        for date in [
            datetime(1999, 12, 31, 23, 59, 59),
            datetime(2000, 1, 1, 0, 0, 0),
            datetime(812, 6, 15, 12, 30, 1),
        ] {
            assert_eq!(
                Value::date(&date).data(),
                date.format(DATE_FORMAT).to_string()
            );
        }
    }

    #[test]
    fn date_uses_the_local_fields_of_the_zone() {
        let offset = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let date = offset
            .from_local_datetime(&datetime(2024, 3, 5, 9, 7, 3))
            .unwrap();

        assert_eq!(Value::from(date).data(), "2024-03-05 09:07:03");
    }

    #[test]
    fn local_dates_use_the_wall_clock() {
        let now = Local::now();
        assert_eq!(
            Value::local_date(&now).data(),
            now.format(DATE_FORMAT).to_string()
        );
    }

    #[test]
    fn scalar_rendering() {
        assert_eq!(Value::integer(-42).data(), "-42");
        assert_eq!(Value::from(7u8).data_type(), DataType::Integer);
        assert_eq!(Value::double(1.5).data(), "1.5");
        assert_eq!(Value::boolean(true).data(), "True");
        assert_eq!(Value::default().data(), "false");
        assert_eq!(Value::default().data_type(), DataType::Boolean);
    }

    #[test]
    fn null_text_fails_fast_for_every_type() {
        for ty in DataType::ALL {
            let result = std::panic::catch_unwind(|| {
                Value::from_nullable_text(None::<String>, *ty);
            });
            assert!(result.is_err(), "{} accepted a null text", ty);
        }
    }

    #[test]
    fn nullable_text_with_content() {
        let value = Value::from_nullable_text(Some("x"), DataType::Varchar).with_column("name");

        assert_eq!(value.data(), "x");
        assert_eq!(value.data_type(), DataType::Varchar);
        assert_eq!(value.column(), Some("name"));
    }

    #[test]
    fn rows_have_no_minimum_length() {
        let row = row![];
        assert!(row.is_empty());

        let row = row![1, "two", 3.0].with(Value::boolean(false).with_column("flag"));
        assert_eq!(row.len(), 4);
        assert_eq!(row.values()[3].column(), Some("flag"));

        let copy = row.clone();
        assert_eq!(copy, row);
    }
}
