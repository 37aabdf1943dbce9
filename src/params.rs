//! Positional statement parameters.
//!
//! Every parameter travels as an Avatica `TypedValue`: a `type` tag naming the
//! Java representation the server should bind, and the raw JSON `value`.
//!
//! ```rust
//! use avatica_client::{params, StatementParameter};
//!
//! let params = params![
//!     StatementParameter::str("Test Name"),
//!     StatementParameter::int(7),
//!     StatementParameter::bool(true),
//! ];
//! assert_eq!(params.len(), 3);
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Wire representation tag of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rep {
    String,
    Character,
    ByteString,
    Null,
    PrimitiveBoolean,
    Boolean,
    Number,
    BigDecimal,
    PrimitiveByte,
    PrimitiveShort,
    PrimitiveInt,
    PrimitiveLong,
    PrimitiveFloat,
    PrimitiveDouble,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    JavaSqlTime,
    JavaSqlDate,
    JavaSqlTimestamp,
    JavaUtilDate,
}

impl Rep {
    /// Every tag, in wire declaration order.
    pub const ALL: [Rep; 24] = [
        Rep::String,
        Rep::Character,
        Rep::ByteString,
        Rep::Null,
        Rep::PrimitiveBoolean,
        Rep::Boolean,
        Rep::Number,
        Rep::BigDecimal,
        Rep::PrimitiveByte,
        Rep::PrimitiveShort,
        Rep::PrimitiveInt,
        Rep::PrimitiveLong,
        Rep::PrimitiveFloat,
        Rep::PrimitiveDouble,
        Rep::Byte,
        Rep::Short,
        Rep::Int,
        Rep::Long,
        Rep::Float,
        Rep::Double,
        Rep::JavaSqlTime,
        Rep::JavaSqlDate,
        Rep::JavaSqlTimestamp,
        Rep::JavaUtilDate,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Rep::String => "STRING",
            Rep::Character => "CHARACTER",
            Rep::ByteString => "BYTE_STRING",
            Rep::Null => "NULL",
            Rep::PrimitiveBoolean => "PRIMITIVE_BOOLEAN",
            Rep::Boolean => "BOOLEAN",
            Rep::Number => "NUMBER",
            Rep::BigDecimal => "BIG_DECIMAL",
            Rep::PrimitiveByte => "PRIMITIVE_BYTE",
            Rep::PrimitiveShort => "PRIMITIVE_SHORT",
            Rep::PrimitiveInt => "PRIMITIVE_INT",
            Rep::PrimitiveLong => "PRIMITIVE_LONG",
            Rep::PrimitiveFloat => "PRIMITIVE_FLOAT",
            Rep::PrimitiveDouble => "PRIMITIVE_DOUBLE",
            Rep::Byte => "BYTE",
            Rep::Short => "SHORT",
            Rep::Int => "INT",
            Rep::Long => "LONG",
            Rep::Float => "FLOAT",
            Rep::Double => "DOUBLE",
            Rep::JavaSqlTime => "JAVA_SQL_TIME",
            Rep::JavaSqlDate => "JAVA_SQL_DATE",
            Rep::JavaSqlTimestamp => "JAVA_SQL_TIMESTAMP",
            Rep::JavaUtilDate => "JAVA_UTIL_DATE",
        }
    }

    /// Inverse of [`Rep::wire_name`]; used to read column reps reported by
    /// the server. Unknown names yield `None`.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Rep::ALL.into_iter().find(|rep| rep.wire_name() == name)
    }
}

impl std::fmt::Display for Rep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl Serialize for Rep {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.wire_name())
    }
}

/// One positional parameter of a prepared statement.
///
/// Values are passed through as given; only the boolean constructors coerce,
/// mapping anything other than JSON `true` to `false`. Range and format checks
/// are left to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementParameter {
    #[serde(rename = "type")]
    rep: Rep,
    value: Value,
}

impl StatementParameter {
    pub fn new(rep: Rep, value: impl Into<Value>) -> Self {
        Self {
            rep,
            value: value.into(),
        }
    }

    pub fn rep(&self) -> Rep {
        self.rep
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn str(value: impl Into<Value>) -> Self {
        Self::new(Rep::String, value)
    }

    pub fn char(value: impl Into<Value>) -> Self {
        Self::new(Rep::Character, value)
    }

    /// Pre-encoded (base64) byte string.
    pub fn encoded(value: impl Into<Value>) -> Self {
        Self::new(Rep::ByteString, value)
    }

    pub fn null() -> Self {
        Self::new(Rep::Null, Value::Null)
    }

    pub fn primitive_bool(value: impl Into<Value>) -> Self {
        Self::new(Rep::PrimitiveBoolean, strict_true(value.into()))
    }

    pub fn bool(value: impl Into<Value>) -> Self {
        Self::new(Rep::Boolean, strict_true(value.into()))
    }

    pub fn number(value: impl Into<Value>) -> Self {
        Self::new(Rep::Number, value)
    }

    pub fn big_decimal(value: impl Into<Value>) -> Self {
        Self::new(Rep::BigDecimal, value)
    }

    pub fn primitive_byte(value: impl Into<Value>) -> Self {
        Self::new(Rep::PrimitiveByte, value)
    }

    pub fn primitive_short(value: impl Into<Value>) -> Self {
        Self::new(Rep::PrimitiveShort, value)
    }

    pub fn primitive_int(value: impl Into<Value>) -> Self {
        Self::new(Rep::PrimitiveInt, value)
    }

    pub fn primitive_long(value: impl Into<Value>) -> Self {
        Self::new(Rep::PrimitiveLong, value)
    }

    pub fn primitive_float(value: impl Into<Value>) -> Self {
        Self::new(Rep::PrimitiveFloat, value)
    }

    pub fn primitive_double(value: impl Into<Value>) -> Self {
        Self::new(Rep::PrimitiveDouble, value)
    }

    pub fn byte(value: impl Into<Value>) -> Self {
        Self::new(Rep::Byte, value)
    }

    pub fn short(value: impl Into<Value>) -> Self {
        Self::new(Rep::Short, value)
    }

    pub fn int(value: impl Into<Value>) -> Self {
        Self::new(Rep::Int, value)
    }

    pub fn long(value: impl Into<Value>) -> Self {
        Self::new(Rep::Long, value)
    }

    pub fn float(value: impl Into<Value>) -> Self {
        Self::new(Rep::Float, value)
    }

    pub fn double(value: impl Into<Value>) -> Self {
        Self::new(Rep::Double, value)
    }

    /// Milliseconds since midnight.
    pub fn sql_time(value: impl Into<Value>) -> Self {
        Self::new(Rep::JavaSqlTime, value)
    }

    /// Days since the Unix epoch.
    pub fn sql_date(value: impl Into<Value>) -> Self {
        Self::new(Rep::JavaSqlDate, value)
    }

    /// Milliseconds since the Unix epoch.
    pub fn sql_timestamp(value: impl Into<Value>) -> Self {
        Self::new(Rep::JavaSqlTimestamp, value)
    }

    /// Milliseconds since the Unix epoch.
    pub fn java_date(value: impl Into<Value>) -> Self {
        Self::new(Rep::JavaUtilDate, value)
    }

    pub fn sql_time_from(time: NaiveTime) -> Self {
        let millis =
            time.num_seconds_from_midnight() as i64 * 1000 + (time.nanosecond() / 1_000_000) as i64;
        Self::sql_time(millis)
    }

    pub fn sql_date_from(date: NaiveDate) -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH.date_naive();
        Self::sql_date(date.signed_duration_since(epoch).num_days())
    }

    pub fn sql_timestamp_from(at: DateTime<Utc>) -> Self {
        Self::sql_timestamp(at.timestamp_millis())
    }

    pub fn java_date_from(at: DateTime<Utc>) -> Self {
        Self::java_date(at.timestamp_millis())
    }
}

fn strict_true(value: Value) -> bool {
    value == Value::Bool(true)
}

/// Ordered parameter list sent with `execute`.
///
/// Converts from the usual ways of spelling "these parameters": nothing (`()`
/// or `None`), a single parameter, an array, a slice or a `Vec`. The result
/// is always a list, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Parameters(Vec<StatementParameter>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, param: StatementParameter) {
        self.0.push(param);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatementParameter> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<StatementParameter> {
        self.0
    }
}

impl From<()> for Parameters {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<StatementParameter> for Parameters {
    fn from(param: StatementParameter) -> Self {
        Self(vec![param])
    }
}

impl From<Vec<StatementParameter>> for Parameters {
    fn from(params: Vec<StatementParameter>) -> Self {
        Self(params)
    }
}

impl From<&[StatementParameter]> for Parameters {
    fn from(params: &[StatementParameter]) -> Self {
        Self(params.to_vec())
    }
}

impl<const N: usize> From<[StatementParameter; N]> for Parameters {
    fn from(params: [StatementParameter; N]) -> Self {
        Self(params.into())
    }
}

impl From<Option<Vec<StatementParameter>>> for Parameters {
    fn from(params: Option<Vec<StatementParameter>>) -> Self {
        Self(params.unwrap_or_default())
    }
}

impl FromIterator<StatementParameter> for Parameters {
    fn from_iter<I: IntoIterator<Item = StatementParameter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Parameters {
    type Item = StatementParameter;
    type IntoIter = std::vec::IntoIter<StatementParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Builds [`Parameters`] from trailing values.
#[macro_export]
macro_rules! params {
    () => {
        $crate::Parameters::new()
    };
    ($($param:expr),+ $(,)?) => {
        $crate::Parameters::from(vec![$($param),+])
    };
}
