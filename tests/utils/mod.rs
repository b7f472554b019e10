#![allow(dead_code)]

use chrono::NaiveDate;
use field_mapper::{
    ConversionError, FromValue, MapperError, MapperSchema, MappingOptions, Multiparam, Record,
    Result, Target, Value,
};

/// Route `log` output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A related object that is rendered as a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub code: String,
    pub name: String,
}

impl Category {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

impl From<Category> for Value {
    fn from(category: Category) -> Self {
        let mut record = Record::new();
        record.insert("code".to_string(), Value::from(category.code));
        record.insert("name".to_string(), Value::from(category.name));
        Self::Record(record)
    }
}

impl FromValue for Category {
    fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
        let field = |name: &str| {
            value
                .field(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ConversionError::new("category", value.kind()))
        };
        Ok(Self {
            code: field("code")?,
            name: field("name")?,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Target)]
pub struct Profile {
    pub nickname: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Target)]
#[target(name = "User")]
pub struct User {
    #[target(readonly)]
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub born_on: Option<NaiveDate>,
    pub category: Option<Category>,
    #[target(skip)]
    pub profile: Profile,
    #[target(skip)]
    pub password_hash: String,
}

impl User {
    pub fn sample() -> Self {
        Self {
            id: 7,
            name: "Ann".to_string(),
            email: Some("ann@example.com".to_string()),
            last_name: Some("Smith".to_string()),
            age: Some(42),
            born_on: NaiveDate::from_ymd_opt(1981, 3, 4),
            category: Some(Category::new("BK", "Books")),
            profile: Profile {
                nickname: Some("annie".to_string()),
                bio: None,
            },
            password_hash: "x1y2".to_string(),
        }
    }
}

/// Reads and writes the nickname on the user's profile rather than the user
pub fn nickname_options() -> MappingOptions<User> {
    MappingOptions::new()
        .read_with(|user: &User| user.profile.get_attribute("nickname"))
        .write_with(|user: &mut User, value| user.profile.set_attribute("nickname", value))
}

/// The schema most tests run against
pub fn user_schema() -> MapperSchema<User> {
    MapperSchema::builder("UserMapper")
        .map(["name", "email", "age"])
        .map([("surname", "last_name")])
        .map_with(["born_on"], MappingOptions::new().with_multiparam(Multiparam::Date))
        .map_with(["category"], MappingOptions::new().with_format("enum"))
        .map_with(["nickname"], nickname_options())
        .build()
        .expect("user schema is valid")
}

/// A writer that always fails, for fail-fast checks
pub fn failing_writer() -> MappingOptions<User> {
    MappingOptions::new().write_with(|_: &mut User, _| -> Result<()> {
        Err(MapperError::Strategy(anyhow::anyhow!("storage is read-only")))
    })
}
