mod utils;

use chrono::NaiveDate;
use field_mapper::{AttributeBag, MapperError, Target, Value};
use utils::{Category, Profile, User};

#[derive(Debug, Default, Target)]
struct Renamed {
    #[target(rename = "title")]
    headline: String,
    tags: Vec<String>,
    score: f64,
    active: bool,
}

#[derive(Debug, Default, Target)]
struct Counter {
    #[target(readonly)]
    id: u64,
    hits: usize,
    total: u64,
}

#[test]
fn test_derived_unsigned_fields() {
    let mut counter = Counter {
        id: 9,
        ..Counter::default()
    };

    counter.set_attribute("hits", Value::from("12")).unwrap();
    counter.set_attribute("total", Value::Int(40)).unwrap();
    assert_eq!(counter.hits, 12);
    assert_eq!(counter.get_attribute("id").unwrap(), Value::Int(9));
    assert_eq!(counter.get_attribute("total").unwrap(), Value::Int(40));
    assert!(counter.set_attribute("hits", Value::Int(-1)).is_err());
}

#[test]
fn test_derived_attribute_names() {
    let user = User::default();
    assert_eq!(user.type_name(), "User");
    assert_eq!(
        user.attribute_names(),
        ["id", "name", "email", "last_name", "age", "born_on", "category"]
    );
    assert!(!user.has_attribute("profile"));
    assert!(!user.has_attribute("password_hash"));

    assert_eq!(Profile::default().type_name(), "Profile");
    assert_eq!(Renamed::default().attribute_names(), ["title", "tags", "score", "active"]);
}

#[test]
fn test_derived_get_and_set() {
    let mut user = User::sample();

    assert_eq!(user.get_attribute("age").unwrap(), Value::Int(42));
    assert_eq!(user.get_attribute("email").unwrap(), Value::from("ann@example.com"));

    user.set_attribute("born_on", Value::from("24/12/1990")).unwrap();
    assert_eq!(user.born_on, NaiveDate::from_ymd_opt(1990, 12, 24));

    user.set_attribute("age", Value::from("")).unwrap();
    assert_eq!(user.age, None);
    assert_eq!(user.get_attribute("age").unwrap(), Value::Null);
}

#[test]
fn test_derived_record_attribute() {
    let mut user = User::default();

    user.set_attribute("category", Value::from(Category::new("MU", "Music")))
        .unwrap();
    assert_eq!(user.category, Some(Category::new("MU", "Music")));
    assert_eq!(
        user.get_attribute("category").unwrap().field("code"),
        Some(&Value::from("MU"))
    );
}

#[test]
fn test_derived_errors() {
    let mut user = User::sample();

    let err = user.set_attribute("id", Value::Int(1)).unwrap_err();
    assert!(matches!(err, MapperError::ReadOnlyAttribute { target: "User", .. }));
    assert_eq!(user.id, 7);
    // Read-only attributes can still be read
    assert_eq!(user.get_attribute("id").unwrap(), Value::Int(7));

    let err = user.get_attribute("password_hash").unwrap_err();
    assert_eq!(err.to_string(), "User has no attribute `password_hash`");

    let err = user.set_attribute("age", Value::from("forty")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value for User.age: expected integer, found \"forty\""
    );
    assert_eq!(user.age, Some(42));
}

#[test]
fn test_derived_collections_and_scalars() {
    let mut renamed = Renamed::default();

    renamed
        .set_attribute("tags", Value::from(vec!["a", "b"]))
        .unwrap();
    renamed.set_attribute("score", Value::from("2.5")).unwrap();
    renamed.set_attribute("active", Value::from("yes")).unwrap();
    renamed.set_attribute("title", Value::from("Hello")).unwrap();

    assert_eq!(renamed.tags, ["a", "b"]);
    assert_eq!(renamed.score, 2.5);
    assert!(renamed.active);
    assert_eq!(renamed.headline, "Hello");
    assert!(renamed.set_attribute("headline", Value::from("x")).is_err());
}

#[test]
fn test_attribute_bag_as_target() {
    let mut bag = AttributeBag::new(&["title", "body"]);

    bag.set_attribute("body", Value::from("Text")).unwrap();
    assert_eq!(bag.get_attribute("body").unwrap(), Value::from("Text"));
    assert_eq!(bag.get_attribute("title").unwrap(), Value::Null);
    assert!(bag.get_attribute("author").is_err());
}
