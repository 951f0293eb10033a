//! Helper filters and functions available to every template, in file names
//! as well as in file contents.

use crate::constants::{DEFAULT_DATE_FORMAT, DEFAULT_PASSWORD_LENGTH};
use chrono::Local;
use cruet::Inflector;
use minijinja::{Environment, Error, ErrorKind};
use rand::{distributions::Alphanumeric, Rng};

/// Registers the helper library on `env`.
pub fn register(env: &mut Environment<'static>) {
    env.add_filter("camel_case", camel_case);
    env.add_filter("pascal_case", pascal_case);
    env.add_filter("snake_case", snake_case);
    env.add_filter("kebab_case", kebab_case);
    env.add_filter("screaming_snake_case", screaming_snake_case);
    env.add_filter("title_case", title_case);
    env.add_filter("train_case", train_case);

    env.add_function("uuid", uuid);
    env.add_function("password", password);
    env.add_function("now", now);
    env.add_function("random_int", random_int);
}

pub fn camel_case(value: &str) -> String {
    value.to_camel_case()
}

pub fn pascal_case(value: &str) -> String {
    value.to_pascal_case()
}

pub fn snake_case(value: &str) -> String {
    value.to_snake_case()
}

pub fn kebab_case(value: &str) -> String {
    value.to_kebab_case()
}

pub fn screaming_snake_case(value: &str) -> String {
    value.to_screaming_snake_case()
}

pub fn title_case(value: &str) -> String {
    value.to_title_case()
}

pub fn train_case(value: &str) -> String {
    value.to_train_case()
}

/// A random version 4 UUID in its hyphenated form.
pub fn uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A random alphanumeric password.
pub fn password(length: Option<usize>) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length.unwrap_or(DEFAULT_PASSWORD_LENGTH))
        .map(char::from)
        .collect()
}

/// The current local time, formatted with a strftime-style pattern.
pub fn now(format: Option<&str>) -> Result<String, Error> {
    use std::fmt::Write;

    let format = format.unwrap_or(DEFAULT_DATE_FORMAT);
    let mut out = String::new();
    write!(out, "{}", Local::now().format(format)).map_err(|_| {
        Error::new(ErrorKind::InvalidOperation, format!("invalid date format '{format}'"))
    })?;
    Ok(out)
}

/// A random integer in the inclusive range `low..=high`.
pub fn random_int(low: i64, high: i64) -> Result<i64, Error> {
    if low > high {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("random_int: {low} is greater than {high}"),
        ));
    }
    Ok(rand::thread_rng().gen_range(low..=high))
}
