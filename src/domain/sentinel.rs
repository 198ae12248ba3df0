use serde::Serializer;
use std::fmt::Display;

/// Marker written wherever a joined value carries no information.
pub const NO_DATA: &str = "#N/A";

/// Serializes `Some(v)` through its `Display` impl and `None` as [`NO_DATA`].
pub fn or_no_data<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_str(NO_DATA),
    }
}
