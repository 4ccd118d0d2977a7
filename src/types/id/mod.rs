use bson::oid::ObjectId;
use std::{
  fmt::{Debug, Display},
  hash::Hash,
  marker::PhantomData,
  str::FromStr,
};
use thiserror::Error;

use self::marker::Marker;

pub mod marker;

pub type CommentId = Id<marker::CommentMarker>;
pub type EducationId = Id<marker::EducationMarker>;
pub type ExperienceId = Id<marker::ExperienceMarker>;
pub type PostId = Id<marker::PostMarker>;
pub type ProfileId = Id<marker::ProfileMarker>;
pub type UserId = Id<marker::UserMarker>;

/// Opaque document identifier, backed by a BSON [`ObjectId`] and
/// tagged with a marker so a post id cannot be passed where a
/// user id is expected.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id<T: Marker> {
  value: ObjectId,
  phantom: PhantomData<T>,
}

impl<T: Marker> Id<T> {
  /// Generates a new unique id.
  #[must_use]
  #[allow(clippy::new_without_default)]
  pub fn new() -> Self {
    Self::from_object_id(ObjectId::new())
  }

  #[must_use]
  pub const fn from_object_id(value: ObjectId) -> Self {
    Self {
      value,
      phantom: PhantomData,
    }
  }

  #[must_use]
  pub const fn into_object_id(self) -> ObjectId {
    self.value
  }

  #[must_use]
  pub fn to_hex(self) -> String {
    self.value.to_hex()
  }
}

#[derive(Debug, Error)]
#[error("invalid id {0:?}")]
pub struct ParseIdError(String);

impl<T: Marker> FromStr for Id<T> {
  type Err = ParseIdError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ObjectId::parse_str(s)
      .map(Self::from_object_id)
      .map_err(|_| ParseIdError(s.to_string()))
  }
}

impl<T: Marker> Debug for Id<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // All ID markers are defined in `marker` module
    let type_name = std::any::type_name::<T>();
    let type_name = type_name.rsplit("::").next().unwrap_or(type_name);
    write!(f, "Id::<{type_name}>({})", self.value.to_hex())
  }
}

impl<T: Marker> Display for Id<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.value.to_hex())
  }
}

impl<T: Marker> Hash for Id<T> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    state.write(&self.value.bytes());
  }
}

impl<T: Marker> From<Id<T>> for bson::Bson {
  fn from(value: Id<T>) -> Self {
    bson::Bson::ObjectId(value.value)
  }
}

// Stored documents keep ids as native ObjectIds. Response views
// use the hex form through `Display`.
impl<'de, T: Marker> serde::Deserialize<'de> for Id<T> {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    ObjectId::deserialize(deserializer).map(Self::from_object_id)
  }
}

impl<T: Marker> serde::Serialize for Id<T> {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    self.value.serialize(serializer)
  }
}

/// (De)serializes an [`Id`] as its plain hex string. Used by response
/// views and token claims where clients expect `"id": "64b..."`.
pub mod hex {
  use serde::Deserialize;

  use super::{marker::Marker, Id};

  pub fn serialize<T: Marker, S: serde::Serializer>(
    id: &Id<T>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
  }

  pub fn deserialize<'de, T: Marker, D: serde::Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Id<T>, D::Error> {
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::id::marker::AnyMarker;
  use static_assertions::{assert_eq_size, assert_impl_all};

  assert_eq_size!(Id<AnyMarker>, ObjectId);
  assert_impl_all!(Id<AnyMarker>:
    Debug, Display, Clone, Copy, Send, Sync, Hash, FromStr,
    serde::Serialize, serde::de::DeserializeOwned
  );

  const HEX: &str = "64b7f3f2a1c2d3e4f5a6b7c8";

  #[test]
  fn test_parse() {
    let id = HEX.parse::<Id<AnyMarker>>().unwrap();
    assert_eq!(id.to_hex(), HEX);

    assert!("not-an-id".parse::<Id<AnyMarker>>().is_err());
    assert!("".parse::<Id<AnyMarker>>().is_err());
  }

  #[test]
  fn test_fmt_impls() {
    let id = HEX.parse::<Id<AnyMarker>>().unwrap();
    assert_eq!(id.to_string(), HEX);
    assert_eq!(format!("{id:?}"), format!("Id::<AnyMarker>({HEX})"));
  }

  #[test]
  fn test_bson_roundtrip_keeps_object_id() {
    let id = Id::<AnyMarker>::new();
    let value = bson::to_bson(&id).unwrap();
    assert_eq!(value, bson::Bson::ObjectId(id.into_object_id()));
    assert_eq!(bson::from_bson::<Id<AnyMarker>>(value).unwrap(), id);
  }

  #[test]
  fn test_hex_serializer() {
    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct View {
      #[serde(with = "super::hex")]
      id: Id<AnyMarker>,
    }

    let id = HEX.parse::<Id<AnyMarker>>().unwrap();
    let json = serde_json::to_value(View { id }).unwrap();
    assert_eq!(json, serde_json::json!({ "id": HEX }));
    assert_eq!(serde_json::from_value::<View>(json).unwrap(), View { id });

    let error = serde_json::from_value::<View>(serde_json::json!({ "id": "nope" }));
    assert!(error.is_err());
  }
}
