// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Typed interface slots.
//!
//! Every model input and output is a [`FeatureDescription`]: a name plus a
//! [`FeatureType`] that holds exactly one [`FeatureKind`]. The builder only
//! ever writes multi-array, image, dictionary, int64 and string kinds, but the
//! full set is modelled so any document can be decoded.

use std::fmt;

// ── Enumerations ───────────────────────────────────────────────────

/// Element type of a multi-array feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ArrayDataType {
    InvalidArrayDataType = 0,
    Float32 = 65568,
    Double = 65600,
    Int32 = 131104,
}

impl ArrayDataType {
    /// Returns the schema name of the value.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::InvalidArrayDataType => "INVALID_ARRAY_DATA_TYPE",
            Self::Float32 => "FLOAT32",
            Self::Double => "DOUBLE",
            Self::Int32 => "INT32",
        }
    }

    /// Parses a schema name.
    pub fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "INVALID_ARRAY_DATA_TYPE" => Some(Self::InvalidArrayDataType),
            "FLOAT32" => Some(Self::Float32),
            "DOUBLE" => Some(Self::Double),
            "INT32" => Some(Self::Int32),
            _ => None,
        }
    }
}

/// Pixel layout of an image feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ColorSpace {
    InvalidColorSpace = 0,
    Grayscale = 10,
    Rgb = 20,
    Bgr = 30,
}

impl ColorSpace {
    /// Returns the schema name of the value.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::InvalidColorSpace => "INVALID_COLOR_SPACE",
            Self::Grayscale => "GRAYSCALE",
            Self::Rgb => "RGB",
            Self::Bgr => "BGR",
        }
    }

    /// Parses a schema name.
    pub fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "INVALID_COLOR_SPACE" => Some(Self::InvalidColorSpace),
            "GRAYSCALE" => Some(Self::Grayscale),
            "RGB" => Some(Self::Rgb),
            "BGR" => Some(Self::Bgr),
            _ => None,
        }
    }
}

// ── Scalar kinds ───────────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct Int64FeatureType {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DoubleFeatureType {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StringFeatureType {}

// ── Structured kinds ───────────────────────────────────────────────

/// A dense n-dimensional array of fixed shape.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ArrayFeatureType {
    #[prost(int64, repeated, tag = "1")]
    pub shape: Vec<i64>,
    #[prost(enumeration = "ArrayDataType", tag = "2")]
    pub data_type: i32,
}

/// An image of fixed size.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ImageFeatureType {
    #[prost(int64, tag = "1")]
    pub width: i64,
    #[prost(int64, tag = "2")]
    pub height: i64,
    #[prost(enumeration = "ColorSpace", tag = "3")]
    pub color_space: i32,
}

/// A map keyed by int64 or string, e.g. class probabilities.
#[derive(Clone, PartialEq, prost::Message)]
pub struct DictionaryFeatureType {
    #[prost(oneof = "DictionaryKey", tags = "1, 2")]
    pub key_type: Option<DictionaryKey>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum DictionaryKey {
    #[prost(message, tag = "1")]
    Int64KeyType(Int64FeatureType),
    #[prost(message, tag = "2")]
    StringKeyType(StringFeatureType),
}

// ── Feature slot ───────────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct FeatureType {
    #[prost(oneof = "FeatureKind", tags = "1, 2, 3, 4, 5, 6")]
    pub kind: Option<FeatureKind>,
    #[prost(bool, tag = "1000")]
    pub is_optional: bool,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum FeatureKind {
    #[prost(message, tag = "1")]
    Int64Type(Int64FeatureType),
    #[prost(message, tag = "2")]
    DoubleType(DoubleFeatureType),
    #[prost(message, tag = "3")]
    StringType(StringFeatureType),
    #[prost(message, tag = "4")]
    ImageType(ImageFeatureType),
    #[prost(message, tag = "5")]
    MultiArrayType(ArrayFeatureType),
    #[prost(message, tag = "6")]
    DictionaryType(DictionaryFeatureType),
}

/// A named input or output of the model.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FeatureDescription {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub short_description: String,
    #[prost(message, optional, tag = "3")]
    pub r#type: Option<FeatureType>,
}

impl FeatureType {
    /// A multi-array feature with the given shape and element type.
    ///
    /// # Examples
    /// ```
    /// use model_spec::{ArrayDataType, FeatureKind, FeatureType};
    /// let t = FeatureType::multi_array(&[3, 224, 224], ArrayDataType::Double);
    /// assert!(matches!(t.kind, Some(FeatureKind::MultiArrayType(ref a)) if a.shape == [3, 224, 224]));
    /// ```
    pub fn multi_array(shape: &[i64], data_type: ArrayDataType) -> Self {
        let mut array = ArrayFeatureType {
            shape: shape.to_vec(),
            ..Default::default()
        };
        array.set_data_type(data_type);
        Self {
            kind: Some(FeatureKind::MultiArrayType(array)),
            is_optional: false,
        }
    }

    /// An image feature.
    pub fn image(width: i64, height: i64, color_space: ColorSpace) -> Self {
        let mut image = ImageFeatureType {
            width,
            height,
            ..Default::default()
        };
        image.set_color_space(color_space);
        Self {
            kind: Some(FeatureKind::ImageType(image)),
            is_optional: false,
        }
    }

    /// A dictionary keyed by int64 (`string_keys == false`) or string.
    pub fn dictionary(string_keys: bool) -> Self {
        let key_type = if string_keys {
            DictionaryKey::StringKeyType(StringFeatureType {})
        } else {
            DictionaryKey::Int64KeyType(Int64FeatureType {})
        };
        Self {
            kind: Some(FeatureKind::DictionaryType(DictionaryFeatureType {
                key_type: Some(key_type),
            })),
            is_optional: false,
        }
    }

    /// A scalar int64 feature.
    pub fn int64() -> Self {
        Self {
            kind: Some(FeatureKind::Int64Type(Int64FeatureType {})),
            is_optional: false,
        }
    }

    /// A scalar string feature.
    pub fn string() -> Self {
        Self {
            kind: Some(FeatureKind::StringType(StringFeatureType {})),
            is_optional: false,
        }
    }

    /// Returns the array descriptor if this is a multi-array feature.
    pub fn as_multi_array(&self) -> Option<&ArrayFeatureType> {
        match &self.kind {
            Some(FeatureKind::MultiArrayType(array)) => Some(array),
            _ => None,
        }
    }
}

impl FeatureDescription {
    /// Creates a slot named `name` of the given type.
    pub fn new(name: impl Into<String>, feature_type: FeatureType) -> Self {
        Self {
            name: name.into(),
            short_description: String::new(),
            r#type: Some(feature_type),
        }
    }

    /// Returns the slot's kind, if one is set.
    pub fn kind(&self) -> Option<&FeatureKind> {
        self.r#type.as_ref().and_then(|t| t.kind.as_ref())
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            None => f.write_str("unset")?,
            Some(FeatureKind::Int64Type(_)) => f.write_str("int64")?,
            Some(FeatureKind::DoubleType(_)) => f.write_str("double")?,
            Some(FeatureKind::StringType(_)) => f.write_str("string")?,
            Some(FeatureKind::ImageType(image)) => write!(
                f,
                "image {}x{} {}",
                image.width,
                image.height,
                image.color_space().as_str_name()
            )?,
            Some(FeatureKind::MultiArrayType(array)) => {
                write!(f, "multi_array {:?} {}", array.shape, array.data_type().as_str_name())?
            }
            Some(FeatureKind::DictionaryType(dict)) => match dict.key_type {
                Some(DictionaryKey::Int64KeyType(_)) => f.write_str("dictionary<int64>")?,
                Some(DictionaryKey::StringKeyType(_)) => f.write_str("dictionary<string>")?,
                None => f.write_str("dictionary")?,
            },
        }
        if self.is_optional {
            f.write_str(" (optional)")?;
        }
        Ok(())
    }
}

// ── Label vectors ──────────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct StringVector {
    #[prost(string, repeated, tag = "1")]
    pub vector: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Int64Vector {
    #[prost(int64, repeated, tag = "1")]
    pub vector: Vec<i64>,
}
