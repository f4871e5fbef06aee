// Copyright 2024 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Base64 convenience functions.

use ::base64::{engine::general_purpose, DecodeError, Engine as _};

/// Encode a byte slice to a padded standard Base64 string.
pub fn encode(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Decode a Base64 string into a byte vector.
pub fn decode(data: &str) -> Result<Vec<u8>, DecodeError> {
    general_purpose::STANDARD.decode(data)
}

/// Serde adapter storing a byte vector as a Base64 string.
///
/// Use with `#[serde(with = "adesval_crypto::base64::serde_bytes")]`.
pub mod serde_bytes {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serializes `data` as a Base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(data))
    }

    /// Deserializes a Base64 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode(&s).map_err(D::Error::custom)
    }
}

/// Serde adapter for an optional byte vector stored as a Base64 string.
pub mod serde_opt_bytes {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serializes `data` as a Base64 string, or `null`.
    pub fn serialize<S: Serializer>(
        data: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match data {
            Some(data) => serializer.serialize_some(&super::encode(data)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional Base64 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => super::decode(&s).map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}
