/*
 * Copyright 2022 Google LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *       http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const SEP: char = ':';

/// The identity of a locality: where a group of endpoints runs.
#[derive(
    Clone, Default, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct LocalityId {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(default, rename = "subZone", skip_serializing_if = "String::is_empty")]
    pub sub_zone: String,
}

impl LocalityId {
    pub fn new(
        region: impl Into<String>,
        zone: impl Into<String>,
        sub_zone: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            zone: zone.into(),
            sub_zone: sub_zone.into(),
        }
    }

    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// The canonical form used to detect duplicate localities: a JSON object
    /// with empty components omitted, eg. `{"region":"r1","zone":"z1"}`.
    ///
    /// Unlike the `:` separated [`Display`](std::fmt::Display) form this is
    /// unambiguous for components which themselves contain `:`.
    pub fn key(&self) -> String {
        // Only string fields, serialization can't fail.
        serde_json::to_string(self).unwrap()
    }
}

impl std::fmt::Display for LocalityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.region)?;

        if !self.zone.is_empty() || !self.sub_zone.is_empty() {
            write!(f, "{SEP}{}", self.zone)?;
        }

        if !self.sub_zone.is_empty() {
            write!(f, "{SEP}{}", self.sub_zone)?;
        }

        Ok(())
    }
}

impl std::str::FromStr for LocalityId {
    type Err = eyre::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut iter = input.split(SEP);

        let Some(region) = iter.next().filter(|r| !r.is_empty()) else {
            return Err(eyre::eyre!("region not specified"));
        };

        let zone = iter.next().unwrap_or_default();
        let sub_zone = iter.next().unwrap_or_default();

        if let Some(invalid) = iter.next() {
            return Err(eyre::eyre!(
                "locality identifier '{input}' had more than 3 components, '{invalid}' is not a region, zone, or subzone"
            ));
        }

        Ok(Self::new(region, zone, sub_zone))
    }
}

impl From<crate::xds::core::Locality> for LocalityId {
    #[inline]
    fn from(value: crate::xds::core::Locality) -> Self {
        Self::new(value.region, value.zone, value.sub_zone)
    }
}

impl From<LocalityId> for crate::xds::core::Locality {
    #[inline]
    fn from(value: LocalityId) -> Self {
        Self {
            region: value.region,
            zone: value.zone,
            sub_zone: value.sub_zone,
        }
    }
}
