/*
 * Copyright 2024 Google LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Options controlling how endpoint resources are validated.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct Config {
    /// What to do with a drop overload whose percentage denominator is not
    /// one of the known `FractionalPercent` denominators.
    #[serde(default)]
    pub drop_denominator: DropDenominatorPolicy,
}

impl Config {
    /// Reads a [`Config`] from a YAML (or JSON) document.
    pub fn from_reader<R: std::io::Read>(input: R) -> crate::Result<Self> {
        Ok(serde_yaml::from_reader(input)?)
    }

    pub fn with_drop_denominator(mut self, policy: DropDenominatorPolicy) -> Self {
        self.drop_denominator = policy;
        self
    }
}

/// Handling of drop overload percentages with an unrecognised denominator.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq, JsonSchema)]
pub enum DropDenominatorPolicy {
    /// Keep the drop overload with a denominator of `0`.
    #[default]
    #[serde(rename = "LENIENT")]
    Lenient,
    /// Reject the whole resource.
    #[serde(rename = "STRICT")]
    Strict,
}
