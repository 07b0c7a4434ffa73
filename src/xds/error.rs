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

use std::collections::{BTreeMap, BTreeSet};

use crate::xds::{
    endpoint::{LbEndpoint, LocalityLbEndpoints},
    resource::UnwrapError,
};

/// Why a single endpoints resource was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EndpointsError {
    #[error("failed to unwrap resource: {0}")]
    Unwrap(#[from] UnwrapError),
    #[error("unexpected resource type: {0:?}")]
    UnexpectedType(String),
    #[error("failed to unmarshal resource: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("EDS response contains a locality without ID, locality: {entry:?}")]
    MissingLocalityId { entry: Box<LocalityLbEndpoints> },
    #[error("duplicate locality {locality} with the same priority {priority}")]
    DuplicateLocality { locality: String, priority: u32 },
    #[error("EDS response contains an endpoint with zero weight: {endpoint:?}")]
    ZeroWeightEndpoint { endpoint: Box<LbEndpoint> },
    #[error("priority {missing} missing (with different priorities {received:?} received)")]
    MissingPriority {
        missing: u32,
        received: BTreeSet<u32>,
    },
    #[error("drop overload {category:?} has unknown percentage denominator {value}")]
    UnknownDropDenominator { category: String, value: i32 },
}

/// The aggregate of every error encountered while processing a discovery
/// response.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("error parsing {type_url:?} response: {details}", details = describe(top_level, per_resource))]
pub struct UnmarshalError {
    pub type_url: &'static str,
    /// Errors for resources whose name could not be determined.
    pub top_level: Vec<EndpointsError>,
    pub per_resource: BTreeMap<String, EndpointsError>,
}

impl UnmarshalError {
    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty() && self.per_resource.is_empty()
    }
}

fn describe(top_level: &[EndpointsError], per_resource: &BTreeMap<String, EndpointsError>) -> String {
    let mut parts = Vec::with_capacity(top_level.len() + per_resource.len());

    if !top_level.is_empty() {
        let errors = top_level
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        parts.push(format!("top level errors: {errors}"));
    }

    parts.extend(
        per_resource
            .iter()
            .map(|(name, error)| format!("resource {name:?}: {error}")),
    );

    parts.join("; ")
}
