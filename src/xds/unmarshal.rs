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

use std::collections::{BTreeMap, HashMap};

use prost_types::Any;

use crate::{
    config::Config,
    time::UtcTimestamp,
    xds::{
        endpoints::{self, EndpointsUpdate},
        metrics,
        resource::{ResourceType, ResourceTypeRegistry, XdsResourceTypes},
        EndpointsError, UnmarshalError, UpdateMetadata,
    },
};

/// The inputs for processing one discovery response.
pub struct UnmarshalOptions<'a> {
    /// The `version_info` of the response.
    pub version: String,
    pub resources: &'a [Any],
    pub config: Config,
    pub registry: &'a dyn ResourceTypeRegistry,
    /// Parent of every diagnostic emitted while processing the response.
    pub span: tracing::Span,
}

impl<'a> UnmarshalOptions<'a> {
    pub fn new(version: impl Into<String>, resources: &'a [Any]) -> Self {
        let version = version.into();
        let span = tracing::debug_span!("unmarshal_endpoints", version = %version);

        Self {
            version,
            resources,
            config: Config::default(),
            registry: &XdsResourceTypes,
            span,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: &'a dyn ResourceTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }
}

/// The result of processing one discovery response.
#[derive(Clone, Debug)]
pub struct Unmarshalled {
    /// Every resource whose name could be determined, keyed by that name.
    pub updates: HashMap<String, Result<EndpointsUpdate, EndpointsError>>,
    pub metadata: UpdateMetadata,
}

impl Unmarshalled {
    /// The aggregate error if the response was NACKed.
    pub fn error(&self) -> Option<&UnmarshalError> {
        self.metadata.err_state.as_ref().map(|state| &state.error)
    }
}

/// Processes every resource in an EDS response.
///
/// A resource that fails validation never prevents the others from being
/// processed; its error is recorded under its name, or as a top level error
/// when the name could not be determined. Resources sharing a name replace
/// each other in `updates`, the last one winning, but an earlier rejection
/// still NACKs the response.
pub fn unmarshal_endpoints(options: &UnmarshalOptions<'_>) -> Unmarshalled {
    let timestamp = UtcTimestamp::now();
    let mut updates = HashMap::with_capacity(options.resources.len());
    let mut error = UnmarshalError {
        type_url: ResourceType::Endpoint.type_url(),
        top_level: Vec::new(),
        per_resource: BTreeMap::new(),
    };

    tracing::debug!(
        parent: &options.span,
        resources = options.resources.len(),
        "processing endpoints response"
    );

    for resource in options.resources {
        match endpoints::unmarshal_resource(resource, options) {
            Ok((name, update)) => {
                metrics::resources_total(metrics::ACCEPTED).inc();
                updates.insert(name, Ok(update));
            }
            Err((Some(name), resource_error)) => {
                metrics::resources_total(metrics::REJECTED).inc();
                tracing::debug!(parent: &options.span, resource = %name, error = %resource_error, "rejected resource");
                error.per_resource.insert(name.clone(), resource_error.clone());
                updates.insert(name, Err(resource_error));
            }
            Err((None, resource_error)) => {
                metrics::resources_total(metrics::REJECTED).inc();
                tracing::debug!(parent: &options.span, error = %resource_error, "rejected unnamed resource");
                error.top_level.push(resource_error);
            }
        }
    }

    let metadata = UpdateMetadata::new(options.version.clone(), timestamp, error);
    metrics::responses_total(metadata.status).inc();
    tracing::debug!(
        parent: &options.span,
        status = %metadata.status,
        timestamp = metadata.timestamp.unix(),
        "processed endpoints response"
    );

    Unmarshalled { updates, metadata }
}
