/*
 * Copyright 2020 Google LLC
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

mod endpoints;
mod error;
pub mod locality;
mod metadata;
pub(crate) mod metrics;
pub mod resource;
mod unmarshal;

pub use crate::generated::envoy::{
    config::core::v3 as core, config::endpoint::v3 as endpoint, kind::v3 as kind,
    service::discovery::v3 as discovery,
};
pub use endpoints::{
    join_host_port, parse_cluster_load_assignment, Endpoint, EndpointsUpdate, HealthStatus,
    Locality, OverloadDropConfig,
};
pub use error::{EndpointsError, UnmarshalError};
pub use locality::LocalityId;
pub use metadata::{ServiceStatus, UpdateErrorMetadata, UpdateMetadata};
pub use resource::{ResourceType, ResourceTypeRegistry, XdsResourceTypes};
pub use unmarshal::{unmarshal_endpoints, UnmarshalOptions, Unmarshalled};
