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

//! Decoding and validation of xDS endpoint discovery (EDS) resources.
//!
//! [`xds::unmarshal_endpoints`] takes the resources of a single discovery
//! response and turns every `ClusterLoadAssignment` into an
//! [`xds::EndpointsUpdate`], enforcing the structural invariants a load
//! balancer relies on (contiguous priorities, unique localities per priority,
//! non-zero endpoint weights).

#![deny(unused_must_use)]

pub mod config;
pub mod generated;
pub mod metrics;
pub mod time;
pub mod xds;


pub type Result<T, E = eyre::Error> = std::result::Result<T, E>;

#[doc(inline)]
pub use self::{
    config::Config,
    xds::{unmarshal_endpoints, EndpointsUpdate, UnmarshalOptions, Unmarshalled},
};
