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

use prost::Message;
use prost_types::Any;

use crate::xds::discovery::Resource as ResourceWrapper;

macro_rules! type_urls {
     ($($base_url:literal : {$($const_name:ident = $type_url:literal),+ $(,)?})+) => {
         $(
             $(
                 pub const $const_name : &str = concat!($base_url, "/", $type_url);
             )+
         )+
     }
 }

type_urls! {
    "type.googleapis.com": {
        CLUSTER_TYPE = "envoy.config.cluster.v3.Cluster",
        ENDPOINT_TYPE = "envoy.config.endpoint.v3.ClusterLoadAssignment",
        ENDPOINT_TYPE_V2 = "envoy.api.v2.ClusterLoadAssignment",
        LISTENER_TYPE = "envoy.config.listener.v3.Listener",
        RESOURCE_WRAPPER_TYPE = "envoy.service.discovery.v3.Resource",
        ROUTE_TYPE = "envoy.config.route.v3.RouteConfiguration",
        SECRET_TYPE = "envoy.extensions.transport_sockets.tls.v3.Secret",
    }
}

/// The kinds of xDS resource a discovery response can carry.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ResourceType {
    Cluster,
    Endpoint,
    Listener,
    Route,
    Secret,
}

impl ResourceType {
    /// Returns the corresponding (v3) type URL for the resource type.
    pub const fn type_url(&self) -> &'static str {
        match self {
            Self::Cluster => CLUSTER_TYPE,
            Self::Endpoint => ENDPOINT_TYPE,
            Self::Listener => LISTENER_TYPE,
            Self::Route => ROUTE_TYPE,
            Self::Secret => SECRET_TYPE,
        }
    }
}

impl TryFrom<&'_ str> for ResourceType {
    type Error = UnknownResourceType;

    fn try_from(url: &str) -> Result<Self, UnknownResourceType> {
        Ok(match url {
            CLUSTER_TYPE => Self::Cluster,
            ENDPOINT_TYPE | ENDPOINT_TYPE_V2 => Self::Endpoint,
            LISTENER_TYPE => Self::Listener,
            ROUTE_TYPE => Self::Route,
            SECRET_TYPE => Self::Secret,
            unknown => return Err(UnknownResourceType(unknown.to_owned())),
        })
    }
}

impl TryFrom<String> for ResourceType {
    type Error = UnknownResourceType;

    fn try_from(url: String) -> Result<Self, UnknownResourceType> {
        Self::try_from(&*url)
    }
}

/// Error indicating an unknown resource type was found.
#[derive(Debug, thiserror::Error)]
#[error("Unknown resource type: {0}")]
pub struct UnknownResourceType(String);

/// Classifies type URLs into [`ResourceType`]s. Implemented by whatever owns
/// the set of resource types a client understands.
pub trait ResourceTypeRegistry {
    fn classify(&self, type_url: &str) -> Option<ResourceType>;

    fn is_endpoints(&self, type_url: &str) -> bool {
        self.classify(type_url) == Some(ResourceType::Endpoint)
    }
}

/// The standard envoy type URLs.
#[derive(Clone, Copy, Debug, Default)]
pub struct XdsResourceTypes;

impl ResourceTypeRegistry for XdsResourceTypes {
    fn classify(&self, type_url: &str) -> Option<ResourceType> {
        ResourceType::try_from(type_url).ok()
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum UnwrapError {
    #[error("{0}")]
    Decode(#[from] prost::DecodeError),
    #[error("resource wrapper {name:?} contains no resource")]
    Empty { name: String },
}

/// A resource with any `envoy.service.discovery.v3.Resource` wrapper removed.
#[derive(Clone, Debug, PartialEq)]
pub struct Unwrapped {
    /// The name declared by the wrapper, if there was one and it was not empty.
    pub name: Option<String>,
    pub resource: Any,
}

/// Removes the `Resource` wrapper from `any` if present, otherwise returns
/// the resource as is.
pub fn unwrap_resource(any: &Any) -> Result<Unwrapped, UnwrapError> {
    if any.type_url != RESOURCE_WRAPPER_TYPE {
        return Ok(Unwrapped {
            name: None,
            resource: any.clone(),
        });
    }

    let wrapper = ResourceWrapper::decode(&*any.value)?;
    let Some(resource) = wrapper.resource else {
        return Err(UnwrapError::Empty { name: wrapper.name });
    };

    Ok(Unwrapped {
        name: (!wrapper.name.is_empty()).then_some(wrapper.name),
        resource,
    })
}
