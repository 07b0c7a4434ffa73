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

use std::collections::{BTreeMap, BTreeSet, HashSet};

use prost::Message;
use prost_types::Any;
use tracing::Span;

use crate::{
    config::{Config, DropDenominatorPolicy},
    xds::{
        core::{self, address, socket_address::PortSpecifier},
        endpoint::{
            cluster_load_assignment::policy::DropOverload, lb_endpoint::HostIdentifier,
            ClusterLoadAssignment, LbEndpoint,
        },
        kind::fractional_percent::DenominatorType,
        locality::LocalityId,
        metrics,
        resource::{unwrap_resource, UnwrapError},
        EndpointsError, UnmarshalOptions,
    },
};

/// A validated `ClusterLoadAssignment`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EndpointsUpdate {
    pub drops: Vec<OverloadDropConfig>,
    /// Localities in the order they were received, zero weight localities
    /// excluded.
    pub localities: Vec<Locality>,
    /// The unwrapped resource this update was decoded from.
    pub raw: Option<Any>,
}

/// The endpoints of one locality at one priority.
#[derive(Clone, Debug, PartialEq)]
pub struct Locality {
    pub id: LocalityId,
    pub endpoints: Vec<Endpoint>,
    /// Always non-zero.
    pub weight: u32,
    /// `0` is the highest priority.
    pub priority: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// `host:port`, with IPv6 hosts in brackets.
    pub address: String,
    /// Always non-zero.
    pub weight: u32,
    pub health_status: HealthStatus,
}

/// An endpoint's health as reported by the control plane.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HealthStatus {
    Unknown,
    Healthy,
    Unhealthy,
    Draining,
    Timeout,
    Degraded,
    /// A status this crate doesn't know about, passed through as is.
    Other(i32),
}

impl HealthStatus {
    /// The wire value of the status.
    pub fn ordinal(self) -> i32 {
        match self {
            Self::Unknown => core::HealthStatus::Unknown as i32,
            Self::Healthy => core::HealthStatus::Healthy as i32,
            Self::Unhealthy => core::HealthStatus::Unhealthy as i32,
            Self::Draining => core::HealthStatus::Draining as i32,
            Self::Timeout => core::HealthStatus::Timeout as i32,
            Self::Degraded => core::HealthStatus::Degraded as i32,
            Self::Other(value) => value,
        }
    }
}

impl From<i32> for HealthStatus {
    fn from(value: i32) -> Self {
        match core::HealthStatus::try_from(value) {
            Ok(core::HealthStatus::Unknown) => Self::Unknown,
            Ok(core::HealthStatus::Healthy) => Self::Healthy,
            Ok(core::HealthStatus::Unhealthy) => Self::Unhealthy,
            Ok(core::HealthStatus::Draining) => Self::Draining,
            Ok(core::HealthStatus::Timeout) => Self::Timeout,
            Ok(core::HealthStatus::Degraded) => Self::Degraded,
            Err(_) => Self::Other(value),
        }
    }
}

impl From<core::HealthStatus> for HealthStatus {
    fn from(value: core::HealthStatus) -> Self {
        Self::from(value as i32)
    }
}

/// A category of traffic that should be dropped with a probability of
/// `numerator / denominator`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverloadDropConfig {
    pub category: String,
    pub numerator: u32,
    /// One of `100`, `10_000` or `1_000_000`, or `0` if the control plane
    /// sent a denominator we don't recognise.
    pub denominator: u32,
}

/// Unwraps, decodes and validates a single endpoints resource.
///
/// On failure the error is paired with the resource's name when it could be
/// determined, so callers can attribute it.
pub(crate) fn unmarshal_resource(
    resource: &Any,
    options: &UnmarshalOptions<'_>,
) -> Result<(String, EndpointsUpdate), (Option<String>, EndpointsError)> {
    let unwrapped = unwrap_resource(resource).map_err(|error| {
        let name = match &error {
            UnwrapError::Empty { name } if !name.is_empty() => Some(name.clone()),
            _ => None,
        };
        (name, EndpointsError::from(error))
    })?;
    let wrapper_name = unwrapped.name;
    let resource = unwrapped.resource;

    if !options.registry.is_endpoints(&resource.type_url) {
        return Err((
            wrapper_name,
            EndpointsError::UnexpectedType(resource.type_url),
        ));
    }

    let assignment = ClusterLoadAssignment::decode(&*resource.value)
        .map_err(|error| (wrapper_name.clone(), error.into()))?;

    let name = if assignment.cluster_name.is_empty() {
        wrapper_name
    } else {
        Some(assignment.cluster_name.clone())
    };

    tracing::trace!(
        parent: &options.span,
        resource = name.as_deref().unwrap_or_default(),
        contents = ?assignment,
        "decoded ClusterLoadAssignment"
    );

    match parse_cluster_load_assignment(assignment, &options.config, &options.span) {
        Ok(mut update) => {
            update.raw = Some(resource);
            Ok((name.unwrap_or_default(), update))
        }
        Err(error) => Err((name, error)),
    }
}

/// Validates a decoded `ClusterLoadAssignment`, converting it into an
/// [`EndpointsUpdate`].
///
/// Diagnostics are emitted as children of `span`.
pub fn parse_cluster_load_assignment(
    assignment: ClusterLoadAssignment,
    config: &Config,
    span: &Span,
) -> Result<EndpointsUpdate, EndpointsError> {
    let drops = assignment
        .policy
        .map(|policy| policy.drop_overloads)
        .unwrap_or_default()
        .into_iter()
        .map(|drop| parse_drop_policy(drop, config.drop_denominator, span))
        .collect::<Result<Vec<_>, _>>()?;

    // Priorities come straight off the wire, so this stays sparse rather
    // than being indexed by priority.
    let mut priorities: BTreeMap<u32, HashSet<String>> = BTreeMap::new();
    let mut localities = Vec::with_capacity(assignment.endpoints.len());

    for mut entry in assignment.endpoints {
        let Some(locality) = entry.locality.take() else {
            return Err(EndpointsError::MissingLocalityId {
                entry: Box::new(entry),
            });
        };

        let id = LocalityId::from(locality);
        let weight = entry.load_balancing_weight.unwrap_or_default();
        if weight == 0 {
            tracing::warn!(parent: span, locality = %id.key(), "ignoring locality with weight 0");
            metrics::ignored_localities_total().inc();
            continue;
        }

        let priority = entry.priority;
        let key = id.key();
        let seen = priorities.entry(priority).or_default();
        if seen.contains(&key) {
            return Err(EndpointsError::DuplicateLocality {
                locality: key,
                priority,
            });
        }
        seen.insert(key);

        localities.push(Locality {
            id,
            endpoints: parse_endpoints(entry.lb_endpoints)?,
            weight,
            priority,
        });
    }

    // The keys are sorted, so they are contiguous from zero exactly when
    // every key matches its position.
    let missing = (0u32..)
        .zip(priorities.keys())
        .find_map(|(expected, &actual)| (expected != actual).then_some(expected));

    if let Some(missing) = missing {
        return Err(EndpointsError::MissingPriority {
            missing,
            received: priorities.into_keys().collect::<BTreeSet<_>>(),
        });
    }

    Ok(EndpointsUpdate {
        drops,
        localities,
        raw: None,
    })
}

fn parse_drop_policy(
    drop: DropOverload,
    policy: DropDenominatorPolicy,
    span: &Span,
) -> Result<OverloadDropConfig, EndpointsError> {
    let percentage = drop.drop_percentage.unwrap_or_default();

    let denominator = match DenominatorType::try_from(percentage.denominator) {
        Ok(DenominatorType::Hundred) => 100,
        Ok(DenominatorType::TenThousand) => 10_000,
        Ok(DenominatorType::Million) => 1_000_000,
        Err(_) => match policy {
            DropDenominatorPolicy::Strict => {
                return Err(EndpointsError::UnknownDropDenominator {
                    category: drop.category,
                    value: percentage.denominator,
                });
            }
            DropDenominatorPolicy::Lenient => {
                tracing::warn!(
                    parent: span,
                    category = %drop.category,
                    denominator = percentage.denominator,
                    "unknown drop percentage denominator, using 0"
                );
                0
            }
        },
    };

    Ok(OverloadDropConfig {
        category: drop.category,
        numerator: percentage.numerator,
        denominator,
    })
}

fn parse_endpoints(lb_endpoints: Vec<LbEndpoint>) -> Result<Vec<Endpoint>, EndpointsError> {
    lb_endpoints
        .into_iter()
        .map(|lb_endpoint| {
            let weight = lb_endpoint.load_balancing_weight.unwrap_or_default();
            if weight == 0 {
                return Err(EndpointsError::ZeroWeightEndpoint {
                    endpoint: Box::new(lb_endpoint),
                });
            }

            Ok(Endpoint {
                health_status: HealthStatus::from(lb_endpoint.health_status),
                address: parse_address(lb_endpoint.host_identifier.as_ref()),
                weight,
            })
        })
        .collect()
}

/// Formats the endpoint's socket address as `host:port`. Missing parts are
/// treated as empty, named ports as `0`.
fn parse_address(host: Option<&HostIdentifier>) -> String {
    let socket_address = match host {
        Some(HostIdentifier::Endpoint(endpoint)) => {
            match endpoint.address.as_ref().and_then(|a| a.address.as_ref()) {
                Some(address::Address::SocketAddress(socket_address)) => Some(socket_address),
                _ => None,
            }
        }
        _ => None,
    };

    let (host, port) = socket_address
        .map(|address| {
            let port = match address.port_specifier {
                Some(PortSpecifier::PortValue(port)) => port,
                _ => 0,
            };
            (address.address.as_str(), port)
        })
        .unwrap_or(("", 0));

    join_host_port(host, port)
}

/// Joins a host and port, bracketing hosts which contain a `:` (IPv6 literals).
pub fn join_host_port(host: &str, port: u32) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::*;
    use crate::{
        test::{lb_endpoint, locality, ClaBuilder},
        xds::core::HealthStatus as Health,
    };

    fn parse(assignment: ClusterLoadAssignment) -> Result<EndpointsUpdate, EndpointsError> {
        parse_cluster_load_assignment(assignment, &Config::default(), &Span::none())
    }

    #[test]
    fn single_locality() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("A")),
                1,
                0,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .build();

        let update = parse(assignment).unwrap();
        assert_eq!(
            update,
            EndpointsUpdate {
                drops: vec![],
                localities: vec![Locality {
                    id: LocalityId::with_region("A"),
                    endpoints: vec![Endpoint {
                        address: "10.0.0.1:80".into(),
                        weight: 1,
                        health_status: HealthStatus::Healthy,
                    }],
                    weight: 1,
                    priority: 0,
                }],
                raw: None,
            }
        );
    }

    #[test]
    fn good_assignment() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(core::Locality {
                    region: "r".into(),
                    zone: "z".into(),
                    sub_zone: "locality-1".into(),
                }),
                1,
                1,
                vec![
                    lb_endpoint("addr1", 314, 271, Health::Unhealthy),
                    lb_endpoint("addr2", 159, 828, Health::Draining),
                ],
            )
            .locality(
                Some(core::Locality {
                    region: "r".into(),
                    zone: "z".into(),
                    sub_zone: "locality-2".into(),
                }),
                1,
                0,
                vec![
                    lb_endpoint("addr3", 314, 271, Health::Healthy),
                    lb_endpoint("addr4", 159, 828, Health::Unknown),
                ],
            )
            .build();

        let update = parse(assignment).unwrap();
        assert_eq!(
            update.localities,
            vec![
                Locality {
                    id: LocalityId::new("r", "z", "locality-1"),
                    endpoints: vec![
                        Endpoint {
                            address: "addr1:314".into(),
                            weight: 271,
                            health_status: HealthStatus::Unhealthy,
                        },
                        Endpoint {
                            address: "addr2:159".into(),
                            weight: 828,
                            health_status: HealthStatus::Draining,
                        },
                    ],
                    weight: 1,
                    priority: 1,
                },
                Locality {
                    id: LocalityId::new("r", "z", "locality-2"),
                    endpoints: vec![
                        Endpoint {
                            address: "addr3:314".into(),
                            weight: 271,
                            health_status: HealthStatus::Healthy,
                        },
                        Endpoint {
                            address: "addr4:159".into(),
                            weight: 828,
                            health_status: HealthStatus::Unknown,
                        },
                    ],
                    weight: 1,
                    priority: 0,
                },
            ]
        );
    }

    #[test]
    fn missing_priority() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("a")),
                1,
                0,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .locality(
                Some(locality("b")),
                1,
                2,
                vec![lb_endpoint("10.0.0.2", 80, 1, Health::Healthy)],
            )
            .build();

        assert_eq!(
            parse(assignment).unwrap_err(),
            EndpointsError::MissingPriority {
                missing: 1,
                received: [0, 2].into(),
            }
        );
    }

    #[test]
    fn priorities_must_start_at_zero() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("a")),
                1,
                1,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .build();

        assert_eq!(
            parse(assignment).unwrap_err(),
            EndpointsError::MissingPriority {
                missing: 0,
                received: [1].into(),
            }
        );
    }

    #[test]
    fn missing_locality_id() {
        let assignment = ClaBuilder::new("test")
            .locality(
                None,
                1,
                0,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .build();

        let error = parse(assignment).unwrap_err();
        assert!(matches!(error, EndpointsError::MissingLocalityId { .. }));
        assert!(error.to_string().contains("locality without ID"));
    }

    #[test]
    fn zero_weight_endpoint() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("a")),
                1,
                0,
                vec![
                    lb_endpoint("10.0.0.1", 80, 1, Health::Healthy),
                    lb_endpoint("10.0.0.2", 80, 0, Health::Healthy),
                ],
            )
            .build();

        let error = parse(assignment).unwrap_err();
        assert!(matches!(error, EndpointsError::ZeroWeightEndpoint { .. }));
    }

    #[test]
    fn unset_endpoint_weight() {
        let mut endpoint = lb_endpoint("10.0.0.1", 80, 1, Health::Healthy);
        endpoint.load_balancing_weight = None;

        let assignment = ClaBuilder::new("test")
            .locality(Some(locality("a")), 1, 0, vec![endpoint])
            .build();

        assert!(matches!(
            parse(assignment).unwrap_err(),
            EndpointsError::ZeroWeightEndpoint { .. }
        ));
    }

    #[test]
    fn unset_locality_weight_is_ignored() {
        let mut assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("a")),
                1,
                0,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .locality(
                Some(locality("unset")),
                1,
                0,
                vec![lb_endpoint("10.0.0.2", 80, 1, Health::Healthy)],
            )
            .build();
        assignment.endpoints[1].load_balancing_weight = None;

        let update = parse(assignment).unwrap();

        assert_eq!(update.localities.len(), 1);
        assert_eq!(update.localities[0].id, LocalityId::with_region("a"));
    }

    #[traced_test]
    #[test]
    fn zero_weight_locality_is_ignored() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("a")),
                1,
                0,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .locality(
                Some(locality("ignored")),
                0,
                1,
                vec![lb_endpoint("10.0.0.2", 80, 0, Health::Healthy)],
            )
            .build();

        let span = tracing::info_span!("eds");
        let update =
            parse_cluster_load_assignment(assignment, &Config::default(), &span).unwrap();

        assert_eq!(update.localities.len(), 1);
        assert_eq!(update.localities[0].id, LocalityId::with_region("a"));
        assert!(logs_contain("ignoring locality with weight 0"));
        assert!(logs_contain(r#""region":"ignored""#));
    }

    #[test]
    fn zero_weight_locality_does_not_hold_a_priority() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("a")),
                0,
                0,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .locality(
                Some(locality("b")),
                1,
                1,
                vec![lb_endpoint("10.0.0.2", 80, 1, Health::Healthy)],
            )
            .build();

        assert_eq!(
            parse(assignment).unwrap_err(),
            EndpointsError::MissingPriority {
                missing: 0,
                received: [1].into(),
            }
        );
    }

    #[test]
    fn duplicate_locality() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("r1")),
                1,
                0,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .locality(
                Some(locality("r1")),
                1,
                0,
                vec![lb_endpoint("10.0.0.2", 80, 1, Health::Healthy)],
            )
            .build();

        let error = parse(assignment).unwrap_err();
        assert_eq!(
            error,
            EndpointsError::DuplicateLocality {
                locality: r#"{"region":"r1"}"#.into(),
                priority: 0,
            }
        );
        let message = error.to_string();
        assert!(message.contains("r1"));
        assert!(message.contains("priority 0"));
    }

    #[test]
    fn same_locality_at_different_priorities() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("r1")),
                1,
                0,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .locality(
                Some(locality("r1")),
                1,
                1,
                vec![lb_endpoint("10.0.0.2", 80, 1, Health::Healthy)],
            )
            .build();

        let update = parse(assignment).unwrap();
        assert_eq!(
            update
                .localities
                .iter()
                .map(|l| (l.id.region.as_str(), l.priority))
                .collect::<Vec<_>>(),
            [("r1", 0), ("r1", 1)]
        );
    }

    #[test]
    fn drops() {
        let assignment = ClaBuilder::new("test")
            .drop("hundred", 1, DenominatorType::Hundred)
            .drop("ten-thousand", 20, DenominatorType::TenThousand)
            .drop("million", 300, DenominatorType::Million)
            .locality(
                Some(locality("a")),
                1,
                0,
                vec![lb_endpoint("10.0.0.1", 80, 1, Health::Healthy)],
            )
            .build();

        let update = parse(assignment).unwrap();
        assert_eq!(
            update.drops,
            vec![
                OverloadDropConfig {
                    category: "hundred".into(),
                    numerator: 1,
                    denominator: 100,
                },
                OverloadDropConfig {
                    category: "ten-thousand".into(),
                    numerator: 20,
                    denominator: 10_000,
                },
                OverloadDropConfig {
                    category: "million".into(),
                    numerator: 300,
                    denominator: 1_000_000,
                },
            ]
        );
    }

    #[test]
    fn drop_without_percentage() {
        let mut assignment = ClaBuilder::new("test").build();
        assignment.policy = Some(crate::xds::endpoint::cluster_load_assignment::Policy {
            drop_overloads: vec![DropOverload {
                category: "bare".into(),
                drop_percentage: None,
            }],
            ..<_>::default()
        });

        let update = parse(assignment).unwrap();
        assert_eq!(
            update.drops,
            vec![OverloadDropConfig {
                category: "bare".into(),
                numerator: 0,
                denominator: 100,
            }]
        );
        assert!(update.localities.is_empty());
    }

    #[traced_test]
    #[test]
    fn unknown_drop_denominator_lenient() {
        let assignment = ClaBuilder::new("test")
            .drop_raw("weird", 5, 42)
            .build();

        let span = tracing::info_span!("eds");
        let update =
            parse_cluster_load_assignment(assignment, &Config::default(), &span).unwrap();
        assert_eq!(
            update.drops,
            vec![OverloadDropConfig {
                category: "weird".into(),
                numerator: 5,
                denominator: 0,
            }]
        );
        assert!(logs_contain("unknown drop percentage denominator"));
    }

    #[test]
    fn unknown_drop_denominator_strict() {
        let assignment = ClaBuilder::new("test")
            .drop_raw("weird", 5, 42)
            .build();

        let config = Config::default().with_drop_denominator(DropDenominatorPolicy::Strict);
        assert_eq!(
            parse_cluster_load_assignment(assignment, &config, &Span::none()).unwrap_err(),
            EndpointsError::UnknownDropDenominator {
                category: "weird".into(),
                value: 42,
            }
        );
    }

    #[test]
    fn addresses() {
        let assignment = ClaBuilder::new("test")
            .locality(
                Some(locality("a")),
                1,
                0,
                vec![
                    lb_endpoint("2001:db8::1", 443, 1, Health::Healthy),
                    lb_endpoint("fe80::1%eth0", 80, 1, Health::Healthy),
                    lb_endpoint("example.com", 8080, 1, Health::Healthy),
                ],
            )
            .build();

        let update = parse(assignment).unwrap();
        assert_eq!(
            update.localities[0]
                .endpoints
                .iter()
                .map(|e| e.address.as_str())
                .collect::<Vec<_>>(),
            ["[2001:db8::1]:443", "[fe80::1%eth0]:80", "example.com:8080"]
        );
    }

    #[test]
    fn address_without_socket_address() {
        let named = LbEndpoint {
            host_identifier: Some(HostIdentifier::EndpointName("named".into())),
            load_balancing_weight: Some(1),
            ..<_>::default()
        };

        let mut named_port = lb_endpoint("10.0.0.1", 0, 1, Health::Healthy);
        if let Some(HostIdentifier::Endpoint(endpoint)) = &mut named_port.host_identifier {
            if let Some(core::Address {
                address: Some(address::Address::SocketAddress(socket)),
            }) = &mut endpoint.address
            {
                socket.port_specifier = Some(PortSpecifier::NamedPort("http".into()));
            }
        }

        let assignment = ClaBuilder::new("test")
            .locality(Some(locality("a")), 1, 0, vec![named, named_port])
            .build();

        let update = parse(assignment).unwrap();
        assert_eq!(
            update.localities[0]
                .endpoints
                .iter()
                .map(|e| e.address.as_str())
                .collect::<Vec<_>>(),
            [":0", "10.0.0.1:0"]
        );
    }

    #[test]
    fn health_status_pass_through() {
        for (raw, expected) in [
            (0, HealthStatus::Unknown),
            (1, HealthStatus::Healthy),
            (2, HealthStatus::Unhealthy),
            (3, HealthStatus::Draining),
            (4, HealthStatus::Timeout),
            (5, HealthStatus::Degraded),
            (17, HealthStatus::Other(17)),
        ] {
            let status = HealthStatus::from(raw);
            assert_eq!(status, expected);
            assert_eq!(status.ordinal(), raw);
        }
    }

    #[test]
    fn join() {
        assert_eq!(join_host_port("10.0.0.1", 80), "10.0.0.1:80");
        assert_eq!(join_host_port("::1", 80), "[::1]:80");
        assert_eq!(join_host_port("", 0), ":0");
    }
}
