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

use crate::{time::UtcTimestamp, xds::UnmarshalError};

/// Whether a discovery response was accepted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ServiceStatus {
    /// Every resource in the response was valid.
    Acked,
    /// At least one resource in the response was rejected.
    Nacked,
}

impl ServiceStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acked => "acked",
            Self::Nacked => "nacked",
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping for a processed discovery response.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateMetadata {
    pub status: ServiceStatus,
    /// The `version_info` of the response.
    pub version: String,
    pub timestamp: UtcTimestamp,
    /// Set when the response was NACKed.
    pub err_state: Option<UpdateErrorMetadata>,
}

impl UpdateMetadata {
    pub(crate) fn new(version: String, timestamp: UtcTimestamp, error: UnmarshalError) -> Self {
        if error.is_empty() {
            return Self {
                status: ServiceStatus::Acked,
                version,
                timestamp,
                err_state: None,
            };
        }

        Self {
            status: ServiceStatus::Nacked,
            err_state: Some(UpdateErrorMetadata {
                version: version.clone(),
                error,
                timestamp,
            }),
            version,
            timestamp,
        }
    }

    #[inline]
    pub fn is_acked(&self) -> bool {
        self.status == ServiceStatus::Acked
    }
}

/// Details of a NACKed response.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateErrorMetadata {
    /// The version that was rejected.
    pub version: String,
    pub error: UnmarshalError,
    pub timestamp: UtcTimestamp,
}
