/*
 * Copyright 2024 Google LLC All Rights Reserved.
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

use std::fmt;

/// A UTC timestamp, recorded when a discovery response is processed.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UtcTimestamp {
    inner: time::OffsetDateTime,
}

impl UtcTimestamp {
    #[inline]
    pub fn now() -> Self {
        Self {
            inner: time::OffsetDateTime::now_utc(),
        }
    }

    /// Gets the [Unix timestamp](https://en.wikipedia.org/wiki/Unix_time)
    #[inline]
    pub fn unix(self) -> i64 {
        self.inner.unix_timestamp()
    }
}

impl fmt::Debug for UtcTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}
