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

use once_cell::sync::Lazy;
use prometheus::{Opts, Registry};

const NAMESPACE: &str = "eds";

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Returns the [`Registry`] containing all the metrics registered by this
/// crate, so that an embedding process can expose them.
#[inline]
pub fn registry() -> &'static Registry {
    &REGISTRY
}

pub fn opts(name: &str, subsystem: &str, description: &str) -> Opts {
    Opts::new(name, description)
        .namespace(NAMESPACE)
        .subsystem(subsystem)
}
