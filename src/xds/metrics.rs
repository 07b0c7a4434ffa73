/*
 * Copyright 2021 Google LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *       http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec};

use crate::metrics::{opts, registry};

const SUBSYSTEM: &str = "xds";

pub(crate) const OUTCOME_LABEL: &str = "outcome";
pub(crate) const STATUS_LABEL: &str = "status";

pub(crate) const ACCEPTED: &str = "accepted";
pub(crate) const REJECTED: &str = "rejected";

pub(crate) fn resources_total(outcome: &str) -> IntCounter {
    static RESOURCES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
        prometheus::register_int_counter_vec_with_registry! {
            opts(
                "resources_total",
                SUBSYSTEM,
                "Total number of endpoint resources processed, by outcome",
            ),
            &[OUTCOME_LABEL],
            registry(),
        }
        .unwrap()
    });

    RESOURCES_TOTAL.with_label_values(&[outcome])
}

pub(crate) fn ignored_localities_total() -> &'static IntCounter {
    static IGNORED_LOCALITIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
        prometheus::register_int_counter_with_registry! {
            opts(
                "ignored_localities_total",
                SUBSYSTEM,
                "Total number of localities ignored because their weight was zero",
            ),
            registry(),
        }
        .unwrap()
    });

    &IGNORED_LOCALITIES_TOTAL
}

pub(crate) fn responses_total(status: crate::xds::ServiceStatus) -> IntCounter {
    static RESPONSES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
        prometheus::register_int_counter_vec_with_registry! {
            opts(
                "responses_total",
                SUBSYSTEM,
                "Total number of endpoint discovery responses processed, by status",
            ),
            &[STATUS_LABEL],
            registry(),
        }
        .unwrap()
    });

    RESPONSES_TOTAL.with_label_values(&[status.as_str()])
}
