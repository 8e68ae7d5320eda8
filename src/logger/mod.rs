// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub use self::entry::Entry;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::mode::Mode;

mod entry;
#[allow(clippy::module_inception)]
mod logger;
mod mode;

/// Message written by the `debug_json` family when the value cannot be serialized.
const JSON_FALLBACK: &str = "error marshaling struct";

fn json_message(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| JSON_FALLBACK.to_string())
}
