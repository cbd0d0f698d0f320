/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

/// Maps an accessor name onto the key the API uses for it.
///
/// `snake_case` names become `camelCase` (`target_url` -> `targetUrl`); names
/// without an underscore are used as they are. Lookups and writes both go
/// through this, so no reverse mapping is ever needed.
pub fn to_external(name: &str) -> String {
    if !name.contains('_') {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    for segment in name.split('_').filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            if out.is_empty() {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}
