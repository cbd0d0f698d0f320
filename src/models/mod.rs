/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

pub mod action;
pub mod album;
pub mod photo;
pub mod tag;

pub use action::*;
pub use album::*;
pub use photo::*;
pub use tag::*;
