// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod validation;
mod worker;

pub use validation::{ValidationError, ValidationWarning};
pub use worker::WorkerError;
