// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

pub mod api {
    pub mod error;
}

pub mod core {
    pub mod id;
    pub mod model;
}

// Re-exports for convenience
pub use api::error::{PixieError, Result};
pub use core::id::{Id, NodeKind};
pub use core::model::{ContentRating, Post, Tag, TagCategory};
