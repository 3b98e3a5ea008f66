// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What one refresh repainted.

use alloc::vec;
use alloc::vec::Vec;

use tessera_core::area::Area;

/// The part of the screen a refresh pushed to the display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DamageRegion {
    /// The whole screen was repainted.
    #[default]
    Full,
    /// These areas were repainted.
    Areas(Vec<Area>),
    /// Nothing was repainted.
    None,
}

impl DamageRegion {
    /// Classifies the areas repainted on `screen`.
    #[must_use]
    pub fn from_areas(areas: Vec<Area>, screen: &Area) -> Self {
        if areas.is_empty() {
            Self::None
        } else if areas.iter().any(|a| screen.is_in(a)) {
            Self::Full
        } else {
            Self::Areas(areas)
        }
    }

    /// Returns `true` if nothing was repainted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Number of repainted pixels, or `None` for [`DamageRegion::Full`].
    #[must_use]
    pub fn pixel_count(&self) -> Option<u64> {
        match self {
            Self::Full => None,
            Self::Areas(areas) => Some(areas.iter().map(|a| u64::from(a.size())).sum()),
            Self::None => Some(0),
        }
    }

    /// The repainted region as `kurbo` rectangles with exclusive max edges,
    /// for presenters that take float damage rects. `Full` yields `screen`.
    #[must_use]
    pub fn to_rects(&self, screen: &Area) -> Vec<kurbo::Rect> {
        match self {
            Self::Full => vec![screen.to_rect()],
            Self::Areas(areas) => areas.iter().map(Area::to_rect).collect(),
            Self::None => Vec::new(),
        }
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Areas(a), Self::Areas(b)) => {
                let mut merged = a.clone();
                merged.extend_from_slice(b);
                *self = Self::Areas(merged);
            }
        }
    }
}
