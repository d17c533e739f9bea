// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::config::PaletteConfig;

pub type ColorGenerator = Box<dyn Fn(usize) -> String + Send + Sync>;

/// Grow-only cache of generated colours.
///
/// Entry `i` never changes once generated, so series keep their colour across
/// re-renders as long as the requested count stays within the high-water mark.
pub struct ColorPalette {
    generator: ColorGenerator,
    colors: Vec<String>,
}
impl ColorPalette {
    pub fn new() -> Self {
        Self::from_config(&PaletteConfig::default())
    }
    pub fn from_config(config: &PaletteConfig) -> Self {
        let PaletteConfig {
            saturation,
            lightness,
            hue_step,
        } = config.clone();
        Self::with_generator(Box::new(move |index| {
            let hue = (index as f64 * hue_step) % 360.0;
            format!("hsl({hue:.0}, {saturation:.0}%, {lightness:.0}%)")
        }))
    }
    pub fn with_generator(generator: ColorGenerator) -> Self {
        Self {
            generator,
            colors: Vec::new(),
        }
    }
    pub fn ensure(&mut self, count: usize) {
        while self.colors.len() < count {
            let next = (self.generator)(self.colors.len());
            self.colors.push(next);
        }
    }
    pub fn get(&mut self, count: usize) -> Vec<String> {
        self.ensure(count);
        self.colors[..count].to_vec()
    }
    pub fn high_water_mark(&self) -> usize {
        self.colors.len()
    }
}
impl Default for ColorPalette {
    fn default() -> Self {
        Self::new()
    }
}
impl std::fmt::Debug for ColorPalette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorPalette")
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}
