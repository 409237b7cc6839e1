// src/validators/dimensions.rs

//! Pixel-dimension rules. Assets without dimensions (models, audio, or
//! textures the host could not measure) are rejected by all of them.

use anyhow::Result;

use crate::types::AssetInfo;
use crate::validators::{AssetValidator, Verdict};

const NO_DIMENSIONS: &str = "asset has no pixel dimensions";

#[derive(Debug, Clone, Copy, Default)]
pub struct PowerOfTwoValidator;

impl AssetValidator for PowerOfTwoValidator {
    fn name(&self) -> &str {
        "power_of_two"
    }

    fn check(&self, asset: &AssetInfo) -> Result<Verdict> {
        let Some((width, height)) = asset.dimensions else {
            return Ok(Verdict::invalid(NO_DIMENSIONS));
        };

        let verdict = match (width.is_power_of_two(), height.is_power_of_two()) {
            (true, true) => Verdict::Valid,
            (false, true) => Verdict::invalid(format!("width {width} is not a power of two")),
            (true, false) => Verdict::invalid(format!("height {height} is not a power of two")),
            (false, false) => Verdict::invalid(format!(
                "width {width} and height {height} are not powers of two"
            )),
        };
        Ok(verdict)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SquareValidator;

impl AssetValidator for SquareValidator {
    fn name(&self) -> &str {
        "square"
    }

    fn check(&self, asset: &AssetInfo) -> Result<Verdict> {
        match asset.dimensions {
            None => Ok(Verdict::invalid(NO_DIMENSIONS)),
            Some((w, h)) if w == h => Ok(Verdict::Valid),
            Some((w, h)) => Ok(Verdict::invalid(format!(
                "width must equal height (got {w}x{h})"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExactSizeValidator {
    width: u32,
    height: u32,
}

impl ExactSizeValidator {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl AssetValidator for ExactSizeValidator {
    fn name(&self) -> &str {
        "exact_size"
    }

    fn check(&self, asset: &AssetInfo) -> Result<Verdict> {
        match asset.dimensions {
            None => Ok(Verdict::invalid(NO_DIMENSIONS)),
            Some(dims) if dims == (self.width, self.height) => Ok(Verdict::Valid),
            Some((w, h)) => Ok(Verdict::invalid(format!(
                "size must be {}x{} (got {w}x{h})",
                self.width, self.height
            ))),
        }
    }
}
