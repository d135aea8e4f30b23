//! A named porous material: principal permeabilities, porosity, thickness.

use lizzy_core::units::{Permeability, Ratio};
use lizzy_core::Real;

use crate::error::{MaterialError, MaterialResult};

#[derive(Debug, Clone)]
pub struct PorousMaterial {
    pub name: String,
    pub k1: Permeability,
    pub k2: Permeability,
    pub k3: Permeability,
    pub porosity: Ratio,
    /// Thickness in whatever unit the caller chose; the engine never
    /// converts it (spec §9 open question).
    pub thickness: Real,
}

impl PorousMaterial {
    pub fn new(
        name: impl Into<String>,
        (k1, k2, k3): (Permeability, Permeability, Permeability),
        porosity: Ratio,
        thickness: Real,
    ) -> MaterialResult<Self> {
        for k in [k1, k2, k3] {
            let v = k.value;
            if v < 0.0 {
                return Err(MaterialError::NegativePermeability { value: v });
            }
        }
        let phi = porosity.value;
        if !(phi > 0.0 && phi < 1.0) {
            return Err(MaterialError::InvalidPorosity { value: phi });
        }
        if thickness <= 0.0 {
            return Err(MaterialError::InvalidThickness { value: thickness });
        }
        Ok(Self {
            name: name.into(),
            k1,
            k2,
            k3,
            porosity,
            thickness,
        })
    }
}
