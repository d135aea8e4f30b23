// lizzy-core/src/units.rs
//
// SI quantity wrappers for the engine's public API boundary. Internal
// hot loops (assembly, advection) work in plain `Real`; these types
// exist so a caller cannot, say, pass a permeability in mm^2 where m^2
// is expected without the compiler noticing.

use uom::si::f64::{
    Area as UomArea, DynamicViscosity as UomDynamicViscosity, Pressure as UomPressure,
    Ratio as UomRatio, Time as UomTime,
};

/// Permeability is expressed in m^2 (Darcy's law coefficient), the same
/// dimension uom already models as `Area`.
pub type Permeability = UomArea;
pub type DynVisc = UomDynamicViscosity;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Time = UomTime;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn m2(v: f64) -> Permeability {
    use uom::si::area::square_meter;
    Permeability::new::<square_meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}
