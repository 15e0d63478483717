// bh-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Length as UomLength, Time as UomTime,
    Velocity as UomVelocity,
};

// SI quantities the kinematics and the CLI report in
pub type Accel = UomAcceleration;
pub type Length = UomLength;
pub type Time = UomTime;
pub type Velocity = UomVelocity;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

/// Time until `v0` decays to zero under constant deceleration `u`.
pub fn stopping_time(v0: Velocity, u: Accel) -> Time {
    v0 / u
}

/// Distance covered while stopping from `v0` at constant deceleration `u`.
pub fn stopping_distance(v0: Velocity, u: Accel) -> Length {
    v0 * v0 / (u * 2.0)
}

#[inline]
pub fn to_ms(t: Time) -> f64 {
    use uom::si::time::millisecond;
    t.get::<millisecond>()
}

#[inline]
pub fn to_cm(l: Length) -> f64 {
    use uom::si::length::centimeter;
    l.get::<centimeter>()
}
