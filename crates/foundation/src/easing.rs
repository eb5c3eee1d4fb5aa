use serde::{Deserialize, Serialize};

/// Easing curves used by camera moves, arc fades and scroll reveals.
///
/// All curves map `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.
/// Inputs outside the unit interval are clamped first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    CubicIn,
    CubicOut,
    #[default]
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for e in ALL {
            assert_eq!(e.apply(0.0), 0.0, "{e:?}");
            assert_eq!(e.apply(1.0), 1.0, "{e:?}");
        }
    }

    #[test]
    fn out_of_range_is_clamped() {
        for e in ALL {
            assert_eq!(e.apply(-3.0), 0.0);
            assert_eq!(e.apply(7.0), 1.0);
            assert_eq!(e.apply(f64::NAN), 0.0);
        }
    }

    #[test]
    fn in_out_is_symmetric_around_midpoint() {
        assert_eq!(Easing::CubicInOut.apply(0.5), 0.5);
        let a = Easing::CubicInOut.apply(0.2);
        let b = Easing::CubicInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!(Easing::CubicOut.apply(0.5) > 0.5);
        assert!(Easing::CubicIn.apply(0.5) < 0.5);
    }
}
