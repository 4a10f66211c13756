/// Clockwise page rotation, kept normalised to `0..360`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rotation(u16);

impl Rotation {
    pub const NONE: Rotation = Rotation(0);
    pub const STEP_DEGREES: u16 = 90;

    /// Build a rotation from any multiple of 90 degrees
    #[must_use]
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % i32::from(Self::STEP_DEGREES) != 0 {
            return None;
        }
        Some(Self(degrees.rem_euclid(360) as u16))
    }

    #[must_use]
    pub const fn degrees(self) -> u16 {
        self.0
    }

    /// Rotate a further 90 degrees clockwise
    #[must_use]
    pub const fn clockwise(self) -> Self {
        Self((self.0 + Self::STEP_DEGREES) % 360)
    }

    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        (self.0 / Self::STEP_DEGREES) as u8
    }

    /// True when the rendered width comes from the page height
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        self.quarter_turns() % 2 == 1
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_step_adds_ninety() {
        let r = Rotation::NONE.clockwise();
        assert_eq!(r.degrees(), 90);
        assert_eq!(r.clockwise().degrees(), 180);
    }

    #[test]
    fn four_steps_return_to_start() {
        let mut r = Rotation::NONE;
        for _ in 0..4 {
            r = r.clockwise();
        }
        assert_eq!(r, Rotation::NONE);
    }

    #[test]
    fn from_degrees_normalises_and_rejects_off_grid() {
        assert_eq!(Rotation::from_degrees(450), Some(Rotation(90)));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation(270)));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn odd_quarter_turns_swap_axes() {
        assert!(!Rotation::NONE.swaps_axes());
        assert!(Rotation::NONE.clockwise().swaps_axes());
        assert!(!Rotation(180).swaps_axes());
    }
}
