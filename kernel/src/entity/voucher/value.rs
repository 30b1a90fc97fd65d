use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::VoucherType;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct VoucherValue(f64);

/// The bound a [`VoucherValue`] falls outside of for a given [`VoucherType`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ValueBound {
    Minimum,
    PercentageMaximum,
}

impl VoucherValue {
    pub const MIN: f64 = 1.0;
    pub const PERCENTAGE_MAX: f64 = 100.0;

    pub fn new(value: impl Into<f64>) -> Self {
        Self(value.into())
    }

    /// `None` when the value is acceptable for `voucher_type`.
    pub fn violated_bound(&self, voucher_type: &VoucherType) -> Option<ValueBound> {
        // NaN compares false against everything, so test for acceptance rather than rejection.
        if !(self.0 >= Self::MIN && self.0.is_finite()) {
            return Some(ValueBound::Minimum);
        }
        match voucher_type {
            VoucherType::Percentage if self.0 > Self::PERCENTAGE_MAX => {
                Some(ValueBound::PercentageMaximum)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ValueBound, VoucherValue};
    use crate::entity::VoucherType;

    #[test]
    fn fixed_has_no_upper_bound() {
        assert_eq!(VoucherValue::new(1).violated_bound(&VoucherType::Fixed), None);
        assert_eq!(VoucherValue::new(5000).violated_bound(&VoucherType::Fixed), None);
        assert_eq!(
            VoucherValue::new(0.5).violated_bound(&VoucherType::Fixed),
            Some(ValueBound::Minimum)
        );
    }

    #[test]
    fn percentage_is_capped() {
        assert_eq!(VoucherValue::new(100).violated_bound(&VoucherType::Percentage), None);
        assert_eq!(
            VoucherValue::new(120).violated_bound(&VoucherType::Percentage),
            Some(ValueBound::PercentageMaximum)
        );
        assert_eq!(
            VoucherValue::new(0).violated_bound(&VoucherType::Percentage),
            Some(ValueBound::Minimum)
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(
            VoucherValue::new(f64::NAN).violated_bound(&VoucherType::Fixed),
            Some(ValueBound::Minimum)
        );
        assert_eq!(
            VoucherValue::new(f64::INFINITY).violated_bound(&VoucherType::Fixed),
            Some(ValueBound::Minimum)
        );
    }
}
