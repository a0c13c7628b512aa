#![allow(missing_docs)]

//! This module defines the physical and monetary quantities used in cost accounting.
//!
//! Each quantity is a thin wrapper around an `f64`. Only the products and quotients that make
//! physical sense are implemented, so e.g. multiplying a load by a price yields [`Money`] only
//! once the load has been turned into [`Energy`] with a snapshot weighting.
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::Neg,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub const fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl From<f64> for $name {
            fn from(val: f64) -> Self {
                Self(val)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl ApproxEq for $name {
            type Margin = F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

macro_rules! dimensioned_ops {
    ($name:ident) => {
        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl std::ops::Div for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

// Dimensionless quantities (rates, factors, fractions)
unit_struct!(Dimensionless);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

// Base quantities
unit_struct!(Money);
unit_struct!(Year);
unit_struct!(Hour);
unit_struct!(Power);
unit_struct!(Capacity);
unit_struct!(Energy);
unit_struct!(Length);
unit_struct!(Emissions);

// Derived quantities
unit_struct!(MoneyPerCapacity);
unit_struct!(MoneyPerCapacityPerLength);
unit_struct!(MoneyPerEnergy);
unit_struct!(MoneyPerEmissions);
unit_struct!(EmissionsPerEnergy);

dimensioned_ops!(Money);
dimensioned_ops!(Year);
dimensioned_ops!(Hour);
dimensioned_ops!(Power);
dimensioned_ops!(Capacity);
dimensioned_ops!(Energy);
dimensioned_ops!(Length);
dimensioned_ops!(Emissions);
dimensioned_ops!(MoneyPerCapacity);
dimensioned_ops!(MoneyPerCapacityPerLength);
dimensioned_ops!(MoneyPerEnergy);
dimensioned_ops!(MoneyPerEmissions);
dimensioned_ops!(EmissionsPerEnergy);

// Multiplication rules
impl_mul!(Power, Hour, Energy);
impl_mul!(Energy, MoneyPerEnergy, Money);
impl_mul!(Energy, EmissionsPerEnergy, Emissions);
impl_mul!(Emissions, MoneyPerEmissions, Money);
impl_mul!(MoneyPerCapacity, Capacity, Money);
impl_mul!(MoneyPerCapacityPerLength, Length, MoneyPerCapacity);

// Division rules
impl_div!(Money, Energy, MoneyPerEnergy);
impl_div!(Money, Capacity, MoneyPerCapacity);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_load_times_price_is_money() {
        let energy = Power(100.0) * Hour(3.0);
        assert_eq!(energy, Energy(300.0));
        assert_eq!(energy * MoneyPerEnergy(50.0), Money(15000.0));
    }

    #[test]
    fn test_transmission_cost_chain() {
        let per_capacity = MoneyPerCapacityPerLength(400.0) * Length(600.0);
        assert_eq!(per_capacity, MoneyPerCapacity(240_000.0));
        assert_eq!(per_capacity * Capacity(2.0), Money(480_000.0));
    }

    #[test]
    fn test_negate() {
        assert_eq!(-Money(250.0), Money(-250.0));
        assert_eq!(-(Money(1.0) - Money(3.0)), Money(2.0));
    }

    #[test]
    fn test_sum_and_ratio() {
        let total: Money = [Money(1.5), Money(2.5), Money(-1.0)].into_iter().sum();
        assert_approx_eq!(Money, total, Money(3.0));
        assert_approx_eq!(Dimensionless, Money(3.0) / Money(1.5), Dimensionless(2.0));
    }
}
