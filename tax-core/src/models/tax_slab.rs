use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A contiguous income range taxed at a single marginal rate.
///
/// `min_income` is inclusive and `max_income` exclusive; `None` marks the
/// open-ended top slab. `rate` is a percentage (`5` means 5%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxSlab {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            rate,
        }
    }

    /// Width of the slab, or `None` for the open-ended slab.
    pub fn width(&self) -> Option<Decimal> {
        self.max_income.map(|max| max - self.min_income)
    }
}

/// Errors raised when a sequence of slabs does not form a valid table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabTableError {
    #[error("slab table is empty")]
    Empty,

    #[error("first slab must start at 0, got {0}")]
    FirstSlabNotZero(Decimal),

    #[error("slab {index} starts at {found} but the previous slab ends at {expected}")]
    Gap {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("slab {index} has an upper bound {max} not above its lower bound {min}")]
    EmptyRange {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("slab {0} is unbounded but is not the last slab")]
    UnboundedBeforeEnd(usize),

    #[error("last slab must be unbounded")]
    BoundedTop,

    #[error("slab {index} has rate {rate}, expected a percentage between 0 and 100")]
    InvalidRate { index: usize, rate: Decimal },
}

/// An ordered, gapless, non-overlapping set of slabs.
///
/// Outside this crate a table can only be built through [`SlabTable::new`]
/// (or deserialisation, which goes through the same checks), so holders can
/// rely on the ordering and coverage invariants without re-checking them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxSlab>", into = "Vec<TaxSlab>")]
pub struct SlabTable {
    slabs: Vec<TaxSlab>,
}

impl SlabTable {
    /// Validates `slabs` and wraps them in a table.
    ///
    /// # Errors
    ///
    /// Returns [`SlabTableError`] if the slabs are empty, do not start at 0,
    /// leave a gap or overlap, contain an empty range, are bounded at the
    /// top, or carry a rate outside `0..=100`.
    pub fn new(slabs: Vec<TaxSlab>) -> Result<Self, SlabTableError> {
        let first = slabs.first().ok_or(SlabTableError::Empty)?;
        if first.min_income != Decimal::ZERO {
            return Err(SlabTableError::FirstSlabNotZero(first.min_income));
        }

        let last_index = slabs.len() - 1;
        let mut expected_min = Decimal::ZERO;

        for (index, slab) in slabs.iter().enumerate() {
            if slab.min_income != expected_min {
                return Err(SlabTableError::Gap {
                    index,
                    expected: expected_min,
                    found: slab.min_income,
                });
            }
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE_HUNDRED {
                return Err(SlabTableError::InvalidRate {
                    index,
                    rate: slab.rate,
                });
            }

            match slab.max_income {
                Some(max) if max <= slab.min_income => {
                    return Err(SlabTableError::EmptyRange {
                        index,
                        min: slab.min_income,
                        max,
                    });
                }
                Some(_) if index == last_index => return Err(SlabTableError::BoundedTop),
                Some(max) => expected_min = max,
                None if index != last_index => {
                    return Err(SlabTableError::UnboundedBeforeEnd(index));
                }
                None => {}
            }
        }

        Ok(Self { slabs })
    }

    /// Wraps slabs that are known to be valid, such as the built-in tables.
    pub(crate) fn from_trusted(slabs: Vec<TaxSlab>) -> Self {
        debug_assert!(Self::new(slabs.clone()).is_ok());
        Self { slabs }
    }

    pub fn slabs(&self) -> &[TaxSlab] {
        &self.slabs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxSlab> {
        self.slabs.iter()
    }

    /// The slab whose range contains `income`, treating upper bounds as exclusive.
    pub fn slab_for(
        &self,
        income: Decimal,
    ) -> Option<&TaxSlab> {
        self.slabs.iter().find(|s| {
            income >= s.min_income && s.max_income.is_none_or(|max| income < max)
        })
    }
}

impl TryFrom<Vec<TaxSlab>> for SlabTable {
    type Error = SlabTableError;

    fn try_from(slabs: Vec<TaxSlab>) -> Result<Self, Self::Error> {
        Self::new(slabs)
    }
}

impl From<SlabTable> for Vec<TaxSlab> {
    fn from(table: SlabTable) -> Self {
        table.slabs
    }
}

impl<'a> IntoIterator for &'a SlabTable {
    type Item = &'a TaxSlab;
    type IntoIter = std::slice::Iter<'a, TaxSlab>;

    fn into_iter(self) -> Self::IntoIter {
        self.slabs.iter()
    }
}
