mod inputs;
mod regime;
mod tax_result;
mod tax_slab;
mod tax_year_config;

pub use inputs::{CompensationInputs, DeductionInputs, HousingDetails};
pub use regime::Regime;
pub use tax_result::{BracketLine, DeductionBreakdown, SlabBreakdown, TaxResult};
pub use tax_slab::{SlabTable, SlabTableError, TaxSlab};
pub use tax_year_config::{ExemptionLimits, RegimeRules, TaxYearConfig, TaxYearConfigError};
