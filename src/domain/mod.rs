//! Quote calculation lives here: pure functions over an immutable field
//! snapshot and an injected price table.

pub mod app_state;
pub mod entities;
pub mod fields;
pub mod price_table;
pub mod projection;
pub mod quote;

#[allow(unused_imports)]
pub use app_state::{AppState, PersistedState, PriceOrigin, PriceStatus};
#[allow(unused_imports)]
pub use entities::{
    EngineConfig, ExtraLine, ExtraSpec, LineItem, QuoteResult, ShapeType, SideSurcharge,
    SpecialResult, TotalsResult, VatPolicy,
};
#[allow(unused_imports)]
pub use fields::{FieldSnapshot, FieldValue};
#[allow(unused_imports)]
pub use price_table::PriceTable;
#[allow(unused_imports)]
pub use projection::{area_m2, project, sek, PLACEHOLDER};
#[allow(unused_imports)]
pub use quote::{compute, CATALOG, REDUCED_RATIO, SIDE_FLAGS};
