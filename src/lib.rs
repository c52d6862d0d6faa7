//! # Billing Core
//!
//! A small-business billing library providing invoicing, purchasing,
//! inventory tracking, and Indian GST computation.
//!
//! ## Features
//!
//! - **GST computation**: CGST/SGST intrastate splits and IGST interstate
//!   totals, exact to the paisa via `BigDecimal`
//! - **Invoice workflow**: per-line tax snapshots, header + line
//!   persistence, payment recording with partial/paid transitions
//! - **Purchase workflow**: SKU resolution with catalog auto-creation,
//!   goods receipt, supplier payments
//! - **Inventory tracking**: stock-ledger entries tied to the document
//!   events that move goods, plus manual adjustments
//! - **Cash book**: the flat income/expense register behind receivables
//!   and payables reporting
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage
//!
//! ## Quick Start
//!
//! ```rust
//! use billing_core::{Billing, MemoryStore};
//!
//! // The facade works against any BillingStore implementation
//! let mut billing = Billing::new(MemoryStore::new());
//! ```

pub mod billing;
pub mod cashbook;
pub mod inventory;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use billing::*;
pub use cashbook::*;
pub use inventory::*;
pub use tax::gst::*;
pub use traits::*;
pub use types::*;

// Re-export the in-memory store for tests and examples
pub use utils::memory_store::MemoryStore;
