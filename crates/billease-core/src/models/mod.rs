//! # Module Inputs
//!
//! Request bodies for every write endpoint, one file per business module.
//!
//! ## Shape of an Input
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON body ──serde (lenient)──► XxxInput ──validated()──► XxxInput     │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                             serde_json::to_value ──► row fields        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names are the table column names, so serializing a validated
//! input yields exactly the columns to write. `type` columns are exposed
//! as `kind` in Rust.

pub mod accounts;
pub mod crm;
pub mod finance;
pub mod inventory;
pub mod pos;

pub use accounts::{
    CompanyInput, EmployeeInput, HeadInput, ItemMasterInput, LedgerInput, PartyInput,
};
pub use crm::{ActivityInput, CommunicationInput, CustomerInput, LeadInput};
pub use finance::{BudgetInput, CategoryInput, FamilyMemberInput, RecurringInput, TransactionInput};
pub use inventory::{ItemInput, StockMovementInput, WarehouseInput};
pub use pos::{
    EntityInput, LineItemInput, PaymentInput, ProductInput, QuotationInput, SaleInput,
};
