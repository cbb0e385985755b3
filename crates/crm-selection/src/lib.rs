//! crm-selection - Bulk selection and label diffing for paginated tables
//!
//! Every server-paginated CRM table (customers, IB requests, affiliates,
//! agents) lets the user tick rows across pages, select "all rows matching
//! the filter", carve exceptions out of that, and then run a bulk mutation.
//! This crate holds the selection state behind those gestures and turns it
//! into request payloads.
//!
//! # Example
//!
//! ```
//! use crm_selection::{BulkAction, BulkRequestBuilder, LabelDiff, RowId, SelectionState};
//!
//! let mut state = SelectionState::new(10);
//! state.select_all_matching();
//! state.deselect_one(RowId::from(142u64));
//!
//! let diff = LabelDiff::between(&[RowId::from(3u64)], &[RowId::from(7u64)]);
//! let payload = BulkRequestBuilder::default()
//!     .build_json(BulkAction::AssignLabels(diff), &state, Default::default())
//!     .unwrap();
//! assert_eq!(payload["non_client_ids"][0], "142");
//! assert_eq!(payload["add_label_ids"][0], "7");
//! ```

pub mod config;
pub mod error;
pub mod filters;
pub mod id;
pub mod id_set;
pub mod label_diff;
pub mod page;
pub mod request;
pub mod resource;
pub mod selection;
pub mod sync;

pub use config::*;
pub use error::*;
pub use filters::*;
pub use id::*;
pub use id_set::*;
pub use label_diff::*;
pub use page::*;
pub use request::*;
pub use resource::*;
pub use selection::*;
pub use sync::*;
