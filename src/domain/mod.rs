pub mod common;
pub mod counter_party;
pub mod query;
pub mod transaction;

pub use common::{tags, Displayable, NamedEntity, Tags};
pub use counter_party::{CounterPartyIdentity, RecordModifier, TransactionModifier};
pub use query::{TimeRange, TransactionQuery};
pub use transaction::{
    FieldMismatch, Fingerprint, NewTransaction, Reconciliation, RecordField, TransactionRecord,
    UNCATEGORIZED,
};
