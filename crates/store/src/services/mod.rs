//! Operations exposed to the command dispatcher.

pub mod users;

pub use users::{
    ChangeEmailOutcome, CreateOutcome, DeleteOutcome, Initialized, ListingScope, LookupOutcome,
    UserListing,
};
