use crate::error::Result;
use crate::model::Document;
use crate::store::DataStore;

use super::helpers::current;

/// The whole document, as the browser client fetches it on every refresh.
pub fn run<S: DataStore + ?Sized>(store: &S) -> Result<Document> {
    current(store)
}
